//! Geometric transforms over bit fields
//!
//! Every function here takes a field by reference and returns a new
//! field; inputs are never mutated. Rotation, mirroring, translation,
//! and scaling are defined for rank 3 only — a 4D rotation about a
//! single named axis is ambiguous, and the type system rejects it by
//! construction.

use crate::error::{BitGridError, Result};
use crate::field::{coords, BitField, BitField3, BitField4, Coord};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Rotation axis for [`rotate3d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Rotate about the x axis (moves y and z).
    X,
    /// Rotate about the y axis (moves z and x).
    Y,
    /// Rotate about the z axis (moves x and y).
    Z,
}

/// Mirror plane for [`mirror3d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    /// The xy plane; mirroring reflects the z axis.
    Xy,
    /// The xz plane; mirroring reflects the y axis.
    Xz,
    /// The yz plane; mirroring reflects the x axis.
    Yz,
}

/// Rotate a 3D field about `axis` by `degrees`.
///
/// Only multiples of 90 degrees are defined on an integer grid; any
/// other angle returns [`BitGridError::InvalidAngle`]. The angle is
/// normalized modulo 360, so `-90` and `270` agree. Output extents are
/// the input extents permuted by the rotation, and every bit moves
/// rigidly together with its properties. Four 90-degree turns about
/// the same axis restore the original field.
pub fn rotate3d(field: &BitField3, axis: Axis, degrees: i32) -> Result<BitField3> {
    let turns = match degrees.rem_euclid(360) {
        0 => 0,
        90 => 1,
        180 => 2,
        270 => 3,
        _ => return Err(BitGridError::InvalidAngle(degrees)),
    };
    trace!(?axis, degrees, turns, "rotate3d");

    let mut out = field.clone();
    for _ in 0..turns {
        out = quarter_turn(&out, axis);
    }
    Ok(out)
}

/// One positive quarter turn about `axis`.
///
/// Mappings (with input extents `[dx, dy, dz]`):
///   about z: `(x, y, z) -> (dy-1-y, x, z)`, extents `[dy, dx, dz]`
///   about x: `(x, y, z) -> (x, dz-1-z, y)`, extents `[dx, dz, dy]`
///   about y: `(x, y, z) -> (z, y, dx-1-x)`, extents `[dz, dy, dx]`
fn quarter_turn(field: &BitField3, axis: Axis) -> BitField3 {
    let [dx, dy, dz] = field.dims;
    let new_dims = match axis {
        Axis::Z => [dy, dx, dz],
        Axis::X => [dx, dz, dy],
        Axis::Y => [dz, dy, dx],
    };
    let map = |[x, y, z]: Coord<3>| -> Coord<3> {
        match axis {
            Axis::Z => [dy - 1 - y, x, z],
            Axis::X => [x, dz - 1 - z, y],
            Axis::Y => [z, y, dx - 1 - x],
        }
    };

    // Cell count is preserved, so the fresh allocation cannot fail.
    let mut out = BitField {
        dims: new_dims,
        bits: vec![0; field.volume()],
        properties: Default::default(),
    };
    for coord in field.coords() {
        let bit = field.bit_at(coord);
        if bit == 1 {
            out.put_bit(map(coord), 1);
        }
    }
    for (coord, props) in &field.properties {
        out.properties.insert(map(*coord), props.clone());
    }
    out
}

/// Shift every cell of a 3D field by an integer vector.
///
/// Cells shifted outside the grid are dropped (clipped, not wrapped);
/// output extents equal input extents.
pub fn translate3d(field: &BitField3, vector: [i64; 3]) -> BitField3 {
    let mut out = BitField {
        dims: field.dims,
        bits: vec![0; field.volume()],
        properties: Default::default(),
    };
    for coord in field.coords() {
        if field.bit_at(coord) == 1 {
            if let Some(dest) = shifted(field, coord, vector) {
                out.put_bit(dest, 1);
            }
        }
    }
    for (coord, props) in &field.properties {
        if let Some(dest) = shifted(field, *coord, vector) {
            out.properties.insert(dest, props.clone());
        }
    }
    out
}

fn shifted(field: &BitField3, coord: Coord<3>, vector: [i64; 3]) -> Option<Coord<3>> {
    let mut dest = [0usize; 3];
    for i in 0..3 {
        let d = coord[i] as i64 + vector[i];
        if d < 0 || d >= field.dims[i] as i64 {
            return None;
        }
        dest[i] = d as usize;
    }
    Some(dest)
}

/// Resample a 3D field by per-axis scale factors.
///
/// Output extent per axis is `round(extent * factor)` with a minimum
/// of 1. Each destination cell copies the bit and properties of the
/// source cell found by inverse-scaling its coordinate and rounding to
/// the nearest integer, clamped to the source bounds. Fails with
/// [`BitGridError::InvalidFactor`] when a factor is not finite and
/// positive.
pub fn scale3d(field: &BitField3, factors: [f64; 3]) -> Result<BitField3> {
    for (axis, &factor) in factors.iter().enumerate() {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(BitGridError::InvalidFactor { axis, factor });
        }
    }

    let mut new_dims = [0usize; 3];
    for i in 0..3 {
        new_dims[i] = ((field.dims[i] as f64 * factors[i]).round() as usize).max(1);
    }
    trace!(?new_dims, "scale3d");

    let mut out = BitField::new(new_dims)?;
    for dest in coords(new_dims) {
        let mut src = [0usize; 3];
        for i in 0..3 {
            let s = (dest[i] as f64 / factors[i]).round() as usize;
            src[i] = s.min(field.dims[i] - 1);
        }
        if field.bit_at(src) == 1 {
            out.put_bit(dest, 1);
        }
        if let Some(props) = field.properties.get(&src) {
            out.properties.insert(dest, props.clone());
        }
    }
    Ok(out)
}

/// Reflect a 3D field across a coordinate plane.
///
/// Output extents are unchanged; applying the same mirror twice
/// restores the original field.
pub fn mirror3d(field: &BitField3, plane: Plane) -> BitField3 {
    let flip_axis = match plane {
        Plane::Xy => 2,
        Plane::Xz => 1,
        Plane::Yz => 0,
    };
    let dim = field.dims[flip_axis];
    let map = |mut coord: Coord<3>| -> Coord<3> {
        coord[flip_axis] = dim - 1 - coord[flip_axis];
        coord
    };

    let mut out = BitField {
        dims: field.dims,
        bits: vec![0; field.volume()],
        properties: Default::default(),
    };
    for coord in field.coords() {
        if field.bit_at(coord) == 1 {
            out.put_bit(map(coord), 1);
        }
    }
    for (coord, props) in &field.properties {
        out.properties.insert(map(*coord), props.clone());
    }
    out
}

/// Map a linear bit sequence onto a 3D grid (row-major, last axis
/// fastest). Exact inverse of [`extract_linear`] for bit values.
pub fn map_to_3d(data: &[u8], dims: [usize; 3]) -> Result<BitField3> {
    from_linear(data, dims)
}

/// Map a linear bit sequence onto a 4D grid (row-major, last axis
/// fastest). Exact inverse of [`extract_linear`] for bit values.
pub fn map_to_4d(data: &[u8], dims: [usize; 4]) -> Result<BitField4> {
    from_linear(data, dims)
}

fn from_linear<const N: usize>(data: &[u8], dims: [usize; N]) -> Result<BitField<N>> {
    let mut out = BitField::new(dims)?;
    if data.len() != out.volume() {
        return Err(BitGridError::ShapeMismatch {
            expected: vec![out.volume()],
            actual: vec![data.len()],
        });
    }
    for &value in data {
        if value > 1 {
            return Err(BitGridError::InvalidValue(value));
        }
    }
    out.bits.copy_from_slice(data);
    Ok(out)
}

/// Extract the bits of a field in row-major order (last axis fastest).
///
/// Properties are not part of the linear representation.
pub fn extract_linear<const N: usize>(field: &BitField<N>) -> Vec<u8> {
    field.bits.clone()
}

/// Relabel a field's cells under new extents with the same total
/// volume. Bits pass through the row-major linear form; properties are
/// not carried (they are not part of the linear representation).
pub fn reshape<const A: usize, const B: usize>(
    field: &BitField<A>,
    new_dims: [usize; B],
) -> Result<BitField<B>> {
    let mut out = BitField::new(new_dims)?;
    if out.volume() != field.volume() {
        return Err(BitGridError::ShapeMismatch {
            expected: field.dims.to_vec(),
            actual: new_dims.to_vec(),
        });
    }
    out.bits.copy_from_slice(&field.bits);
    Ok(out)
}

/// Copy a sub-box out of a field, rebasing coordinates to the block's
/// own origin. Bits and properties are both carried.
pub fn extract_block<const N: usize>(
    field: &BitField<N>,
    origin: Coord<N>,
    block_dims: [usize; N],
) -> Result<BitField<N>> {
    let mut block = BitField::new(block_dims)?;
    check_fit(field, origin, block_dims)?;

    for local in coords(block_dims) {
        let mut src = origin;
        for i in 0..N {
            src[i] += local[i];
        }
        if field.bit_at(src) == 1 {
            block.put_bit(local, 1);
        }
        if let Some(props) = field.properties.get(&src) {
            block.properties.insert(local, props.clone());
        }
    }
    Ok(block)
}

/// Write a block into a copy of `target` at `origin`.
///
/// Block bits overwrite the region; block properties merge over any
/// existing properties per cell and name.
pub fn insert_block<const N: usize>(
    target: &BitField<N>,
    block: &BitField<N>,
    origin: Coord<N>,
) -> Result<BitField<N>> {
    check_fit(target, origin, block.dims)?;

    let mut out = target.clone();
    for local in coords(block.dims) {
        let mut dest = origin;
        for i in 0..N {
            dest[i] += local[i];
        }
        out.put_bit(dest, block.bit_at(local));
        if let Some(props) = block.properties.get(&local) {
            out.properties
                .entry(dest)
                .or_default()
                .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    Ok(out)
}

fn check_fit<const N: usize>(
    field: &BitField<N>,
    origin: Coord<N>,
    block_dims: [usize; N],
) -> Result<()> {
    for i in 0..N {
        if origin[i] + block_dims[i] > field.dims[i] {
            let mut corner = origin;
            for j in 0..N {
                corner[j] += block_dims[j] - 1;
            }
            return Err(BitGridError::OutOfBounds {
                coord: corner.to_vec(),
                dims: field.dims.to_vec(),
            });
        }
    }
    Ok(())
}
