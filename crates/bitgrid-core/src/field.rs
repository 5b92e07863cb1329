//! Dense bit grid with a sparse property overlay
//!
//! [`BitField`] owns a dense plane of 0/1 cells over a fixed 3D or 4D
//! integer coordinate grid, plus a sparse map of per-cell properties.
//! The rank is a const-generic parameter, so a 3D field and a 4D field
//! are distinct types and can never be mixed in one operation.

use crate::error::{BitGridError, Result};
use crate::property::{PropertyMap, PropertyValue};
use std::collections::HashMap;

/// A coordinate in an `N`-dimensional grid.
pub type Coord<const N: usize> = [usize; N];

/// Dense `N`-dimensional bit grid with sparse per-cell properties.
///
/// Bits are stored row-major with the LAST axis varying fastest; this
/// is the order used by [`crate::transform::extract_linear`] and its
/// inverse mappings. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BitField<const N: usize> {
    pub(crate) dims: [usize; N],
    pub(crate) bits: Vec<u8>,
    pub(crate) properties: HashMap<Coord<N>, PropertyMap>,
}

/// Three-dimensional bit grid (x, y, z).
pub type BitField3 = BitField<3>;
/// Four-dimensional bit grid (x, y, z, t).
pub type BitField4 = BitField<4>;

impl<const N: usize> BitField<N> {
    /// Create a zero-initialized field with the given per-axis extents.
    pub fn new(dims: [usize; N]) -> Result<Self> {
        for (axis, &size) in dims.iter().enumerate() {
            if size == 0 {
                return Err(BitGridError::InvalidDimension { axis, size });
            }
        }
        Ok(Self {
            dims,
            bits: vec![0; volume(&dims)],
            properties: HashMap::new(),
        })
    }

    /// Per-axis extents of the grid.
    #[inline]
    pub fn dimensions(&self) -> [usize; N] {
        self.dims
    }

    /// Number of spatial axes (3 or 4).
    #[inline]
    pub fn rank(&self) -> usize {
        N
    }

    /// Total number of cells.
    #[inline]
    pub fn volume(&self) -> usize {
        self.bits.len()
    }

    /// Number of cells currently set to 1.
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Bit value at `coord`.
    pub fn get_bit(&self, coord: Coord<N>) -> Result<u8> {
        let idx = self.checked_index(coord)?;
        Ok(self.bits[idx])
    }

    /// Overwrite the bit at `coord` with `value` (0 or 1).
    pub fn set_bit(&mut self, coord: Coord<N>, value: u8) -> Result<()> {
        if value > 1 {
            return Err(BitGridError::InvalidValue(value));
        }
        let idx = self.checked_index(coord)?;
        self.bits[idx] = value;
        Ok(())
    }

    /// Attach a named property to the cell at `coord`.
    pub fn set_property(
        &mut self,
        coord: Coord<N>,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        self.checked_index(coord)?;
        self.properties
            .entry(coord)
            .or_default()
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Property value at `coord`, or `None` when the name is unset.
    pub fn get_property(&self, coord: Coord<N>, name: &str) -> Result<Option<&PropertyValue>> {
        self.checked_index(coord)?;
        Ok(self.properties.get(&coord).and_then(|m| m.get(name)))
    }

    /// Names of every property set on the cell at `coord`, sorted.
    pub fn property_names(&self, coord: Coord<N>) -> Result<Vec<&str>> {
        self.checked_index(coord)?;
        Ok(self
            .properties
            .get(&coord)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default())
    }

    /// Whether `coord` lies inside the grid on every axis.
    #[inline]
    pub fn in_bounds(&self, coord: Coord<N>) -> bool {
        coord.iter().zip(&self.dims).all(|(c, d)| c < d)
    }

    /// Row-major iterator over every coordinate of the grid.
    pub fn coords(&self) -> impl Iterator<Item = Coord<N>> {
        coords(self.dims)
    }

    #[inline]
    pub(crate) fn checked_index(&self, coord: Coord<N>) -> Result<usize> {
        if !self.in_bounds(coord) {
            return Err(BitGridError::OutOfBounds {
                coord: coord.to_vec(),
                dims: self.dims.to_vec(),
            });
        }
        Ok(linear_index(&self.dims, &coord))
    }

    /// Bit at an already-validated coordinate.
    #[inline]
    pub(crate) fn bit_at(&self, coord: Coord<N>) -> u8 {
        self.bits[linear_index(&self.dims, &coord)]
    }

    /// Write a bit at an already-validated coordinate.
    #[inline]
    pub(crate) fn put_bit(&mut self, coord: Coord<N>, value: u8) {
        let idx = linear_index(&self.dims, &coord);
        self.bits[idx] = value;
    }
}

/// Product of the per-axis extents.
#[inline]
pub(crate) fn volume<const N: usize>(dims: &[usize; N]) -> usize {
    dims.iter().product()
}

/// Row-major linear index of `coord` (last axis fastest).
#[inline]
pub(crate) fn linear_index<const N: usize>(dims: &[usize; N], coord: &[usize; N]) -> usize {
    coord.iter().zip(dims).fold(0, |acc, (c, d)| acc * d + c)
}

/// Coordinate of the row-major linear index `idx`.
#[inline]
pub(crate) fn coord_at<const N: usize>(dims: &[usize; N], mut idx: usize) -> [usize; N] {
    let mut coord = [0usize; N];
    for i in (0..N).rev() {
        coord[i] = idx % dims[i];
        idx /= dims[i];
    }
    coord
}

/// Row-major iterator over every coordinate of a grid with extents `dims`.
pub(crate) fn coords<const N: usize>(dims: [usize; N]) -> impl Iterator<Item = [usize; N]> {
    (0..volume(&dims)).map(move |i| coord_at(&dims, i))
}
