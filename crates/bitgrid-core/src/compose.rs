//! Elementwise composition of same-shaped fields
//!
//! Superposition is a pure OR-merge. Entanglement is the one place
//! shared mutable state exists in this crate: both returned handles
//! reference a single coordinator that owns the two bit planes and
//! the pairing table, and every write goes through its lock, so
//! propagation is serialized even across threads.

use crate::error::{BitGridError, Result};
use crate::field::{BitField, Coord};
use crate::pattern::wave_positive;
use crate::property::PropertyValue;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Elementwise OR of two same-shaped fields.
///
/// The result bit at every coordinate is `a OR b`. Properties merge
/// per coordinate with `b` overriding `a` on name collision. Fails
/// with [`BitGridError::ShapeMismatch`] when extents differ.
pub fn superposition<const N: usize>(a: &BitField<N>, b: &BitField<N>) -> Result<BitField<N>> {
    check_same_shape(a, b)?;

    let mut out = a.clone();
    for (dst, &src) in out.bits.iter_mut().zip(&b.bits) {
        *dst |= src;
    }
    for (coord, props) in &b.properties {
        out.properties
            .entry(*coord)
            .or_default()
            .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Ok(out)
}

/// Named deterministic bit-flip transforms over a whole field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KineticTransform {
    /// Flip cells where the alternating sin/cos product is positive.
    Wave,
    /// Flip cells where `(c0 & c1) == (c[N-2] & c[N-1])`.
    Fractal,
    /// Flip cells where the coordinate sum is divisible by the rank.
    Recursive,
}

/// Apply a deterministic flip mask to a copy of `field`.
///
/// Each transform is an involution: applying it twice restores the
/// original bit plane. Properties are untouched.
pub fn apply_kinetic<const N: usize>(
    field: &BitField<N>,
    transform: KineticTransform,
) -> BitField<N> {
    let mut out = field.clone();
    for coord in field.coords() {
        let flip = match transform {
            KineticTransform::Wave => wave_positive(&coord),
            KineticTransform::Fractal => (coord[0] & coord[1]) == (coord[N - 2] & coord[N - 1]),
            KineticTransform::Recursive => coord.iter().sum::<usize>() % N == 0,
        };
        if flip {
            let current = out.bit_at(coord);
            out.put_bit(coord, 1 - current);
        }
    }
    out
}

/// Which side of an entangled pair a handle views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Coordinator state shared by both handles of an entangled pair.
#[derive(Debug)]
struct PairState<const N: usize> {
    a: BitField<N>,
    b: BitField<N>,
    /// Coordinate in one field -> paired coordinate in the other.
    /// Identity mapping at entanglement time; emptied by `unlink`.
    links: HashMap<Coord<N>, Coord<N>>,
}

/// One side of an entangled pair of fields.
///
/// While the pairing is intact, `set_bit` on either handle also
/// writes the paired coordinate on the other side with the same
/// value. All access is serialized through the coordinator's lock.
#[derive(Debug)]
pub struct Entangled<const N: usize> {
    shared: Arc<Mutex<PairState<N>>>,
    side: Side,
}

/// Entangle two same-shaped fields.
///
/// Both inputs are copied into a shared coordinator; the originals
/// stay untouched and independent. The pairing table maps every
/// coordinate to the same coordinate in the other field. Fails with
/// [`BitGridError::ShapeMismatch`] when extents differ.
pub fn entangle<const N: usize>(
    a: &BitField<N>,
    b: &BitField<N>,
) -> Result<(Entangled<N>, Entangled<N>)> {
    check_same_shape(a, b)?;

    let links = a.coords().map(|c| (c, c)).collect();
    let shared = Arc::new(Mutex::new(PairState {
        a: a.clone(),
        b: b.clone(),
        links,
    }));
    let handle_a = Entangled {
        shared: Arc::clone(&shared),
        side: Side::A,
    };
    let handle_b = Entangled {
        shared,
        side: Side::B,
    };
    Ok((handle_a, handle_b))
}

impl<const N: usize> Entangled<N> {
    /// Per-axis extents of the underlying field.
    pub fn dimensions(&self) -> [usize; N] {
        self.shared.lock().a.dimensions()
    }

    /// Bit value on this side at `coord`.
    pub fn get_bit(&self, coord: Coord<N>) -> Result<u8> {
        let state = self.shared.lock();
        self.own(&state).get_bit(coord)
    }

    /// Write a bit on this side; while linked, the paired coordinate
    /// on the other side receives the same value.
    pub fn set_bit(&self, coord: Coord<N>, value: u8) -> Result<()> {
        let mut state = self.shared.lock();
        self.own_mut(&mut state).set_bit(coord, value)?;
        if let Some(paired) = state.links.get(&coord).copied() {
            trace!(?coord, ?paired, value, "entangled propagation");
            self.other_mut(&mut state).set_bit(paired, value)?;
        }
        Ok(())
    }

    /// Attach a property on this side only; properties do not
    /// propagate.
    pub fn set_property(
        &self,
        coord: Coord<N>,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let mut state = self.shared.lock();
        self.own_mut(&mut state).set_property(coord, name, value)
    }

    /// Property value on this side, cloned out of the coordinator.
    pub fn get_property(&self, coord: Coord<N>, name: &str) -> Result<Option<PropertyValue>> {
        let state = self.shared.lock();
        Ok(self.own(&state).get_property(coord, name)?.cloned())
    }

    /// Whether the pairing is still intact.
    pub fn is_linked(&self) -> bool {
        !self.shared.lock().links.is_empty()
    }

    /// Sever the pairing for BOTH handles without altering any bit.
    pub fn unlink(&self) {
        self.shared.lock().links.clear();
    }

    /// Snapshot this side as an independently owned field.
    ///
    /// The handle is consumed; the snapshot never sees later writes
    /// through the surviving handle.
    pub fn release(self) -> BitField<N> {
        let state = self.shared.lock();
        self.own(&state).clone()
    }

    fn own<'s>(&self, state: &'s PairState<N>) -> &'s BitField<N> {
        match self.side {
            Side::A => &state.a,
            Side::B => &state.b,
        }
    }

    fn own_mut<'s>(&self, state: &'s mut PairState<N>) -> &'s mut BitField<N> {
        match self.side {
            Side::A => &mut state.a,
            Side::B => &mut state.b,
        }
    }

    fn other_mut<'s>(&self, state: &'s mut PairState<N>) -> &'s mut BitField<N> {
        match self.side {
            Side::A => &mut state.b,
            Side::B => &mut state.a,
        }
    }
}

fn check_same_shape<const N: usize>(a: &BitField<N>, b: &BitField<N>) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(BitGridError::ShapeMismatch {
            expected: a.dimensions().to_vec(),
            actual: b.dimensions().to_vec(),
        });
    }
    Ok(())
}
