//! Pattern generation, search, and approximate matching
//!
//! Search is an exhaustive sliding-window scan over every candidate
//! origin. The scan is parallelized across origins with rayon; result
//! values and ordering are identical to a serial scan.

use crate::error::{BitGridError, Result};
use crate::field::{coord_at, coords, linear_index, volume, BitField, Coord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Seed used by [`generate_pattern`] for the `Random` kind, so the
/// unseeded call is reproducible.
pub const DEFAULT_PATTERN_SEED: u64 = 42;

/// Canonical pattern shapes for [`generate_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Filled axis-aligned box centered in the grid, spanning half the
    /// extent per axis (rounded down, minimum 1).
    Cube,
    /// Filled ball: cells within half the minimum extent of the grid
    /// center.
    Sphere,
    /// Deterministic periodic pattern from an alternating sin/cos
    /// product over the axes.
    Wave,
    /// Independent Bernoulli(0.5) bits from a seeded generator.
    Random,
}

impl FromStr for PatternKind {
    type Err = BitGridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cube" => Ok(PatternKind::Cube),
            "sphere" => Ok(PatternKind::Sphere),
            "wave" => Ok(PatternKind::Wave),
            "random" => Ok(PatternKind::Random),
            other => Err(BitGridError::InvalidPatternType(other.to_string())),
        }
    }
}

/// One approximate match produced by [`match_pattern`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch<const N: usize> {
    /// Origin coordinate of the window in the searched field.
    pub origin: Coord<N>,
    /// Fraction of aligned cells where field and pattern bits agree.
    pub similarity: f64,
}

/// Generate a canonical pattern with the default seed.
///
/// `Cube`, `Sphere`, and `Wave` are fully determined by `dims`;
/// `Random` draws from [`DEFAULT_PATTERN_SEED`], so repeated calls
/// with the same dimensions always agree.
pub fn generate_pattern<const N: usize>(
    kind: PatternKind,
    dims: [usize; N],
) -> Result<BitField<N>> {
    generate_pattern_seeded(kind, dims, DEFAULT_PATTERN_SEED)
}

/// Generate a canonical pattern, drawing `Random` bits from `seed`.
pub fn generate_pattern_seeded<const N: usize>(
    kind: PatternKind,
    dims: [usize; N],
    seed: u64,
) -> Result<BitField<N>> {
    let mut field = BitField::new(dims)?;
    match kind {
        PatternKind::Cube => {
            let mut start = [0usize; N];
            let mut end = [0usize; N];
            for i in 0..N {
                let len = (dims[i] / 2).max(1);
                start[i] = (dims[i] - len) / 2;
                end[i] = start[i] + len;
            }
            for coord in coords(dims) {
                if (0..N).all(|i| coord[i] >= start[i] && coord[i] < end[i]) {
                    field.put_bit(coord, 1);
                }
            }
        }
        PatternKind::Sphere => {
            let radius = dims.iter().copied().min().unwrap_or(1) as f64 / 2.0;
            for coord in coords(dims) {
                let dist_sq: f64 = (0..N)
                    .map(|i| {
                        let center = (dims[i] - 1) as f64 / 2.0;
                        let d = coord[i] as f64 - center;
                        d * d
                    })
                    .sum();
                if dist_sq.sqrt() <= radius {
                    field.put_bit(coord, 1);
                }
            }
        }
        PatternKind::Wave => {
            for coord in coords(dims) {
                if wave_positive(&coord) {
                    field.put_bit(coord, 1);
                }
            }
        }
        PatternKind::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            for bit in field.bits.iter_mut() {
                *bit = u8::from(rng.gen_bool(0.5));
            }
        }
    }
    Ok(field)
}

/// Sign of the alternating sin/cos product at `coord`.
///
/// Axis 0 contributes `sin(c/2)`, axis 1 `cos(c/2)`, and so on
/// alternating; the bit is considered set where the product is
/// strictly positive. Shared with the wave kinetic transform.
pub(crate) fn wave_positive<const N: usize>(coord: &Coord<N>) -> bool {
    let mut product = 1.0f64;
    for (i, &c) in coord.iter().enumerate() {
        let v = c as f64 / 2.0;
        product *= if i % 2 == 0 { v.sin() } else { v.cos() };
    }
    product > 0.0
}

/// Find every exact occurrence of `pattern` inside `field`.
///
/// An origin matches when every SET pattern bit lines up with a set
/// field bit; pattern bits equal to 0 are wildcards. Results are in
/// ascending row-major order of origin. An all-zero pattern therefore
/// matches every valid origin.
pub fn find_pattern<const N: usize>(
    field: &BitField<N>,
    pattern: &BitField<N>,
) -> Result<Vec<Coord<N>>> {
    let origin_extent = window_extent(field, pattern)?;
    debug!(
        field_volume = field.volume(),
        pattern_volume = pattern.volume(),
        "find_pattern scan"
    );

    let origins: Vec<Coord<N>> = coords(origin_extent).collect();
    let hits = origins
        .par_iter()
        .filter(|origin| matches_at(field, pattern, **origin))
        .copied()
        .collect();
    Ok(hits)
}

/// Find approximate occurrences of `pattern` inside `field`.
///
/// Similarity is the fraction of aligned cells (over the pattern's
/// FULL extent, set or not) where field and pattern bits agree. Only
/// origins with similarity >= `threshold` are returned, ordered by
/// descending similarity with ties broken by ascending row-major
/// origin.
pub fn match_pattern<const N: usize>(
    field: &BitField<N>,
    pattern: &BitField<N>,
    threshold: f64,
) -> Result<Vec<PatternMatch<N>>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(BitGridError::InvalidThreshold(threshold));
    }
    let origin_extent = window_extent(field, pattern)?;
    debug!(
        field_volume = field.volume(),
        pattern_volume = pattern.volume(),
        threshold,
        "match_pattern scan"
    );

    let origins: Vec<Coord<N>> = coords(origin_extent).collect();
    let mut matches: Vec<PatternMatch<N>> = origins
        .par_iter()
        .filter_map(|origin| {
            let similarity = similarity_at(field, pattern, *origin);
            (similarity >= threshold).then_some(PatternMatch {
                origin: *origin,
                similarity,
            })
        })
        .collect();

    // Origins come out of the scan in ascending row-major order, so a
    // stable sort on similarity alone keeps the tie-break intact.
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(matches)
}

/// Number of valid window origins per axis; errors when the pattern
/// exceeds the field anywhere.
fn window_extent<const N: usize>(
    field: &BitField<N>,
    pattern: &BitField<N>,
) -> Result<[usize; N]> {
    let mut extent = [0usize; N];
    for i in 0..N {
        if pattern.dims[i] > field.dims[i] {
            return Err(BitGridError::PatternTooLarge {
                axis: i,
                pattern: pattern.dims[i],
                field: field.dims[i],
            });
        }
        extent[i] = field.dims[i] - pattern.dims[i] + 1;
    }
    Ok(extent)
}

fn matches_at<const N: usize>(
    field: &BitField<N>,
    pattern: &BitField<N>,
    origin: Coord<N>,
) -> bool {
    for idx in 0..pattern.bits.len() {
        if pattern.bits[idx] == 1 {
            let offset = coord_at(&pattern.dims, idx);
            let mut probe = origin;
            for i in 0..N {
                probe[i] += offset[i];
            }
            if field.bits[linear_index(&field.dims, &probe)] != 1 {
                return false;
            }
        }
    }
    true
}

fn similarity_at<const N: usize>(
    field: &BitField<N>,
    pattern: &BitField<N>,
    origin: Coord<N>,
) -> f64 {
    let total = volume(&pattern.dims);
    let mut agreeing = 0usize;
    for idx in 0..total {
        let offset = coord_at(&pattern.dims, idx);
        let mut probe = origin;
        for i in 0..N {
            probe[i] += offset[i];
        }
        if field.bits[linear_index(&field.dims, &probe)] == pattern.bits[idx] {
            agreeing += 1;
        }
    }
    agreeing as f64 / total as f64
}
