//! Error types for bitgrid operations
//!
//! Every fallible operation in the crate reports through [`BitGridError`].
//! Errors always propagate to the immediate caller; the library never
//! retries or substitutes defaults.

use thiserror::Error;

/// Result type alias for bitgrid operations.
pub type Result<T> = std::result::Result<T, BitGridError>;

/// Main error type for bitgrid operations.
///
/// Rank mismatches, bad axis/plane names, and wrong-arity vectors are
/// unrepresentable in the typed API (const-generic rank, `Axis`/`Plane`
/// enums, fixed-size arrays), so this enum carries only the conditions
/// that remain dynamically checkable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BitGridError {
    /// An axis size of zero was given at construction or generation.
    #[error("Invalid dimension: axis {axis} has size {size} (every axis must be >= 1)")]
    InvalidDimension {
        /// Offending axis index
        axis: usize,
        /// Size that was given
        size: usize,
    },

    /// A coordinate fell outside the field's declared extent.
    #[error("Coordinate {coord:?} out of bounds for dimensions {dims:?}")]
    OutOfBounds {
        /// Offending coordinate
        coord: Vec<usize>,
        /// Declared extents
        dims: Vec<usize>,
    },

    /// A bit value other than 0 or 1 was given.
    #[error("Invalid bit value: {0} (must be 0 or 1)")]
    InvalidValue(u8),

    /// Extents that were required to agree did not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Required extents (or cell count for linear data)
        expected: Vec<usize>,
        /// Extents that were given
        actual: Vec<usize>,
    },

    /// A pattern extent exceeds the searched field's extent.
    #[error("Pattern too large on axis {axis}: pattern extent {pattern} > field extent {field}")]
    PatternTooLarge {
        /// Offending axis index
        axis: usize,
        /// Pattern extent on that axis
        pattern: usize,
        /// Field extent on that axis
        field: usize,
    },

    /// A rotation angle that is not a multiple of 90 degrees.
    #[error("Invalid rotation angle: {0} degrees (only multiples of 90 are defined on an integer grid)")]
    InvalidAngle(i32),

    /// A scale factor that is zero, negative, or non-finite.
    #[error("Invalid scale factor on axis {axis}: {factor} (must be finite and > 0)")]
    InvalidFactor {
        /// Offending axis index
        axis: usize,
        /// Factor that was given
        factor: f64,
    },

    /// An unknown pattern type name.
    #[error("Invalid pattern type: {0:?} (expected cube, sphere, wave, or random)")]
    InvalidPatternType(String),

    /// A similarity threshold outside [0, 1].
    #[error("Invalid threshold: {0} (must be within [0, 1])")]
    InvalidThreshold(f64),
}

impl BitGridError {
    /// Check if the error is a coordinate bounds violation.
    pub fn is_bounds(&self) -> bool {
        matches!(self, BitGridError::OutOfBounds { .. })
    }

    /// Check if the error concerns field or pattern extents.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            BitGridError::InvalidDimension { .. }
                | BitGridError::ShapeMismatch { .. }
                | BitGridError::PatternTooLarge { .. }
        )
    }

    /// Check if the error is a parameter range or enum violation.
    pub fn is_parameter(&self) -> bool {
        matches!(
            self,
            BitGridError::InvalidValue(_)
                | BitGridError::InvalidAngle(_)
                | BitGridError::InvalidFactor { .. }
                | BitGridError::InvalidPatternType(_)
                | BitGridError::InvalidThreshold(_)
        )
    }
}
