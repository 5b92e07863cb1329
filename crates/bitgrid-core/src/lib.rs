//! # bitgrid-core
//!
//! Dense 3D/4D bit grids with sparse per-cell properties, plus three
//! engines of pure functions over them:
//!
//! - **Transforms**: rotation (90-degree multiples), translation,
//!   scaling, mirroring, block extraction/insertion, reshaping, and
//!   row-major linear mapping.
//! - **Patterns**: canonical pattern generation (cube, sphere, wave,
//!   seeded random) and exhaustive exact/approximate sliding-window
//!   search.
//! - **Composition**: OR superposition, entanglement with write
//!   propagation between two paired fields, and deterministic
//!   kinetic flip transforms.
//!
//! The rank (3 or 4) is a const-generic parameter of [`BitField`];
//! mixing ranks in one operation is a compile error. All engine
//! functions leave their inputs untouched and return new fields,
//! except writes through [`Entangled`] handles, which deliberately
//! propagate to the paired field while the link is intact.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod compose;
pub mod error;
pub mod field;
pub mod pattern;
pub mod property;
pub mod transform;

// Re-exports for convenience
pub use compose::{apply_kinetic, entangle, superposition, Entangled, KineticTransform};
pub use error::{BitGridError, Result};
pub use field::{BitField, BitField3, BitField4, Coord};
pub use pattern::{
    find_pattern, generate_pattern, generate_pattern_seeded, match_pattern, PatternKind,
    PatternMatch, DEFAULT_PATTERN_SEED,
};
pub use property::{PropertyMap, PropertyValue};
pub use transform::{
    extract_block, extract_linear, insert_block, map_to_3d, map_to_4d, mirror3d, reshape,
    rotate3d, scale3d, translate3d, Axis, Plane,
};

/// Version of the bitgrid-core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
