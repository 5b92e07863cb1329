//! Walk through the core bitgrid operations: construction, properties,
//! transforms, pattern search, and composition.

use bitgrid_core::{
    entangle, find_pattern, generate_pattern, match_pattern, rotate3d, superposition, Axis,
    BitField, PatternKind, Result,
};

fn main() -> Result<()> {
    // A 4x4x4 grid with two marked cells.
    let mut field = BitField::new([4, 4, 4])?;
    field.set_bit([1, 1, 1], 1)?;
    field.set_bit([2, 2, 2], 1)?;
    field.set_property([1, 1, 1], "label", "seed")?;

    let rotated = rotate3d(&field, Axis::Z, 90)?;
    println!(
        "rotated dims {:?}, set cells {}",
        rotated.dimensions(),
        rotated.count_set()
    );

    // Search for the canonical cube inside a generated sphere.
    let sphere = generate_pattern(PatternKind::Sphere, [8, 8, 8])?;
    let cube = generate_pattern(PatternKind::Cube, [4, 4, 4])?;
    let exact = find_pattern(&sphere, &cube)?;
    println!("cube fits the sphere at {} origins", exact.len());

    let close = match_pattern(&sphere, &cube, 0.8)?;
    if let Some(best) = close.first() {
        println!(
            "best approximate origin {:?} at similarity {:.2}",
            best.origin, best.similarity
        );
    }

    // OR-merge, then link two fields and watch a write propagate.
    let merged = superposition(&field, &cube)?;
    println!("merged population: {}", merged.count_set());

    let (left, right) = entangle(&field, &merged)?;
    left.set_bit([0, 0, 0], 1)?;
    println!(
        "propagated bit on the paired field: {}",
        right.get_bit([0, 0, 0])?
    );

    Ok(())
}
