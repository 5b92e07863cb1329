//! Integration tests for the transform engine
//!
//! Covers:
//! - Rotation permutation, the 2x2x2 z-180 scenario, and identity laws
//! - Translation clipping, scaling resampling, mirror involution
//! - Linear mapping round trips and block extract/insert

use bitgrid_core::{
    extract_block, extract_linear, insert_block, map_to_3d, map_to_4d, mirror3d, reshape,
    rotate3d, scale3d, translate3d, Axis, BitField, Plane, PropertyValue,
};

fn field_with_bits(dims: [usize; 3], set: &[[usize; 3]]) -> BitField<3> {
    let mut field = BitField::new(dims).unwrap();
    for &coord in set {
        field.set_bit(coord, 1).unwrap();
    }
    field
}

mod rotation {
    use super::*;

    #[test]
    fn test_z_180_scenario() {
        // Two opposite corners of a 2x2x2 grid rotated 180 about z:
        // x and y both reflect through the axis center, z is fixed.
        let field = field_with_bits([2, 2, 2], &[[0, 0, 0], [1, 1, 1]]);
        let rotated = rotate3d(&field, Axis::Z, 180).unwrap();

        assert_eq!(rotated.get_bit([1, 1, 0]).unwrap(), 1);
        assert_eq!(rotated.get_bit([0, 0, 1]).unwrap(), 1);
        assert_eq!(rotated.count_set(), 2);
    }

    #[test]
    fn test_four_quarter_turns_identity() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut field = field_with_bits([2, 3, 4], &[[0, 1, 2], [1, 2, 3], [0, 0, 0]]);
            field.set_property([0, 1, 2], "tag", "corner").unwrap();

            let mut rotated = field.clone();
            for _ in 0..4 {
                rotated = rotate3d(&rotated, axis, 90).unwrap();
            }
            assert_eq!(rotated, field);
        }
    }

    #[test]
    fn test_90_equals_minus_270() {
        let field = field_with_bits([3, 4, 2], &[[0, 0, 0], [2, 3, 1], [1, 2, 0]]);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert_eq!(
                rotate3d(&field, axis, 90).unwrap(),
                rotate3d(&field, axis, -270).unwrap()
            );
        }
    }

    #[test]
    fn test_quarter_turn_moves_bit_and_property() {
        // 90 about z maps (x, y, z) -> (dim_y - 1 - y, x, z).
        let mut field = field_with_bits([2, 3, 1], &[[0, 0, 0]]);
        field.set_property([0, 0, 0], "origin", true).unwrap();

        let rotated = rotate3d(&field, Axis::Z, 90).unwrap();
        assert_eq!(rotated.dimensions(), [3, 2, 1]);
        assert_eq!(rotated.get_bit([2, 0, 0]).unwrap(), 1);
        assert_eq!(
            rotated.get_property([2, 0, 0], "origin").unwrap(),
            Some(&PropertyValue::Bool(true))
        );
        assert_eq!(rotated.count_set(), 1);
    }

    #[test]
    fn test_zero_degrees_is_copy() {
        let field = field_with_bits([2, 2, 2], &[[1, 0, 1]]);
        let rotated = rotate3d(&field, Axis::X, 0).unwrap();
        assert_eq!(rotated, field);
    }
}

mod translation {
    use super::*;

    #[test]
    fn test_shift_moves_bits_and_properties() {
        let mut field = field_with_bits([3, 3, 3], &[[0, 0, 0], [1, 1, 1]]);
        field.set_property([1, 1, 1], "weight", 2i64).unwrap();

        let shifted = translate3d(&field, [1, 0, 1]);
        assert_eq!(shifted.dimensions(), [3, 3, 3]);
        assert_eq!(shifted.get_bit([1, 0, 1]).unwrap(), 1);
        assert_eq!(shifted.get_bit([2, 1, 2]).unwrap(), 1);
        assert_eq!(
            shifted.get_property([2, 1, 2], "weight").unwrap(),
            Some(&PropertyValue::Int(2))
        );
        assert_eq!(shifted.get_bit([0, 0, 0]).unwrap(), 0);
    }

    #[test]
    fn test_cells_clipped_not_wrapped() {
        let field = field_with_bits([2, 2, 2], &[[1, 1, 1], [0, 0, 0]]);
        let shifted = translate3d(&field, [1, 1, 1]);
        // (1,1,1) falls off the grid; (0,0,0) lands on (1,1,1).
        assert_eq!(shifted.count_set(), 1);
        assert_eq!(shifted.get_bit([1, 1, 1]).unwrap(), 1);

        let negative = translate3d(&field, [-1, -1, -1]);
        assert_eq!(negative.count_set(), 1);
        assert_eq!(negative.get_bit([0, 0, 0]).unwrap(), 1);
    }

    #[test]
    fn test_zero_vector_identity() {
        let field = field_with_bits([2, 3, 2], &[[1, 2, 0], [0, 1, 1]]);
        assert_eq!(translate3d(&field, [0, 0, 0]), field);
    }
}

mod scaling {
    use super::*;

    #[test]
    fn test_upscale_dimensions_and_replication() {
        let field = field_with_bits([2, 2, 2], &[[1, 1, 1]]);
        let scaled = scale3d(&field, [2.0, 2.0, 2.0]).unwrap();
        assert_eq!(scaled.dimensions(), [4, 4, 4]);
        // Destination cells whose inverse-scaled coordinate rounds (and
        // clamps) to 1 are 1, 2, and 3 on every axis.
        assert_eq!(scaled.count_set(), 27);
        assert_eq!(scaled.get_bit([0, 0, 0]).unwrap(), 0);
        assert_eq!(scaled.get_bit([2, 3, 1]).unwrap(), 1);
    }

    #[test]
    fn test_downscale_minimum_extent() {
        let field = field_with_bits([2, 2, 2], &[[0, 0, 0]]);
        let scaled = scale3d(&field, [0.1, 0.1, 0.1]).unwrap();
        assert_eq!(scaled.dimensions(), [1, 1, 1]);
        assert_eq!(scaled.get_bit([0, 0, 0]).unwrap(), 1);
    }

    #[test]
    fn test_properties_follow_nearest_neighbor() {
        let mut field = field_with_bits([2, 1, 1], &[[0, 0, 0]]);
        field.set_property([0, 0, 0], "label", "low").unwrap();

        let scaled = scale3d(&field, [2.0, 1.0, 1.0]).unwrap();
        assert_eq!(
            scaled.get_property([0, 0, 0], "label").unwrap(),
            Some(&PropertyValue::Str("low".to_string()))
        );
    }

    #[test]
    fn test_invalid_factors() {
        let field = BitField::new([2, 2, 2]).unwrap();
        assert!(scale3d(&field, [0.0, 1.0, 1.0]).unwrap_err().is_parameter());
        assert!(scale3d(&field, [1.0, -2.0, 1.0]).unwrap_err().is_parameter());
        assert!(scale3d(&field, [1.0, 1.0, f64::NAN])
            .unwrap_err()
            .is_parameter());
    }
}

mod mirroring {
    use super::*;

    #[test]
    fn test_xy_plane_reflects_z() {
        let mut field = field_with_bits([2, 2, 3], &[[0, 0, 0]]);
        field.set_property([0, 0, 0], "mark", 1i64).unwrap();

        let mirrored = mirror3d(&field, Plane::Xy);
        assert_eq!(mirrored.dimensions(), [2, 2, 3]);
        assert_eq!(mirrored.get_bit([0, 0, 2]).unwrap(), 1);
        assert_eq!(
            mirrored.get_property([0, 0, 2], "mark").unwrap(),
            Some(&PropertyValue::Int(1))
        );
    }

    #[test]
    fn test_double_mirror_involution() {
        let mut field = field_with_bits([3, 2, 4], &[[0, 1, 3], [2, 0, 0], [1, 1, 2]]);
        field.set_property([2, 0, 0], "tag", "x").unwrap();

        for plane in [Plane::Xy, Plane::Xz, Plane::Yz] {
            let twice = mirror3d(&mirror3d(&field, plane), plane);
            assert_eq!(twice, field);
        }
    }
}

mod linear_mapping {
    use super::*;

    #[test]
    fn test_map_extract_round_trip_3d() {
        let mut field = field_with_bits([2, 3, 2], &[[0, 2, 1], [1, 0, 0], [1, 2, 1]]);
        field.set_property([0, 2, 1], "dropped", true).unwrap();

        let linear = extract_linear(&field);
        assert_eq!(linear.len(), 12);

        let rebuilt = map_to_3d(&linear, [2, 3, 2]).unwrap();
        assert_eq!(extract_linear(&rebuilt), linear);
        // Properties are not part of the linear representation.
        assert_eq!(rebuilt.get_property([0, 2, 1], "dropped").unwrap(), None);
    }

    #[test]
    fn test_map_extract_round_trip_4d() {
        let mut field = BitField::new([2, 2, 2, 2]).unwrap();
        field.set_bit([1, 0, 1, 0], 1).unwrap();
        field.set_bit([0, 1, 0, 1], 1).unwrap();

        let linear = extract_linear(&field);
        let rebuilt = map_to_4d(&linear, [2, 2, 2, 2]).unwrap();
        assert_eq!(extract_linear(&rebuilt), linear);
    }

    #[test]
    fn test_row_major_last_axis_fastest() {
        let mut field = BitField::new([2, 2, 2]).unwrap();
        field.set_bit([0, 0, 1], 1).unwrap();
        // With z fastest, (0, 0, 1) is linear index 1.
        assert_eq!(extract_linear(&field), vec![0, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_length_must_equal_volume() {
        assert!(map_to_3d(&[1, 0, 1], [2, 2, 2]).unwrap_err().is_shape());
        assert!(map_to_4d(&[1; 17], [2, 2, 2, 2]).unwrap_err().is_shape());
    }
}

mod reshaping {
    use super::*;

    #[test]
    fn test_reshape_preserves_linear_form() {
        let field = field_with_bits([2, 3, 4], &[[0, 0, 3], [1, 2, 0]]);
        let reshaped = reshape(&field, [4, 3, 2]).unwrap();
        assert_eq!(extract_linear(&reshaped), extract_linear(&field));
    }

    #[test]
    fn test_reshape_across_ranks() {
        let field = field_with_bits([2, 2, 4], &[[1, 1, 3]]);
        let lifted = reshape(&field, [2, 2, 2, 2]).unwrap();
        assert_eq!(lifted.rank(), 4);
        assert_eq!(extract_linear(&lifted), extract_linear(&field));
    }

    #[test]
    fn test_reshape_volume_mismatch() {
        let field = BitField::new([2, 2, 2]).unwrap();
        assert!(reshape(&field, [3, 3, 3]).unwrap_err().is_shape());
    }
}

mod blocks {
    use super::*;

    #[test]
    fn test_extract_insert_round_trip() {
        let mut field = field_with_bits([4, 4, 4], &[[1, 1, 1], [2, 2, 2]]);
        field.set_property([1, 1, 1], "anchor", true).unwrap();

        let block = extract_block(&field, [1, 1, 1], [2, 2, 2]).unwrap();
        assert_eq!(block.dimensions(), [2, 2, 2]);
        assert_eq!(block.get_bit([0, 0, 0]).unwrap(), 1);
        assert_eq!(block.get_bit([1, 1, 1]).unwrap(), 1);
        assert_eq!(
            block.get_property([0, 0, 0], "anchor").unwrap(),
            Some(&PropertyValue::Bool(true))
        );

        let empty = BitField::new([4, 4, 4]).unwrap();
        let restored = insert_block(&empty, &block, [1, 1, 1]).unwrap();
        assert_eq!(restored.get_bit([1, 1, 1]).unwrap(), 1);
        assert_eq!(restored.get_bit([2, 2, 2]).unwrap(), 1);
        assert_eq!(
            restored.get_property([1, 1, 1], "anchor").unwrap(),
            Some(&PropertyValue::Bool(true))
        );
    }

    #[test]
    fn test_insert_does_not_mutate_target() {
        let target = BitField::new([3, 3, 3]).unwrap();
        let block = field_with_bits([2, 2, 2], &[[0, 0, 0]]);
        let _ = insert_block(&target, &block, [0, 0, 0]).unwrap();
        assert_eq!(target.count_set(), 0);
    }

    #[test]
    fn test_block_must_fit() {
        let field = BitField::new([4, 4, 4]).unwrap();
        assert!(extract_block(&field, [3, 3, 3], [2, 2, 2])
            .unwrap_err()
            .is_bounds());

        let block = BitField::new([2, 2, 2]).unwrap();
        assert!(insert_block(&field, &block, [0, 3, 0])
            .unwrap_err()
            .is_bounds());
    }
}
