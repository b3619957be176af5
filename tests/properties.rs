use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use hiergrid::box_container::make_non_overlapping;
use hiergrid::geometry::Centering;
use hiergrid::index_space::{range2d, range3d, IndexSpace};
use hiergrid::int_vector::IntVector;
use hiergrid::patch_data::PatchArray;
use hiergrid::patch_ops;




fn centering() -> impl Strategy<Value = Centering> {
    prop_oneof![
        Just(Centering::Cell),
        Just(Centering::Face),
        Just(Centering::Edge),
        Just(Centering::Node),
    ]
}

fn box2d() -> impl Strategy<Value = IndexSpace> {
    (-8i64..8, -8i64..8, 1i64..6, 1i64..6).prop_map(|(i, j, ni, nj)| range2d(i..i + ni, j..j + nj))
}

fn box3d() -> impl Strategy<Value = IndexSpace> {
    (-4i64..4, -4i64..4, -4i64..4, 1i64..4, 1i64..4, 1i64..4)
        .prop_map(|(i, j, k, ni, nj, nk)| range3d(i..i + ni, j..j + nj, k..k + nk))
}




// ============================================================================
proptest! {
    #[test]
    fn linear_sum_with_unit_coefficients_is_subtraction(
        space in box2d(),
        centering in centering(),
        depth in 1usize..3,
        seed in any::<u64>(),
    ) {
        let ghost = IntVector::one(2);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut a = PatchArray::<i32>::new(centering, space, ghost, depth);
        let mut b = PatchArray::<i32>::new(centering, space, ghost, depth);
        let region = a.ghost_box();
        patch_ops::set_random_values(&mut a, 2000, -1000, &region, &mut rng);
        patch_ops::set_random_values(&mut b, 2000, -1000, &region, &mut rng);

        let mut x = PatchArray::<i32>::new(centering, space, ghost, depth);
        let mut y = PatchArray::<i32>::new(centering, space, ghost, depth);
        patch_ops::linear_sum(&mut x, 1, &a, -1, &b, &space);
        patch_ops::subtract(&mut y, &a, &b, &space);
        prop_assert_eq!(x, y);
    }

    #[test]
    fn non_overlapping_pieces_partition_the_union(boxes in prop::collection::vec(box2d(), 1..6)) {
        let pieces = make_non_overlapping(&boxes);
        prop_assert_eq!(pieces.len(), boxes.len());

        for (piece, space) in pieces.iter().zip(&boxes) {
            prop_assert!(piece.iter().all(|p| space.contains_space(p)));
        }
        let all: Vec<_> = pieces.iter().flat_map(|c| c.iter().copied()).collect();

        for (n, p) in all.iter().enumerate() {
            prop_assert!(all[n + 1..].iter().all(|q| !p.intersects(q)), "{} overlaps another piece", p);
        }
        for index in &range2d(-8..14, -8..14) {
            let covered = boxes.iter().any(|b| b.contains(&index));
            let count = all.iter().filter(|p| p.contains(&index)).count();
            prop_assert_eq!(count, covered as usize);
        }
    }

    #[test]
    fn geometry_boxes_map_back_to_the_cell_box(space in box3d(), centering in centering()) {
        for geometry in centering.geometries(3) {
            let g = geometry.to_geometry_box(&space);
            prop_assert!(g.contains_space(&space));
            prop_assert_eq!(geometry.to_cell_box(&g), space);
        }
    }

    #[test]
    fn geometry_boxes_of_distinct_cell_boxes_differ(a in box2d(), b in box2d(), centering in centering()) {
        prop_assume!(a != b);
        for geometry in centering.geometries(2) {
            prop_assert_ne!(geometry.to_geometry_box(&a), geometry.to_geometry_box(&b));
        }
    }
}
