use kdpair::{
    Binning, Error, ErrorClass, PointSet, RuntimeSpec, paircount, paircount_brute_force,
    paircount_with,
};
use kdpair_test::TestPoints;
use ndarray::ArrayView2;
use std::num::NonZeroUsize;

mod common;

use common::{assert_allclose, assert_consistent_counts};

// 4 points along the z-axis
fn line_of_points(box_size: Option<&[f64]>) -> PointSet {
    #[rustfmt::skip]
    let positions = [
        0.0, 0.0,  0.0, 0.0,
        0.0, 0.0,  0.0, 0.0,
        0.0, 0.05, 0.5, 0.99,
    ];
    let view = ArrayView2::from_shape((3, 4), &positions).unwrap();
    PointSet::new(view, None, box_size).unwrap()
}

#[test]
fn line_of_points_periodic() {
    let binning = Binning::from_edges(&[0.0, 0.1, 1.0]).unwrap();
    let points = line_of_points(Some(&[1.0; 3]));

    // the separations are 0.05, 0.5, 0.01, 0.45, 0.06 & 0.49 once wrapped, so
    // bin 0 holds the pairs 0-1, 0-3 & 1-3 while bin 1 holds 0-2, 1-2 & 2-3
    let result = paircount(&points, None, &binning, 1).unwrap();
    assert_eq!(result.count, [6, 6]);
    assert_eq!(result.weighted_sum, [6.0, 6.0]);
    assert_eq!(result.weighted_sum_sq, [6.0, 6.0]);
    assert_allclose(&result.bin_centers, &[0.05, 0.55], 1e-15, 0.0, "bin_centers");
    assert_eq!(result.edges, [0.0, 0.1, 1.0]);
}

#[test]
fn line_of_points_open() {
    let binning = Binning::from_edges(&[0.0, 0.1, 1.0]).unwrap();
    let points = line_of_points(None);
    let result = paircount(&points, None, &binning, 1).unwrap();
    assert_eq!(result.count, [2, 10]);
}

#[test]
fn periodic_wrap_straddling_boundary() {
    #[rustfmt::skip]
    let positions = [
        0.02, 0.97,
        0.5,  0.5,
        0.5,  0.5,
    ];
    let view = ArrayView2::from_shape((3, 2), &positions).unwrap();
    let binning = Binning::from_edges(&[0.0, 0.1, 0.5]).unwrap();

    let periodic = PointSet::new(view, None, Some(&[1.0; 3])).unwrap();
    let result = paircount(&periodic, None, &binning, 1).unwrap();
    assert_eq!(result.count, [2, 0]);

    let open = PointSet::new(view, None, None).unwrap();
    let result = paircount(&open, None, &binning, 1).unwrap();
    assert_eq!(result.count, [0, 0]);
}

#[test]
fn self_pairs_are_excluded() {
    let test_data = TestPoints::from_random(300, 3, 1.0, false, 5784);
    let points_a = test_data.point_set();
    // every separation is smaller than 2
    let binning = Binning::from_edges(&[0.0, 0.3, 2.0]).unwrap();

    let result = paircount(&points_a, None, &binning, 1).unwrap();
    assert_eq!(result.total_count(), 300 * 299);

    let other = TestPoints::from_random(70, 3, 1.0, false, 91).point_set();
    let result = paircount(&points_a, Some(&other), &binning, 1).unwrap();
    assert_eq!(result.total_count(), 300 * 70);
}

#[test]
fn coincident_points() {
    let positions = [0.25; 10];
    let view = ArrayView2::from_shape((2, 5), &positions).unwrap();
    let points = PointSet::new(view, None, None).unwrap();

    let binning = Binning::from_edges(&[0.0, 1.0]).unwrap();
    assert_eq!(paircount(&points, None, &binning, 1).unwrap().count, [20]);

    // a separation of 0 doesn't land in a bin that starts above 0
    let binning = Binning::from_edges(&[0.1, 1.0]).unwrap();
    assert_eq!(paircount(&points, None, &binning, 1).unwrap().count, [0]);
}

#[test]
fn symmetry() {
    let binning = Binning::linear(0.05, 8, 0.0).unwrap();
    for periodic in [false, true] {
        let points_a = TestPoints::from_random(250, 3, 1.0, periodic, 1).point_set();
        let points_b = TestPoints::from_random(180, 3, 1.0, periodic, 2).point_set();
        let ab = paircount(&points_a, Some(&points_b), &binning, 1).unwrap();
        let ba = paircount(&points_b, Some(&points_a), &binning, 1).unwrap();
        assert_consistent_counts(&ab, &ba, 1e-10);
    }
}

#[test]
fn weight_handling() {
    let binning = Binning::from_edges(&[0.0, 0.05, 0.1, 0.2, 0.3]).unwrap();
    let test_data = TestPoints::from_random(400, 3, 1.0, true, 8);

    // unit weights reproduce the counts
    let unweighted = PointSet::new(test_data.positions(), None, Some(&[1.0; 3])).unwrap();
    let result = paircount(&unweighted, None, &binning, 1).unwrap();
    let counts: Vec<f64> = result.count.iter().map(|&c| c as f64).collect();
    assert_eq!(result.weighted_sum, counts);
    assert_eq!(result.weighted_sum_sq, counts);

    // scaling the weights by c scales the sums by c² & c⁴
    let c = 3.0;
    let base = test_data.with_integer_weights(4, 13);
    let reference = paircount(&base.point_set(), None, &binning, 1).unwrap();
    let scaled = paircount(&base.scale_weights(c).point_set(), None, &binning, 1).unwrap();
    assert_eq!(scaled.count, reference.count);
    let expected: Vec<f64> = reference.weighted_sum.iter().map(|x| c * c * x).collect();
    assert_allclose(&scaled.weighted_sum, &expected, 1e-14, 0.0, "weighted_sum");
    let expected: Vec<f64> = reference
        .weighted_sum_sq
        .iter()
        .map(|x| c * c * c * c * x)
        .collect();
    assert_allclose(
        &scaled.weighted_sum_sq,
        &expected,
        1e-14,
        0.0,
        "weighted_sum_sq",
    );
}

#[test]
fn leaf_size_doesnt_matter() {
    let binning = Binning::from_edges(&[0.0, 0.02, 0.07, 0.15, 0.4]).unwrap();
    let test_data = TestPoints::from_random(500, 3, 1.0, true, 77).with_integer_weights(3, 78);
    let points = test_data.point_set();

    let expected = paircount_brute_force(&points, None, &binning).unwrap();
    for leaf_size in [1, 2, 16, 1000] {
        let spec = RuntimeSpec::default().with_leaf_size(NonZeroUsize::new(leaf_size).unwrap());
        let result = paircount_with(&points, None, &binning, &spec).unwrap();
        // integer weights make every sum exact
        assert_eq!(result.count, expected.count);
        assert_eq!(result.weighted_sum, expected.weighted_sum);
        assert_eq!(result.weighted_sum_sq, expected.weighted_sum_sq);
    }
}

#[test]
fn incompatible_point_sets() {
    let binning = Binning::from_edges(&[0.0, 1.0]).unwrap();
    let points_3d = TestPoints::from_random(10, 3, 1.0, false, 1).point_set();
    let points_2d = TestPoints::from_random(10, 2, 1.0, false, 2).point_set();
    let periodic = TestPoints::from_random(10, 3, 1.0, true, 3).point_set();
    let bigger_box = TestPoints::from_random(10, 3, 2.0, true, 4).point_set();

    let err = paircount(&points_3d, Some(&points_2d), &binning, 1).unwrap_err();
    assert_eq!(err.class(), ErrorClass::DimensionMismatch);

    let err = paircount(&points_3d, Some(&periodic), &binning, 1).unwrap_err();
    assert_eq!(err.class(), ErrorClass::PeriodicityMismatch);

    let err = paircount(&periodic, Some(&bigger_box), &binning, 2).unwrap_err();
    assert_eq!(err.class(), ErrorClass::PeriodicityMismatch);

    let err = paircount_brute_force(&periodic, Some(&points_3d), &binning).unwrap_err();
    assert_eq!(err.class(), ErrorClass::PeriodicityMismatch);
}

#[test]
fn invalid_inputs() {
    let bad_edges: [&[f64]; 4] = [&[1.0], &[1.0, 0.5], &[-1.0, 1.0], &[0.0, f64::INFINITY]];
    for edges in bad_edges {
        let err: Error = Binning::from_edges(edges).unwrap_err().into();
        assert_eq!(err.class(), ErrorClass::BinEdge);
    }
    let err: Error = Binning::linear(0.0, 4, 0.0).unwrap_err().into();
    assert_eq!(err.class(), ErrorClass::BinEdge);

    let positions = [0.0; 6];
    let view = ArrayView2::from_shape((3, 2), &positions).unwrap();
    let err: Error = PointSet::new(view, Some(&[1.0]), None).unwrap_err().into();
    assert_eq!(err.class(), ErrorClass::Shape);
}

#[test]
fn empty_point_set() {
    let binning = Binning::from_edges(&[0.0, 1.0]).unwrap();
    let positions: [f64; 0] = [];
    let empty = PointSet::new(
        ArrayView2::from_shape((3, 0), &positions).unwrap(),
        None,
        None,
    )
    .unwrap();
    let result = paircount(&empty, None, &binning, 0).unwrap();
    assert_eq!(result.count, [0]);
    assert_eq!(result.weighted_sum, [0.0]);
}
