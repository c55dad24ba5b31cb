// compare the tree-based pair counts against the brute-force calculation

use kdpair::{Binning, RuntimeSpec, paircount_brute_force, paircount_with};
use kdpair_test::TestPoints;
use ndarray::Axis;
use std::num::NonZeroUsize;

mod common;

use common::assert_consistent_counts;

// the order in which contributions are summed differs between the two
// approaches, so the weighted sums are only consistent up to round-off
const RTOL: f64 = 1e-10;

fn check_against_brute_force(
    test_a: &TestPoints,
    test_b: Option<&TestPoints>,
    binning: &Binning,
    worker_count: usize,
) {
    let points_a = test_a.point_set();
    let points_b = test_b.map(TestPoints::point_set);
    let expected = paircount_brute_force(&points_a, points_b.as_ref(), binning).unwrap();

    for leaf_size in [1, 8, 32] {
        let spec = RuntimeSpec::default()
            .with_worker_count(worker_count)
            .with_leaf_size(NonZeroUsize::new(leaf_size).unwrap());
        let actual = paircount_with(&points_a, points_b.as_ref(), binning, &spec).unwrap();
        assert_consistent_counts(&actual, &expected, RTOL);
    }
}

#[test]
fn auto_open() {
    let test_data = TestPoints::from_random(600, 3, 10.0, false, 2525365464);
    let binning = Binning::from_edges(&[0.0, 0.5, 1.0, 2.0, 4.0]).unwrap();
    for worker_count in [1, 3] {
        check_against_brute_force(&test_data, None, &binning, worker_count);
    }
}

#[test]
fn auto_periodic() {
    let test_data = TestPoints::from_random(600, 3, 10.0, true, 83452);
    let binning = Binning::from_edges(&[0.25, 0.5, 1.0, 2.0, 4.0]).unwrap();
    for worker_count in [1, 3] {
        check_against_brute_force(&test_data, None, &binning, worker_count);
    }
}

#[test]
fn cross_open() {
    let test_a = TestPoints::from_random(400, 3, 5.0, false, 11);
    let test_b = TestPoints::from_random(300, 3, 5.0, false, 12);
    let binning = Binning::linear(0.3, 6, 0.1).unwrap();
    for worker_count in [1, 3] {
        check_against_brute_force(&test_a, Some(&test_b), &binning, worker_count);
    }
}

#[test]
fn cross_periodic() {
    let test_a = TestPoints::from_random(400, 3, 5.0, true, 21);
    let test_b = TestPoints::from_random(300, 3, 5.0, true, 22);
    let binning = Binning::linear(0.3, 8, 0.0).unwrap();
    for worker_count in [1, 3] {
        check_against_brute_force(&test_a, Some(&test_b), &binning, worker_count);
    }
}

#[test]
fn other_dimensionalities() {
    let binning = Binning::from_edges(&[0.0, 0.05, 0.1, 0.2, 0.35]).unwrap();
    for n_spatial_dims in [1, 2, 4] {
        for periodic in [false, true] {
            let test_data = TestPoints::from_random(300, n_spatial_dims, 1.0, periodic, 3);
            check_against_brute_force(&test_data, None, &binning, 1);
        }
    }
}

#[test]
fn anisotropic_periodic_box() {
    let box_size = [1.0, 3.0, 0.4];
    let scale_to_box = |test_data: TestPoints| {
        let mut positions = test_data.positions().to_owned();
        for (mut axis, length) in positions.axis_iter_mut(Axis(0)).zip(box_size) {
            axis *= length;
        }
        TestPoints::new(positions.view(), Some(test_data.weights()), Some(box_size.as_slice()))
    };
    let test_a = scale_to_box(TestPoints::from_random(400, 3, 1.0, false, 4040));
    let test_b = scale_to_box(TestPoints::from_random(250, 3, 1.0, false, 4041));
    // the largest edge exceeds half of the shortest box length
    let binning = Binning::from_edges(&[0.0, 0.1, 0.25, 0.5, 1.2]).unwrap();
    for worker_count in [1, 3] {
        check_against_brute_force(&test_a, None, &binning, worker_count);
        check_against_brute_force(&test_a, Some(&test_b), &binning, worker_count);
    }
}

#[test]
fn weights_spanning_many_magnitudes() {
    // every pair shares the only bin, so whole nodes get resolved at once
    let random = TestPoints::from_random(50, 3, 0.5, false, 777);
    let binning = Binning::from_edges(&[0.0, 1.0]).unwrap();

    let one_heavy: Vec<f64> = (0..50).map(|i| if i == 0 { 1e8 } else { 1e-4 }).collect();
    let spread: Vec<f64> = (0..50).map(|i| 10f64.powi((i % 13) - 6)).collect();
    for weights in [one_heavy, spread] {
        let test_data = TestPoints::new(random.positions(), Some(&weights), None);
        let points = test_data.point_set();
        let expected = paircount_brute_force(&points, None, &binning).unwrap();
        assert_eq!(expected.count, [50 * 49]);
        for leaf_size in [1, 8, 64] {
            let spec = RuntimeSpec::default().with_leaf_size(NonZeroUsize::new(leaf_size).unwrap());
            let actual = paircount_with(&points, None, &binning, &spec).unwrap();
            assert_consistent_counts(&actual, &expected, RTOL);
        }
    }
}
