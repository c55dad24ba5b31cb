// do we have to use this to silence warnings?
#![allow(dead_code)]

// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

use kdpair::PairCounts;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

pub fn assert_allclose(actual: &[f64], expected: &[f64], rtol: f64, atol: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "the lengths of {name} in actual and ref are unequal",
    );
    for (i, (&actual_val, &ref_val)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            isclose(actual_val, ref_val, rtol, atol),
            "{name}[{i}] values aren't to within rtol={rtol}, atol={atol}\
            \n  actual   = {actual_val}\
            \n  expected = {ref_val}",
        );
    }
}

/// counts must match exactly while the weighted sums are compared with
/// the specified relative tolerance
pub fn assert_consistent_counts(actual: &PairCounts, expected: &PairCounts, rtol: f64) {
    assert_eq!(actual.edges, expected.edges);
    assert_eq!(actual.count, expected.count);
    assert_allclose(
        &actual.weighted_sum,
        &expected.weighted_sum,
        rtol,
        0.0,
        "weighted_sum",
    );
    assert_allclose(
        &actual.weighted_sum_sq,
        &expected.weighted_sum_sq,
        rtol,
        0.0,
        "weighted_sum_sq",
    );
}
