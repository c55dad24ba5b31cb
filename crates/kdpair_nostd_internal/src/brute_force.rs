//! The brute-force O(N²) reference implementation.
//!
//! This considers every point pair directly and shares the separation and
//! binning logic of the tree traversal. It primarily exists to check the
//! traversal, but it's also handy for tiny inputs.

use crate::accumulator::Accumulator;
use crate::bins::Binning;
use crate::error::Incompatibility;
use crate::misc::squared_separation;
use crate::points::{PointSet, check_compatible};

/// Computes the pair statistics of `points_a` & `points_b` by directly
/// considering every pair.
///
/// When `points_b` is `None`, `points_a` is paired with itself: every ordered
/// pair `(i, j)` with `i != j` is counted.
pub fn brute_force_paircount(
    points_a: &PointSet,
    points_b: Option<&PointSet>,
    binning: &Binning,
) -> Result<Accumulator, Incompatibility> {
    let mut accum = Accumulator::new(binning.n_bins());
    if let Some(points_b) = points_b {
        check_compatible(points_a, points_b)?;
        brute_force_helper::<false>(&mut accum, points_a, points_b, binning);
    } else {
        brute_force_helper::<true>(&mut accum, points_a, points_a, binning);
    }
    Ok(accum)
}

fn brute_force_helper<const AUTO: bool>(
    accum: &mut Accumulator,
    points_a: &PointSet,
    points_b: &PointSet,
    binning: &Binning,
) {
    for i_a in 0..points_a.n_points() {
        // for auto pairs, (i_b, i_a) is accounted for by doubling (i_a, i_b)
        let i_b_start = if AUTO { i_a + 1 } else { 0 };
        for i_b in i_b_start..points_b.n_points() {
            let distance_squared = squared_separation(points_a, i_a, points_b, i_b);
            if let Some(bin) = binning.bin_of_squared(distance_squared) {
                let w = points_a.weight(i_a) * points_b.weight(i_b);
                if AUTO {
                    accum.add_block(bin, 2, 2.0 * w, 2.0 * (w * w));
                } else {
                    accum.add_pair(bin, w);
                }
            }
        }
    }
}
