//! Separation helpers shared by the traversals and the brute-force oracle.
//!
//! Everything here is expressed in terms of squared distances. When a box
//! size is provided, separations follow the minimum-image convention: along
//! each axis the separation is `min(|Δ|, L - |Δ|)`.

use crate::kdtree::BoundingBox;
use crate::points::PointSet;

// NOTE: f64::abs isn't reliably available in no_std crates on older toolchains
#[inline(always)]
fn abs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}

/// calculate the squared separation between the `i_a`th point of `points_a`
/// and the `i_b`th point of `points_b`
///
/// # Assumptions
/// Both point sets share a dimensionality and periodicity (this is checked
/// when the traversal is constructed). Coordinates of periodic point sets
/// have already been wrapped into the box.
#[inline]
pub fn squared_separation(points_a: &PointSet, i_a: usize, points_b: &PointSet, i_b: usize) -> f64 {
    let mut sum = 0.0;
    match points_a.box_size() {
        None => {
            for k in 0..points_a.n_spatial_dims() {
                let diff = points_a.position(k, i_a) - points_b.position(k, i_b);
                sum += diff * diff; // NOTE: .powi can't be used in no_std crates
            }
        }
        Some(box_size) => {
            for (k, &length) in box_size.iter().enumerate() {
                let mut diff = abs(points_a.position(k, i_a) - points_b.position(k, i_b));
                if diff > 0.5 * length {
                    diff = length - diff;
                }
                sum += diff * diff;
            }
        }
    }
    sum
}

/// Computes the smallest and largest squared separation between any point
/// in `box_a` and any point in `box_b`.
///
/// For a given axis, the coordinate differences span the interval
/// `[lo_a - hi_b, hi_a - lo_b]`, and their magnitudes span `[near, far]`.
/// In a periodic domain the separation along the axis is `min(t, L - t)`,
/// which is concave in `t`: its minimum over `[near, far]` sits at one of the
/// endpoints and its maximum is `L/2` whenever that lies inside the interval.
pub fn squared_separation_bounds(
    box_a: &BoundingBox,
    box_b: &BoundingBox,
    box_size: Option<&[f64]>,
) -> (f64, f64) {
    let mut min_sum = 0.0;
    let mut max_sum = 0.0;
    for k in 0..box_a.n_spatial_dims() {
        let low = box_a.lower[k] - box_b.upper[k];
        let high = box_a.upper[k] - box_b.lower[k];
        let (near, far) = if low > 0.0 {
            (low, high)
        } else if high < 0.0 {
            (-high, -low)
        } else {
            (0.0, abs(low).max(high))
        };

        let (axis_min, axis_max) = match box_size {
            None => (near, far),
            Some(box_size) => {
                let length = box_size[k];
                let half = 0.5 * length;
                let axis_min = near.min(length - far).max(0.0);
                let axis_max = if near <= half && half <= far {
                    half
                } else {
                    near.min(length - near).max(far.min(length - far))
                };
                (axis_min, axis_max)
            }
        };
        min_sum += axis_min * axis_min;
        max_sum += axis_max * axis_max;
    }
    (min_sum, max_sum)
}
