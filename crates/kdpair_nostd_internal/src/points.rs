use crate::error::{Incompatibility, ShapeError};
use alloc::vec::Vec;
use ndarray::{Array2, ArrayView2, Axis};

/// Collection of point properties.
///
/// We place the following constraints on the positions array:
/// - axis 0 is the slow axis and it corresponds to the different spatial
///   components.
/// - axis 1 is the fast axis. The length along this axis coincides with
///   the number of points.
/// - In other words the shape of the array is `(D, n_points)`, where `D` is
///   the number of spatial dimensions and `n_points` is the number of points.
///
/// Unlike the views used elsewhere, a `PointSet` owns a copy of the
/// positions. When a box size is given, the domain is periodic and every
/// coordinate is wrapped into `[0, box_size[dim])` during construction.
#[derive(Clone, Debug)]
pub struct PointSet {
    positions: Array2<f64>,
    weights: Vec<f64>,
    box_size: Option<Vec<f64>>,
}

impl PointSet {
    /// create a new instance
    ///
    /// When `weights` is `None`, every point has a weight of 1.
    pub fn new(
        positions: ArrayView2<f64>,
        weights: Option<&[f64]>,
        box_size: Option<&[f64]>,
    ) -> Result<PointSet, ShapeError> {
        let n_spatial_dims = positions.len_of(Axis(0));
        let n_points = positions.len_of(Axis(1));
        if n_spatial_dims == 0 {
            return Err(ShapeError("positions must have at least 1 spatial dimension"));
        } else if weights.is_some_and(|w| w.len() != n_points) {
            return Err(ShapeError(
                "weights must have the same number of points as positions",
            ));
        } else if positions.iter().any(|x| !x.is_finite()) {
            return Err(ShapeError("positions must be finite"));
        }

        if let Some(box_size) = box_size {
            if box_size.len() != n_spatial_dims {
                return Err(ShapeError(
                    "box_size must have an entry for each spatial dimension",
                ));
            } else if box_size.iter().any(|&l| !(l > 0.0) || !l.is_finite()) {
                return Err(ShapeError("each box_size entry must be positive and finite"));
            }
        }

        let mut owned = positions.to_owned();
        if let Some(box_size) = box_size {
            for (mut component, &length) in owned.axis_iter_mut(Axis(0)).zip(box_size.iter()) {
                component.mapv_inplace(|x| wrap_coordinate(x, length));
            }
        }

        Ok(PointSet {
            positions: owned,
            weights: match weights {
                Some(w) => w.to_vec(),
                None => alloc::vec![1.0; n_points],
            },
            box_size: box_size.map(|l| l.to_vec()),
        })
    }

    pub fn n_points(&self) -> usize {
        self.positions.len_of(Axis(1))
    }

    pub fn n_spatial_dims(&self) -> usize {
        self.positions.len_of(Axis(0))
    }

    /// the (possibly wrapped) `dim` component of the `i`th point's position
    #[inline(always)]
    pub fn position(&self, dim: usize, i: usize) -> f64 {
        self.positions[[dim, i]]
    }

    pub fn positions(&self) -> ArrayView2<f64> {
        self.positions.view()
    }

    #[inline(always)]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn box_size(&self) -> Option<&[f64]> {
        self.box_size.as_deref()
    }

    pub fn is_periodic(&self) -> bool {
        self.box_size.is_some()
    }
}

/// Checks whether pairs can be formed between `points_a` and `points_b`
pub fn check_compatible(points_a: &PointSet, points_b: &PointSet) -> Result<(), Incompatibility> {
    if points_a.n_spatial_dims() != points_b.n_spatial_dims() {
        Err(Incompatibility::Dimension {
            dims_a: points_a.n_spatial_dims(),
            dims_b: points_b.n_spatial_dims(),
        })
    } else if points_a.box_size() != points_b.box_size() {
        Err(Incompatibility::Periodicity)
    } else {
        Ok(())
    }
}

/// maps `x` into `[0, length)`
///
/// `f64::rem_euclid` isn't available without the standard library
fn wrap_coordinate(x: f64, length: f64) -> f64 {
    let mut out = x % length;
    if out < 0.0 {
        out += length;
    }
    // adding length to a tiny negative remainder can round up to length
    if out >= length { 0.0 } else { out }
}
