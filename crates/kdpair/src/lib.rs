/*!
Provides parallelized routines for counting pairs of points as a function of
their separation (e.g. to estimate 2-point correlation functions).

# High-Level: Pair Counts

2-point correlation functions come up in a number of contexts, including
[astronomy/cosmology](https://en.wikipedia.org/wiki/Correlation_function_(astronomy)).
Estimators of these functions are built from the number of pairs of points
(taken from a single data set or from 2 separate data sets) whose
separations fall within each of a set of separation bins. Often each point
also carries a weight, and the weighted pair counts `Σ wᵢwⱼ` are needed.

The naive calculation considers every pair of points. Instead, we build a
k-d tree over each point set and walk the pair of trees together. Whole
groups of pairs can be skipped (when they are too far apart for any bin) or
added in a single step (when they must all share a bin), so that only a
small fraction of pairs is ever considered individually.

# User Guide

```
use kdpair::{Binning, PointSet, paircount};
use ndarray::ArrayView2;

// 3 points along a line, stored with shape (n_spatial_dims, n_points)
let positions = [0.0, 1.0, 2.5];
let points = PointSet::new(
    ArrayView2::from_shape((1, 3), &positions).unwrap(),
    None,
    None,
).unwrap();

let binning = Binning::from_edges(&[0.0, 1.5, 3.0]).unwrap();
let result = paircount(&points, None, &binning, 1).unwrap();
// ordered pairs are counted, so (0,1) and (1,0) both land in the first bin.
// A separation equal to an edge belongs to the higher bin.
assert_eq!(result.count, [2, 4]);
```

Periodic domains are described by passing a box size to [`PointSet::new`].
Separations then follow the minimum-image convention.

# Developer Guide

The algorithms live in [`kdpair_nostd_internal`], which doesn't depend on
the standard library. This crate adds error handling, runtime configuration,
logging (through the [`log`] facade), and the thread pool.

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the crates in this package
mod error;
mod fof;
mod paircount;
mod parallel;
mod runtime;

// pull in symbols that visible outside of the package
pub use error::{Error, ErrorClass};
pub use fof::{fof, fof_with_stats};
pub use kdpair_nostd_internal::{Binning, FofGroups, FofStats, PointSet, TraversalStats};
pub use paircount::{PairCounts, paircount, paircount_brute_force, paircount_with};
pub use runtime::RuntimeSpec;
