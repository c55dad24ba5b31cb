//! Public pair counting entry points

use crate::parallel;
use crate::{Error, RuntimeSpec};
use kdpair_nostd_internal::{
    Accumulator, Binning, DualTree, KdTree, PointSet, TraversalStats, brute_force_paircount,
    check_compatible, partition_work,
};
use log::debug;

/// Binned pair statistics.
///
/// Pairs are ordered: when a point set is paired with itself, `(i, j)` and
/// `(j, i)` are both counted (and `(i, i)` never is), so the count over an
/// all-inclusive binning is `N·(N−1)`. For two distinct point sets it is
/// `N_a·N_b`.
#[derive(Clone, Debug, PartialEq)]
pub struct PairCounts {
    /// the midpoint of each bin
    pub bin_centers: Vec<f64>,
    pub edges: Vec<f64>,
    pub count: Vec<u64>,
    /// `Σ wᵢwⱼ` over the pairs in each bin
    pub weighted_sum: Vec<f64>,
    /// `Σ (wᵢwⱼ)²` over the pairs in each bin
    pub weighted_sum_sq: Vec<f64>,
    /// Describes the work performed by the traversal. This depends on how the
    /// work was partitioned, so compare the other fields to check whether
    /// two results agree.
    pub stats: TraversalStats,
}

impl PairCounts {
    fn new(binning: &Binning, accum: &Accumulator, stats: TraversalStats) -> Self {
        PairCounts {
            bin_centers: binning.centers(),
            edges: binning.edges().to_vec(),
            count: accum.count().to_vec(),
            weighted_sum: accum.weighted_sum().to_vec(),
            weighted_sum_sq: accum.weighted_sum_sq().to_vec(),
            stats,
        }
    }

    pub fn n_bins(&self) -> usize {
        self.count.len()
    }

    pub fn total_count(&self) -> u64 {
        self.count.iter().sum()
    }
}

/// drop `points_b` when it refers to the same object as `points_a`
fn distinct_b<'b>(points_a: &PointSet, points_b: Option<&'b PointSet>) -> Option<&'b PointSet> {
    points_b.filter(|points_b| !std::ptr::eq(points_a, *points_b))
}

/// Count the pairs formed between `points_a` and `points_b` in each
/// separation bin.
///
/// When `points_b` is `None` (or refers to `points_a`), `points_a` is paired
/// with itself. `worker_count` follows the convention of
/// [`RuntimeSpec::with_worker_count`].
pub fn paircount(
    points_a: &PointSet,
    points_b: Option<&PointSet>,
    binning: &Binning,
    worker_count: usize,
) -> Result<PairCounts, Error> {
    let spec = RuntimeSpec::default().with_worker_count(worker_count);
    paircount_with(points_a, points_b, binning, &spec)
}

/// Same as [`paircount`], with full control over the runtime parameters.
pub fn paircount_with(
    points_a: &PointSet,
    points_b: Option<&PointSet>,
    binning: &Binning,
    spec: &RuntimeSpec,
) -> Result<PairCounts, Error> {
    let points_b = distinct_b(points_a, points_b);
    if let Some(points_b) = points_b {
        check_compatible(points_a, points_b)?;
    }

    let n_points_b = points_b.map_or(points_a.n_points(), PointSet::n_points);
    if points_a.n_points() == 0 || n_points_b == 0 {
        debug!("skipping the traversal: no pairs can be formed");
        let accum = Accumulator::new(binning.n_bins());
        return Ok(PairCounts::new(binning, &accum, TraversalStats::default()));
    }

    let tree_a = build_tree(points_a, spec)?;
    let tree_b = points_b.map(|points| build_tree(points, spec)).transpose()?;
    let dual = DualTree::new(&tree_a, tree_b.as_ref(), binning)?;

    let target_units = spec.target_units();
    let units = partition_work(&dual, target_units);
    debug!(
        "partitioned the traversal into {} work units (target: {target_units})",
        units.len()
    );

    let (accum, stats) = parallel::run(&dual, &units, spec.worker_count())?;
    debug!("traversal stats: {stats:?}");
    Ok(PairCounts::new(binning, &accum, stats))
}

pub(crate) fn build_tree<'a>(points: &'a PointSet, spec: &RuntimeSpec) -> Result<KdTree<'a>, Error> {
    let tree = KdTree::build(points, spec.leaf_size())?;
    debug!(
        "built a k-d tree over {} points: {} nodes, depth {}, leaf size {}",
        points.n_points(),
        tree.n_nodes(),
        tree.depth(),
        tree.leaf_size()
    );
    Ok(tree)
}

/// Computes the same quantities as [`paircount`] by directly considering
/// every pair of points.
///
/// This is O(N²) and primarily exists to validate [`paircount`].
pub fn paircount_brute_force(
    points_a: &PointSet,
    points_b: Option<&PointSet>,
    binning: &Binning,
) -> Result<PairCounts, Error> {
    let points_b = distinct_b(points_a, points_b);
    let accum = brute_force_paircount(points_a, points_b, binning)?;
    Ok(PairCounts::new(binning, &accum, TraversalStats::default()))
}
