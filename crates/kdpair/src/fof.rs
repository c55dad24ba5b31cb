use crate::paircount::build_tree;
use crate::{Error, RuntimeSpec};
use kdpair_nostd_internal::{FofGroups, FofStats, PointSet, friends_of_friends};
use log::debug;

/// Groups `points` with the friends-of-friends algorithm.
///
/// Two points are linked when their separation doesn't exceed
/// `linking_length`, and groups are the connected components of the links.
/// Labels are contiguous and follow the order in which each group's first
/// member appears in `points`.
///
/// This always runs on the calling thread (the worker count of `spec` is
/// ignored).
pub fn fof(points: &PointSet, linking_length: f64, spec: &RuntimeSpec) -> Result<FofGroups, Error> {
    fof_with_stats(points, linking_length, spec).map(|(groups, _)| groups)
}

/// Like [`fof`], but also reports counters describing the work done
pub fn fof_with_stats(
    points: &PointSet,
    linking_length: f64,
    spec: &RuntimeSpec,
) -> Result<(FofGroups, FofStats), Error> {
    if !(linking_length > 0.0) || !linking_length.is_finite() {
        return Err(Error::parameter(
            "linking_length",
            linking_length,
            "positive and finite",
        ));
    }
    if points.n_points() == 0 {
        let groups = FofGroups {
            labels: Vec::new(),
            n_groups: 0,
        };
        return Ok((groups, FofStats::default()));
    }

    let tree = build_tree(points, spec)?;
    let (groups, stats) = friends_of_friends(&tree, linking_length);
    debug!(
        "found {} friends-of-friends groups among {} points",
        groups.n_groups,
        points.n_points()
    );
    debug!("friends-of-friends counters: {stats:?}");
    Ok((groups, stats))
}
