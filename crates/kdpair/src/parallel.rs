//! Drives a partitioned traversal on a pool of workers
//!
//! Each unit of work gets its own [`Accumulator`]. Once every unit is done,
//! the accumulators are merged on the calling thread in unit order. Since
//! the partition doesn't depend on the number of workers, the serial and
//! threaded paths produce bitwise identical results.

use crate::Error;
use kdpair_nostd_internal::{Accumulator, DualTree, NodePair, TraversalStats};
use log::{debug, trace};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Evaluate `f` for every index in `0..n_units` and return the results in
/// index order.
///
/// A panic inside of `f` is caught and reported as an [`Error`]. In that
/// case all other results are discarded.
fn run_units<T, F>(n_units: usize, worker_count: usize, f: F) -> Result<Vec<T>, Error>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let guarded = |index: usize| {
        let out = panic::catch_unwind(AssertUnwindSafe(|| f(index)))
            .map_err(|payload| Error::worker_panic(index, panic_message(payload.as_ref())));
        trace!("finished work unit {index}");
        out
    };

    if worker_count == 1 {
        debug!("processing {n_units} work units on the calling thread");
        (0..n_units).map(guarded).collect()
    } else {
        // num_threads(0) lets rayon pick (all available parallelism)
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|idx| format!("kdpair-worker-{idx}"))
            .build()
            .map_err(Error::worker_pool)?;
        debug!(
            "processing {n_units} work units with {} threads",
            pool.current_num_threads()
        );
        pool.install(|| (0..n_units).into_par_iter().map(guarded).collect())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Traverse every unit in `units` and merge the results (in unit order)
pub(crate) fn run(
    dual: &DualTree,
    units: &[NodePair],
    worker_count: usize,
) -> Result<(Accumulator, TraversalStats), Error> {
    let n_bins = dual.binning().n_bins();
    let partials = run_units(units.len(), worker_count, |index| {
        let mut accum = Accumulator::new(n_bins);
        let mut stats = TraversalStats::default();
        dual.traverse(units[index], &mut accum, &mut stats);
        (accum, stats)
    })?;

    let mut accum = Accumulator::new(n_bins);
    let mut stats = TraversalStats::default();
    for (unit_accum, unit_stats) in &partials {
        accum.merge(unit_accum);
        stats.merge(unit_stats);
    }
    Ok((accum, stats))
}
