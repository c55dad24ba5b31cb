use std::num::NonZeroUsize;

const DEFAULT_LEAF_SIZE: NonZeroUsize = NonZeroUsize::new(16).unwrap();
const DEFAULT_UNITS_PER_WORKER: NonZeroUsize = NonZeroUsize::new(8).unwrap();

/// Runtime parameters that don't have a meaningful impact on the output.
///
/// Every choice produces the same counts, and (because per-unit results are
/// always merged in the same order) bitwise identical weighted sums for a
/// given `leaf_size` and machine. These knobs only affect performance.
///
/// In the future this might also track the backend to use (e.g. GPUs or
/// Threads or Serial).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeSpec {
    worker_count: usize,
    leaf_size: NonZeroUsize,
    units_per_worker: NonZeroUsize,
}

impl Default for RuntimeSpec {
    fn default() -> Self {
        RuntimeSpec {
            worker_count: 1,
            leaf_size: DEFAULT_LEAF_SIZE,
            units_per_worker: DEFAULT_UNITS_PER_WORKER,
        }
    }
}

impl RuntimeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// `1` runs everything on the calling thread, `0` uses all available
    /// parallelism, and any other value builds a pool with that many threads
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// the maximum number of points held by a leaf of a k-d tree
    pub fn with_leaf_size(mut self, leaf_size: NonZeroUsize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// how many work units to create for each hardware thread
    pub fn with_units_per_worker(mut self, units_per_worker: NonZeroUsize) -> Self {
        self.units_per_worker = units_per_worker;
        self
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn leaf_size(&self) -> NonZeroUsize {
        self.leaf_size
    }

    pub fn units_per_worker(&self) -> NonZeroUsize {
        self.units_per_worker
    }

    /// The number of work units that a traversal is split into.
    ///
    /// This must not depend on `worker_count`: the partition fixes the merge
    /// order of the partial results.
    pub(crate) fn target_units(&self) -> usize {
        let parallelism = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        self.units_per_worker.get() * parallelism
    }
}
