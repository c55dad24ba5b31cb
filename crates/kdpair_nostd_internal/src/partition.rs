//! Splits a dual-tree traversal into independent units of work.
//!
//! Every [`NodePair`] returned by [`partition_work`] is the root of a
//! traversal that touches a disjoint set of point pairs. Traversing every
//! unit and merging the results therefore reproduces a traversal of the
//! root pair.

use crate::traversal::{Action, DualTree, NodePair};
use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// Expands the root pair breadth-first until there are roughly
/// `target_units` pairs.
///
/// Expansion follows the same rules as the traversal: pruned pairs are
/// dropped, while pairs that can be resolved or enumerated become units
/// immediately. The output is a pure function of the trees, the binning and
/// `target_units`. In particular it must NOT depend on the number of workers
/// that consume it, since the merge order of the per-unit results is the
/// order of this list.
pub fn partition_work(dual: &DualTree, target_units: usize) -> Vec<NodePair> {
    let mut units = Vec::new();
    let mut frontier = VecDeque::new();
    frontier.push_back(dual.root_pair());

    while let Some(pair) = frontier.pop_front() {
        match dual.classify(&pair) {
            Action::Prune => {}
            Action::Resolve(_) | Action::Enumerate => units.push(pair),
            Action::Split => {
                if units.len() + frontier.len() + 1 >= target_units {
                    units.push(pair);
                } else {
                    dual.for_each_child(&pair, |child| frontier.push_back(child));
                }
            }
        }
    }
    units
}
