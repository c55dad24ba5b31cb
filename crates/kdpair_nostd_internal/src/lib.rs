#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod accumulator;
mod bins;
mod brute_force;
mod error;
mod fof;
mod kdtree;
mod misc;
mod partition;
mod points;
mod traversal;

pub use accumulator::Accumulator;
pub use bins::{BinRange, Binning, validate_bin_edges};
pub use brute_force::brute_force_paircount;
pub use error::{BinEdgeError, EmptyInputError, Incompatibility, ShapeError};
pub use fof::{FofGroups, FofStats, brute_force_friends_of_friends, friends_of_friends};
pub use kdtree::{BoundingBox, KdTree, Node, NodeId, Split, WeightMoments};
pub use misc::{squared_separation, squared_separation_bounds};
pub use partition::partition_work;
pub use points::{PointSet, check_compatible};
pub use traversal::{Action, DualTree, NodePair, TraversalStats};
