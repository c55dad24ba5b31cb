//! The dual-tree traversal that drives pair counting.
//!
//! For every pair of nodes `(a, b)` we compute the range of separations
//! between their bounding boxes and then do exactly one of the following:
//! - **prune**: no point pair can land in any bin,
//! - **resolve**: every point pair lands in the same bin, so we add the whole
//!   block at once using the nodes' point counts & [`WeightMoments`],
//! - **enumerate**: both nodes are leaves, so we test every point pair,
//! - **split**: recurse into the children of each internal node.
//!
//! # Auto pairing
//!
//! When a point set is paired with itself, we only build a single tree and
//! exploit symmetry. Pairs are reported as ordered pairs, so `(i, j)` and
//! `(j, i)` are both counted (and `(i, i)` never is). Splitting a node that
//! is paired with itself produces `(L, L)`, `(R, R)` and a single *mirrored*
//! `(L, R)` pair, whose contributions get doubled to stand in for the
//! `(R, L)` pair that we never visit.
//!
//! [`WeightMoments`]: crate::WeightMoments

use crate::accumulator::Accumulator;
use crate::bins::{BinRange, Binning};
use crate::error::Incompatibility;
use crate::kdtree::{KdTree, NodeId};
use crate::misc::{squared_separation, squared_separation_bounds};
use crate::points::check_compatible;

/// A pair of nodes (the first from tree a, the second from tree b).
///
/// `mirrored` is only ever `true` for auto pairing. It indicates that the
/// pair also stands in for the (unvisited) pair with the roles swapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodePair {
    pub a: NodeId,
    pub b: NodeId,
    pub mirrored: bool,
}

/// What the traversal does with a [`NodePair`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Prune,
    Resolve(usize),
    Enumerate,
    Split,
}

/// Counters describing the work done by a traversal.
///
/// These are purely informational. They depend on how work was partitioned,
/// but never affect the pair statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub node_pairs_visited: u64,
    pub pruned: u64,
    pub resolved: u64,
    pub leaf_pairs: u64,
    pub point_pairs_tested: u64,
    /// deepest recursion level reached (relative to a traversal's root pair)
    pub max_depth: usize,
}

impl TraversalStats {
    pub fn merge(&mut self, other: &TraversalStats) {
        self.node_pairs_visited += other.node_pairs_visited;
        self.pruned += other.pruned;
        self.resolved += other.resolved;
        self.leaf_pairs += other.leaf_pairs;
        self.point_pairs_tested += other.point_pairs_tested;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Pairs the nodes of two trees (or of a tree with itself) and accumulates
/// pair statistics into separation bins.
///
/// This type is read-only once constructed, so a single instance can be
/// shared by any number of threads, each traversing different [`NodePair`]s
/// into their own [`Accumulator`].
#[derive(Debug)]
pub struct DualTree<'t, 'a> {
    tree_a: &'t KdTree<'a>,
    tree_b: &'t KdTree<'a>,
    is_auto: bool, // true when tree_a is the same as tree_b
    binning: &'t Binning,
}

impl<'t, 'a> DualTree<'t, 'a> {
    /// When `tree_b` is `None`, the points of `tree_a` are paired with
    /// themselves.
    pub fn new(
        tree_a: &'t KdTree<'a>,
        tree_b: Option<&'t KdTree<'a>>,
        binning: &'t Binning,
    ) -> Result<Self, Incompatibility> {
        if let Some(tree_b) = tree_b {
            check_compatible(tree_a.points(), tree_b.points())?;
            Ok(Self {
                tree_a,
                tree_b,
                is_auto: false,
                binning,
            })
        } else {
            Ok(Self {
                tree_a,
                tree_b: tree_a,
                is_auto: true,
                binning,
            })
        }
    }

    pub fn binning(&self) -> &Binning {
        self.binning
    }

    pub fn is_auto(&self) -> bool {
        self.is_auto
    }

    pub fn root_pair(&self) -> NodePair {
        NodePair {
            a: self.tree_a.root(),
            b: self.tree_b.root(),
            mirrored: false,
        }
    }

    #[inline(always)]
    fn is_same_node(&self, pair: &NodePair) -> bool {
        self.is_auto && pair.a == pair.b
    }

    /// decide what to do with `pair`
    pub fn classify(&self, pair: &NodePair) -> Action {
        let (min2, max2) = squared_separation_bounds(
            &self.tree_a.bounds(pair.a),
            &self.tree_b.bounds(pair.b),
            self.tree_a.points().box_size(),
        );
        match self.binning.bin_range_of_squared(min2, max2) {
            BinRange::Empty => Action::Prune,
            BinRange::Within(bin) => Action::Resolve(bin),
            BinRange::Spans { .. } => {
                if self.tree_a.is_leaf(pair.a) && self.tree_b.is_leaf(pair.b) {
                    Action::Enumerate
                } else {
                    Action::Split
                }
            }
        }
    }

    /// calls `f` on each child pair of `pair` (does nothing for a leaf pair)
    pub fn for_each_child(&self, pair: &NodePair, mut f: impl FnMut(NodePair)) {
        if self.is_same_node(pair) {
            if let Some((left, right)) = self.tree_a.children(pair.a) {
                let child = |a, b, mirrored| NodePair { a, b, mirrored };
                f(child(left, left, false));
                f(child(left, right, true));
                f(child(right, right, false));
            }
            return;
        }

        let mirrored = pair.mirrored;
        match (self.tree_a.children(pair.a), self.tree_b.children(pair.b)) {
            (Some((a_left, a_right)), Some((b_left, b_right))) => {
                for a in [a_left, a_right] {
                    for b in [b_left, b_right] {
                        f(NodePair { a, b, mirrored });
                    }
                }
            }
            (Some((a_left, a_right)), None) => {
                for a in [a_left, a_right] {
                    f(NodePair {
                        a,
                        b: pair.b,
                        mirrored,
                    });
                }
            }
            (None, Some((b_left, b_right))) => {
                for b in [b_left, b_right] {
                    f(NodePair {
                        a: pair.a,
                        b,
                        mirrored,
                    });
                }
            }
            (None, None) => {}
        }
    }

    /// Accumulate the contributions of every point pair under `pair`
    pub fn traverse(&self, pair: NodePair, accum: &mut Accumulator, stats: &mut TraversalStats) {
        self.traverse_at(pair, 0, accum, stats);
    }

    fn traverse_at(
        &self,
        pair: NodePair,
        depth: usize,
        accum: &mut Accumulator,
        stats: &mut TraversalStats,
    ) {
        stats.node_pairs_visited += 1;
        stats.max_depth = stats.max_depth.max(depth);
        match self.classify(&pair) {
            Action::Prune => stats.pruned += 1,
            Action::Resolve(bin) => {
                stats.resolved += 1;
                self.resolve(&pair, bin, accum);
            }
            Action::Enumerate => {
                stats.leaf_pairs += 1;
                self.enumerate(&pair, accum, stats);
            }
            Action::Split => {
                self.for_each_child(&pair, |child| {
                    self.traverse_at(child, depth + 1, accum, stats)
                });
            }
        }
    }

    /// add every point pair under `pair` to `bin` without visiting points
    fn resolve(&self, pair: &NodePair, bin: usize, accum: &mut Accumulator) {
        let moments_a = self.tree_a.moments(pair.a);
        let n_a = self.tree_a.node(pair.a).n_points() as u64;
        if self.is_same_node(pair) {
            if n_a > 1 {
                accum.add_block(
                    bin,
                    n_a * (n_a - 1),
                    moments_a.self_pair_sum,
                    moments_a.self_pair_sum_sq,
                );
            }
        } else {
            let moments_b = self.tree_b.moments(pair.b);
            let n_b = self.tree_b.node(pair.b).n_points() as u64;
            let factor = if pair.mirrored { 2 } else { 1 };
            accum.add_block(
                bin,
                factor * n_a * n_b,
                (factor as f64) * moments_a.sum * moments_b.sum,
                (factor as f64) * moments_a.sum_sq * moments_b.sum_sq,
            );
        }
    }

    /// test every point pair of a pair of leaves
    fn enumerate(&self, pair: &NodePair, accum: &mut Accumulator, stats: &mut TraversalStats) {
        let points_a = self.tree_a.points();
        let points_b = self.tree_b.points();
        let indices_a = self.tree_a.points_in(pair.a);

        if self.is_same_node(pair) {
            for (offset, &i_a) in indices_a.iter().enumerate() {
                for &i_b in &indices_a[offset + 1..] {
                    let distance_squared = squared_separation(points_a, i_a, points_a, i_b);
                    if let Some(bin) = self.binning.bin_of_squared(distance_squared) {
                        let w = points_a.weight(i_a) * points_a.weight(i_b);
                        accum.add_block(bin, 2, 2.0 * w, 2.0 * (w * w));
                    }
                }
            }
            let n = indices_a.len() as u64;
            stats.point_pairs_tested += n * n.saturating_sub(1) / 2;
        } else {
            let indices_b = self.tree_b.points_in(pair.b);
            for &i_a in indices_a {
                for &i_b in indices_b {
                    let distance_squared = squared_separation(points_a, i_a, points_b, i_b);
                    if let Some(bin) = self.binning.bin_of_squared(distance_squared) {
                        let w = points_a.weight(i_a) * points_b.weight(i_b);
                        if pair.mirrored {
                            accum.add_block(bin, 2, 2.0 * w, 2.0 * (w * w));
                        } else {
                            accum.add_pair(bin, w);
                        }
                    }
                }
            }
            stats.point_pairs_tested += (indices_a.len() * indices_b.len()) as u64;
        }
    }
}
