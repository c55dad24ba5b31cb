//! Friends-of-friends grouping.
//!
//! Two points are friends when their separation is no larger than the
//! linking length. Groups are the connected components of that relation.
//! We track components with a union-find forest and enumerate candidate
//! edges with a dual-tree walk of a tree against itself.
//!
//! Before the walk, every node whose own extent fits within the linking
//! length is marked as internally connected (and its points are linked
//! without any enumeration). When two such nodes are entirely within the
//! linking length of each other, linking their first points is enough.

use crate::kdtree::{KdTree, NodeId};
use crate::misc::{squared_separation, squared_separation_bounds};
use crate::points::PointSet;
use alloc::vec;
use alloc::vec::Vec;

/// The outcome of a friends-of-friends pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FofGroups {
    /// group label of each point. Labels are contiguous and assigned in the
    /// order in which groups are first encountered (by point index).
    pub labels: Vec<usize>,
    pub n_groups: usize,
}

impl FofGroups {
    /// the number of members in each group
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_groups];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Counters describing the work done by [`friends_of_friends`].
///
/// Like [`TraversalStats`](crate::TraversalStats), these never affect the
/// groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FofStats {
    /// candidate edges passed to the union-find forest during the walk
    pub edges_visited: u64,
    /// nodes whose points are all within the linking length of each other
    pub connected_nodes: u64,
    /// calls to the union-find root lookup
    pub n_finds: u64,
    /// longest path from a point to its root seen by a lookup
    pub max_find_depth: usize,
    /// sum of the path lengths of every lookup
    pub total_find_depth: u64,
}

/// Disjoint-set forest with path compression
struct UnionFind {
    parent: Vec<usize>,
    n_finds: u64,
    max_depth: usize,
    total_depth: u64,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            n_finds: 0,
            max_depth: 0,
            total_depth: 0,
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        let mut depth = 0;
        while self.parent[root] != root {
            root = self.parent[root];
            depth += 1;
        }
        self.n_finds += 1;
        self.max_depth = self.max_depth.max(depth);
        self.total_depth += depth as u64;
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);
        // also correct when root_i == root_j
        self.parent[root_j] = root_i;
    }

    /// replace roots with contiguous labels (in order of first appearance)
    fn into_groups(mut self) -> FofGroups {
        let n = self.parent.len();
        let mut root_label = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut n_groups = 0;
        for i in 0..n {
            let root = self.find(i);
            if root_label[root] == usize::MAX {
                root_label[root] = n_groups;
                n_groups += 1;
            }
            labels.push(root_label[root]);
        }
        FofGroups { labels, n_groups }
    }
}

struct FofWalk<'t, 'a> {
    tree: &'t KdTree<'a>,
    linking_length_sq: f64,
    connected: Vec<bool>,
    forest: UnionFind,
    edges_visited: u64,
    connected_nodes: u64,
}

impl FofWalk<'_, '_> {
    fn bounds(&self, a: NodeId, b: NodeId) -> (f64, f64) {
        squared_separation_bounds(
            &self.tree.bounds(a),
            &self.tree.bounds(b),
            self.tree.points().box_size(),
        )
    }

    fn first_point(&self, id: NodeId) -> usize {
        self.tree.points_in(id)[0]
    }

    /// link every point of `id` to its first point when the node is small
    /// enough. All descendants of a connected node are connected.
    fn mark_connected(&mut self, id: NodeId, parent_connected: bool) {
        let is_connected = parent_connected || {
            let tree = self.tree;
            let (_, max2) = self.bounds(id, id);
            if max2 <= self.linking_length_sq {
                let indices = tree.points_in(id);
                let first = indices[0];
                for &i in &indices[1..] {
                    self.forest.union(first, i);
                }
                true
            } else {
                false
            }
        };
        self.connected[id.index()] = is_connected;
        self.connected_nodes += u64::from(is_connected);
        if let Some((left, right)) = self.tree.children(id) {
            self.mark_connected(left, is_connected);
            self.mark_connected(right, is_connected);
        }
    }

    fn visit(&mut self, a: NodeId, b: NodeId) {
        let (min2, max2) = self.bounds(a, b);
        if min2 > self.linking_length_sq {
            return;
        }

        if max2 <= self.linking_length_sq {
            if a == b {
                // already linked while marking connected nodes
                return;
            }
            // every pair is linked
            let (first_a, first_b) = (self.first_point(a), self.first_point(b));
            if self.connected[a.index()] && self.connected[b.index()] {
                self.link(first_a, first_b);
            } else {
                let tree = self.tree;
                for node in [a, b] {
                    for &i in tree.points_in(node) {
                        self.link(first_a, i);
                    }
                }
            }
            return;
        }

        match (self.tree.children(a), self.tree.children(b)) {
            (None, None) => self.enumerate(a, b),
            (Some((a_left, a_right)), _) if a == b => {
                self.visit(a_left, a_left);
                self.visit(a_left, a_right);
                self.visit(a_right, a_right);
            }
            (Some((a_left, a_right)), Some((b_left, b_right))) => {
                for a_child in [a_left, a_right] {
                    for b_child in [b_left, b_right] {
                        self.visit(a_child, b_child);
                    }
                }
            }
            (Some((a_left, a_right)), None) => {
                self.visit(a_left, b);
                self.visit(a_right, b);
            }
            (None, Some((b_left, b_right))) => {
                self.visit(a, b_left);
                self.visit(a, b_right);
            }
        }
    }

    fn enumerate(&mut self, a: NodeId, b: NodeId) {
        let tree = self.tree;
        let points = tree.points();
        let indices_a = tree.points_in(a);
        let indices_b = tree.points_in(b);
        for (offset, &i) in indices_a.iter().enumerate() {
            let candidates = if a == b {
                &indices_b[offset + 1..]
            } else {
                indices_b
            };
            for &j in candidates {
                if squared_separation(points, i, points, j) <= self.linking_length_sq {
                    self.link(i, j);
                }
            }
        }
    }

    fn link(&mut self, i: usize, j: usize) {
        self.edges_visited += 1;
        self.forest.union(i, j);
    }

    fn stats(&self) -> FofStats {
        FofStats {
            edges_visited: self.edges_visited,
            connected_nodes: self.connected_nodes,
            n_finds: self.forest.n_finds,
            max_find_depth: self.forest.max_depth,
            total_find_depth: self.forest.total_depth,
        }
    }
}

/// Groups the points of `tree` into friends-of-friends groups.
///
/// `linking_length` is assumed to be non-negative and finite. The counters
/// cover the linking passes (not the final relabeling).
pub fn friends_of_friends(tree: &KdTree, linking_length: f64) -> (FofGroups, FofStats) {
    let mut walk = FofWalk {
        tree,
        linking_length_sq: linking_length * linking_length,
        connected: vec![false; tree.n_nodes()],
        forest: UnionFind::new(tree.points().n_points()),
        edges_visited: 0,
        connected_nodes: 0,
    };
    walk.mark_connected(tree.root(), false);
    walk.visit(tree.root(), tree.root());
    let stats = walk.stats();
    (walk.forest.into_groups(), stats)
}

/// The O(N²) version of [`friends_of_friends`], for testing
pub fn brute_force_friends_of_friends(
    points: &PointSet,
    linking_length: f64,
) -> FofGroups {
    let linking_length_sq = linking_length * linking_length;
    let n_points = points.n_points();
    let mut forest = UnionFind::new(n_points);
    for i in 0..n_points {
        for j in (i + 1)..n_points {
            if squared_separation(points, i, points, j) <= linking_length_sq {
                forest.union(i, j);
            }
        }
    }
    forest.into_groups()
}
