//! A balanced k-d tree over the points of a [`PointSet`].
//!
//! The tree never copies coordinate data. It owns:
//! - a permutation array over the point indices, which is reordered in place
//!   during construction so that every node covers a contiguous range of it,
//! - an arena of nodes (addressed by [`NodeId`]),
//! - a flat buffer of bounding boxes (`2 * D` values per node).
//!
//! Each node is split at the median of its widest dimension, which bounds
//! the depth by `ceil(log2(n_points / leaf_size))`.

use crate::error::EmptyInputError;
use crate::points::PointSet;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

/// Index of a node inside of a [`KdTree`]'s arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An axis-aligned box. `lower` and `upper` each hold 1 entry per dimension
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox<'a> {
    pub lower: &'a [f64],
    pub upper: &'a [f64],
}

impl BoundingBox<'_> {
    pub fn n_spatial_dims(&self) -> usize {
        self.lower.len()
    }

    /// the extent of the box along `dim`
    pub fn width(&self, dim: usize) -> f64 {
        self.upper[dim] - self.lower[dim]
    }
}

/// Sums of the weights of the points within a node.
///
/// These let us resolve an entire node pair without visiting its points:
/// - `Σᵢ Σⱼ wᵢwⱼ = (Σ w)(Σ w)`
/// - `Σᵢ Σⱼ (wᵢwⱼ)² = (Σ w²)(Σ w²)`
///
/// Pairing a node with itself needs the sums over `i != j`. Subtracting the
/// `i == j` terms from the products above cancels catastrophically when the
/// weights span many orders of magnitude, so these sums are accumulated
/// directly: explicitly over the points of a leaf, and as
/// `self(L) + self(R) + 2 S(L) S(R)` for an internal node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeightMoments {
    /// `Σ w`
    pub sum: f64,
    /// `Σ w²`
    pub sum_sq: f64,
    /// `Σ_{i≠j} wᵢwⱼ`
    pub self_pair_sum: f64,
    /// `Σ_{i≠j} (wᵢwⱼ)²`
    pub self_pair_sum_sq: f64,
}

/// Describes how an internal node was split
#[derive(Clone, Copy, Debug)]
pub struct Split {
    pub dim: usize,
    pub value: f64,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Clone, Debug)]
pub struct Node {
    start: usize,
    end: usize,
    split: Option<Split>,
    moments: WeightMoments,
}

impl Node {
    /// the range of the permutation array covered by this node
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }

    pub fn n_points(&self) -> usize {
        self.end - self.start
    }

    /// `None` for leaves
    pub fn split(&self) -> Option<&Split> {
        self.split.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }
}

#[derive(Debug)]
pub struct KdTree<'a> {
    points: &'a PointSet,
    nodes: Vec<Node>,
    // holds the lower corner followed by the upper corner for each node
    bounds: Vec<f64>,
    permutation: Vec<usize>,
    leaf_size: NonZeroUsize,
    depth: usize,
}

impl<'a> KdTree<'a> {
    /// Construct the tree in a single top-down pass.
    ///
    /// Ranges holding no more than `leaf_size` points become leaves.
    pub fn build(points: &'a PointSet, leaf_size: NonZeroUsize) -> Result<Self, EmptyInputError> {
        let n_points = points.n_points();
        if n_points == 0 {
            return Err(EmptyInputError);
        }
        // a balanced binary tree with n_leaves leaves has 2*n_leaves - 1 nodes
        let approx_n_nodes = 2 * n_points.div_ceil(leaf_size.get());
        let mut tree = KdTree {
            points,
            nodes: Vec::with_capacity(approx_n_nodes),
            bounds: Vec::with_capacity(approx_n_nodes * 2 * points.n_spatial_dims()),
            permutation: (0..n_points).collect(),
            leaf_size,
            depth: 0,
        };
        tree.build_node(0, n_points, 0);
        Ok(tree)
    }

    fn build_node(&mut self, start: usize, end: usize, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let n_dims = self.points.n_spatial_dims();
        let points = self.points;

        // tight bounds & weight moments
        let bounds_offset = self.bounds.len();
        self.bounds.resize(bounds_offset + 2 * n_dims, 0.0);
        let (lower, upper) = self.bounds[bounds_offset..].split_at_mut(n_dims);
        lower.fill(f64::INFINITY);
        upper.fill(f64::NEG_INFINITY);
        let mut moments = WeightMoments::default();
        for &i in &self.permutation[start..end] {
            for dim in 0..n_dims {
                let x = points.position(dim, i);
                lower[dim] = lower[dim].min(x);
                upper[dim] = upper[dim].max(x);
            }
            let w = points.weight(i);
            moments.sum += w;
            moments.sum_sq += w * w;
        }

        // pick the dimension of greatest extent
        let mut split_dim = 0;
        let mut widest = f64::NEG_INFINITY;
        for dim in 0..n_dims {
            let width = upper[dim] - lower[dim];
            if width > widest {
                widest = width;
                split_dim = dim;
            }
        }

        self.nodes.push(Node {
            start,
            end,
            split: None,
            moments,
        });
        self.depth = self.depth.max(depth);

        if (end - start) > self.leaf_size.get() {
            // median partition (order-statistic selection rather than a sort)
            let mid = start + (end - start) / 2;
            self.permutation[start..end].select_nth_unstable_by(mid - start, |&i, &j| {
                points
                    .position(split_dim, i)
                    .total_cmp(&points.position(split_dim, j))
            });
            let value = points.position(split_dim, self.permutation[mid]);

            let left = self.build_node(start, mid, depth + 1);
            let right = self.build_node(mid, end, depth + 1);
            let (l, r) = (self.nodes[left.0].moments, self.nodes[right.0].moments);
            let node = &mut self.nodes[id.0];
            node.moments.self_pair_sum = l.self_pair_sum + r.self_pair_sum + 2.0 * l.sum * r.sum;
            node.moments.self_pair_sum_sq =
                l.self_pair_sum_sq + r.self_pair_sum_sq + 2.0 * l.sum_sq * r.sum_sq;
            node.split = Some(Split {
                dim: split_dim,
                value,
                left,
                right,
            });
        } else {
            let (self_pair_sum, self_pair_sum_sq) = self.leaf_self_pairs(start, end);
            let node = &mut self.nodes[id.0];
            node.moments.self_pair_sum = self_pair_sum;
            node.moments.self_pair_sum_sq = self_pair_sum_sq;
        }
        id
    }

    /// `Σ_{i≠j} wᵢwⱼ` and `Σ_{i≠j} (wᵢwⱼ)²` over a leaf's points
    fn leaf_self_pairs(&self, start: usize, end: usize) -> (f64, f64) {
        let indices = &self.permutation[start..end];
        let (mut sum, mut sum_sq) = (0.0, 0.0);
        for (offset, &i) in indices.iter().enumerate() {
            let w_i = self.points.weight(i);
            for &j in &indices[offset + 1..] {
                let w = w_i * self.points.weight(j);
                sum += w;
                sum_sq += w * w;
            }
        }
        (2.0 * sum, 2.0 * sum_sq)
    }

    pub fn points(&self) -> &'a PointSet {
        self.points
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// the number of edges between the root and the deepest leaf
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf_size(&self) -> NonZeroUsize {
        self.leaf_size
    }

    /// the tight bounding box of the points under node `id`
    #[inline]
    pub fn bounds(&self, id: NodeId) -> BoundingBox<'_> {
        let n_dims = self.points.n_spatial_dims();
        let offset = id.0 * 2 * n_dims;
        let (lower, upper) = self.bounds[offset..offset + 2 * n_dims].split_at(n_dims);
        BoundingBox { lower, upper }
    }

    /// the indices (into the [`PointSet`]) of the points under node `id`
    #[inline]
    pub fn points_in(&self, id: NodeId) -> &[usize] {
        &self.permutation[self.nodes[id.0].range()]
    }

    #[inline]
    pub fn moments(&self, id: NodeId) -> &WeightMoments {
        &self.nodes[id.0].moments
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes[id.0].split.map(|s| (s.left, s.right))
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }
}
