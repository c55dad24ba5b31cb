//! Implements [`Binning`], the separation bins that pair counts are
//! partitioned into.
//!
//! Edges are always specified as separations (never as squared separations).
//! We square them once at construction so that the tree traversal can work
//! entirely with squared distances. Since every edge is non-negative, the
//! squaring is monotonic and a squared distance lands in the same bin as the
//! distance itself.

use crate::error::BinEdgeError;
use alloc::vec::Vec;

/// Checks that `edges` describe at least one valid bin
pub fn validate_bin_edges(edges: &[f64]) -> Result<(), BinEdgeError> {
    if edges.len() < 2 {
        Err(BinEdgeError("A minimum of two bin edges are required"))
    } else if edges.iter().any(|&x| !x.is_finite()) {
        Err(BinEdgeError("Bin edges must be finite"))
    } else if edges[0] < 0.0 {
        Err(BinEdgeError("Separation bin edges can't be negative"))
    } else if edges
        .iter()
        .zip(edges.iter().skip(1))
        .any(|(&left, &right)| right <= left)
    {
        Err(BinEdgeError("Bin edges must be in strictly increasing order"))
    } else {
        Ok(())
    }
}

/// The bins that values from an interval of separations could land in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinRange {
    /// No value of the interval lands in any bin
    Empty,
    /// Every value of the interval lands in this bin
    Within(usize),
    /// Values of the interval may land in any bin from `first` through
    /// `last` (inclusive). This can hold a single bin when the interval
    /// pokes out past the outermost edges.
    Spans { first: usize, last: usize },
}

/// Ordered separation bins. Bin `i` is the half-open interval
/// `[edges[i], edges[i+1])`.
#[derive(Clone, Debug, PartialEq)]
pub struct Binning {
    edges: Vec<f64>,
    squared_edges: Vec<f64>,
}

impl Binning {
    pub fn from_edges(edges: &[f64]) -> Result<Self, BinEdgeError> {
        validate_bin_edges(edges)?;
        Ok(Self {
            edges: edges.to_vec(),
            squared_edges: edges.iter().map(|x| x * x).collect(),
        })
    }

    /// Uniform bins of width `bin_width`, starting at `min_edge`
    pub fn linear(bin_width: f64, n_bins: usize, min_edge: f64) -> Result<Self, BinEdgeError> {
        if n_bins == 0 {
            Err(BinEdgeError("Number of bins must be greater than zero"))
        } else if !(bin_width > 0.0) || !bin_width.is_finite() {
            Err(BinEdgeError("Bin width must be positive and finite"))
        } else {
            let edges: Vec<f64> = (0..=n_bins)
                .map(|i| min_edge + (i as f64) * bin_width)
                .collect();
            Self::from_edges(&edges)
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// the midpoint of each bin (used when reporting results)
    pub fn centers(&self) -> Vec<f64> {
        self.edges
            .iter()
            .zip(self.edges.iter().skip(1))
            .map(|(left, right)| 0.5 * (left + right))
            .collect()
    }

    /// Calculate the bin index for a separation. Values which are equal to
    /// an edge are part of the higher bin.
    pub fn bin_of(&self, distance: f64) -> Option<usize> {
        locate(&self.edges, distance)
    }

    /// The minimal contiguous range of bins that could hold any value in
    /// `[min_distance, max_distance]`.
    pub fn bin_range_of(&self, min_distance: f64, max_distance: f64) -> BinRange {
        locate_range(&self.edges, min_distance, max_distance)
    }

    #[inline]
    pub(crate) fn bin_of_squared(&self, distance_squared: f64) -> Option<usize> {
        locate(&self.squared_edges, distance_squared)
    }

    #[inline]
    pub(crate) fn bin_range_of_squared(&self, min_squared: f64, max_squared: f64) -> BinRange {
        locate_range(&self.squared_edges, min_squared, max_squared)
    }
}

/// index of the bin holding `value` (`None` also covers `NaN`)
#[inline]
fn locate(edges: &[f64], value: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if !(value >= edges[0]) || value >= edges[last] {
        None
    } else {
        // counts the edges that are <= value (there's at least 1)
        Some(edges.partition_point(|&edge| edge <= value) - 1)
    }
}

#[inline]
fn locate_range(edges: &[f64], min: f64, max: f64) -> BinRange {
    let last = edges.len() - 1;
    if max < edges[0] || min >= edges[last] {
        return BinRange::Empty;
    }
    let first_bin = locate(edges, min).unwrap_or(0);
    let last_bin = locate(edges, max).unwrap_or(last - 1);
    if first_bin == last_bin && min >= edges[0] && max < edges[last] {
        BinRange::Within(first_bin)
    } else {
        BinRange::Spans {
            first: first_bin,
            last: last_bin,
        }
    }
}
