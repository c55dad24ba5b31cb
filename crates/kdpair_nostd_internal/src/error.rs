//! Small error types returned by this crate.
//!
//! Most of the legacy code in the `pairwise` crates returned `&'static str`
//! everywhere. Here we still carry a static message, but we wrap it in a type
//! per failure category so that the public crate can map each one onto its
//! own `Error` kind without guessing from the message text.

use core::fmt;

/// Malformed input arrays (mismatched lengths, bad box sizes, ...)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeError(pub &'static str);

/// Problematic bin edges (or parameters used to generate bin edges)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinEdgeError(pub &'static str);

/// Raised when something that needs at least one point receives none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyInputError;

/// Describes why two point sets can't be paired with each other
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Incompatibility {
    /// the point sets have different numbers of spatial dimensions
    Dimension { dims_a: usize, dims_b: usize },
    /// exactly one point set is periodic, or both are periodic with
    /// different box sizes
    Periodicity,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl fmt::Display for BinEdgeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl fmt::Display for EmptyInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot build a k-d tree over zero points")
    }
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Incompatibility::Dimension { dims_a, dims_b } => write!(
                f,
                "points_a has {dims_a} spatial dimensions while points_b has {dims_b}"
            ),
            Incompatibility::Periodicity => write!(
                f,
                "points_a and points_b must either both be periodic (with the \
                same box size) or both be non-periodic"
            ),
        }
    }
}
