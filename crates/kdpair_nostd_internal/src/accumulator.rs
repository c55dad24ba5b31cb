//! Per-bin running totals of pair statistics
//!
//! The layout follows the statepack convention of the `pairwise` crates:
//! the floating point registers of all bins live in a single 2D array with
//! shape `(n_registers, n_bins)`, so that the registers of a given bin form
//! a column. Pair counts are tracked separately as integers so that they
//! stay exact no matter how large they get (or in which order partial
//! results are merged).

use alloc::vec::Vec;
use ndarray::{Array2, ArrayView1, Axis};

#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    counts: Vec<u64>,
    sums: Array2<f64>,
}

impl Accumulator {
    /// row of `sums` holding `Σ wᵢwⱼ`
    const WEIGHT: usize = 0;
    /// row of `sums` holding `Σ (wᵢwⱼ)²`
    const WEIGHT_SQ: usize = 1;
    const N_REGISTERS: usize = 2;

    pub fn new(n_bins: usize) -> Self {
        Accumulator {
            counts: alloc::vec![0; n_bins],
            sums: Array2::zeros((Self::N_REGISTERS, n_bins)),
        }
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.sums.fill(0.0);
    }

    /// record a single pair with the combined weight `wᵢwⱼ`
    #[inline(always)]
    pub fn add_pair(&mut self, bin: usize, pair_weight: f64) {
        self.counts[bin] += 1;
        self.sums[[Self::WEIGHT, bin]] += pair_weight;
        self.sums[[Self::WEIGHT_SQ, bin]] += pair_weight * pair_weight;
    }

    /// record a batch of `count` pairs whose totals were computed elsewhere
    #[inline]
    pub fn add_block(&mut self, bin: usize, count: u64, weight_sum: f64, weight_sq_sum: f64) {
        self.counts[bin] += count;
        self.sums[[Self::WEIGHT, bin]] += weight_sum;
        self.sums[[Self::WEIGHT_SQ, bin]] += weight_sq_sum;
    }

    /// merge the totals tracked by `other` into `self`
    ///
    /// # Panics
    ///
    /// Panics if `other` doesn't track the same number of bins as `self`.
    pub fn merge(&mut self, other: &Accumulator) {
        assert_eq!(
            self.n_bins(),
            other.n_bins(),
            "can't merge accumulators with different numbers of bins"
        );
        for (count, other_count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other_count;
        }
        self.sums += &other.sums;
    }

    pub fn count(&self) -> &[u64] {
        &self.counts
    }

    pub fn weighted_sum(&self) -> ArrayView1<f64> {
        self.sums.index_axis(Axis(0), Self::WEIGHT)
    }

    pub fn weighted_sum_sq(&self) -> ArrayView1<f64> {
        self.sums.index_axis(Axis(0), Self::WEIGHT_SQ)
    }

    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_merge() {
        let mut accum = Accumulator::new(3);
        accum.add_pair(0, 2.0);
        accum.add_pair(0, 3.0);
        accum.add_block(2, 10, 5.0, 7.0);

        let mut other = Accumulator::new(3);
        other.add_pair(1, 4.0);
        other.add_pair(0, 1.0);

        accum.merge(&other);
        assert_eq!(accum.count(), &[3, 1, 10]);
        assert_eq!(accum.weighted_sum().to_vec(), [6.0, 4.0, 5.0]);
        assert_eq!(accum.weighted_sum_sq().to_vec(), [14.0, 16.0, 7.0]);
        assert_eq!(accum.total_count(), 14);

        accum.reset();
        assert_eq!(accum, Accumulator::new(3));
    }

    #[test]
    #[should_panic(expected = "different numbers of bins")]
    fn merge_mismatched() {
        let mut accum = Accumulator::new(3);
        accum.merge(&Accumulator::new(2));
    }
}
