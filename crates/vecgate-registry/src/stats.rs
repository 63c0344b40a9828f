//! Per-domain reference statistic for anomaly scoring.
//!
//! Holds per-component sums and sums of squares in 256-bit words. It changes
//! only through explicit calibration on the registry; scoring reads a
//! snapshot.

use crate::{Error, Result};
use vecgate_fixed::{FixedError, I256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyStatistic {
    dimension: u32,
    count: u64,
    /// Σx at scale 1e18
    sum: Vec<I256>,
    /// Σx² at scale 1e36
    sum_sq: Vec<I256>,
}

/// Mean and variance of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// Scale 1e18.
    pub mean: I256,
    /// Scale 1e36, already floored.
    pub variance: I256,
}

impl AnomalyStatistic {
    pub fn new(dimension: u32) -> Self {
        Self {
            dimension,
            count: 0,
            sum: vec![I256::ZERO; dimension as usize],
            sum_sq: vec![I256::ZERO; dimension as usize],
        }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Fold one observation in. All-or-nothing: on error the statistic is
    /// unchanged.
    pub(crate) fn observe(&mut self, components: &[i128]) -> Result<u64> {
        if components.len() != self.dimension as usize {
            return Err(Error::DimensionMismatch {
                expected: self.dimension as usize,
                actual: components.len(),
            });
        }

        let mut sum = self.sum.clone();
        let mut sum_sq = self.sum_sq.clone();
        for (i, &c) in components.iter().enumerate() {
            let w = I256::from(c);
            sum[i] = sum[i].checked_add(w).ok_or(FixedError::Overflow)?;
            sum_sq[i] = sum_sq[i].checked_add(w * w).ok_or(FixedError::Overflow)?;
        }
        let count = self.count.checked_add(1).ok_or(FixedError::Overflow)?;

        self.sum = sum;
        self.sum_sq = sum_sq;
        self.count = count;
        Ok(count)
    }

    /// Per-component mean and variance, with variance floored at `floor`.
    ///
    /// Empty if nothing has been observed.
    pub fn moments(&self, floor: I256) -> Vec<Moment> {
        if self.count == 0 {
            return Vec::new();
        }
        let n = I256::from(self.count);
        self.sum
            .iter()
            .zip(&self.sum_sq)
            .map(|(&s, &sq)| {
                let mean = s / n;
                let variance = (sq / n - mean * mean).max(floor);
                Moment { mean, variance }
            })
            .collect()
    }
}
