// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use vigil_core::{Baseline, VigilError};

/// Exact first and second moments of a multiset of counts.
///
/// Sums are kept as integers, so adding and removing samples never
/// accumulates rounding error: a window whose counts are all equal always
/// reports a standard deviation of exactly zero, however many values have
/// passed through it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactMoments {
    n: u64,
    sum: u128,
    sum_sq: u128,
}

impl ExactMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: impl IntoIterator<Item = u64>) -> Result<Self, VigilError> {
        let mut moments = Self::new();
        for count in counts {
            moments.push(count)?;
        }
        Ok(moments)
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.n).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn push(&mut self, count: u64) -> Result<(), VigilError> {
        let value = u128::from(count);
        let square = value
            .checked_mul(value)
            .ok_or_else(|| VigilError::numerical_issue(format!("count {count} squared overflows")))?;
        let n = self
            .n
            .checked_add(1)
            .ok_or_else(|| VigilError::numerical_issue("sample counter overflow"))?;
        let sum = self
            .sum
            .checked_add(value)
            .ok_or_else(|| VigilError::numerical_issue("count sum overflow"))?;
        let sum_sq = self
            .sum_sq
            .checked_add(square)
            .ok_or_else(|| VigilError::numerical_issue("count sum of squares overflow"))?;
        self.n = n;
        self.sum = sum;
        self.sum_sq = sum_sq;
        Ok(())
    }

    /// Removes a sample previously added with [`push`](Self::push).
    pub fn pop(&mut self, count: u64) -> Result<(), VigilError> {
        let value = u128::from(count);
        let underflow = || {
            VigilError::numerical_issue(format!(
                "removing count {count} from moments that never contained it"
            ))
        };
        let square = value.checked_mul(value).ok_or_else(underflow)?;
        let n = self.n.checked_sub(1).ok_or_else(underflow)?;
        let sum = self.sum.checked_sub(value).ok_or_else(underflow)?;
        let sum_sq = self.sum_sq.checked_sub(square).ok_or_else(underflow)?;
        self.n = n;
        self.sum = sum;
        self.sum_sq = sum_sq;
        Ok(())
    }

    /// Mean and population standard deviation (divide by N), `None` when empty.
    pub fn baseline(&self) -> Result<Option<Baseline>, VigilError> {
        if self.n == 0 {
            return Ok(None);
        }
        let n = u128::from(self.n);
        let scaled_sq = n
            .checked_mul(self.sum_sq)
            .ok_or_else(|| VigilError::numerical_issue("variance numerator overflow"))?;
        let sum_squared = self
            .sum
            .checked_mul(self.sum)
            .ok_or_else(|| VigilError::numerical_issue("squared sum overflow"))?;
        // n * Σx² - (Σx)² = n² · variance, non-negative by Cauchy-Schwarz.
        let spread = scaled_sq.checked_sub(sum_squared).ok_or_else(|| {
            VigilError::numerical_issue("negative variance numerator; moments are inconsistent")
        })?;

        let n_f = self.n as f64;
        Ok(Some(Baseline {
            mean: self.sum as f64 / n_f,
            std_dev: (spread as f64).sqrt() / n_f,
            samples: self.len(),
        }))
    }
}
