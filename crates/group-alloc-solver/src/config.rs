// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use group_alloc_core::bitvec::SummaryMerge;
use std::{fmt::Display, num::NonZeroUsize};

pub const DEFAULT_SAMPLE_SIZE: usize = 100;
pub const DEFAULT_SEED: u64 = 0x00C0_FFEE_D00D;
pub const DEFAULT_PROGRESS_STEP_PERCENT: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocConfigError {
    ZeroSampleSize,
    InvalidProgressStep(u8),
}

impl Display for AllocConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocConfigError::ZeroSampleSize => write!(f, "Sample size must be positive"),
            AllocConfigError::InvalidProgressStep(p) => {
                write!(f, "Progress step must be within 1..=100, got {p}")
            }
        }
    }
}

impl std::error::Error for AllocConfigError {}

/// Tunables of one allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocConfig {
    /// Candidates drawn (with replacement) per selection step.
    sample_size: NonZeroUsize,
    merge: SummaryMerge,
    seed: u64,
    progress_step_percent: u8,
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self {
            sample_size: NonZeroUsize::new(DEFAULT_SAMPLE_SIZE).unwrap_or(NonZeroUsize::MIN),
            merge: SummaryMerge::default(),
            seed: DEFAULT_SEED,
            progress_step_percent: DEFAULT_PROGRESS_STEP_PERCENT,
        }
    }
}

impl AllocConfig {
    pub fn new(
        sample_size: usize,
        merge: SummaryMerge,
        seed: u64,
        progress_step_percent: u8,
    ) -> Result<Self, AllocConfigError> {
        Self::default()
            .with_sample_size(sample_size)?
            .with_merge(merge)
            .with_seed(seed)
            .with_progress_step(progress_step_percent)
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Result<Self, AllocConfigError> {
        self.sample_size = NonZeroUsize::new(sample_size).ok_or(AllocConfigError::ZeroSampleSize)?;
        Ok(self)
    }

    #[inline]
    pub fn with_merge(mut self, merge: SummaryMerge) -> Self {
        self.merge = merge;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress_step(mut self, percent: u8) -> Result<Self, AllocConfigError> {
        if !(1..=100).contains(&percent) {
            return Err(AllocConfigError::InvalidProgressStep(percent));
        }
        self.progress_step_percent = percent;
        Ok(self)
    }

    #[inline]
    pub fn sample_size(&self) -> usize {
        self.sample_size.get()
    }

    #[inline]
    pub fn merge(&self) -> SummaryMerge {
        self.merge
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn progress_step_percent(&self) -> u8 {
        self.progress_step_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AllocConfig::default();
        assert_eq!(c.sample_size(), 100);
        assert_eq!(c.merge(), SummaryMerge::SelfAgreement);
        assert_eq!(c.progress_step_percent(), 10);
        assert_eq!(c.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_rejects_zero_sample_size() {
        assert_eq!(
            AllocConfig::default().with_sample_size(0),
            Err(AllocConfigError::ZeroSampleSize)
        );
    }

    #[test]
    fn test_rejects_out_of_range_progress_step() {
        assert_eq!(
            AllocConfig::new(5, SummaryMerge::Intersection, 1, 0),
            Err(AllocConfigError::InvalidProgressStep(0))
        );
        assert!(AllocConfig::new(5, SummaryMerge::Intersection, 1, 101).is_err());
        let c = AllocConfig::new(5, SummaryMerge::Intersection, 1, 25).unwrap();
        assert_eq!(c.sample_size(), 5);
        assert_eq!(c.merge(), SummaryMerge::Intersection);
    }
}
