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

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of pool indices for candidate sampling.
///
/// Implementations must return a value in `0..upper`; callers never pass
/// `upper == 0`.
pub trait IndexSampler {
    fn sample_index(&mut self, upper: usize) -> usize;
}

impl<S: IndexSampler + ?Sized> IndexSampler for &mut S {
    #[inline]
    fn sample_index(&mut self, upper: usize) -> usize {
        (**self).sample_index(upper)
    }
}

/// Uniform sampling on top of any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomIndexSampler<R> {
    rng: R,
}

impl<R: Rng> RandomIndexSampler<R> {
    #[inline]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomIndexSampler<ChaCha8Rng> {
    #[inline]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> IndexSampler for RandomIndexSampler<R> {
    #[inline]
    fn sample_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// Replays a fixed index sequence, cycling when exhausted. Each value is
/// reduced modulo `upper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedIndexSampler {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedIndexSampler {
    #[inline]
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Number of indices handed out so far.
    #[inline]
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl IndexSampler for ScriptedIndexSampler {
    fn sample_index(&mut self, upper: usize) -> usize {
        if self.script.is_empty() || upper == 0 {
            self.cursor += 1;
            return 0;
        }
        let v = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        v % upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_cycles_and_wraps() {
        let mut s = ScriptedIndexSampler::new([1, 5, 2]);
        assert_eq!(s.sample_index(3), 1);
        assert_eq!(s.sample_index(3), 2);
        assert_eq!(s.sample_index(3), 2);
        assert_eq!(s.sample_index(3), 1);
        assert_eq!(s.drawn(), 4);
    }

    #[test]
    fn test_random_stays_in_range_and_is_reproducible() {
        let mut a = RandomIndexSampler::seeded(9);
        let mut b = RandomIndexSampler::seeded(9);
        for upper in 1..200 {
            let x = a.sample_index(upper);
            assert!(x < upper);
            assert_eq!(x, b.sample_index(upper));
        }
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn draw<S: IndexSampler>(mut sampler: S) -> usize {
            sampler.sample_index(10)
        }

        let mut s = ScriptedIndexSampler::new(vec![4]);
        assert_eq!(draw(&mut s), 4);
        assert_eq!(s.drawn(), 1);
    }
}
