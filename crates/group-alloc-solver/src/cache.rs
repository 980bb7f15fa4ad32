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

use group_alloc_core::bitvec::{BitLengthMismatchError, BitVector};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    entries: usize,
    hits: u64,
    misses: u64,
}

impl CacheStats {
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Memoised Hamming distances keyed by the ordered pair `(left, right)`.
///
/// Entries are never evicted: within a run the left side is a group summary
/// that recurs for every candidate of a selection step, and both sides are
/// immutable values. Lookups go through a map per left vector, so a hit
/// costs two hashes and no allocation.
#[derive(Debug, Clone, Default)]
pub struct DistanceCache {
    rows: HashMap<BitVector, HashMap<BitVector, usize>>,
    stats: CacheStats,
}

impl DistanceCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stats.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stats.entries == 0
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn distance_between(
        &mut self,
        left: &BitVector,
        right: &BitVector,
    ) -> Result<usize, BitLengthMismatchError> {
        if let Some(&d) = self.rows.get(left).and_then(|row| row.get(right)) {
            self.stats.hits += 1;
            return Ok(d);
        }

        let d = left.hamming_distance(right)?;
        match self.rows.get_mut(left) {
            Some(row) => {
                row.insert(right.clone(), d);
            }
            None => {
                let mut row = HashMap::new();
                row.insert(right.clone(), d);
                self.rows.insert(left.clone(), row);
            }
        }
        self.stats.misses += 1;
        self.stats.entries += 1;
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_vector(rng: &mut ChaCha8Rng, len: usize) -> BitVector {
        BitVector::from_positions(len, (0..len).filter(|_| rng.random_bool(0.3)))
            .expect("positions in range")
    }

    #[test]
    fn test_hit_returns_stored_distance() {
        let mut cache = DistanceCache::new();
        let a = BitVector::from_positions(4, [0, 1]).unwrap();
        let b = BitVector::from_positions(4, [1, 2]).unwrap();

        assert_eq!(cache.distance_between(&a, &b), Ok(2));
        assert_eq!(cache.distance_between(&a, &b), Ok(2));
        let s = cache.stats();
        assert_eq!((s.hits(), s.misses(), s.entries()), (1, 1, 1));
        assert!((s.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pairs_are_ordered() {
        let mut cache = DistanceCache::new();
        let a = BitVector::from_positions(3, [0]).unwrap();
        let b = BitVector::from_positions(3, [2]).unwrap();
        cache.distance_between(&a, &b).unwrap();
        cache.distance_between(&b, &a).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_matches_direct_computation() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let vectors: Vec<BitVector> = (0..24).map(|_| random_vector(&mut rng, 90)).collect();
        let mut cache = DistanceCache::new();
        for _ in 0..3 {
            for a in &vectors {
                for b in &vectors {
                    assert_eq!(cache.distance_between(a, b), a.hamming_distance(b));
                }
            }
        }
        assert_eq!(cache.len(), 24 * 24);
        assert_eq!(cache.stats().hits(), 2 * 24 * 24);
    }

    #[test]
    fn test_length_mismatch_is_not_cached() {
        let mut cache = DistanceCache::new();
        let a = BitVector::zeros(3);
        let b = BitVector::zeros(5);
        assert!(cache.distance_between(&a, &b).is_err());
        assert!(cache.is_empty());
    }
}
