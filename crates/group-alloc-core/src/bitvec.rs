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

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitLengthMismatchError {
    left: usize,
    right: usize,
}

impl BitLengthMismatchError {
    #[inline]
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }
}

impl Display for BitLengthMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bit vector length mismatch: left has {} bits, right has {} bits",
            self.left, self.right
        )
    }
}

impl std::error::Error for BitLengthMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPositionOutOfBoundsError {
    position: usize,
    len: usize,
}

impl BitPositionOutOfBoundsError {
    #[inline]
    pub fn new(position: usize, len: usize) -> Self {
        Self { position, len }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn vector_len(&self) -> usize {
        self.len
    }
}

impl Display for BitPositionOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bit position {} is out of bounds for a vector of {} bits",
            self.position, self.len
        )
    }
}

impl std::error::Error for BitPositionOutOfBoundsError {}

/// How a group summary absorbs the vector of a newly added item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SummaryMerge {
    /// Compares the incoming vector against itself at every position, so
    /// every summary bit ends up set. From the second item on, a candidate
    /// scores by the features it lacks.
    #[default]
    SelfAgreement,
    /// Elementwise AND of summary and incoming vector: the summary keeps the
    /// features shared by every member.
    Intersection,
}

impl Display for SummaryMerge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryMerge::SelfAgreement => write!(f, "self-agreement"),
            SummaryMerge::Intersection => write!(f, "intersection"),
        }
    }
}

/// A fixed-length boolean vector packed into `u64` words.
///
/// Bits beyond `len` in the last word are always zero, which keeps the
/// derived `Eq` and `Hash` consistent with the logical contents. Vectors
/// compared against each other must share the same length; mixing lengths is
/// reported as [`BitLengthMismatchError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
}

impl BitVector {
    const WORD_BITS: usize = u64::BITS as usize;

    #[inline]
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0u64; len.div_ceil(Self::WORD_BITS)],
        }
    }

    #[inline]
    pub fn ones(len: usize) -> Self {
        let mut v = Self {
            len,
            words: vec![!0u64; len.div_ceil(Self::WORD_BITS)],
        };
        v.mask_tail();
        v
    }

    pub fn from_positions<I>(len: usize, positions: I) -> Result<Self, BitPositionOutOfBoundsError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut v = Self::zeros(len);
        for p in positions {
            v.set(p)?;
        }
        Ok(v)
    }

    #[inline(always)]
    fn word_ix(pos: usize) -> usize {
        pos / Self::WORD_BITS
    }

    #[inline(always)]
    fn bit_off(pos: usize) -> usize {
        pos % Self::WORD_BITS
    }

    #[inline(always)]
    fn hi_mask(end: usize) -> u64 {
        if end == 0 {
            0
        } else if end >= Self::WORD_BITS {
            !0
        } else {
            (!0u64) >> (Self::WORD_BITS - end)
        }
    }

    #[inline]
    fn mask_tail(&mut self) {
        let last_bits = self.len % Self::WORD_BITS;
        if last_bits != 0
            && let Some(last) = self.words.last_mut()
        {
            *last &= Self::hi_mask(last_bits);
        }
    }

    #[inline]
    fn check_len(&self, other: &BitVector) -> Result<(), BitLengthMismatchError> {
        if self.len != other.len {
            return Err(BitLengthMismatchError::new(self.len, other.len));
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn set(&mut self, position: usize) -> Result<(), BitPositionOutOfBoundsError> {
        if position >= self.len {
            return Err(BitPositionOutOfBoundsError::new(position, self.len));
        }
        self.words[Self::word_ix(position)] |= 1u64 << Self::bit_off(position);
        Ok(())
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<bool> {
        if position >= self.len {
            return None;
        }
        let w = self.words[Self::word_ix(position)];
        Some((w >> Self::bit_off(position)) & 1 == 1)
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Positions of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(ix, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let off = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(ix * Self::WORD_BITS + off)
            })
        })
    }

    /// Number of positions at which `self` and `other` disagree.
    #[inline]
    pub fn hamming_distance(&self, other: &BitVector) -> Result<usize, BitLengthMismatchError> {
        self.check_len(other)?;
        Ok(self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum())
    }

    /// Positions set in either vector.
    pub fn union(&self, other: &BitVector) -> Result<BitVector, BitLengthMismatchError> {
        self.check_len(other)?;
        let mut out = self.clone();
        for (o, b) in out.words.iter_mut().zip(&other.words) {
            *o |= b;
        }
        Ok(out)
    }

    /// Folds `other` into a copy of `self` according to `rule`.
    pub fn merge(
        &self,
        other: &BitVector,
        rule: SummaryMerge,
    ) -> Result<BitVector, BitLengthMismatchError> {
        self.check_len(other)?;
        let mut out = self.clone();
        match rule {
            SummaryMerge::SelfAgreement => {
                // `other[i] == other[i]` holds at every position.
                out.words.fill(!0u64);
                out.mask_tail();
            }
            SummaryMerge::Intersection => {
                for (o, b) in out.words.iter_mut().zip(&other.words) {
                    *o &= b;
                }
            }
        }
        Ok(out)
    }
}

impl Display for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len {
            let bit = (self.words[Self::word_ix(i)] >> Self::bit_off(i)) & 1;
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}
