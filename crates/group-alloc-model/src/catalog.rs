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

use crate::err::{ProblemBuildError, UnknownFeatureError};
use group_alloc_core::bitvec::BitVector;
use std::collections::HashMap;

/// Stable mapping from feature labels to bit positions.
///
/// Positions are handed out in first-seen order, so interning the items of a
/// problem in input order always yields the same layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCatalog {
    index: HashMap<String, usize>,
    labels: Vec<String>,
}

impl FeatureCatalog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, label: &str) -> usize {
        if let Some(&pos) = self.index.get(label) {
            return pos;
        }
        let pos = self.labels.len();
        self.index.insert(label.to_owned(), pos);
        self.labels.push(label.to_owned());
        pos
    }

    #[inline]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    #[inline]
    pub fn label(&self, position: usize) -> Option<&str> {
        self.labels.get(position).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }

    /// Encodes `labels` as a vector spanning the whole catalog.
    pub fn encode<'a, I>(&self, labels: I) -> Result<BitVector, ProblemBuildError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bits = BitVector::zeros(self.len());
        for label in labels {
            let pos = self
                .position(label)
                .ok_or_else(|| UnknownFeatureError::new(label))?;
            bits.set(pos)?;
        }
        Ok(bits)
    }
}
