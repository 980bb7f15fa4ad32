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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRangeError {
    min: usize,
    max: usize,
    vocabulary: usize,
}

impl FeatureRangeError {
    pub fn new(min: usize, max: usize, vocabulary: usize) -> Self {
        Self {
            min,
            max,
            vocabulary,
        }
    }
    pub fn min(&self) -> usize {
        self.min
    }
    pub fn max(&self) -> usize {
        self.max
    }
    pub fn vocabulary(&self) -> usize {
        self.vocabulary
    }
}

impl Display for FeatureRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FeatureRangeError: features per item [{}, {}] do not fit a vocabulary of {}",
            self.min, self.max, self.vocabulary
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceGenConfigBuildError {
    FeatureRange(FeatureRangeError),
    ZeroCapacity,
    InvalidDecay,
    MissingItemCount,
    MissingVocabulary,
}

impl Display for InstanceGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InstanceGenConfigBuildError::*;
        match self {
            FeatureRange(e) => write!(f, "{}", e),
            ZeroCapacity => write!(f, "Group capacity must be positive"),
            InvalidDecay => write!(f, "Feature popularity decay must be finite and positive"),
            MissingItemCount => write!(f, "Missing item_count"),
            MissingVocabulary => write!(f, "Missing vocabulary"),
        }
    }
}

impl From<FeatureRangeError> for InstanceGenConfigBuildError {
    fn from(err: FeatureRangeError) -> Self {
        Self::FeatureRange(err)
    }
}

impl std::error::Error for InstanceGenConfigBuildError {}
