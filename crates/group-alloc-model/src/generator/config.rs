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

use super::err::{FeatureRangeError, InstanceGenConfigBuildError};

/// Configuration for synthetic instance generation.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGenConfig {
    pub(crate) item_count: usize,
    pub(crate) vocabulary: usize,
    pub(crate) min_features: usize,
    pub(crate) max_features: usize,
    /// Exponential decay rate of feature popularity; larger is more concentrated.
    pub(crate) popularity_decay: f64,
    /// `(capacity, count)` pairs in declaration order.
    pub(crate) groups: Vec<(usize, usize)>,
    pub(crate) seed: u64,
}

impl Default for InstanceGenConfig {
    fn default() -> Self {
        Self {
            item_count: 1_000,
            vocabulary: 200,
            min_features: 1,
            max_features: 8,
            popularity_decay: 1.0,
            groups: vec![(2, 100), (3, 100), (4, 100)],
            seed: 42,
        }
    }
}

impl InstanceGenConfig {
    pub fn new(
        item_count: usize,
        vocabulary: usize,
        unord_min_features: usize,
        unord_max_features: usize,
        popularity_decay: f64,
        groups: Vec<(usize, usize)>,
        seed: u64,
    ) -> Result<Self, InstanceGenConfigBuildError> {
        let (min_features, max_features) = if unord_min_features > unord_max_features {
            (unord_max_features, unord_min_features)
        } else {
            (unord_min_features, unord_max_features)
        };

        if max_features > vocabulary {
            return Err(FeatureRangeError::new(min_features, max_features, vocabulary).into());
        }
        if !(popularity_decay.is_finite() && popularity_decay > 0.0) {
            return Err(InstanceGenConfigBuildError::InvalidDecay);
        }
        if groups.iter().any(|&(cap, _)| cap == 0) {
            return Err(InstanceGenConfigBuildError::ZeroCapacity);
        }

        Ok(Self {
            item_count,
            vocabulary,
            min_features,
            max_features,
            popularity_decay,
            groups,
            seed,
        })
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn vocabulary(&self) -> usize {
        self.vocabulary
    }

    #[inline]
    pub fn min_features(&self) -> usize {
        self.min_features
    }

    #[inline]
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    #[inline]
    pub fn popularity_decay(&self) -> f64 {
        self.popularity_decay
    }

    #[inline]
    pub fn groups(&self) -> &[(usize, usize)] {
        &self.groups
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstanceGenConfigBuilder {
    item_count: Option<usize>,
    vocabulary: Option<usize>,
    min_features: Option<usize>,
    max_features: Option<usize>,
    popularity_decay: Option<f64>,
    groups: Vec<(usize, usize)>,
    seed: Option<u64>,
}

impl InstanceGenConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(mut self, n: usize) -> Self {
        self.item_count = Some(n);
        self
    }

    pub fn vocabulary(mut self, n: usize) -> Self {
        self.vocabulary = Some(n);
        self
    }

    pub fn features_per_item(mut self, min: usize, max: usize) -> Self {
        self.min_features = Some(min);
        self.max_features = Some(max);
        self
    }

    pub fn popularity_decay(mut self, s: f64) -> Self {
        self.popularity_decay = Some(s);
        self
    }

    pub fn groups(mut self, capacity: usize, count: usize) -> Self {
        self.groups.push((capacity, count));
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    pub fn build(self) -> Result<InstanceGenConfig, InstanceGenConfigBuildError> {
        let defaults = InstanceGenConfig::default();
        let item_count = self
            .item_count
            .ok_or(InstanceGenConfigBuildError::MissingItemCount)?;
        let vocabulary = self
            .vocabulary
            .ok_or(InstanceGenConfigBuildError::MissingVocabulary)?;
        InstanceGenConfig::new(
            item_count,
            vocabulary,
            self.min_features.unwrap_or(defaults.min_features),
            self.max_features
                .unwrap_or(defaults.max_features)
                .min(vocabulary),
            self.popularity_decay.unwrap_or(defaults.popularity_decay),
            self.groups,
            self.seed.unwrap_or(defaults.seed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_counts() {
        assert_eq!(
            InstanceGenConfigBuilder::new().vocabulary(5).build(),
            Err(InstanceGenConfigBuildError::MissingItemCount)
        );
        assert_eq!(
            InstanceGenConfigBuilder::new().item_count(5).build(),
            Err(InstanceGenConfigBuildError::MissingVocabulary)
        );
    }

    #[test]
    fn test_builder_orders_feature_range() {
        let cfg = InstanceGenConfigBuilder::new()
            .item_count(10)
            .vocabulary(20)
            .features_per_item(6, 2)
            .groups(2, 3)
            .build()
            .unwrap();
        assert_eq!(cfg.min_features(), 2);
        assert_eq!(cfg.max_features(), 6);
        assert_eq!(cfg.groups(), &[(2, 3)]);
        assert_eq!(cfg.seed(), 42);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            InstanceGenConfig::new(10, 3, 1, 5, 1.0, vec![], 0),
            Err(InstanceGenConfigBuildError::FeatureRange(_))
        ));
        assert_eq!(
            InstanceGenConfig::new(10, 3, 1, 2, 0.0, vec![], 0),
            Err(InstanceGenConfigBuildError::InvalidDecay)
        );
        assert_eq!(
            InstanceGenConfig::new(10, 3, 1, 2, 1.0, vec![(0, 1)], 0),
            Err(InstanceGenConfigBuildError::ZeroCapacity)
        );
    }
}
