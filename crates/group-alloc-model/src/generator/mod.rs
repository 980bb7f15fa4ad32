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

mod config;
mod err;

pub use config::{InstanceGenConfig, InstanceGenConfigBuilder};
pub use err::{FeatureRangeError, InstanceGenConfigBuildError};

use crate::{
    err::ProblemBuildError,
    problem::{Problem, ProblemBuilder},
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Exp, Uniform};

/// Share of the vocabulary covered by one unit of the popularity draw.
const POPULARITY_SPAN: f64 = 5.0;

pub struct InstanceGenerator {
    config: InstanceGenConfig,
    rng: SmallRng,
    feature_count_distribution: Uniform<usize>,
    popularity: Exp<f64>,
}

impl TryFrom<InstanceGenConfig> for InstanceGenerator {
    type Error = InstanceGenConfigBuildError;

    fn try_from(config: InstanceGenConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl InstanceGenerator {
    pub fn new(config: InstanceGenConfig) -> Result<Self, InstanceGenConfigBuildError> {
        let feature_count_distribution =
            Uniform::new_inclusive(config.min_features, config.max_features).map_err(|_| {
                FeatureRangeError::new(
                    config.min_features,
                    config.max_features,
                    config.vocabulary,
                )
            })?;
        let popularity = Exp::new(config.popularity_decay)
            .map_err(|_| InstanceGenConfigBuildError::InvalidDecay)?;
        Ok(Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            feature_count_distribution,
            popularity,
        })
    }

    #[inline]
    pub fn config(&self) -> &InstanceGenConfig {
        &self.config
    }

    #[inline]
    fn label(ix: usize) -> String {
        format!("f{ix}")
    }

    /// Draws a feature index; popular features sit at low indices.
    fn sample_feature(&mut self) -> usize {
        let vocab = self.config.vocabulary;
        let x = self.popularity.sample(&mut self.rng);
        let ix = (x * vocab as f64 / POPULARITY_SPAN) as usize;
        if ix < vocab {
            ix
        } else {
            self.rng.random_range(0..vocab)
        }
    }

    fn sample_features(&mut self) -> Vec<String> {
        let k = self.feature_count_distribution.sample(&mut self.rng);
        let mut picked: Vec<usize> = Vec::with_capacity(k);
        let mut attempts = 0usize;
        while picked.len() < k && attempts < 32 * k {
            let ix = self.sample_feature();
            if !picked.contains(&ix) {
                picked.push(ix);
            }
            attempts += 1;
        }
        // Heavy skew can starve the draw; top up with the first unused labels.
        let mut next = 0usize;
        while picked.len() < k {
            if !picked.contains(&next) {
                picked.push(next);
            }
            next += 1;
        }
        picked.into_iter().map(Self::label).collect()
    }

    pub fn generate(&mut self) -> Result<Problem, ProblemBuildError> {
        let mut builder = ProblemBuilder::new();
        for _ in 0..self.config.item_count {
            let features = self.sample_features();
            builder.add_item(features);
        }
        for &(capacity, count) in &self.config.groups {
            builder.add_groups(capacity, count)?;
        }
        builder.build()
    }
}
