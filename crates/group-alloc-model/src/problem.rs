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

use crate::{catalog::FeatureCatalog, err::ProblemBuildError, item::Item};
use group_alloc_core::id::ItemId;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProblemStats {
    /// Number of items in the pool.
    item_count: usize,
    /// Distinct features across all items (the bit vector length).
    feature_count: usize,
    /// Number of declared groups.
    group_count: usize,
    /// Sum of all declared capacities.
    total_capacity: usize,
    /// 50th percentile of distinct features per item.
    p50_features_per_item: f64,
    /// 90th percentile of distinct features per item.
    p90_features_per_item: f64,
}

impl ProblemStats {
    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    #[inline]
    pub fn p50_features_per_item(&self) -> f64 {
        self.p50_features_per_item
    }

    #[inline]
    pub fn p90_features_per_item(&self) -> f64 {
        self.p90_features_per_item
    }

    /// Declared capacity per item; above 1.0 some groups cannot be filled.
    #[inline]
    pub fn demand_ratio(&self) -> f64 {
        self.total_capacity as f64 / (self.item_count.max(1) as f64)
    }
}

/// A complete allocation instance: the item pool, the catalog that fixed the
/// bit layout, and the declared group capacities in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    items: Vec<Item>,
    capacities: Vec<usize>,
    catalog: FeatureCatalog,
    stats: ProblemStats,
}

impl Problem {
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item ids are dense indices, so lookup is positional.
    #[inline]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.value())
    }

    #[inline]
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    #[inline]
    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    #[inline]
    pub fn feature_len(&self) -> usize {
        self.catalog.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.capacities.len()
    }

    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.stats.total_capacity()
    }

    #[inline]
    pub fn stats(&self) -> &ProblemStats {
        &self.stats
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem:")?;
        writeln!(f, "  Features: {}", self.catalog.len())?;
        writeln!(f, "  Group capacities: {:?}", self.capacities)?;
        writeln!(f, "  Items ({}):", self.items.len())?;
        for item in &self.items {
            writeln!(f, "    {}", item)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    items: Vec<Vec<String>>,
    capacities: Vec<usize>,
    total_capacity: usize,
}

impl ProblemBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item and returns the id it will carry in the built problem.
    pub fn add_item<I, S>(&mut self, labels: I) -> ItemId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = ItemId::new(self.items.len());
        self.items.push(labels.into_iter().map(Into::into).collect());
        id
    }

    #[inline]
    pub fn add_group(&mut self, capacity: usize) -> Result<&mut Self, ProblemBuildError> {
        self.add_groups(capacity, 1)
    }

    pub fn add_groups(
        &mut self,
        capacity: usize,
        count: usize,
    ) -> Result<&mut Self, ProblemBuildError> {
        if capacity == 0 {
            return Err(ProblemBuildError::ZeroCapacity);
        }
        let total = capacity
            .checked_mul(count)
            .and_then(|added| self.total_capacity.checked_add(added))
            .ok_or(ProblemBuildError::CapacityOverflow { capacity, count })?;
        self.capacities
            .try_reserve(count)
            .map_err(|_| ProblemBuildError::TooManyGroups { capacity, count })?;
        self.capacities.extend(std::iter::repeat_n(capacity, count));
        self.total_capacity = total;
        Ok(self)
    }

    pub fn build(&self) -> Result<Problem, ProblemBuildError> {
        let mut catalog = FeatureCatalog::new();
        for labels in &self.items {
            for label in labels {
                catalog.intern(label);
            }
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (idx, labels) in self.items.iter().enumerate() {
            let bits = catalog.encode(labels.iter().map(String::as_str))?;
            items.push(Item::new(ItemId::new(idx), labels.clone(), bits));
        }

        let per_item: Vec<f64> = items.iter().map(|i| i.feature_count() as f64).collect();
        let stats = ProblemStats {
            item_count: items.len(),
            feature_count: catalog.len(),
            group_count: self.capacities.len(),
            total_capacity: self.total_capacity,
            p50_features_per_item: stats::percentile(&per_item, 0.50),
            p90_features_per_item: stats::percentile(&per_item, 0.90),
        };

        Ok(Problem {
            items,
            capacities: self.capacities.clone(),
            catalog,
            stats,
        })
    }
}

mod stats {
    use statrs::statistics::{Data, OrderStatistics};

    #[inline]
    pub fn percentile(data: &[f64], p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        let vals: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if vals.is_empty() {
            return 0.0;
        }
        let mut d = Data::new(vals);
        d.quantile(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Problem: Send, Sync, Clone);

    fn sample_builder() -> ProblemBuilder {
        let mut b = ProblemBuilder::new();
        b.add_item(["onion", "pepper", "olive"]);
        b.add_item(["mushroom", "tomato", "basil"]);
        b.add_item(["chicken", "mushroom", "pepper"]);
        b.add_item(["tomato", "mushroom", "basil"]);
        b.add_item(["chicken", "basil"]);
        b.add_group(2).unwrap().add_groups(3, 2).unwrap();
        b
    }

    #[test]
    fn test_build_assigns_sequential_ids_and_shared_layout() {
        let p = sample_builder().build().unwrap();
        assert_eq!(p.item_count(), 5);
        assert_eq!(p.feature_len(), 7);
        for (i, item) in p.items().iter().enumerate() {
            assert_eq!(item.id(), ItemId::new(i));
            assert_eq!(item.bits().len(), 7);
        }
        assert_eq!(p.catalog().position("onion"), Some(0));
        assert_eq!(p.catalog().position("basil"), Some(5));
        assert_eq!(p.item(ItemId::new(4)).unwrap().bits().to_string(), "0000011");
        assert!(p.item(ItemId::new(5)).is_none());
    }

    #[test]
    fn test_capacities_keep_declaration_order() {
        let p = sample_builder().build().unwrap();
        assert_eq!(p.capacities(), &[2, 3, 3]);
        assert_eq!(p.group_count(), 3);
        assert_eq!(p.total_capacity(), 8);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut b = ProblemBuilder::new();
        assert!(matches!(b.add_groups(0, 3), Err(ProblemBuildError::ZeroCapacity)));
    }

    #[test]
    fn test_overflowing_total_capacity_rejected() {
        let mut b = ProblemBuilder::new();
        assert_eq!(
            b.add_groups(2, usize::MAX).err(),
            Some(ProblemBuildError::CapacityOverflow {
                capacity: 2,
                count: usize::MAX
            })
        );
        b.add_group(3).unwrap();
        assert_eq!(
            b.add_group(usize::MAX).err(),
            Some(ProblemBuildError::CapacityOverflow {
                capacity: usize::MAX,
                count: 1
            })
        );
        // Rejected declarations leave the builder untouched.
        assert_eq!(b.build().unwrap().capacities(), &[3]);
    }

    #[test]
    fn test_unstorable_group_count_rejected() {
        let mut b = ProblemBuilder::new();
        assert_eq!(
            b.add_groups(1, usize::MAX).err(),
            Some(ProblemBuildError::TooManyGroups {
                capacity: 1,
                count: usize::MAX
            })
        );
        assert_eq!(b.build().unwrap().group_count(), 0);
    }

    #[test]
    fn test_stats() {
        let p = sample_builder().build().unwrap();
        let s = p.stats();
        assert_eq!(s.item_count(), 5);
        assert_eq!(s.feature_count(), 7);
        assert_eq!(s.group_count(), 3);
        assert_eq!(s.p50_features_per_item(), 3.0);
        assert!((s.demand_ratio() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_labels_count_once() {
        let mut b = ProblemBuilder::new();
        b.add_item(["a", "a", "b"]);
        let p = b.build().unwrap();
        assert_eq!(p.items()[0].feature_count(), 2);
        assert_eq!(p.items()[0].features().len(), 3);
    }

    #[test]
    fn test_empty_problem_builds() {
        let p = ProblemBuilder::new().build().unwrap();
        assert_eq!(p.item_count(), 0);
        assert_eq!(p.feature_len(), 0);
        assert_eq!(p.stats().p50_features_per_item(), 0.0);
    }
}
