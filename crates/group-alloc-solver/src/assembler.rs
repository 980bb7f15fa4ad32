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

use crate::{
    cache::DistanceCache,
    config::AllocConfig,
    group::{Group, GroupState},
    pool::Pool,
    sampler::IndexSampler,
};
use group_alloc_core::bitvec::{BitLengthMismatchError, BitVector, SummaryMerge};
use group_alloc_model::item::Item;
use std::fmt::Display;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssembleError {
    LengthMismatch(BitLengthMismatchError),
}

impl From<BitLengthMismatchError> for AssembleError {
    fn from(value: BitLengthMismatchError) -> Self {
        AssembleError::LengthMismatch(value)
    }
}

impl Display for AssembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssembleError::LengthMismatch(e) => write!(f, "Assembly error: {e}"),
        }
    }
}

impl std::error::Error for AssembleError {}

/// The winner of one sampling round: a pool index and its distance to the
/// group summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    distance: usize,
}

impl Selection {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }
}

/// Drives a single group through `Empty -> Seeded -> Filling -> Complete`.
///
/// An empty group takes the item at the front of the pool unscored. After
/// that every step draws `sample_size` pool indices with replacement, scores
/// each candidate by its distance to the group summary and keeps the first
/// strictly greatest one. The running best starts at pool index 0 with
/// distance 0, so a round in which nothing scores above zero takes the front
/// of the pool.
pub struct GroupAssembler<S> {
    sample_size: usize,
    merge: SummaryMerge,
    cache: DistanceCache,
    sampler: S,
}

impl<S: IndexSampler> GroupAssembler<S> {
    pub fn new(config: &AllocConfig, sampler: S) -> Self {
        Self {
            sample_size: config.sample_size(),
            merge: config.merge(),
            cache: DistanceCache::new(),
            sampler,
        }
    }

    #[inline]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    #[inline]
    pub fn merge(&self) -> SummaryMerge {
        self.merge
    }

    #[inline]
    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }

    /// Moves the front of the pool into an empty group.
    pub fn seed<'p>(&mut self, group: &mut Group<'p>, pool: &mut Pool<'p>) -> Option<&'p Item> {
        if !group.is_empty() || group.is_complete() {
            return None;
        }
        let item = pool.take(0)?;
        group.push(item, item.bits().clone());
        trace!(group = %group.id(), item = %item.id(), "Seeded group");
        Some(item)
    }

    pub fn select(
        &mut self,
        summary: &BitVector,
        pool: &Pool<'_>,
    ) -> Result<Option<Selection>, AssembleError> {
        if pool.is_empty() {
            return Ok(None);
        }

        let mut best = Selection {
            index: 0,
            distance: 0,
        };
        for _ in 0..self.sample_size {
            let index = self.sampler.sample_index(pool.len());
            let Some(candidate) = pool.get(index) else {
                continue;
            };
            let distance = self.cache.distance_between(summary, candidate.bits())?;
            if distance > best.distance {
                best = Selection { index, distance };
            }
        }
        Ok(Some(best))
    }

    /// Performs one transition and returns the item that moved, if any.
    pub fn step<'p>(
        &mut self,
        group: &mut Group<'p>,
        pool: &mut Pool<'p>,
    ) -> Result<Option<&'p Item>, AssembleError> {
        if group.is_complete() || pool.is_empty() {
            return Ok(None);
        }
        if group.is_empty() {
            return Ok(self.seed(group, pool));
        }

        let Some(summary) = group.summary() else {
            return Ok(None);
        };
        let Some(selection) = self.select(summary, pool)? else {
            return Ok(None);
        };
        let Some(item) = pool.take(selection.index()) else {
            return Ok(None);
        };
        let merged = match group.summary() {
            Some(summary) => summary.merge(item.bits(), self.merge)?,
            None => item.bits().clone(),
        };
        group.push(item, merged);
        trace!(
            group = %group.id(),
            item = %item.id(),
            distance = selection.distance(),
            "Added item"
        );
        Ok(Some(item))
    }

    /// Runs the group until it is complete or the pool is empty.
    #[instrument(
        level = "debug",
        skip_all,
        fields(group = %group.id(), capacity = group.capacity())
    )]
    pub fn assemble<'p>(
        &mut self,
        group: &mut Group<'p>,
        pool: &mut Pool<'p>,
    ) -> Result<GroupState, AssembleError> {
        while self.step(group, pool)?.is_some() {}
        Ok(group.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ScriptedIndexSampler;
    use group_alloc_core::id::{GroupId, ItemId};
    use group_alloc_model::problem::{Problem, ProblemBuilder};

    /// `[1,0,0]`, `[0,1,0]`, `[0,0,1]`, `[1,1,1]`.
    fn unit_problem() -> Problem {
        let mut b = ProblemBuilder::new();
        b.add_item(["a"]);
        b.add_item(["b"]);
        b.add_item(["c"]);
        b.add_item(["a", "b", "c"]);
        b.build().unwrap()
    }

    fn config(sample_size: usize, merge: SummaryMerge) -> AllocConfig {
        AllocConfig::default()
            .with_sample_size(sample_size)
            .unwrap()
            .with_merge(merge)
    }

    fn ids(group: &Group<'_>) -> Vec<usize> {
        group.item_ids().map(ItemId::value).collect()
    }

    #[test]
    fn test_seed_takes_front_and_copies_vector() {
        let p = unit_problem();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 2);
        let mut asm = GroupAssembler::new(
            &config(1, SummaryMerge::SelfAgreement),
            ScriptedIndexSampler::new([0]),
        );

        let seeded = asm.seed(&mut g, &mut pool).unwrap();
        assert_eq!(seeded.id(), ItemId::new(0));
        assert_eq!(g.state(), GroupState::Seeded);
        assert_eq!(g.summary().unwrap().to_string(), "100");
        // Front slot now holds the former last item.
        assert_eq!(pool.get(0).unwrap().id(), ItemId::new(3));
        assert!(asm.seed(&mut g, &mut pool).is_none());
    }

    #[test]
    fn test_ties_keep_first_sampled_maximum() {
        let p = unit_problem();
        for merge in [SummaryMerge::SelfAgreement, SummaryMerge::Intersection] {
            let mut pool = Pool::new(p.items());
            let mut g = Group::new(GroupId::new(0), 2);
            // After seeding the pool reads [3, 1, 2]; indices 2 and 1 both score 2.
            let mut asm = GroupAssembler::new(&config(2, merge), ScriptedIndexSampler::new([2, 1]));
            let state = asm.assemble(&mut g, &mut pool).unwrap();
            assert_eq!(state, GroupState::Complete);
            assert_eq!(ids(&g), vec![0, 2], "merge = {merge}");
        }
    }

    #[test]
    fn test_self_agreement_merge_scores_absent_features() {
        let p = unit_problem();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 3);
        let mut asm = GroupAssembler::new(
            &config(2, SummaryMerge::SelfAgreement),
            ScriptedIndexSampler::new([1, 1, 0, 1]),
        );

        asm.assemble(&mut g, &mut pool).unwrap();
        assert_eq!(g.summary().unwrap().to_string(), "111");
        // Against an all-set summary `[1,1,1]` scores 0 and `[0,0,1]` scores 2.
        assert_eq!(ids(&g), vec![0, 1, 2]);
        assert_eq!(pool.iter_ids().collect::<Vec<_>>(), vec![ItemId::new(3)]);

        let s = asm.cache().stats();
        assert_eq!((s.misses(), s.hits()), (3, 1));
    }

    #[test]
    fn test_intersection_merge_scores_against_shared_features() {
        let p = unit_problem();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 3);
        let mut asm = GroupAssembler::new(
            &config(2, SummaryMerge::Intersection),
            ScriptedIndexSampler::new([1, 1, 0, 1]),
        );

        asm.assemble(&mut g, &mut pool).unwrap();
        assert_eq!(g.summary().unwrap().to_string(), "000");
        assert_eq!(ids(&g), vec![0, 1, 3]);
        assert_eq!(pool.iter_ids().collect::<Vec<_>>(), vec![ItemId::new(2)]);
    }

    #[test]
    fn test_zero_scores_fall_back_to_pool_front() {
        let mut b = ProblemBuilder::new();
        for _ in 0..3 {
            b.add_item(["a"]);
        }
        let p = b.build().unwrap();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 2);
        let mut asm = GroupAssembler::new(
            &config(4, SummaryMerge::SelfAgreement),
            ScriptedIndexSampler::new([1]),
        );

        asm.assemble(&mut g, &mut pool).unwrap();
        // Pool after seeding is [2, 1]; every candidate scores 0.
        assert_eq!(ids(&g), vec![0, 2]);
    }

    #[test]
    fn test_pool_exhaustion_leaves_group_filling() {
        let mut b = ProblemBuilder::new();
        b.add_item(["a"]);
        b.add_item(["b"]);
        let p = b.build().unwrap();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 3);
        let mut asm = GroupAssembler::new(
            &config(3, SummaryMerge::SelfAgreement),
            ScriptedIndexSampler::new([0]),
        );

        let state = asm.assemble(&mut g, &mut pool).unwrap();
        assert_eq!(state, GroupState::Filling);
        assert!(pool.is_empty());
        assert_eq!(g.remaining(), 1);
    }

    #[test]
    fn test_select_on_empty_pool() {
        let p = unit_problem();
        let pool = Pool::new(&p.items()[..0]);
        let mut asm = GroupAssembler::new(
            &config(3, SummaryMerge::SelfAgreement),
            ScriptedIndexSampler::new([0]),
        );
        assert_eq!(asm.select(&BitVector::zeros(3), &pool), Ok(None));
    }

    #[test]
    fn test_sample_draws_with_replacement() {
        let p = unit_problem();
        let mut pool = Pool::new(p.items());
        let mut g = Group::new(GroupId::new(0), 2);
        let mut sampler = ScriptedIndexSampler::new([1]);
        let mut asm = GroupAssembler::new(&config(5, SummaryMerge::SelfAgreement), &mut sampler);
        asm.assemble(&mut g, &mut pool).unwrap();
        assert_eq!(asm.cache().stats().hits(), 4);
        drop(asm);
        assert_eq!(sampler.drawn(), 5);
    }
}
