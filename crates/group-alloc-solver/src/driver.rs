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
    assembler::{AssembleError, GroupAssembler},
    cache::CacheStats,
    config::AllocConfig,
    group::{Group, GroupState},
    pool::Pool,
    progress::{ProgressObserver, ProgressTracker, TracingProgress},
    sampler::{IndexSampler, RandomIndexSampler},
};
use group_alloc_core::id::{GroupId, ItemId};
use group_alloc_model::{
    problem::Problem,
    sol::{GroupAssignment, Solution},
};
use rand_chacha::ChaCha8Rng;
use std::{cmp::Reverse, fmt::Display};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    Assemble(AssembleError),
}

impl From<AssembleError> for AllocError {
    fn from(value: AssembleError) -> Self {
        AllocError::Assemble(value)
    }
}

impl Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocError::Assemble(e) => write!(f, "Allocation failed: {e}"),
        }
    }
}

impl std::error::Error for AllocError {}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    solution: Solution,
    leftover: Vec<ItemId>,
    partial_groups: Vec<GroupAssignment>,
    assembly_order: Vec<GroupId>,
    cache: CacheStats,
}

impl Allocation {
    /// Complete groups only.
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Items still in the pool when the run ended, in pool order.
    #[inline]
    pub fn leftover(&self) -> &[ItemId] {
        &self.leftover
    }

    /// Groups that ran out of items before reaching capacity. They are not
    /// part of the solution.
    #[inline]
    pub fn partial_groups(&self) -> &[GroupAssignment] {
        &self.partial_groups
    }

    /// Groups in the order they were assembled.
    #[inline]
    pub fn assembly_order(&self) -> &[GroupId] {
        &self.assembly_order
    }

    #[inline]
    pub fn cache(&self) -> &CacheStats {
        &self.cache
    }
}

/// Declared groups in the order they are assembled: descending capacity,
/// equal capacities from the back of the declared list to the front.
pub fn processing_order(capacities: &[usize]) -> Vec<(GroupId, usize)> {
    let mut order: Vec<(GroupId, usize)> = capacities
        .iter()
        .enumerate()
        .map(|(ix, &capacity)| (GroupId::new(ix), capacity))
        .collect();
    order.sort_by_key(|&(id, capacity)| (Reverse(capacity), Reverse(id)));
    order
}

/// Assembles every declared group against one shared pool.
///
/// A fresh distance cache is built for each call to [`AllocationDriver::run`];
/// the sampler carries over between runs.
pub struct AllocationDriver<S, O> {
    config: AllocConfig,
    sampler: S,
    observer: O,
}

impl AllocationDriver<RandomIndexSampler<ChaCha8Rng>, TracingProgress> {
    pub fn new(config: AllocConfig) -> Self {
        Self::with_parts(
            config,
            RandomIndexSampler::seeded(config.seed()),
            TracingProgress,
        )
    }
}

impl Default for AllocationDriver<RandomIndexSampler<ChaCha8Rng>, TracingProgress> {
    fn default() -> Self {
        Self::new(AllocConfig::default())
    }
}

impl<S, O> AllocationDriver<S, O>
where
    S: IndexSampler,
    O: ProgressObserver,
{
    pub fn with_parts(config: AllocConfig, sampler: S, observer: O) -> Self {
        Self {
            config,
            sampler,
            observer,
        }
    }

    #[inline]
    pub fn config(&self) -> &AllocConfig {
        &self.config
    }

    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(items = problem.item_count(), groups = problem.group_count()),
        err(Display)
    )]
    pub fn run(&mut self, problem: &Problem) -> Result<Allocation, AllocError> {
        let mut pool = Pool::new(problem.items());
        let mut tracker =
            ProgressTracker::new(pool.initial_len(), self.config.progress_step_percent());
        let mut assembler = GroupAssembler::new(&self.config, &mut self.sampler);

        let mut complete = Vec::new();
        let mut partial_groups = Vec::new();
        let mut assembly_order = Vec::new();

        for (id, capacity) in processing_order(problem.capacities()) {
            if pool.is_empty() {
                debug!(group = %id, "Pool exhausted; skipping remaining groups");
                break;
            }

            let mut group = Group::new(id, capacity);
            let state = assembler.assemble(&mut group, &mut pool)?;
            assembly_order.push(id);
            debug!(group = %id, capacity, ?state, remaining = pool.len(), "Assembled group");

            if let Some(progress) = tracker.update(pool.consumed()) {
                self.observer.on_progress(progress);
            }

            match state {
                GroupState::Complete => complete.push(group.to_assignment()),
                _ => partial_groups.push(group.to_assignment()),
            }
        }

        let cache = assembler.cache().stats();
        let leftover: Vec<ItemId> = pool.iter_ids().collect();
        let solution = Solution::new(problem, complete);

        info!(
            complete = solution.stats().complete_groups(),
            partial = partial_groups.len(),
            leftover = leftover.len(),
            coverage = solution.stats().coverage_score(),
            cache_entries = cache.entries(),
            cache_hit_rate = cache.hit_rate(),
            "Allocation finished"
        );

        Ok(Allocation {
            solution,
            leftover,
            partial_groups,
            assembly_order,
            cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{progress::Progress, sampler::ScriptedIndexSampler};
    use group_alloc_core::bitvec::SummaryMerge;
    use group_alloc_model::{
        generator::{InstanceGenConfigBuilder, InstanceGenerator},
        io::parse_problem,
        problem::ProblemBuilder,
    };
    use static_assertions::assert_impl_all;
    use std::collections::HashSet;

    assert_impl_all!(Allocation: Send, Sync);
    assert_impl_all!(AllocError: Send, Sync, std::error::Error);

    const SAMPLE: &str = "5 1 2 1\n\
        3 onion pepper olive\n\
        3 mushroom tomato basil\n\
        3 chicken mushroom pepper\n\
        3 tomato mushroom basil\n\
        2 chicken basil\n";

    fn generated(seed: u64, items: usize) -> Problem {
        let config = InstanceGenConfigBuilder::new()
            .item_count(items)
            .vocabulary(30)
            .features_per_item(1, 5)
            .groups(2, 15)
            .groups(3, 15)
            .groups(4, 15)
            .seed(seed)
            .build()
            .unwrap();
        InstanceGenerator::new(config).unwrap().generate().unwrap()
    }

    fn quiet(
        config: AllocConfig,
    ) -> AllocationDriver<RandomIndexSampler<ChaCha8Rng>, Vec<Progress>> {
        AllocationDriver::with_parts(
            config,
            RandomIndexSampler::seeded(config.seed()),
            Vec::new(),
        )
    }

    #[test]
    fn test_processing_order() {
        let order: Vec<(usize, usize)> = processing_order(&[2, 3, 3, 4, 2])
            .into_iter()
            .map(|(id, c)| (id.value(), c))
            .collect();
        assert_eq!(order, vec![(3, 4), (2, 3), (1, 3), (4, 2), (0, 2)]);
    }

    #[test]
    fn test_sample_input_fills_largest_group_only() {
        let problem = parse_problem(SAMPLE.as_bytes()).unwrap();
        let mut driver = quiet(AllocConfig::default());
        let alloc = driver.run(&problem).unwrap();

        let groups = alloc.solution().groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group(), GroupId::new(3));
        assert_eq!(groups[0].capacity(), 4);

        // The fifth item lands in the next group, which stays partial.
        assert_eq!(alloc.partial_groups().len(), 1);
        assert_eq!(alloc.partial_groups()[0].group(), GroupId::new(2));
        assert_eq!(alloc.partial_groups()[0].items().len(), 1);
        assert!(alloc.leftover().is_empty());
        assert_eq!(alloc.assembly_order(), &[GroupId::new(3), GroupId::new(2)]);
        alloc.solution().validate(&problem).unwrap();
    }

    #[test]
    fn test_every_item_accounted_for_once() {
        for seed in [1, 7, 99] {
            let problem = generated(seed, 100);
            let alloc = quiet(AllocConfig::default().with_seed(seed)).run(&problem).unwrap();

            let mut seen = HashSet::new();
            let all = alloc
                .solution()
                .iter_item_ids()
                .chain(alloc.partial_groups().iter().flat_map(|g| g.items().iter().copied()))
                .chain(alloc.leftover().iter().copied());
            for id in all {
                assert!(seen.insert(id), "{id} seen twice");
            }
            assert_eq!(seen.len(), problem.item_count());
            alloc.solution().validate(&problem).unwrap();
        }
    }

    #[test]
    fn test_groups_never_exceed_capacity() {
        let problem = generated(3, 200);
        let alloc = quiet(AllocConfig::default()).run(&problem).unwrap();
        for g in alloc.solution().groups() {
            assert_eq!(g.items().len(), g.capacity());
        }
        for g in alloc.partial_groups() {
            assert!(g.items().len() < g.capacity());
        }
        // Only the last assembled group can be left short.
        assert!(alloc.partial_groups().len() <= 1);
    }

    #[test]
    fn test_assembly_follows_descending_capacity() {
        let problem = generated(11, 120);
        let alloc = quiet(AllocConfig::default()).run(&problem).unwrap();
        let caps: Vec<usize> = alloc
            .assembly_order()
            .iter()
            .map(|id| problem.capacities()[id.value()])
            .collect();
        assert!(caps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_same_seed_same_allocation() {
        let problem = generated(5, 150);
        for merge in [SummaryMerge::SelfAgreement, SummaryMerge::Intersection] {
            let config = AllocConfig::default().with_seed(1234).with_merge(merge);
            let a = quiet(config).run(&problem).unwrap();
            let b = quiet(config).run(&problem).unwrap();
            assert_eq!(a.solution(), b.solution());
            assert_eq!(a.leftover(), b.leftover());
        }
    }

    #[test]
    fn test_surplus_items_left_in_pool() {
        let mut b = ProblemBuilder::new();
        for i in 0..7 {
            b.add_item([format!("f{}", i % 3)]);
        }
        b.add_groups(2, 2).unwrap();
        let problem = b.build().unwrap();
        let alloc = quiet(AllocConfig::default()).run(&problem).unwrap();

        assert_eq!(alloc.solution().groups().len(), 2);
        assert_eq!(alloc.leftover().len(), 3);
        assert_eq!(alloc.solution().stats().undelivered_items(), 3);
    }

    #[test]
    fn test_no_items_no_groups_assembled() {
        let mut b = ProblemBuilder::new();
        b.add_groups(3, 2).unwrap();
        let problem = b.build().unwrap();
        let alloc = quiet(AllocConfig::default()).run(&problem).unwrap();
        assert!(alloc.solution().groups().is_empty());
        assert!(alloc.assembly_order().is_empty());
        assert_eq!(alloc.solution().stats().incomplete_groups(), 2);
    }

    #[test]
    fn test_progress_reported_per_step() {
        let mut b = ProblemBuilder::new();
        for i in 0..10 {
            b.add_item([format!("f{i}")]);
        }
        b.add_groups(2, 5).unwrap();
        let problem = b.build().unwrap();

        let mut driver = quiet(AllocConfig::default());
        driver.run(&problem).unwrap();
        let percents: Vec<u8> = driver.observer().iter().map(|p| p.percent()).collect();
        assert_eq!(percents, vec![20, 40, 60, 80, 100]);
    }

    #[test]
    fn test_scripted_sampler_drives_whole_run() {
        let problem = parse_problem(SAMPLE.as_bytes()).unwrap();
        let config = AllocConfig::default().with_sample_size(1).unwrap();
        let mut driver =
            AllocationDriver::with_parts(config, ScriptedIndexSampler::new([0]), Vec::new());
        let alloc = driver.run(&problem).unwrap();
        // Seeding takes item 0, leaving [4, 1, 2, 3]. Every draw hits the front.
        let ids: Vec<usize> = alloc.solution().groups()[0]
            .items()
            .iter()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![0, 4, 3, 2]);
        assert_eq!(alloc.partial_groups()[0].items(), &[ItemId::new(1)]);
    }
}
