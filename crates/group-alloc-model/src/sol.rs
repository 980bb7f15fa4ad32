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
    err::{SolutionValidationError, WrongGroupSizeError},
    problem::Problem,
};
use group_alloc_core::{
    bitvec::BitVector,
    id::{GroupId, ItemId},
};
use serde::Serialize;
use std::{collections::HashSet, fmt::Display};

/// A group that reached its capacity, with its items in assignment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    group: GroupId,
    capacity: usize,
    items: Vec<ItemId>,
}

impl GroupAssignment {
    #[inline]
    pub fn new(group: GroupId, capacity: usize, items: Vec<ItemId>) -> Self {
        Self {
            group,
            capacity,
            items,
        }
    }

    #[inline]
    pub fn group(&self) -> GroupId {
        self.group
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }
}

impl Display for GroupAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.capacity)?;
        for id in &self.items {
            write!(f, " {}", id.value())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolutionStats {
    delivered_items: usize,
    undelivered_items: usize,
    complete_groups: usize,
    incomplete_groups: usize,
    /// Sum over complete groups of the squared number of distinct features.
    coverage_score: u64,
}

impl SolutionStats {
    #[inline]
    pub fn delivered_items(&self) -> usize {
        self.delivered_items
    }

    #[inline]
    pub fn undelivered_items(&self) -> usize {
        self.undelivered_items
    }

    #[inline]
    pub fn complete_groups(&self) -> usize {
        self.complete_groups
    }

    #[inline]
    pub fn incomplete_groups(&self) -> usize {
        self.incomplete_groups
    }

    #[inline]
    pub fn coverage_score(&self) -> u64 {
        self.coverage_score
    }
}

/// The complete groups of a run, ordered by group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    groups: Vec<GroupAssignment>,
    stats: SolutionStats,
}

impl Solution {
    pub fn new(problem: &Problem, mut groups: Vec<GroupAssignment>) -> Self {
        groups.sort_by_key(|g| g.group());
        let delivered_items = groups.iter().map(|g| g.items().len()).sum();
        let coverage_score = groups
            .iter()
            .map(|g| {
                let distinct = coverage(problem, g.items()) as u64;
                distinct * distinct
            })
            .sum();
        let stats = SolutionStats {
            delivered_items,
            undelivered_items: problem.item_count().saturating_sub(delivered_items),
            complete_groups: groups.len(),
            incomplete_groups: problem.group_count().saturating_sub(groups.len()),
            coverage_score,
        };
        Self { groups, stats }
    }

    #[inline]
    pub fn groups(&self) -> &[GroupAssignment] {
        &self.groups
    }

    #[inline]
    pub fn stats(&self) -> &SolutionStats {
        &self.stats
    }

    #[inline]
    pub fn iter_item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.groups.iter().flat_map(|g| g.items().iter().copied())
    }

    pub fn validate(&self, problem: &Problem) -> Result<(), SolutionValidationError> {
        let mut seen_items = HashSet::with_capacity(self.stats.delivered_items);
        let mut seen_groups = HashSet::with_capacity(self.groups.len());

        for g in &self.groups {
            let declared = problem
                .capacities()
                .get(g.group().value())
                .copied()
                .ok_or(SolutionValidationError::UndeclaredGroup(g.group()))?;
            if !seen_groups.insert(g.group()) {
                return Err(SolutionValidationError::DuplicateGroup(g.group()));
            }
            if declared != g.capacity() {
                return Err(SolutionValidationError::CapacityMismatch(g.group()));
            }
            if g.items().len() != g.capacity() {
                return Err(SolutionValidationError::WrongGroupSize(
                    WrongGroupSizeError::new(g.group(), g.capacity(), g.items().len()),
                ));
            }
            for &id in g.items() {
                if problem.item(id).is_none() {
                    return Err(SolutionValidationError::UnknownItem(id));
                }
                if !seen_items.insert(id) {
                    return Err(SolutionValidationError::DuplicateItem(id));
                }
            }
        }
        Ok(())
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.groups.len())?;
        for g in &self.groups {
            writeln!(f, "{g}")?;
        }
        Ok(())
    }
}

/// Distinct features across `items`; unknown ids contribute nothing.
///
/// Every item vector of a problem is encoded against its catalog, so all of
/// them have `problem.feature_len()` bits.
fn coverage(problem: &Problem, items: &[ItemId]) -> usize {
    let mut acc = BitVector::zeros(problem.feature_len());
    for item in items.iter().filter_map(|&id| problem.item(id)) {
        debug_assert_eq!(
            item.bits().len(),
            acc.len(),
            "{} is not encoded against the problem catalog",
            item.id()
        );
        if let Ok(u) = acc.union(item.bits()) {
            acc = u;
        }
    }
    acc.count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemBuilder;

    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        b.add_item(["a"]);
        b.add_item(["b"]);
        b.add_item(["c"]);
        b.add_item(["a", "b", "c"]);
        b.add_groups(2, 2).unwrap();
        b.build().unwrap()
    }

    fn ga(group: usize, capacity: usize, items: &[usize]) -> GroupAssignment {
        GroupAssignment::new(
            GroupId::new(group),
            capacity,
            items.iter().map(|&i| ItemId::new(i)).collect(),
        )
    }

    #[test]
    fn test_stats_and_display() {
        let p = problem();
        let s = Solution::new(&p, vec![ga(1, 2, &[3, 0]), ga(0, 2, &[1, 2])]);
        assert_eq!(s.groups()[0].group(), GroupId::new(0));
        assert_eq!(s.stats().delivered_items(), 4);
        assert_eq!(s.stats().undelivered_items(), 0);
        assert_eq!(s.stats().complete_groups(), 2);
        assert_eq!(s.stats().incomplete_groups(), 0);
        // {b, c} -> 2^2, {a, b, c} -> 3^2
        assert_eq!(s.stats().coverage_score(), 13);
        assert_eq!(s.to_string(), "2\n2 1 2\n2 3 0\n");
        assert!(s.validate(&p).is_ok());
    }

    #[test]
    fn test_coverage_counts_each_feature_once() {
        let p = problem();
        // `a` is shared by both members; the unknown id adds nothing.
        let s = Solution::new(&p, vec![ga(0, 2, &[0, 3]), ga(1, 2, &[2, 9])]);
        assert_eq!(s.stats().coverage_score(), 3 * 3 + 1);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let p = problem();
        let s = Solution::new(&p, vec![ga(0, 2, &[0, 1]), ga(1, 2, &[1, 2])]);
        assert_eq!(
            s.validate(&p),
            Err(SolutionValidationError::DuplicateItem(ItemId::new(1)))
        );
    }

    #[test]
    fn test_validate_rejects_partial_groups() {
        let p = problem();
        let s = Solution::new(&p, vec![ga(0, 2, &[0])]);
        assert!(matches!(
            s.validate(&p),
            Err(SolutionValidationError::WrongGroupSize(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_items_and_groups() {
        let p = problem();
        let s = Solution::new(&p, vec![ga(0, 2, &[0, 9])]);
        assert_eq!(
            s.validate(&p),
            Err(SolutionValidationError::UnknownItem(ItemId::new(9)))
        );
        let s = Solution::new(&p, vec![ga(5, 2, &[0, 1])]);
        assert_eq!(
            s.validate(&p),
            Err(SolutionValidationError::UndeclaredGroup(GroupId::new(5)))
        );
        let s = Solution::new(&p, vec![ga(0, 3, &[0, 1, 2])]);
        assert_eq!(
            s.validate(&p),
            Err(SolutionValidationError::CapacityMismatch(GroupId::new(0)))
        );
    }
}
