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

use group_alloc_core::{
    bitvec::BitVector,
    id::{GroupId, ItemId},
};
use group_alloc_model::{item::Item, sol::GroupAssignment};

/// Assembly state of a group, derived from how many items it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupState {
    Empty,
    Seeded,
    Filling,
    Complete,
}

/// A fixed-capacity group of borrowed items and its running summary vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'p> {
    id: GroupId,
    capacity: usize,
    items: Vec<&'p Item>,
    summary: Option<BitVector>,
}

impl<'p> Group<'p> {
    #[inline]
    pub fn new(id: GroupId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            items: Vec::with_capacity(capacity),
            summary: None,
        }
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn items(&self) -> &[&'p Item] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    #[inline]
    pub fn summary(&self) -> Option<&BitVector> {
        self.summary.as_ref()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn state(&self) -> GroupState {
        if self.items.is_empty() {
            GroupState::Empty
        } else if self.is_complete() {
            GroupState::Complete
        } else if self.items.len() == 1 {
            GroupState::Seeded
        } else {
            GroupState::Filling
        }
    }

    #[inline]
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|i| i.id())
    }

    /// Appends `item` and installs the new summary.
    #[inline]
    pub(crate) fn push(&mut self, item: &'p Item, summary: BitVector) {
        debug_assert!(!self.is_complete());
        self.items.push(item);
        self.summary = Some(summary);
    }

    pub fn to_assignment(&self) -> GroupAssignment {
        GroupAssignment::new(self.id, self.capacity, self.item_ids().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use group_alloc_model::problem::ProblemBuilder;

    #[test]
    fn test_state_follows_fill_level() {
        let mut b = ProblemBuilder::new();
        for l in ["a", "b", "c"] {
            b.add_item([l]);
        }
        let p = b.build().unwrap();
        let mut g = Group::new(GroupId::new(0), 3);
        assert_eq!(g.state(), GroupState::Empty);
        for (item, expected) in p.items().iter().zip([
            GroupState::Seeded,
            GroupState::Filling,
            GroupState::Complete,
        ]) {
            g.push(item, item.bits().clone());
            assert_eq!(g.state(), expected);
        }
        assert_eq!(g.remaining(), 0);
        assert_eq!(g.to_assignment().items().len(), 3);
    }

    #[test]
    fn test_single_capacity_group_completes_on_seed() {
        let mut b = ProblemBuilder::new();
        b.add_item(["a"]);
        let p = b.build().unwrap();
        let mut g = Group::new(GroupId::new(0), 1);
        g.push(&p.items()[0], p.items()[0].bits().clone());
        assert_eq!(g.state(), GroupState::Complete);
    }
}
