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

use group_alloc_core::id::ItemId;
use group_alloc_model::item::Item;

/// The shared working set of unassigned items.
///
/// Removal swaps the last item into the vacated slot, so it is O(1) and does
/// NOT preserve order. Only positions that were just sampled are meaningful.
#[derive(Debug, Clone)]
pub struct Pool<'p> {
    items: Vec<&'p Item>,
    initial_len: usize,
}

impl<'p> Pool<'p> {
    pub fn new(items: &'p [Item]) -> Self {
        Self {
            items: items.iter().collect(),
            initial_len: items.len(),
        }
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
    pub fn initial_len(&self) -> usize {
        self.initial_len
    }

    /// Items removed since construction.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.initial_len - self.items.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&'p Item> {
        self.items.get(index).copied()
    }

    /// Removes the item at `index`, moving the last item into its slot.
    #[inline]
    pub fn take(&mut self, index: usize) -> Option<&'p Item> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.swap_remove(index))
    }

    #[inline]
    pub fn iter_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|i| i.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use group_alloc_model::problem::ProblemBuilder;

    #[test]
    fn test_take_swaps_last_into_slot() {
        let mut b = ProblemBuilder::new();
        for l in ["a", "b", "c", "d"] {
            b.add_item([l]);
        }
        let p = b.build().unwrap();
        let mut pool = Pool::new(p.items());

        let taken = pool.take(0).unwrap();
        assert_eq!(taken.id(), ItemId::new(0));
        assert_eq!(pool.get(0).map(|i| i.id()), Some(ItemId::new(3)));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.consumed(), 1);
        assert!(pool.take(3).is_none());

        while pool.take(0).is_some() {}
        assert!(pool.is_empty());
        assert_eq!(pool.consumed(), pool.initial_len());
    }
}
