//! Open set for best-first search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::node::{FrontierKey, NodeId};

/// Min-heap of frontier keys.
///
/// Stale entries (a better path to the same state was found after the push)
/// are not removed here; the search skips them when popped.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<Reverse<FrontierKey>>,
    high_water: usize,
}

impl OpenSet {
    pub fn push(&mut self, key: FrontierKey) {
        self.heap.push(Reverse(key));
        self.high_water = self.high_water.max(self.heap.len());
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(key)| key.id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Largest size the open set reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
