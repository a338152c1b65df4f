//! Binary min-heap with an injectable comparator.
//!
//! `std::collections::BinaryHeap` is a max-heap over `Ord` and needs wrapper
//! types to change direction or key. NSW search orders candidates by an `f32`
//! distance, and needs `pop_n` and a sorted snapshot, so the heap is kept here
//! with the ordering supplied as a [`Comparator`].
//!
//! ```rust
//! use strata::queue::PriorityQueue;
//!
//! let mut pq = PriorityQueue::new();
//! for x in [4, 2, 1, 5] {
//!     pq.push(x);
//! }
//! assert_eq!(pq.peek(), Some(&1));
//! assert_eq!(pq.pop_n(3), vec![1, 2, 4]);
//! assert_eq!(pq.pop_n(3), vec![5]);
//! assert_eq!(pq.pop(), None);
//! ```

use crate::compare::{Comparator, NaturalOrder};
use std::cmp::Ordering;

/// Array-backed binary heap; the root is the minimum under `C`.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, C = NaturalOrder> {
    heap: Vec<T>,
    comparator: C,
}

impl<T: Ord> PriorityQueue<T, NaturalOrder> {
    /// Create an empty queue ordered by `T`'s natural order.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for PriorityQueue<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T, C> {
    /// Create an empty queue ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            heap: Vec::new(),
            comparator,
        }
    }

    /// Create an empty queue with room for `capacity` items.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            comparator,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Add an item. O(log n).
    pub fn push(&mut self, value: T) {
        self.heap.push(value);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the minimum, or `None` when empty. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let root = self.heap.pop();
        self.sift_down(0);
        root
    }

    /// The minimum without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Pop up to `n` items in ascending order. Returns fewer when the queue runs out.
    pub fn pop_n(&mut self, n: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(n.min(self.heap.len()));
        while out.len() < n {
            match self.pop() {
                Some(value) => out.push(value),
                None => break,
            }
        }
        out
    }

    /// Items in heap (not sorted) order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Consume the queue, returning its items sorted ascending.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let Self {
            mut heap,
            comparator,
        } = self;
        heap.sort_by(|a, b| comparator.compare(a, b));
        heap
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.comparator.compare(&self.heap[parent], &self.heap[index]) != Ordering::Greater {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smaller = left;
            if right < len && self.comparator.less(&self.heap[right], &self.heap[left]) {
                smaller = right;
            }
            if !self.comparator.less(&self.heap[smaller], &self.heap[index]) {
                break;
            }
            self.heap.swap(smaller, index);
            index = smaller;
        }
    }
}

impl<T: Clone, C: Comparator<T>> PriorityQueue<T, C> {
    /// Sorted snapshot of every item; the queue is left untouched. O(n log n).
    pub fn as_sorted_vec(&self) -> Vec<T> {
        let mut items = self.heap.clone();
        items.sort_by(|a, b| self.comparator.compare(a, b));
        items
    }
}

impl<T, C: Comparator<T>> Extend<T> for PriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for PriorityQueue<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pq = Self::new();
        pq.extend(iter);
        pq
    }
}
