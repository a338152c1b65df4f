//! Skip list whose nodes each own a tower of forward links.

use super::levels::LevelGenerator;
use super::{render_levels, SkipListConfig, SortedIndex};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

/// Slot of the header node.
const HEAD: usize = 0;

/// Predecessor per level, collected on the way down.
type Path = SmallVec<[usize; 32]>;

/// A node of variable height.
///
/// `next[i]` is the following node that is at least `i + 1` levels tall.
/// The header has no value and is `max_levels` tall.
#[derive(Debug, Clone)]
struct SkipNode<T> {
    value: Option<T>,
    next: Vec<Option<usize>>,
}

impl<T> SkipNode<T> {
    fn new(value: Option<T>, height: usize) -> Self {
        Self {
            value,
            next: vec![None; height],
        }
    }
}

/// Ordered multiset with O(log n) expected search, insert and delete.
///
/// Nodes live in a slot arena; a deleted node's slot goes on a vacancy stack
/// and is handed to the next insert.
#[derive(Clone)]
pub struct SkipList<T, C = NaturalOrder, R = StdRng> {
    nodes: Vec<SkipNode<T>>,
    vacant: Vec<usize>,
    levels: LevelGenerator<R>,
    comparator: C,
    len: usize,
    /// Number of levels that currently hold at least one node.
    height: usize,
}

impl<T: Ord> SkipList<T> {
    /// Empty list with default parameters and an entropy seed.
    pub fn new() -> Self {
        Self::with_generator(LevelGenerator::default(), NaturalOrder)
    }

    /// Empty list with default parameters and deterministic tower heights.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_generator(LevelGenerator::with_seed(seed), NaturalOrder)
    }

    /// Empty list built from `config`.
    pub fn from_config(config: SkipListConfig) -> Result<Self> {
        Self::with_config_and_comparator(config, NaturalOrder)
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> SkipList<T, C> {
    /// Empty list built from `config`, ordered by `comparator`.
    pub fn with_config_and_comparator(config: SkipListConfig, comparator: C) -> Result<Self> {
        Ok(Self::with_generator(config.level_generator()?, comparator))
    }
}

impl<T, C: Comparator<T>, R: Rng> SkipList<T, C, R> {
    /// Empty list drawing tower heights from `levels`.
    pub fn with_generator(levels: LevelGenerator<R>, comparator: C) -> Self {
        let header = SkipNode::new(None, levels.max_levels());
        Self {
            nodes: vec![header],
            vacant: Vec::new(),
            levels,
            comparator,
            len: 0,
            height: 0,
        }
    }

    /// Insert `value`, keeping duplicates. A new value goes in front of equal ones.
    pub fn insert(&mut self, value: T) {
        let tower = self.levels.next_level();
        let path = self.predecessors(&value);
        let slot = self.allocate(value, tower);

        for (level, &pred) in path.iter().enumerate().take(tower) {
            let succ = self.nodes[pred].next[level];
            self.nodes[slot].next[level] = succ;
            self.nodes[pred].next[level] = Some(slot);
        }

        self.height = self.height.max(tower);
        self.len += 1;
    }

    /// Remove the first stored value equal to `value`, unlinking it on every
    /// level it occupies. Returns `false` when nothing matched.
    pub fn delete(&mut self, value: &T) -> bool {
        let path = self.predecessors(value);
        let target = match self.next_at(path[0], 0) {
            Some(candidate) if self.value_equals(candidate, value) => candidate,
            _ => return false,
        };

        for level in 0..self.nodes[target].next.len() {
            let pred = path[level];
            if self.nodes[pred].next[level] == Some(target) {
                self.nodes[pred].next[level] = self.nodes[target].next[level];
            }
        }

        self.release(target);
        self.len -= 1;
        while self.height > 0 && self.nodes[HEAD].next[self.height - 1].is_none() {
            self.height -= 1;
        }
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// The stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value)
            .and_then(|slot| self.nodes[slot].value.as_ref())
    }

    /// Position of `value` in ascending order. Linear in the position.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let mut current = HEAD;
        let mut index = 0;
        while let Some(next) = self.next_at(current, 0) {
            match self.nodes[next].value.as_ref() {
                Some(v) if self.comparator.less(v, value) => {
                    index += 1;
                    current = next;
                }
                _ => break,
            }
        }
        match self.next_at(current, 0) {
            Some(next) if self.value_equals(next, value) => Some(index),
            _ => None,
        }
    }

    /// Smallest stored value.
    pub fn first(&self) -> Option<&T> {
        self.next_at(HEAD, 0)
            .and_then(|slot| self.nodes[slot].value.as_ref())
    }

    /// Drop every value; the header and level generator are kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[HEAD].next.fill(None);
        self.vacant.clear();
        self.len = 0;
        self.height = 0;
    }

    /// Walk from the top level down, stopping early on an exact match.
    fn find(&self, value: &T) -> Option<usize> {
        let mut current = HEAD;
        for level in (0..self.height).rev() {
            current = self.advance(current, level, value);
            if let Some(next) = self.next_at(current, level) {
                if self.value_equals(next, value) {
                    return Some(next);
                }
            }
        }
        None
    }

    /// For every level, the last node whose value is strictly less than `value`.
    fn predecessors(&self, value: &T) -> Path {
        let mut path: Path = SmallVec::from_elem(HEAD, self.levels.max_levels());
        let mut current = HEAD;
        for level in (0..self.height).rev() {
            current = self.advance(current, level, value);
            path[level] = current;
        }
        path
    }

    /// Follow `level` links from `current` while the next value is less than `value`.
    #[inline]
    fn advance(&self, mut current: usize, level: usize, value: &T) -> usize {
        while let Some(next) = self.next_at(current, level) {
            match self.nodes[next].value.as_ref() {
                Some(v) if self.comparator.less(v, value) => current = next,
                _ => break,
            }
        }
        current
    }

    #[inline]
    fn next_at(&self, slot: usize, level: usize) -> Option<usize> {
        self.nodes[slot].next.get(level).copied().flatten()
    }

    #[inline]
    fn value_equals(&self, slot: usize, value: &T) -> bool {
        self.nodes[slot]
            .value
            .as_ref()
            .is_some_and(|v| self.comparator.compare(v, value).is_eq())
    }

    fn allocate(&mut self, value: T, tower: usize) -> usize {
        match self.vacant.pop() {
            Some(slot) => {
                self.nodes[slot] = SkipNode::new(Some(value), tower);
                slot
            }
            None => {
                self.nodes.push(SkipNode::new(Some(value), tower));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) {
        let node = &mut self.nodes[slot];
        node.value = None;
        node.next = Vec::new();
        self.vacant.push(slot);
    }

    /// Verify ordering and tower shape on every level.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let max_levels = self.levels.max_levels();
        if self.nodes[HEAD].next.len() != max_levels {
            return Err(format!(
                "header is {} levels tall, expected {max_levels}",
                self.nodes[HEAD].next.len()
            ));
        }

        let mut below: Option<HashSet<usize>> = None;
        for level in 0..max_levels {
            let mut members = Vec::new();
            let mut current = HEAD;
            while let Some(next) = self.next_at(current, level) {
                let node = &self.nodes[next];
                let Some(value) = node.value.as_ref() else {
                    return Err(format!("vacant slot {next} is linked on level {level}"));
                };
                if node.next.len() <= level {
                    return Err(format!("slot {next} is linked above its tower on level {level}"));
                }
                if let Some(prev) = self.nodes[current].value.as_ref() {
                    if self.comparator.less(value, prev) {
                        return Err(format!("level {level} is out of order at slot {next}"));
                    }
                }
                members.push(next);
                current = next;
            }
            if level == 0 && members.len() != self.len {
                return Err(format!(
                    "level 0 holds {} nodes but len is {}",
                    members.len(),
                    self.len
                ));
            }
            if !members.is_empty() && level >= self.height {
                return Err(format!("level {level} is populated above height {}", self.height));
            }
            if let Some(lower) = &below {
                if let Some(missing) = members.iter().find(|&slot| !lower.contains(slot)) {
                    return Err(format!("slot {missing} is on level {level} but not below it"));
                }
            }
            below = Some(members.into_iter().collect());
        }
        Ok(())
    }
}

impl<T, C, R> SkipList<T, C, R> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Header height.
    pub fn max_levels(&self) -> usize {
        self.nodes[HEAD].next.len()
    }

    /// Number of levels currently holding at least one node.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Ascending iterator over the stored values; call again to restart.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            current: self.nodes[HEAD].next.first().copied().flatten(),
            remaining: self.len,
        }
    }
}

impl<T: fmt::Display, C, R> SkipList<T, C, R> {
    /// Every non-empty level, top first, with values aligned by position.
    ///
    /// ```text
    /// 3:	[  2  ]
    /// 2:	[  2 3]
    /// 1:	[1 2 3]
    /// ```
    pub fn to_pretty_string(&self) -> String {
        let mut position = vec![usize::MAX; self.nodes.len()];
        let mut current = self.nodes[HEAD].next.first().copied().flatten();
        let mut index = 0;
        while let Some(slot) = current {
            position[slot] = index;
            index += 1;
            current = self.nodes[slot].next.first().copied().flatten();
        }

        let rows: Vec<Vec<(usize, String)>> = (0..self.height)
            .map(|level| {
                let mut row = Vec::new();
                let mut current = self.nodes[HEAD].next[level];
                while let Some(slot) = current {
                    if let Some(value) = self.nodes[slot].value.as_ref() {
                        row.push((position[slot], value.to_string()));
                    }
                    current = self.nodes[slot].next.get(level).copied().flatten();
                }
                row
            })
            .collect();

        render_levels(&rows, self.len)
    }
}

impl<T: fmt::Debug, C, R> fmt::Debug for SkipList<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Ascending iterator over a [`SkipList`].
pub struct Iter<'a, T> {
    nodes: &'a [SkipNode<T>],
    current: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let node = &self.nodes[slot];
        self.current = node.next.first().copied().flatten();
        self.remaining = self.remaining.saturating_sub(1);
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, C, R> IntoIterator for &'a SkipList<T, C, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Comparator<T>, R: Rng> Extend<T> for SkipList<T, C, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, C: Comparator<T>, R: Rng> SortedIndex<T> for SkipList<T, C, R> {
    fn insert(&mut self, value: T) {
        SkipList::insert(self, value);
    }

    fn delete(&mut self, value: &T) -> bool {
        SkipList::delete(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        SkipList::contains(self, value)
    }

    fn get(&self, value: &T) -> Option<&T> {
        SkipList::get(self, value)
    }

    fn index_of(&self, value: &T) -> Option<usize> {
        SkipList::index_of(self, value)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Reverse;

    fn filled(max: i32) -> SkipList<i32> {
        let mut list = SkipList::with_seed(42);
        for i in 1..=max {
            list.insert(i);
        }
        list
    }

    #[test]
    fn insert_then_contains() {
        let list = filled(99);
        for i in 1..=99 {
            assert!(list.contains(&i), "missing {i}");
        }
        assert!(!list.contains(&0));
        assert!(!list.contains(&101));
        list.check_invariants().unwrap();
    }

    #[test]
    fn delete_then_contains() {
        let mut list = filled(99);
        for i in 1..=99 {
            assert!(list.delete(&i));
            assert!(!list.contains(&i));
            assert!(!list.delete(&i));
            list.check_invariants().unwrap();
        }
        assert!(!list.delete(&0));
        assert!(!list.delete(&101));
        assert!(list.is_empty());
        assert_eq!(list.height(), 0);
    }

    #[test]
    fn size_counts_values() {
        assert_eq!(filled(100).len(), 100);
        assert_eq!(SkipList::<i32>::new().len(), 0);
    }

    #[test]
    fn get_returns_stored_value() {
        let list = filled(10);
        for i in 1..=10 {
            assert_eq!(list.get(&i), Some(&i));
        }
        assert_eq!(list.get(&0), None);
        assert_eq!(list.get(&11), None);
    }

    #[test]
    fn index_of_matches_position() {
        let list = filled(10);
        for i in 0..10 {
            assert_eq!(list.index_of(&(i + 1)), Some(i as usize));
        }
        assert_eq!(list.index_of(&0), None);
        assert_eq!(list.index_of(&11), None);
    }

    #[test]
    fn iterates_in_order_and_restarts() {
        let list = filled(10);
        let once: Vec<i32> = list.iter().copied().collect();
        let twice: Vec<i32> = (&list).into_iter().copied().collect();
        assert_eq!(once, (1..=10).collect::<Vec<_>>());
        assert_eq!(once, twice);
        assert_eq!(list.iter().len(), 10);
    }

    #[test]
    fn sorted_even_when_inserted_in_reverse() {
        let mut list = SkipList::with_seed(3);
        for i in (1..=10).rev() {
            list.insert(i);
        }
        assert_eq!(list.to_vec(), (1..=10).collect::<Vec<_>>());
        list.check_invariants().unwrap();
    }

    #[test]
    fn duplicates_are_kept_and_removed_one_at_a_time() {
        let mut list = SkipList::with_seed(11);
        for x in [5, 3, 5, 1, 5] {
            list.insert(x);
        }
        assert_eq!(list.to_vec(), vec![1, 3, 5, 5, 5]);
        assert_eq!(list.index_of(&5), Some(2));
        assert!(list.delete(&5));
        assert_eq!(list.len(), 4);
        assert!(list.contains(&5));
        list.check_invariants().unwrap();
        assert!(list.delete(&5));
        assert!(list.delete(&5));
        assert!(!list.contains(&5));
        assert_eq!(list.to_vec(), vec![1, 3]);
        list.check_invariants().unwrap();
    }

    #[test]
    fn strings_sort_lexicographically() {
        let list: SkipList<String> = ["pear", "apple", "fig"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(list.to_vec(), vec!["apple", "fig", "pear"]);
        assert_eq!(list.first().map(String::as_str), Some("apple"));
    }

    #[test]
    fn custom_comparator_reverses_order() {
        let config = SkipListConfig {
            seed: Some(5),
            ..SkipListConfig::default()
        };
        let mut list = SkipList::with_config_and_comparator(config, Reverse(NaturalOrder)).unwrap();
        list.extend([1, 4, 2, 3]);
        assert_eq!(list.to_vec(), vec![4, 3, 2, 1]);
        assert_eq!(list.index_of(&4), Some(0));
    }

    #[test]
    fn slots_are_reused_after_delete() {
        let mut list = filled(8);
        let slots = list.nodes.len();
        assert!(list.delete(&4));
        list.insert(40);
        assert_eq!(list.nodes.len(), slots);
        list.check_invariants().unwrap();
    }

    #[test]
    fn pretty_string_has_one_line_per_used_level() {
        let list = filled(9);
        let pretty = list.to_pretty_string();
        assert_eq!(pretty.lines().count(), list.height());
        let bottom = pretty.lines().last().unwrap();
        assert_eq!(bottom, "1:\t[1 2 3 4 5 6 7 8 9]");
    }

    #[test]
    fn clear_resets() {
        let mut list = filled(20);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().next(), None);
        list.insert(1);
        assert_eq!(list.to_vec(), vec![1]);
        list.check_invariants().unwrap();
    }

    #[test]
    fn single_level_list_degrades_to_linked_list() {
        let config = SkipListConfig {
            max_levels: 1,
            probability: 0.5,
            seed: Some(1),
        };
        let mut list = SkipList::from_config(config).unwrap();
        list.extend([3, 1, 2]);
        assert_eq!(list.height(), 1);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }
}
