//! Skip list stored as parallel arrays.
//!
//! Node `s` is a slot: its value is `values[s]` and its level-`i` successor is
//! `next[i][s]`. There are no per-node allocations, so inserts are cheap.
//!
//! Deleted slots are chained into a free list through the level-0 link array
//! (`first_empty_cell -> next[0][slot] -> ...`) and handed out again before the
//! arrays grow. Capacity never shrinks.
//!
//! Level arrays are allocated lazily: `next[i]` appears when the first node at
//! least `i + 1` levels tall is inserted. Every allocated level array spans
//! all slots.

use super::levels::LevelGenerator;
use super::{render_levels, SkipListConfig, SortedIndex};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

/// End of a chain (level link or free list).
const NIL: usize = usize::MAX;

/// Slot of the header node.
const HEAD: usize = 0;

type Path = SmallVec<[usize; 32]>;

/// Arena-backed skip list with O(1) slot reclamation.
#[derive(Clone)]
pub struct OptimizedSkipList<T, C = NaturalOrder, R = StdRng> {
    values: Vec<Option<T>>,
    next: Vec<Vec<usize>>,
    first_empty_cell: usize,
    free: usize,
    levels: LevelGenerator<R>,
    comparator: C,
    len: usize,
}

impl<T: Ord> OptimizedSkipList<T> {
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

impl<T: Ord> Default for OptimizedSkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> OptimizedSkipList<T, C> {
    /// Empty list built from `config`, ordered by `comparator`.
    pub fn with_config_and_comparator(config: SkipListConfig, comparator: C) -> Result<Self> {
        Ok(Self::with_generator(config.level_generator()?, comparator))
    }
}

impl<T, C: Comparator<T>, R: Rng> OptimizedSkipList<T, C, R> {
    /// Empty list drawing tower heights from `levels`.
    pub fn with_generator(levels: LevelGenerator<R>, comparator: C) -> Self {
        let mut list = Self {
            values: Vec::new(),
            next: Vec::new(),
            first_empty_cell: NIL,
            free: 0,
            levels,
            comparator,
            len: 0,
        };
        // Level 0 always exists: it also carries the free list.
        let header = list.create_node(None, 1);
        debug_assert_eq!(header, HEAD);
        list
    }

    /// Insert `value`, keeping duplicates. A new value goes in front of equal ones.
    pub fn insert(&mut self, value: T) {
        let tower = self.levels.next_level();
        let path = self.predecessors(&value);
        let slot = self.create_node(Some(value), tower);

        for (level, &pred) in path.iter().enumerate().take(tower) {
            self.next[level][slot] = self.next[level][pred];
            self.next[level][pred] = slot;
        }
        self.len += 1;
    }

    /// Remove the first stored value equal to `value` and recycle its slot.
    /// Returns `false` when nothing matched.
    pub fn delete(&mut self, value: &T) -> bool {
        let path = self.predecessors(value);
        let target = self.next[0][path[0]];
        if target == NIL || !self.value_equals(target, value) {
            return false;
        }

        for (level, links) in self.next.iter_mut().enumerate() {
            let pred = path[level];
            if links[pred] == target {
                links[pred] = links[target];
            }
        }

        self.values[target] = None;
        self.next[0][target] = self.first_empty_cell;
        self.first_empty_cell = target;
        self.free += 1;
        self.len -= 1;
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// The stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).and_then(|slot| self.values[slot].as_ref())
    }

    /// Position of `value` in ascending order. Linear in the position.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let links = &self.next[0];
        let mut current = HEAD;
        let mut index = 0;
        while links[current] != NIL && self.value_less(links[current], value) {
            index += 1;
            current = links[current];
        }
        let candidate = links[current];
        (candidate != NIL && self.value_equals(candidate, value)).then_some(index)
    }

    /// Smallest stored value.
    pub fn first(&self) -> Option<&T> {
        match self.next[0][HEAD] {
            NIL => None,
            slot => self.values[slot].as_ref(),
        }
    }

    /// Drop every value and release the arrays; the level generator is kept.
    pub fn clear(&mut self) {
        self.values.truncate(1);
        self.next.truncate(1);
        self.next[0].truncate(1);
        self.next[0][HEAD] = NIL;
        self.first_empty_cell = NIL;
        self.free = 0;
        self.len = 0;
    }

    fn find(&self, value: &T) -> Option<usize> {
        let mut current = HEAD;
        for level in (0..self.next.len()).rev() {
            current = self.advance(current, level, value);
            let candidate = self.next[level][current];
            if candidate != NIL && self.value_equals(candidate, value) {
                return Some(candidate);
            }
        }
        None
    }

    /// For every level, the last slot whose value is strictly less than `value`.
    /// Levels not yet allocated report the header.
    fn predecessors(&self, value: &T) -> Path {
        let mut path: Path = SmallVec::from_elem(HEAD, self.levels.max_levels());
        let mut current = HEAD;
        for level in (0..self.next.len()).rev() {
            current = self.advance(current, level, value);
            path[level] = current;
        }
        path
    }

    #[inline]
    fn advance(&self, mut current: usize, level: usize, value: &T) -> usize {
        let links = &self.next[level];
        while links[current] != NIL && self.value_less(links[current], value) {
            current = links[current];
        }
        current
    }

    #[inline]
    fn value_less(&self, slot: usize, value: &T) -> bool {
        self.values[slot]
            .as_ref()
            .is_some_and(|v| self.comparator.less(v, value))
    }

    #[inline]
    fn value_equals(&self, slot: usize, value: &T) -> bool {
        self.values[slot]
            .as_ref()
            .is_some_and(|v| self.comparator.compare(v, value).is_eq())
    }

    /// Take a slot from the free list, or append one to every array.
    fn create_node(&mut self, value: Option<T>, tower: usize) -> usize {
        let slot = if self.first_empty_cell != NIL {
            let slot = self.first_empty_cell;
            self.first_empty_cell = self.next[0][slot];
            self.free -= 1;
            self.values[slot] = value;
            for links in &mut self.next {
                links[slot] = NIL;
            }
            slot
        } else {
            let slot = self.values.len();
            self.values.push(value);
            for links in &mut self.next {
                links.push(NIL);
            }
            slot
        };

        while self.next.len() < tower {
            self.next.push(vec![NIL; self.values.len()]);
        }
        slot
    }

    /// Verify ordering, tower shape, and free-list bookkeeping.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let slots = self.values.len();
        if let Some(level) = self.next.iter().position(|links| links.len() != slots) {
            return Err(format!("level {level} does not span all {slots} slots"));
        }

        let mut below: Option<HashSet<usize>> = None;
        for (level, links) in self.next.iter().enumerate() {
            let mut members = HashSet::new();
            let mut current = HEAD;
            while links[current] != NIL {
                let slot = links[current];
                let Some(value) = self.values[slot].as_ref() else {
                    return Err(format!("empty slot {slot} is linked on level {level}"));
                };
                if let Some(prev) = self.values[current].as_ref() {
                    if self.comparator.less(value, prev) {
                        return Err(format!("level {level} is out of order at slot {slot}"));
                    }
                }
                if !members.insert(slot) {
                    return Err(format!("level {level} has a cycle through slot {slot}"));
                }
                current = slot;
            }
            if level == 0 && members.len() != self.len {
                return Err(format!(
                    "level 0 holds {} nodes but len is {}",
                    members.len(),
                    self.len
                ));
            }
            if let Some(lower) = &below {
                if let Some(missing) = members.iter().find(|&slot| !lower.contains(slot)) {
                    return Err(format!("slot {missing} is on level {level} but not below it"));
                }
            }
            below = Some(members);
        }

        let mut free = 0;
        let mut cell = self.first_empty_cell;
        while cell != NIL {
            if self.values[cell].is_some() {
                return Err(format!("free slot {cell} still holds a value"));
            }
            free += 1;
            if free > slots {
                return Err("free list does not terminate".to_string());
            }
            cell = self.next[0][cell];
        }
        if free != self.free || free + self.len + 1 != slots {
            return Err(format!(
                "{free} free + {} live + header != {slots} slots",
                self.len
            ));
        }
        Ok(())
    }
}

impl<T, C, R> OptimizedSkipList<T, C, R> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cap on tower height.
    pub fn max_levels(&self) -> usize
    where
        R: Rng,
    {
        self.levels.max_levels()
    }

    /// Number of levels currently holding at least one node.
    pub fn height(&self) -> usize {
        self.next
            .iter()
            .rposition(|links| links[HEAD] != NIL)
            .map_or(0, |top| top + 1)
    }

    /// Slots allocated so far, header included.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Slots waiting on the free list.
    pub fn free_slots(&self) -> usize {
        self.free
    }

    /// Level arrays allocated so far.
    pub fn allocated_levels(&self) -> usize {
        self.next.len()
    }

    /// Ascending iterator over the stored values; call again to restart.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            values: &self.values,
            links: &self.next[0],
            current: self.next[0][HEAD],
            remaining: self.len,
        }
    }
}

impl<T: fmt::Display, C, R> OptimizedSkipList<T, C, R> {
    /// Every non-empty level, top first, with values aligned by position.
    pub fn to_pretty_string(&self) -> String {
        let mut position = vec![usize::MAX; self.values.len()];
        let mut current = self.next[0][HEAD];
        let mut index = 0;
        while current != NIL {
            position[current] = index;
            index += 1;
            current = self.next[0][current];
        }

        let rows: Vec<Vec<(usize, String)>> = self
            .next
            .iter()
            .map(|links| {
                let mut row = Vec::new();
                let mut current = links[HEAD];
                while current != NIL {
                    if let Some(value) = self.values[current].as_ref() {
                        row.push((position[current], value.to_string()));
                    }
                    current = links[current];
                }
                row
            })
            .collect();

        render_levels(&rows, self.len)
    }
}

impl<T: fmt::Debug, C, R> fmt::Debug for OptimizedSkipList<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Ascending iterator over an [`OptimizedSkipList`].
pub struct Iter<'a, T> {
    values: &'a [Option<T>],
    links: &'a [usize],
    current: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let slot = self.current;
        self.current = self.links[slot];
        self.remaining = self.remaining.saturating_sub(1);
        self.values[slot].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, C, R> IntoIterator for &'a OptimizedSkipList<T, C, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Comparator<T>, R: Rng> Extend<T> for OptimizedSkipList<T, C, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for OptimizedSkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, C: Comparator<T>, R: Rng> SortedIndex<T> for OptimizedSkipList<T, C, R> {
    fn insert(&mut self, value: T) {
        OptimizedSkipList::insert(self, value);
    }

    fn delete(&mut self, value: &T) -> bool {
        OptimizedSkipList::delete(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        OptimizedSkipList::contains(self, value)
    }

    fn get(&self, value: &T) -> Option<&T> {
        OptimizedSkipList::get(self, value)
    }

    fn index_of(&self, value: &T) -> Option<usize> {
        OptimizedSkipList::index_of(self, value)
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
