//! Probabilistic skip lists.
//!
//! Two representations of the same ordered index:
//!
//! - [`SkipList`]: every node owns its own tower of forward links, and nodes
//!   live in a slot arena addressed by stable indices.
//! - [`OptimizedSkipList`]: values and links are split into parallel arrays
//!   (`values[slot]`, `next[level][slot]`); reclaimed slots are chained through
//!   the level-0 link array, so insert after delete never allocates.
//!
//! ```text
//! level 3:  HEAD ─────────────────► 20 ──────────────────► NIL
//! level 2:  HEAD ──────► 10 ──────► 20 ────────► 40 ─────► NIL
//! level 1:  HEAD ─► 5 ─► 10 ─► 15 ─► 20 ─► 30 ─► 40 ─► 50 ─► NIL
//! ```
//!
//! Both keep values non-decreasing along every level, keep towers monotone
//! (a node on level i is on every level below i), and accept duplicates.
//! A new value lands in front of existing equal values.
//!
//! # Quick Start
//!
//! ```rust
//! use strata::skiplist::{SkipList, SortedIndex};
//!
//! let mut list = SkipList::with_seed(7);
//! for x in [3, 1, 2] {
//!     list.insert(x);
//! }
//! assert!(list.contains(&2));
//! assert_eq!(list.index_of(&3), Some(2));
//! assert!(list.delete(&1));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
//! ```
//!
//! # Which one?
//!
//! | Workload | Recommendation |
//! |----------|----------------|
//! | Insert-heavy, values churned through delete | **OptimizedSkipList** |
//! | Mostly reads, few deletes | either |
//! | Wants per-node tower sizes in memory | **SkipList** |

pub mod levels;
pub mod list;
pub mod optimized;

pub use levels::{calculate_levels, LevelGenerator, DEFAULT_PROBABILITY, MAX_LEVELS};
pub use list::SkipList;
pub use optimized::OptimizedSkipList;

use serde::{Deserialize, Serialize};

/// Common contract of the skip list variants.
pub trait SortedIndex<T> {
    /// Insert `value`; duplicates are kept.
    fn insert(&mut self, value: T);

    /// Remove one occurrence of `value`. Returns `false` when absent.
    fn delete(&mut self, value: &T) -> bool;

    /// Whether a value comparing equal to `value` is stored.
    fn contains(&self, value: &T) -> bool;

    /// The stored value comparing equal to `value`.
    fn get(&self, value: &T) -> Option<&T>;

    /// Position of `value` in ascending order, or `None` when absent.
    fn index_of(&self, value: &T) -> Option<usize>;

    /// Number of stored values.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending snapshot of the stored values.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone;
}

/// Skip list construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipListConfig {
    /// Cap on tower height (header height).
    pub max_levels: usize,
    /// Probability of promoting a node one more level.
    pub probability: f64,
    /// Seed for tower heights; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_levels: MAX_LEVELS,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl SkipListConfig {
    /// Build the level generator this config describes.
    pub fn level_generator(&self) -> crate::Result<LevelGenerator> {
        LevelGenerator::from_seed_or_entropy(self.seed, self.max_levels, self.probability)
    }
}

/// Render per-level cells aligned by level-0 position.
///
/// `rows[level]` holds `(position, text)` for every node on that level.
/// Empty levels are skipped; the top level is printed first.
pub(crate) fn render_levels(rows: &[Vec<(usize, String)>], total: usize) -> String {
    let width = rows
        .iter()
        .flatten()
        .map(|(_, text)| text.chars().count())
        .max()
        .unwrap_or(1);

    let mut lines = Vec::new();
    for (level, row) in rows.iter().enumerate().rev() {
        if row.is_empty() {
            continue;
        }
        let mut cells = vec![" ".repeat(width); total];
        for (position, text) in row {
            if let Some(cell) = cells.get_mut(*position) {
                *cell = format!("{text:>width$}");
            }
        }
        lines.push(format!("{}:\t[{}]", level + 1, cells.join(" ")));
    }
    lines.join("\n")
}
