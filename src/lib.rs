//! strata: skip lists and a Navigable Small World graph.
//!
//! Two families of search structures, both built from scratch on small,
//! inspectable primitives:
//!
//! - `skiplist/`: probabilistic ordered index, in node-tower and
//!   parallel-array (slot-recycling) forms
//! - `nsw/`: approximate nearest-neighbor graph over 2D points
//! - `queue`: binary min-heap with a pluggable [`Comparator`], used by NSW
//! - `compare`: the comparator trait shared by the skip lists and the queue
//!
//! # Critical Nuances
//!
//! ## Randomness is injected
//!
//! Skip list tower heights come from a [`skiplist::LevelGenerator`] owned by the
//! list. Seed it (`SkipList::with_seed`, `SkipListConfig::seed`) to make layouts
//! reproducible; otherwise it is seeded from OS entropy.
//!
//! ## NSW search is greedy
//!
//! Insertion and search both stop at the first local minimum reachable from the
//! entry point. On small or badly clustered inputs the result can miss the true
//! nearest neighbor. The graph only grows: there is no node removal.
//!
//! ## Logging
//!
//! NSW insertion and search report their decisions through the [`log`] facade
//! (`debug` for insertion points and stop conditions, `trace` per hop). Install
//! any logger, e.g. `env_logger`, to see them.

pub mod compare;
pub mod distance;
pub mod error;
pub mod queue;

#[cfg(feature = "skiplist")]
pub mod skiplist;

#[cfg(feature = "nsw")]
pub mod nsw;

// Re-exports
pub use compare::{Comparator, NaturalOrder, Reverse, TotalOrder};
pub use error::{Result, StrataError};
pub use queue::PriorityQueue;

#[cfg(feature = "skiplist")]
pub use skiplist::{OptimizedSkipList, SkipList, SkipListConfig, SortedIndex};

#[cfg(feature = "nsw")]
pub use nsw::{GraphNode, NavigableSmallWorld, NswParams, UndirectedGraph};
