//! Navigable Small World (NSW) graph over 2D points.
//!
//! A single-layer proximity graph built incrementally. Each insertion runs a
//! greedy walk from the entry point (the first node ever inserted) towards the
//! new point, stops at a local optimum, and links the new node to the `k`
//! closest candidates seen during the walk. Queries run the same walk and
//! return the local optimum plus the next-closest candidates.
//!
//! Results are approximate: the walk never backtracks past a local minimum.
//!
//! # Feature Flag
//!
//! Requires the `nsw` feature (on by default).
//!
//! # Quick Start
//!
//! ```rust
//! use strata::nsw::{GraphNode, NavigableSmallWorld, NswParams, SearchStep};
//!
//! let mut nsw = NavigableSmallWorld::new(NswParams { k: 2 })?;
//! for (id, v) in [(1, [1.0, 1.0]), (2, [2.0, 2.0]), (3, [10.0, 5.0])] {
//!     nsw.add_node(GraphNode::new(id, v));
//! }
//!
//! let hits = nsw.search_similar_nodes([9.0, 5.0], 2);
//! assert_eq!(hits[0].id, 3);
//!
//! // Same search, one event at a time (e.g. to animate it).
//! let mut steps = nsw.search_steps([9.0, 5.0], 2);
//! while let Some(step) = steps.step() {
//!     if let SearchStep::Done(nodes) = step {
//!         assert_eq!(nodes, hits);
//!     }
//! }
//! # Ok::<(), strata::StrataError>(())
//! ```
//!
//! # Modules
//!
//! - [`node`]: [`GraphNode`], an id plus a 2D vector.
//! - [`graph`]: [`UndirectedGraph`], symmetric adjacency with JSON round trip.
//! - [`search`]: the greedy walk, including the stepwise [`SearchSteps`].
//! - [`construction`]: [`NavigableSmallWorld`] and [`NswParams`].

pub mod construction;
pub mod graph;
pub mod node;
pub mod search;

pub use construction::{NavigableSmallWorld, NswParams};
pub use graph::UndirectedGraph;
pub use node::GraphNode;
pub use search::{Neighbor, SearchStep, SearchSteps};
