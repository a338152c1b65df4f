//! Undirected adjacency storage.
//!
//! Every edge is recorded on both endpoints, so `has_edge(a, b)` only needs to
//! look at `a`. Nodes are remembered in registration order; the first one
//! registered is where searches start.
//!
//! # JSON layout
//!
//! ```text
//! {
//!   "1": {"node": {"id": 1, "vector": [1.0, 1.0]},
//!         "neighbors": [{"id": 2, "vector": [2.0, 2.0]}]},
//!   "2": {"node": {"id": 2, "vector": [2.0, 2.0]},
//!         "neighbors": [{"id": 1, "vector": [1.0, 1.0]}]}
//! }
//! ```
//!
//! Entries are written in registration order and read back in document order.

use super::node::GraphNode;
use crate::error::{Result, StrataError};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
struct Entry {
    node: GraphNode,
    /// Slots of adjacent entries, in the order the edges were added.
    neighbors: SmallVec<[usize; 8]>,
}

/// Undirected graph keyed by node id. No self-loops, no parallel edges.
#[derive(Debug, Clone, Default)]
pub struct UndirectedGraph {
    entries: Vec<Entry>,
    index: HashMap<u32, usize>,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node`. Returns `false` (and keeps the stored node) if its id is taken.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        self.slot_or_insert(node).1
    }

    /// Connect `a` and `b`, registering either if needed.
    ///
    /// Returns `true` when a new edge was recorded; self-loops and existing
    /// edges are ignored.
    pub fn add_edge(&mut self, a: &GraphNode, b: &GraphNode) -> bool {
        let (sa, _) = self.slot_or_insert(*a);
        let (sb, _) = self.slot_or_insert(*b);
        if sa == sb || self.entries[sa].neighbors.contains(&sb) {
            return false;
        }
        self.entries[sa].neighbors.push(sb);
        self.entries[sb].neighbors.push(sa);
        true
    }

    /// Whether `a` and `b` share an edge. `false` when `a` is not registered.
    pub fn has_edge(&self, a: &GraphNode, b: &GraphNode) -> bool {
        match (self.index.get(&a.id), self.index.get(&b.id)) {
            (Some(&sa), Some(sb)) => self.entries[sa].neighbors.contains(sb),
            _ => false,
        }
    }

    /// Neighbors of `node`, in edge insertion order.
    ///
    /// Asking about a node that was never registered is a caller bug and
    /// reports [`StrataError::MissingNode`].
    pub fn get_neighbors_for_node(&self, node: &GraphNode) -> Result<Vec<GraphNode>> {
        let slot = self
            .index
            .get(&node.id)
            .ok_or(StrataError::MissingNode(node.id))?;
        Ok(self.entries[*slot]
            .neighbors
            .iter()
            .map(|&n| self.entries[n].node)
            .collect())
    }

    /// Neighbors of the node with `id`; empty when the id is unknown.
    pub(crate) fn adjacent(&self, id: u32) -> impl Iterator<Item = &GraphNode> + '_ {
        self.index.get(&id).into_iter().flat_map(move |&slot| {
            self.entries[slot]
                .neighbors
                .iter()
                .map(move |&n| &self.entries[n].node)
        })
    }

    /// The stored node with `id`.
    pub fn get_node(&self, id: u32) -> Option<&GraphNode> {
        self.index.get(&id).map(|&slot| &self.entries[slot].node)
    }

    /// First registered node: the entry point for traversals.
    pub fn start_node(&self) -> Option<&GraphNode> {
        self.entries.first().map(|entry| &entry.node)
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.entries.iter().map(|entry| &entry.node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|e| e.neighbors.len()).sum::<usize>() / 2
    }

    /// Number of neighbors of the node with `id`.
    pub fn degree(&self, id: u32) -> Option<usize> {
        self.index
            .get(&id)
            .map(|&slot| self.entries[slot].neighbors.len())
    }

    /// One line per node: `Node 1: 2, 7`.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let ids: Vec<String> = entry
                .neighbors
                .iter()
                .map(|&n| self.entries[n].node.id.to_string())
                .collect();
            if ids.is_empty() {
                out.push_str(&format!("Node {}:\n", entry.node.id));
            } else {
                out.push_str(&format!("Node {}: {}\n", entry.node.id, ids.join(", ")));
            }
        }
        out
    }

    /// Compact JSON encoding (see the module docs for the layout).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON encoding.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a graph from [`to_json`](Self::to_json) output.
    ///
    /// Malformed JSON reports [`StrataError::Serialization`]; JSON that does not
    /// describe a symmetric graph (key/id mismatch, duplicate entries, a neighbor
    /// without an entry, a one-sided edge) reports [`StrataError::Format`].
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Self::from_entries(raw.0)
    }

    fn slot_or_insert(&mut self, node: GraphNode) -> (usize, bool) {
        if let Some(&slot) = self.index.get(&node.id) {
            return (slot, false);
        }
        let slot = self.entries.len();
        self.entries.push(Entry {
            node,
            neighbors: SmallVec::new(),
        });
        self.index.insert(node.id, slot);
        (slot, true)
    }

    fn from_entries(raw: Vec<(String, EntryRepr)>) -> Result<Self> {
        let mut graph = Self::new();
        for (key, entry) in &raw {
            if key.parse::<u32>().ok() != Some(entry.node.id) {
                return Err(StrataError::Format(format!(
                    "entry key {key:?} does not match node id {}",
                    entry.node.id
                )));
            }
            if !graph.add_node(entry.node) {
                return Err(StrataError::Format(format!(
                    "node {} has more than one entry",
                    entry.node.id
                )));
            }
        }

        for (slot, (_, entry)) in raw.iter().enumerate() {
            for neighbor in &entry.neighbors {
                let Some(&other) = graph.index.get(&neighbor.id) else {
                    return Err(StrataError::Format(format!(
                        "neighbor {} of node {} has no entry",
                        neighbor.id, entry.node.id
                    )));
                };
                if other == slot {
                    return Err(StrataError::Format(format!(
                        "node {} lists itself as a neighbor",
                        entry.node.id
                    )));
                }
                if !graph.entries[slot].neighbors.contains(&other) {
                    graph.entries[slot].neighbors.push(other);
                }
            }
        }

        for (slot, entry) in graph.entries.iter().enumerate() {
            if let Some(&other) = entry
                .neighbors
                .iter()
                .find(|&&other| !graph.entries[other].neighbors.contains(&slot))
            {
                return Err(StrataError::Format(format!(
                    "edge {}-{} is only recorded on one side",
                    entry.node.id, graph.entries[other].node.id
                )));
            }
        }

        Ok(graph)
    }
}

/// Wire form of one adjacency entry.
#[derive(Serialize, Deserialize)]
struct EntryRepr {
    node: GraphNode,
    neighbors: Vec<GraphNode>,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    node: &'a GraphNode,
    neighbors: Vec<&'a GraphNode>,
}

impl Serialize for UndirectedGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let repr = EntryRef {
                node: &entry.node,
                neighbors: entry
                    .neighbors
                    .iter()
                    .map(|&n| &self.entries[n].node)
                    .collect(),
            };
            map.serialize_entry(&entry.node.id.to_string(), &repr)?;
        }
        map.end()
    }
}

/// Entries in document order (a `HashMap` or `BTreeMap` would lose it).
struct RawGraph(Vec<(String, EntryRepr)>);

impl<'de> Deserialize<'de> for RawGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RawGraphVisitor;

        impl<'de> Visitor<'de> for RawGraphVisitor {
            type Value = RawGraph;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from node id to adjacency entry")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawGraph, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, EntryRepr>()? {
                    entries.push((key, entry));
                }
                Ok(RawGraph(entries))
            }
        }

        deserializer.deserialize_map(RawGraphVisitor)
    }
}

impl<'de> Deserialize<'de> for UndirectedGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawGraph::deserialize(deserializer)?;
        Self::from_entries(raw.0).map_err(de::Error::custom)
    }
}
