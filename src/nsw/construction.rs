//! Incremental NSW construction and the query entry points.

use super::graph::UndirectedGraph;
use super::node::GraphNode;
use super::search::{expand, seed, Neighbor, SearchSteps};
use crate::error::{Result, StrataError};
use serde::{Deserialize, Serialize};

/// NSW parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NswParams {
    /// Edges added per insertion (fewer when fewer candidates were seen).
    pub k: usize,
}

impl Default for NswParams {
    fn default() -> Self {
        Self { k: 2 }
    }
}

impl NswParams {
    fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(StrataError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Navigable Small World graph over 2D points.
///
/// Nodes are inserted one at a time: a greedy walk from the entry point finds a
/// local optimum for the new point, and the new node is linked to the `k`
/// closest candidates seen on the way.
///
/// ```rust
/// use strata::nsw::{GraphNode, NavigableSmallWorld};
///
/// let mut nsw = NavigableSmallWorld::with_k(1)?;
/// nsw.add_node(GraphNode::new(1, [0.0, 0.0]));
/// nsw.add_node(GraphNode::new(2, [10.0, 10.0]));
///
/// let hits = nsw.search_similar_nodes([9.0, 9.0], 1);
/// assert_eq!(hits[0].id, 2);
/// # Ok::<(), strata::StrataError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigableSmallWorld {
    params: NswParams,
    graph: UndirectedGraph,
}

impl NavigableSmallWorld {
    pub fn new(params: NswParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            graph: UndirectedGraph::new(),
        })
    }

    pub fn with_k(k: usize) -> Result<Self> {
        Self::new(NswParams { k })
    }

    /// Continue building on an existing graph, e.g. one read back with
    /// [`UndirectedGraph::from_json`].
    pub fn from_graph(graph: UndirectedGraph, params: NswParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, graph })
    }

    /// Insert `node` and connect it to up to `k` nearby nodes.
    ///
    /// Returns the stored node. If the id is already present nothing changes
    /// and the existing node is returned.
    pub fn add_node(&mut self, node: GraphNode) -> GraphNode {
        if let Some(existing) = self.graph.get_node(node.id) {
            log::warn!("node {} is already in the graph, ignoring", node.id);
            return *existing;
        }
        log::debug!("adding node {} to the graph", node.id);

        let (mut queue, mut visited) = seed(&self.graph, &node.vector);
        // The queue only grows inside the loop, so it is empty only for an empty graph.
        while let Some(&current) = queue.peek() {
            if expand(&self.graph, &node.vector, &current, &mut queue, &mut visited) {
                continue;
            }
            let closest = queue.pop_n(self.params.k);
            log::debug!(
                "inserting node {} at node {} with neighbors {:?}",
                node.id,
                current.node.id,
                closest.iter().map(|n| n.node.id).collect::<Vec<_>>()
            );
            self.graph.add_node(node);
            for neighbor in &closest {
                self.graph.add_edge(&node, &neighbor.node);
            }
            return node;
        }

        log::debug!("graph is empty, node {} becomes the entry point", node.id);
        self.graph.add_node(node);
        node
    }

    /// Approximate `k` nearest nodes to `query`, closest first.
    ///
    /// Empty for an empty graph or `k == 0`.
    pub fn search_similar_nodes(&self, query: [f32; 2], k: usize) -> Vec<GraphNode> {
        self.search_with_distances(query, k)
            .into_iter()
            .map(|n| n.node)
            .collect()
    }

    /// Like [`search_similar_nodes`](Self::search_similar_nodes), with distances.
    pub fn search_with_distances(&self, query: [f32; 2], k: usize) -> Vec<Neighbor> {
        self.search_steps(query, k).into_result()
    }

    /// The same search, one hop at a time.
    pub fn search_steps(&self, query: [f32; 2], k: usize) -> SearchSteps<'_> {
        SearchSteps::new(&self.graph, query, k)
    }

    pub fn graph(&self) -> &UndirectedGraph {
        &self.graph
    }

    /// Give up the index and keep the graph.
    pub fn into_graph(self) -> UndirectedGraph {
        self.graph
    }

    pub fn k(&self) -> usize {
        self.params.k
    }

    pub fn params(&self) -> NswParams {
        self.params
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Indented JSON of the underlying graph.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.graph.to_json_pretty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u32, x: f32, y: f32) -> GraphNode {
        GraphNode::new(id, [x, y])
    }

    #[test]
    fn rejects_zero_k() {
        assert!(matches!(
            NavigableSmallWorld::with_k(0),
            Err(StrataError::InvalidParameter(_))
        ));
    }

    #[test]
    fn default_params() {
        assert_eq!(NswParams::default().k, 2);
        let params: NswParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.k, 2);
    }

    #[test]
    fn first_node_has_no_edges() {
        let mut nsw = NavigableSmallWorld::with_k(2).unwrap();
        assert_eq!(nsw.add_node(n(1, 1.0, 1.0)), n(1, 1.0, 1.0));
        assert_eq!(nsw.graph().degree(1), Some(0));
    }

    #[test]
    fn second_node_links_to_first() {
        let mut nsw = NavigableSmallWorld::with_k(2).unwrap();
        nsw.add_node(n(1, 1.0, 1.0));
        nsw.add_node(n(2, 2.0, 2.0));
        assert!(nsw.graph().has_edge(&n(1, 1.0, 1.0), &n(2, 2.0, 2.0)));
        assert_eq!(nsw.graph().edge_count(), 1);
    }

    #[test]
    fn duplicate_id_keeps_the_stored_node() {
        let mut nsw = NavigableSmallWorld::with_k(2).unwrap();
        nsw.add_node(n(1, 1.0, 1.0));
        nsw.add_node(n(2, 2.0, 2.0));
        assert_eq!(nsw.add_node(n(1, 9.0, 9.0)), n(1, 1.0, 1.0));
        assert_eq!(nsw.len(), 2);
        assert_eq!(nsw.graph().edge_count(), 1);
    }

    #[test]
    fn empty_search() {
        let nsw = NavigableSmallWorld::default();
        assert!(nsw.search_similar_nodes([0.0, 0.0], 3).is_empty());
    }

    #[test]
    fn distances_are_sorted() {
        let mut nsw = NavigableSmallWorld::with_k(3).unwrap();
        for (i, x) in [0.0, 1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            nsw.add_node(n(i as u32, x, 0.0));
        }
        let hits = nsw.search_with_distances([4.0, 0.0], 3);
        assert!(!hits.is_empty() && hits.len() <= 3);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(hits[0].node.id, 4);
    }

    #[test]
    fn resumes_from_deserialized_graph() {
        let mut nsw = NavigableSmallWorld::with_k(2).unwrap();
        nsw.add_node(n(1, 0.0, 0.0));
        nsw.add_node(n(2, 5.0, 5.0));
        let graph = UndirectedGraph::from_json(&nsw.to_json_pretty().unwrap()).unwrap();
        let mut resumed = NavigableSmallWorld::from_graph(graph, nsw.params()).unwrap();
        resumed.add_node(n(3, 6.0, 6.0));
        assert_eq!(resumed.len(), 3);
        assert!(resumed.graph().degree(3).unwrap() >= 1);
    }
}
