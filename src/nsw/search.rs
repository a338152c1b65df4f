//! Greedy best-first search over an [`UndirectedGraph`].
//!
//! The walk starts at the graph's first-registered node and always expands the
//! closest candidate seen so far. It stops at the first node none of whose
//! unvisited neighbors is strictly closer to the query (a local minimum), so
//! results are approximate.

use super::graph::UndirectedGraph;
use super::node::GraphNode;
use crate::compare::Comparator;
use crate::distance::euclidean;
use crate::queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A node paired with its distance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub node: GraphNode,
    pub distance: f32,
}

/// Closest first; equal distances fall back to node id so order is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ByDistance;

impl Comparator<Neighbor> for ByDistance {
    fn compare(&self, a: &Neighbor, b: &Neighbor) -> Ordering {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.node.id.cmp(&b.node.id))
    }
}

pub(crate) type CandidateQueue = PriorityQueue<Neighbor, ByDistance>;

/// Candidate queue and visited set seeded with the entry point.
///
/// Both are empty when the graph is.
pub(crate) fn seed(graph: &UndirectedGraph, target: &[f32; 2]) -> (CandidateQueue, HashSet<u32>) {
    let mut queue = PriorityQueue::with_comparator(ByDistance);
    let mut visited = HashSet::new();
    if let Some(start) = graph.start_node() {
        queue.push(Neighbor {
            node: *start,
            distance: euclidean(target, &start.vector),
        });
        visited.insert(start.id);
    }
    (queue, visited)
}

/// Push every unvisited neighbor of `current`.
///
/// Returns `true` if at least one of them is strictly closer to `target` than
/// `current` is.
pub(crate) fn expand(
    graph: &UndirectedGraph,
    target: &[f32; 2],
    current: &Neighbor,
    queue: &mut CandidateQueue,
    visited: &mut HashSet<u32>,
) -> bool {
    let mut improved = false;
    for neighbor in graph.adjacent(current.node.id) {
        if !visited.insert(neighbor.id) {
            continue;
        }
        let distance = euclidean(target, &neighbor.vector);
        log::trace!(
            "distance from {:?} to node {} is {}",
            target,
            neighbor.id,
            distance
        );
        if distance < current.distance {
            improved = true;
        }
        queue.push(Neighbor {
            node: *neighbor,
            distance,
        });
    }
    improved
}

/// One event of a stepwise search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStep {
    /// The search popped `node` and is about to look at its neighbors.
    Visit { node: GraphNode, distance: f32 },
    /// The search finished; same nodes `search_similar_nodes` returns.
    Done(Vec<GraphNode>),
}

/// Stepwise form of the greedy search.
///
/// Each [`step`](Self::step) does one unit of work: it either pops the next
/// candidate (reported as [`SearchStep::Visit`]) or expands the last one popped,
/// which may end the search ([`SearchStep::Done`]). After `Done`, `step` returns
/// `None`. Dropping the value cancels the search.
///
/// The graph is borrowed for the lifetime of the search, so it cannot change
/// underneath it.
///
/// As an [`Iterator`] it yields the visited nodes in order.
#[derive(Debug)]
pub struct SearchSteps<'g> {
    graph: &'g UndirectedGraph,
    query: [f32; 2],
    k: usize,
    queue: CandidateQueue,
    visited: HashSet<u32>,
    /// Popped but not yet expanded.
    current: Option<Neighbor>,
    result: Option<Vec<Neighbor>>,
    finished: bool,
}

impl<'g> SearchSteps<'g> {
    pub(crate) fn new(graph: &'g UndirectedGraph, query: [f32; 2], k: usize) -> Self {
        let (queue, visited) = seed(graph, &query);
        Self {
            graph,
            query,
            k,
            queue,
            visited,
            current: None,
            result: None,
            finished: false,
        }
    }

    pub fn query(&self) -> [f32; 2] {
        self.query
    }

    /// Advance the search by one event.
    pub fn step(&mut self) -> Option<SearchStep> {
        if self.finished {
            return None;
        }

        if let Some(current) = self.current.take() {
            let graph = self.graph;
            let improved = expand(
                graph,
                &self.query,
                &current,
                &mut self.queue,
                &mut self.visited,
            );
            if !improved {
                log::debug!(
                    "no neighbor of node {} is closer, stopping search",
                    current.node.id
                );
                let result = self.collect_result(current);
                return Some(self.finish(result));
            }
        }

        match self.queue.pop() {
            Some(next) => {
                log::trace!("visiting node {} at distance {}", next.node.id, next.distance);
                self.current = Some(next);
                Some(SearchStep::Visit {
                    node: next.node,
                    distance: next.distance,
                })
            }
            None => Some(self.finish(Vec::new())),
        }
    }

    /// Final neighbors, closest first, once the search has finished.
    pub fn result(&self) -> Option<&[Neighbor]> {
        self.result.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drive the search to completion and return its neighbors.
    pub fn into_result(mut self) -> Vec<Neighbor> {
        while self.step().is_some() {}
        self.result.unwrap_or_default()
    }

    fn collect_result(&mut self, current: Neighbor) -> Vec<Neighbor> {
        if self.k == 0 {
            return Vec::new();
        }
        let mut result = Vec::with_capacity(self.k);
        result.push(current);
        result.extend(self.queue.pop_n(self.k - 1));
        log::debug!(
            "closest nodes: {:?}",
            result
                .iter()
                .map(|n| (n.node.id, n.distance))
                .collect::<Vec<_>>()
        );
        result
    }

    fn finish(&mut self, result: Vec<Neighbor>) -> SearchStep {
        let nodes = result.iter().map(|n| n.node).collect();
        self.result = Some(result);
        self.finished = true;
        SearchStep::Done(nodes)
    }
}

impl Iterator for SearchSteps<'_> {
    type Item = GraphNode;

    fn next(&mut self) -> Option<GraphNode> {
        loop {
            match self.step()? {
                SearchStep::Visit { node, .. } => return Some(node),
                SearchStep::Done(_) => continue,
            }
        }
    }
}
