//! End-to-end tests for NSW construction, search, and graph serialization.

#![cfg(feature = "nsw")]

use std::collections::{BTreeSet, HashSet, VecDeque};
use strata::nsw::{GraphNode, NavigableSmallWorld, SearchStep, UndirectedGraph};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_points() -> Vec<GraphNode> {
    [
        (1, [1.0, 1.0]),
        (2, [2.0, 2.0]),
        (3, [3.0, 3.0]),
        (4, [1.0, 4.0]),
        (5, [2.0, 5.0]),
        (6, [10.0, 5.0]),
        (7, [1.0, 2.0]),
    ]
    .into_iter()
    .map(|(id, v)| GraphNode::new(id, v))
    .collect()
}

fn build(points: &[GraphNode], k: usize) -> NavigableSmallWorld {
    let mut nsw = NavigableSmallWorld::with_k(k).expect("valid k");
    for &p in points {
        nsw.add_node(p);
    }
    nsw
}

fn reachable_from(graph: &UndirectedGraph, start: &GraphNode) -> HashSet<u32> {
    let mut seen = HashSet::from([start.id]);
    let mut frontier = VecDeque::from([*start]);
    while let Some(node) = frontier.pop_front() {
        for neighbor in graph.get_neighbors_for_node(&node).expect("registered") {
            if seen.insert(neighbor.id) {
                frontier.push_back(neighbor);
            }
        }
    }
    seen
}

fn neighbor_ids(graph: &UndirectedGraph, node: &GraphNode) -> BTreeSet<u32> {
    graph
        .get_neighbors_for_node(node)
        .expect("registered")
        .iter()
        .map(|n| n.id)
        .collect()
}

#[test]
fn build_stays_connected_with_bounded_fanout() {
    init_logger();
    let points = sample_points();
    let mut nsw = NavigableSmallWorld::with_k(2).unwrap();
    for &p in &points {
        let before = nsw.graph().edge_count();
        nsw.add_node(p);
        let added = nsw.graph().edge_count() - before;
        assert!(added <= 2, "node {} added {} edges", p.id, added);
    }

    let graph = nsw.graph();
    assert_eq!(graph.len(), 7);
    assert_eq!(graph.edge_count(), 11);
    let start = graph.start_node().expect("non-empty");
    assert_eq!(start.id, 1);
    assert_eq!(reachable_from(graph, start).len(), 7);
}

#[test]
fn search_finds_the_far_cluster() {
    init_logger();
    let nsw = build(&sample_points(), 2);
    let ids: Vec<u32> = nsw
        .search_similar_nodes([10.0, 5.0], 4)
        .iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![6, 5, 2, 4]);
}

#[test]
fn single_node_graph() {
    let nsw = build(&[GraphNode::new(1, [1.0, 1.0])], 2);
    assert_eq!(
        nsw.search_similar_nodes([5.0, 5.0], 3),
        vec![GraphNode::new(1, [1.0, 1.0])]
    );
}

#[test]
fn k1_picks_the_closer_point() {
    let nsw = build(
        &[GraphNode::new(1, [0.0, 0.0]), GraphNode::new(2, [10.0, 10.0])],
        1,
    );
    assert_eq!(
        nsw.search_similar_nodes([9.0, 9.0], 1),
        vec![GraphNode::new(2, [10.0, 10.0])]
    );
}

#[test]
fn stepwise_search_matches_direct_search() {
    init_logger();
    let nsw = build(&sample_points(), 2);
    let direct = nsw.search_similar_nodes([10.0, 5.0], 4);

    let mut steps = nsw.search_steps([10.0, 5.0], 4);
    let mut visited = Vec::new();
    let mut done = None;
    while let Some(step) = steps.step() {
        match step {
            SearchStep::Visit { node, distance } => {
                assert!(distance >= 0.0);
                visited.push(node.id);
            }
            SearchStep::Done(nodes) => done = Some(nodes),
        }
    }
    assert_eq!(visited, vec![1, 3, 6]);
    assert_eq!(done, Some(direct));
    assert_eq!(steps.step(), None);
}

#[test]
fn every_query_point_agrees_with_its_steps() {
    let nsw = build(&sample_points(), 2);
    for x in 0..12 {
        for y in 0..7 {
            let query = [x as f32, y as f32];
            let direct = nsw.search_similar_nodes(query, 3);
            let stepped: Vec<GraphNode> = nsw
                .search_steps(query, 3)
                .into_result()
                .into_iter()
                .map(|n| n.node)
                .collect();
            assert_eq!(direct, stepped);
            assert!(!direct.is_empty() && direct.len() <= 3);
        }
    }
}

#[test]
fn graph_json_round_trip() {
    let nsw = build(&sample_points(), 2);
    let json = nsw.graph().to_json().unwrap();
    let back = UndirectedGraph::from_json(&json).unwrap();

    assert_eq!(back.len(), nsw.len());
    assert_eq!(back.start_node(), nsw.graph().start_node());
    for node in nsw.graph().nodes() {
        assert_eq!(neighbor_ids(&back, node), neighbor_ids(nsw.graph(), node));
    }
    assert_eq!(back.to_pretty_string(), nsw.graph().to_pretty_string());
}

#[test]
fn pretty_string_lines() {
    let nsw = build(&sample_points(), 2);
    let pretty = nsw.graph().to_pretty_string();
    let first = pretty.lines().next().unwrap();
    assert_eq!(first, "Node 1: 2, 3, 7");
    assert_eq!(pretty.lines().count(), 7);
}

#[test]
fn pretty_json_is_parseable() {
    let nsw = build(&sample_points(), 2);
    let json = nsw.to_json_pretty().unwrap();
    assert!(json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["6"]["node"]["vector"][0], 10.0);
}
