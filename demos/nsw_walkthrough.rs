//! Build a small NSW graph and watch a search walk through it.
//!
//! Run with logging to see insertion and search decisions:
//!
//! ```sh
//! RUST_LOG=strata=debug cargo run --example nsw_walkthrough
//! ```

use strata::nsw::{GraphNode, NavigableSmallWorld, NswParams, SearchStep};

fn main() -> strata::Result<()> {
    env_logger::init();

    let mut nsw = NavigableSmallWorld::new(NswParams { k: 2 })?;
    let points = [
        (1, [1.0, 1.0]),
        (2, [2.0, 2.0]),
        (3, [3.0, 3.0]),
        (4, [1.0, 4.0]),
        (5, [2.0, 5.0]),
        (6, [10.0, 5.0]),
        (7, [1.0, 2.0]),
    ];
    for (id, v) in points {
        nsw.add_node(GraphNode::new(id, v));
    }

    println!("Graph:");
    print!("{}", nsw.graph().to_pretty_string());

    let query = [10.0, 5.0];
    println!("\nSearching for the 4 nodes closest to {query:?}:");
    let mut steps = nsw.search_steps(query, 4);
    while let Some(step) = steps.step() {
        match step {
            SearchStep::Visit { node, distance } => {
                println!("  at node {} (distance {distance:.3})", node.id)
            }
            SearchStep::Done(nodes) => {
                let ids: Vec<u32> = nodes.iter().map(|n| n.id).collect();
                println!("  result: {ids:?}");
            }
        }
    }

    println!("\nJSON:\n{}", nsw.to_json_pretty()?);
    Ok(())
}
