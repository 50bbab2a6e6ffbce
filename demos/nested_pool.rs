//! # Nested Pool Demo
//!
//! Builds the graph of a nested pool from a JSON pool set and prints its BFS order,
//! its leaf tokens and the root path of one input token.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example nested_pool -- demos/nested_pools.json <pool_id> <input_token>
//! ```
//!
//! `POOL_GRAPH__GRAPH__WRAP_MAIN_TOKENS=true` expands linear pools through their
//! wrapped token.

use anyhow::{Context, Result};
use pool_graph_sdk::cache::{InMemoryPoolRepository, StaticSpotPrices};
use pool_graph_sdk::fallback_repository::FallbackPoolRepository;
use pool_graph_sdk::pool_graph::{leaf_addresses, GraphBuilder};
use pool_graph_sdk::pool_repository::PoolRepository;
use pool_graph_sdk::Settings;
use std::sync::Arc;

const DEFAULT_POOL_ID: &str = "0x08775ccb6674d6bdceb0797c364c2653ed84f3840002000000000000000004f0";
const DEFAULT_INPUT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

#[cfg(feature = "observability")]
fn init_logging() {
    tracing_subscriber::fmt().json().init();
}

#[cfg(not(feature = "observability"))]
fn init_logging() {
    env_logger::init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let settings = Settings::new().context("Failed to load settings")?;
    let mut args = std::env::args().skip(1);
    let pools_path = args.next().unwrap_or_else(|| "demos/nested_pools.json".to_string());
    let pool_id = args.next().unwrap_or_else(|| DEFAULT_POOL_ID.to_string());
    let input_token = args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string());

    let json = std::fs::read_to_string(&pools_path)
        .with_context(|| format!("Failed to read {}", pools_path))?;
    let memory: Arc<dyn PoolRepository> = Arc::new(InMemoryPoolRepository::from_json(&json)?);
    let pools = FallbackPoolRepository::from_settings(vec![memory], &settings.lookup);

    let builder = GraphBuilder::new(pools, StaticSpotPrices::with_fallback("1"));
    let wrap = settings.graph.wrap_main_tokens;

    let (graph, exit_order) = builder.graph_nodes(false, &pool_id, wrap).await?;
    println!("Exit order ({} nodes, wrap_main_tokens={}):", exit_order.len(), wrap);
    for node in graph.resolve(&exit_order) {
        println!(
            "  [{}] {:?} {:?} join={:?} exit={:?} proportion={}",
            node.index,
            node.kind,
            node.address,
            node.join_action,
            node.exit_action,
            node.proportion_of_parent
        );
    }

    println!("Leaves:");
    for address in leaf_addresses(graph.resolve(&exit_order)) {
        println!("  {:?}", address);
    }

    let path = graph.root_path(&exit_order, &input_token, graph.len())?;
    println!("Root path for {}:", input_token);
    for node in path.nodes() {
        println!(
            "  [{}] {:?} {:?} proportion={}",
            node.index, node.kind, node.address, node.proportion_of_parent
        );
    }

    Ok(())
}
