//! # Graph Builder
//!
//! Recursively expands a root pool into a [`PoolGraph`].
//!
//! ## Algorithm
//!
//! Each address is looked up in the pool repository:
//!
//! - **Not a pool**: the address is a token of its parent pool and becomes an input leaf
//!   (decimals read from the parent's token list)
//! - **Linear pool**: delegated to [`linear`](super::linear), one child subtree
//! - **Any other pool**: every non-BPT token is expanded in declared order, carrying
//!   `balance * 1e18 / total * proportion / 1e18` of the amount
//!
//! Indices are assigned in pre-order and threaded through the recursion, so siblings are
//! expanded one after another. A failed lookup anywhere aborts the whole build.

use ethers::types::{Address, U256};
use futures::future::{BoxFuture, FutureExt};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::actions;
use super::error::PoolGraphError;
use super::linear::expand_linear_pool;
use super::nodes::{Node, NodeId, NodeKind};
use super::PoolGraph;
use crate::normalization::{mul_down, one, parse_balance, proportion_of};
use crate::pool_repository::{PoolRepository, SpotPriceSource};
use crate::pools::PoolRecord;

/// Builds pool graphs from a pool repository and a spot price source.
///
/// # Example
///
/// ```rust,no_run
/// use pool_graph_sdk::cache::{InMemoryPoolRepository, StaticSpotPrices};
/// use pool_graph_sdk::pool_graph::GraphBuilder;
///
/// # async fn run(pools: InMemoryPoolRepository) -> anyhow::Result<()> {
/// let builder = GraphBuilder::new(pools, StaticSpotPrices::with_fallback("1"));
/// let graph = builder.build_root("0x01", false).await?;
/// for node in graph.resolve(&graph.order_by_bfs()) {
///     println!("{} {:?}", node.index, node.address);
/// }
/// # Ok(())
/// # }
/// ```
pub struct GraphBuilder<R, P> {
    pools: R,
    prices: P,
}

impl<R, P> GraphBuilder<R, P>
where
    R: PoolRepository,
    P: SpotPriceSource,
{
    pub fn new(pools: R, prices: P) -> Self {
        Self { pools, prices }
    }

    /// Builds the graph rooted at pool `pool_id`.
    pub async fn build_root(
        &self,
        pool_id: &str,
        wrap_main_tokens: bool,
    ) -> Result<PoolGraph, PoolGraphError> {
        let root_pool = self
            .find_by_id(pool_id)
            .await
            .ok_or_else(|| PoolGraphError::PoolNotFound(pool_id.to_string()))?;

        let mut graph = PoolGraph::empty();
        let (root, next_index) = self
            .expand(&mut graph, root_pool.address, 0, None, one(), wrap_main_tokens)
            .await?;
        graph.set_root(root);

        info!(
            "Built graph for pool {}: {} nodes (next index {}), wrap_main_tokens={}",
            pool_id,
            graph.len(),
            next_index,
            wrap_main_tokens
        );
        Ok(graph)
    }

    /// Builds the graph and returns it with its processing order: BFS (root first) for
    /// exits, reversed BFS (leaves first, root last) for joins.
    pub async fn graph_nodes(
        &self,
        is_join: bool,
        pool_id: &str,
        wrap_main_tokens: bool,
    ) -> Result<(PoolGraph, Vec<NodeId>), PoolGraphError> {
        let graph = self.build_root(pool_id, wrap_main_tokens).await?;
        let root_matches = graph
            .root()
            .id
            .as_deref()
            .map_or(false, |id| id.eq_ignore_ascii_case(pool_id));
        if !root_matches {
            return Err(PoolGraphError::PoolNotFound(pool_id.to_string()));
        }

        let mut ordered = graph.order_by_bfs();
        if is_join {
            ordered.reverse();
        }
        Ok((graph, ordered))
    }

    fn expand<'a>(
        &'a self,
        graph: &'a mut PoolGraph,
        address: Address,
        index: usize,
        parent: Option<NodeId>,
        proportion_of_parent: U256,
        wrap_main_tokens: bool,
    ) -> BoxFuture<'a, Result<(NodeId, usize), PoolGraphError>> {
        async move {
            let Some(pool) = self.find_by_address(address).await else {
                return self
                    .create_leaf(graph, address, index, parent, proportion_of_parent)
                    .await;
            };

            let (pool_type, join_action, exit_action) = actions::resolve(&pool.pool_type)
                .ok_or_else(|| PoolGraphError::UnsupportedPoolType {
                    pool_id: pool.id.clone(),
                    pool_type: pool.pool_type.clone(),
                })?;

            let token_total = token_total(&pool)?;
            let spot_prices = self.spot_prices(&pool)?;

            let node_id = graph.push(Node {
                address: pool.address,
                id: Some(pool.id.clone()),
                kind: NodeKind::Pool(pool_type),
                join_action,
                exit_action,
                children: Vec::new(),
                parent,
                proportion_of_parent,
                is_leaf: false,
                is_proportional_exit: actions::supports_proportional_exit(
                    pool_type,
                    pool.pool_type_version,
                ),
                spot_prices,
                decimals: pool.token_decimals(pool.address),
                index,
            });
            let mut next_index = index + 1;

            debug!(
                "Node {} {:?} pool {} ({}) proportion {}",
                index, pool.address, pool.id, pool_type, proportion_of_parent
            );

            if pool.is_linear() {
                next_index = expand_linear_pool(
                    graph,
                    node_id,
                    pool_type,
                    next_index,
                    &pool,
                    wrap_main_tokens,
                )?;
                return Ok((node_id, next_index));
            }

            for token in pool.non_bpt_tokens() {
                let balance = parse_token_balance(&pool, &token.address, &token.balance)?;
                let child_proportion = proportion_of(balance, token_total).ok_or_else(|| {
                    PoolGraphError::ZeroLiquidity {
                        pool_id: pool.id.clone(),
                    }
                })?;
                let final_proportion = mul_down(child_proportion, proportion_of_parent);

                let (child, after_child) = self
                    .expand(
                        graph,
                        token.address,
                        next_index,
                        Some(node_id),
                        final_proportion,
                        wrap_main_tokens,
                    )
                    .await?;
                graph.node_mut(node_id).children.push(child);
                next_index = after_child;
            }

            Ok((node_id, next_index))
        }
        .boxed()
    }

    /// Base case: `address` is not a pool, so it is a token of the parent pool.
    async fn create_leaf(
        &self,
        graph: &mut PoolGraph,
        address: Address,
        index: usize,
        parent: Option<NodeId>,
        proportion_of_parent: U256,
    ) -> Result<(NodeId, usize), PoolGraphError> {
        let Some(parent_id) = parent else {
            return Err(PoolGraphError::PoolNotFound(format!("{:?}", address)));
        };
        let parent_address = graph[parent_id].address;
        let parent_pool = self
            .find_by_address(parent_address)
            .await
            .ok_or_else(|| PoolGraphError::PoolNotFound(format!("{:?}", parent_address)))?;

        let (node, next_index) = Node::input(
            index,
            address,
            parent_pool.token_decimals(address),
            parent,
            proportion_of_parent,
        );
        debug!("Node {} {:?} input, proportion {}", index, address, proportion_of_parent);
        Ok((graph.push(node), next_index))
    }

    fn spot_prices(&self, pool: &PoolRecord) -> Result<HashMap<Address, Decimal>, PoolGraphError> {
        pool.non_bpt_tokens()
            .map(|token| {
                let raw = self
                    .prices
                    .spot_price(pool, token.address, pool.address)
                    .map_err(|e| PoolGraphError::SpotPrice {
                        pool_id: pool.id.clone(),
                        token: token.address,
                        reason: e.to_string(),
                    })?;
                let price = parse_decimal(&raw).ok_or_else(|| PoolGraphError::SpotPrice {
                    pool_id: pool.id.clone(),
                    token: token.address,
                    reason: format!("not a decimal: {:?}", raw),
                })?;
                Ok((token.address, price))
            })
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Option<PoolRecord> {
        match self.pools.find_by_id(id).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Pool lookup for id {} failed in {}: {}", id, self.pools.name(), e);
                None
            }
        }
    }

    async fn find_by_address(&self, address: Address) -> Option<PoolRecord> {
        match self.pools.find_by_address(address).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(
                    "Pool lookup for {:?} failed in {}: {}",
                    address,
                    self.pools.name(),
                    e
                );
                None
            }
        }
    }
}

/// Sum of the pool's balances at 18 decimals, phantom BPT excluded.
fn token_total(pool: &PoolRecord) -> Result<U256, PoolGraphError> {
    pool.non_bpt_tokens().try_fold(U256::zero(), |total, token| {
        let balance = parse_token_balance(pool, &token.address, &token.balance)?;
        Ok(total.saturating_add(balance))
    })
}

fn parse_token_balance(
    pool: &PoolRecord,
    token: &Address,
    balance: &str,
) -> Result<U256, PoolGraphError> {
    parse_balance(balance).ok_or_else(|| PoolGraphError::InvalidBalance {
        pool_id: pool.id.clone(),
        token: *token,
        balance: balance.to_string(),
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
