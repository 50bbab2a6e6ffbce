//! Expansion of linear pools.
//!
//! A linear pool holds one main token and its yield-bearing wrapper. Depending on
//! `wrap_main_tokens` the pool gets either a wrapped-token node (which in turn holds
//! the main token) or the main token directly as its only child. Neither step splits
//! the proportion: the single child carries the linear pool's full share.

use ethers::types::U256;
use std::collections::HashMap;
use tracing::debug;

use super::actions::wrap_actions;
use super::error::PoolGraphError;
use super::nodes::{Node, NodeId, NodeKind};
use super::PoolGraph;
use crate::pools::{PoolRecord, PoolToken, PoolType, DEFAULT_DECIMALS};

/// Appends the single child subtree of `linear_node` and returns the next free index.
pub(crate) fn expand_linear_pool(
    graph: &mut PoolGraph,
    linear_node: NodeId,
    linear_type: PoolType,
    index: usize,
    pool: &PoolRecord,
    wrap_main_tokens: bool,
) -> Result<usize, PoolGraphError> {
    let proportion = graph[linear_node].proportion_of_parent;

    let (child, next_index) = if wrap_main_tokens {
        create_wrapped_token_node(graph, pool, linear_type, index, linear_node, proportion)?
    } else {
        let main = main_token(pool)?;
        let (node, next_index) = Node::input(
            index,
            main.address,
            main.decimals.unwrap_or(DEFAULT_DECIMALS),
            Some(linear_node),
            proportion,
        );
        (graph.push(node), next_index)
    };

    graph.node_mut(linear_node).children.push(child);
    Ok(next_index)
}

/// Creates the wrapped-token node of a linear pool together with its main-token leaf.
pub(crate) fn create_wrapped_token_node(
    graph: &mut PoolGraph,
    pool: &PoolRecord,
    linear_type: PoolType,
    index: usize,
    parent: NodeId,
    proportion_of_parent: U256,
) -> Result<(NodeId, usize), PoolGraphError> {
    let main = main_token(pool)?;
    let wrapped = pool
        .wrapped_token()
        .ok_or_else(|| PoolGraphError::MalformedLinearPool {
            pool_id: pool.id.clone(),
            missing: "wrapped",
        })?;
    let (join_action, exit_action) = wrap_actions(linear_type);

    debug!(
        "Wrapping {:?} as {:?} under linear pool {}",
        main.address, wrapped.address, pool.id
    );

    let wrapped_id = graph.push(Node {
        address: wrapped.address,
        id: None,
        kind: NodeKind::WrappedToken,
        join_action,
        exit_action,
        children: Vec::new(),
        parent: Some(parent),
        proportion_of_parent,
        is_leaf: false,
        is_proportional_exit: false,
        spot_prices: HashMap::new(),
        decimals: 18,
        index,
    });

    let (input, next_index) = Node::input(
        index + 1,
        main.address,
        main.decimals.unwrap_or(DEFAULT_DECIMALS),
        Some(wrapped_id),
        proportion_of_parent,
    );
    let input_id = graph.push(input);
    graph.node_mut(wrapped_id).children.push(input_id);

    Ok((wrapped_id, next_index))
}

fn main_token(pool: &PoolRecord) -> Result<&PoolToken, PoolGraphError> {
    pool.main_token()
        .ok_or_else(|| PoolGraphError::MalformedLinearPool {
            pool_id: pool.id.clone(),
            missing: "main",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::one;
    use crate::pool_graph::actions::{ExitAction, JoinAction};
    use ethers::types::Address;

    fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    fn linear_pool(
        pool_type: &str,
        main_index: Option<usize>,
        wrapped_index: Option<usize>,
    ) -> PoolRecord {
        PoolRecord {
            id: "0xlinear".to_string(),
            address: addr(0xaa),
            pool_type: pool_type.to_string(),
            pool_type_version: 1,
            tokens: vec![
                PoolToken { address: addr(0x01), balance: "100".into(), decimals: Some(6) },
                PoolToken { address: addr(0x02), balance: "50".into(), decimals: Some(6) },
                PoolToken {
                    address: addr(0xaa),
                    balance: "5192296858534827".into(),
                    decimals: Some(18),
                },
            ],
            main_index,
            wrapped_index,
        }
    }

    fn graph_with_linear_node(proportion: U256) -> (PoolGraph, NodeId) {
        let mut graph = PoolGraph::empty();
        let (mut node, _) = Node::input(0, addr(0xaa), 18, None, proportion);
        node.kind = NodeKind::Pool(PoolType::AaveLinear);
        node.is_leaf = false;
        let id = graph.push(node);
        graph.set_root(id);
        (graph, id)
    }

    #[test]
    fn test_wrapped_expansion_keeps_proportion() {
        let half = one() / 2;
        let (mut graph, linear) = graph_with_linear_node(half);
        let pool = linear_pool("AaveLinear", Some(0), Some(1));

        let next =
            expand_linear_pool(&mut graph, linear, PoolType::AaveLinear, 1, &pool, true).unwrap();
        assert_eq!(next, 3);
        assert_eq!(graph.len(), 3);

        let wrapped = graph.children(linear).next().unwrap();
        assert_eq!(wrapped.kind, NodeKind::WrappedToken);
        assert_eq!(wrapped.address, addr(0x02));
        assert_eq!(wrapped.decimals, 18);
        assert_eq!(wrapped.join_action, JoinAction::WrapAaveDynamicToken);
        assert_eq!(wrapped.exit_action, ExitAction::UnwrapAaveStaticToken);
        assert_eq!(wrapped.proportion_of_parent, half);
        assert_eq!(wrapped.index, 1);

        let input = &graph[wrapped.children[0]];
        assert!(input.is_leaf);
        assert_eq!(input.address, addr(0x01));
        assert_eq!(input.decimals, 6);
        assert_eq!(input.proportion_of_parent, half);
        assert_eq!(input.index, 2);
    }

    #[test]
    fn test_erc4626_wrap_actions() {
        let (mut graph, linear) = graph_with_linear_node(one());
        let pool = linear_pool("ERC4626Linear", Some(0), Some(1));
        expand_linear_pool(&mut graph, linear, PoolType::ERC4626Linear, 1, &pool, true).unwrap();

        let wrapped = graph.children(linear).next().unwrap();
        assert_eq!(wrapped.join_action, JoinAction::WrapErc4626);
        assert_eq!(wrapped.exit_action, ExitAction::UnwrapErc4626);
    }

    #[test]
    fn test_unwrapped_expansion_attaches_main_token() {
        let (mut graph, linear) = graph_with_linear_node(one());
        let pool = linear_pool("AaveLinear", Some(0), None);

        let next =
            expand_linear_pool(&mut graph, linear, PoolType::AaveLinear, 1, &pool, false).unwrap();
        assert_eq!(next, 2);
        let children: Vec<&Node> = graph.children(linear).collect();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_leaf);
        assert_eq!(children[0].address, addr(0x01));
        assert_eq!(children[0].parent, Some(linear));
    }

    #[test]
    fn test_missing_slots_are_malformed() {
        let (mut graph, linear) = graph_with_linear_node(one());

        let no_main = linear_pool("AaveLinear", None, Some(1));
        let err = expand_linear_pool(&mut graph, linear, PoolType::AaveLinear, 1, &no_main, false)
            .unwrap_err();
        assert_eq!(
            err,
            PoolGraphError::MalformedLinearPool { pool_id: "0xlinear".into(), missing: "main" }
        );

        let no_wrapped = linear_pool("AaveLinear", Some(0), None);
        let err =
            expand_linear_pool(&mut graph, linear, PoolType::AaveLinear, 1, &no_wrapped, true)
                .unwrap_err();
        assert_eq!(
            err,
            PoolGraphError::MalformedLinearPool { pool_id: "0xlinear".into(), missing: "wrapped" }
        );
    }
}
