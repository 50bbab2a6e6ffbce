use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::actions::{ExitAction, JoinAction};
use crate::pools::PoolType;

/// Handle of a node inside the [`PoolGraph`](super::PoolGraph) arena that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Pool(PoolType),
    /// Yield-bearing wrapper between a linear pool and its main token.
    WrappedToken,
    Input,
}

/// A pool, wrapped token or input token in a nested pool graph.
///
/// `proportion_of_parent` is a 1e18 fixed-point share of the parent's amount. Children
/// carry fractions of the parent's fraction, so a grandchild holding half of a child
/// that holds 40% carries 0.2e18.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub address: Address,
    /// Pool id, `None` for tokens that are not pools.
    pub id: Option<String>,
    pub kind: NodeKind,
    pub join_action: JoinAction,
    pub exit_action: ExitAction,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub proportion_of_parent: U256,
    pub is_leaf: bool,
    pub is_proportional_exit: bool,
    /// Spot price of each sibling token quoted in this pool's BPT.
    pub spot_prices: HashMap<Address, Decimal>,
    pub decimals: u8,
    /// Positional label; unique within a freshly built graph only.
    pub index: usize,
}

impl Node {
    /// Creates an input/output leaf and returns it with the next free index.
    ///
    /// This is the only constructor of leaf nodes.
    pub fn input(
        index: usize,
        address: Address,
        decimals: u8,
        parent: Option<NodeId>,
        proportion_of_parent: U256,
    ) -> (Node, usize) {
        let node = Node {
            address,
            id: None,
            kind: NodeKind::Input,
            join_action: JoinAction::Input,
            exit_action: ExitAction::Output,
            children: Vec::new(),
            parent,
            proportion_of_parent,
            is_leaf: true,
            is_proportional_exit: false,
            spot_prices: HashMap::new(),
            decimals,
            index,
        };
        (node, index + 1)
    }

    pub fn is_pool(&self) -> bool {
        self.id.is_some() && matches!(self.kind, NodeKind::Pool(_))
    }

    pub fn pool_type(&self) -> Option<PoolType> {
        match self.kind {
            NodeKind::Pool(t) => Some(t),
            _ => None,
        }
    }
}
