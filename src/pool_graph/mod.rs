//! # Pool Graph
//!
//! Models a nested pool (a pool whose tokens may themselves be pools) as a tree, so a
//! join or exit on the root can be decomposed into ordered actions against every nested
//! pool and leaf token.
//!
//! ## Overview
//!
//! - [`GraphBuilder`] expands a root pool id into a [`PoolGraph`], one repository lookup
//!   per node, splitting proportions by pool balances
//! - [`PoolGraph::order_by_bfs`] flattens the tree level by level, root first
//! - [`PoolGraph::root_path`] extracts the single chain from an input token up to the
//!   root, with proportions rewritten so the whole amount flows through that chain
//! - [`leaf_addresses`] lists the input/output tokens of a node sequence
//!
//! ## Storage
//!
//! Nodes live in an arena and refer to each other through [`NodeId`] handles: a parent
//! owns its child list, a child keeps a plain handle back to its parent. A built graph is
//! never mutated; path extraction writes its copies into a new arena.

pub mod actions;
pub mod builder;
pub mod error;
pub mod linear;
pub mod nodes;
pub mod path;
pub mod traversal;

pub use actions::{ExitAction, JoinAction};
pub use builder::GraphBuilder;
pub use error::PoolGraphError;
pub use nodes::{Node, NodeId, NodeKind};
pub use path::NodePath;
pub use traversal::{is_proportional_pools, leaf_addresses};

use ethers::types::Address;
use std::ops::Index;

/// Arena of [`Node`]s rooted at a single pool.
#[derive(Debug, Clone)]
pub struct PoolGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl PoolGraph {
    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &Node {
        &self[self.root]
    }

    /// # Panics
    ///
    /// Panics if `id` was not handed out by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in arena (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Resolves a handle sequence, e.g. the output of [`PoolGraph::order_by_bfs`].
    pub fn resolve<'a>(&'a self, ids: &'a [NodeId]) -> impl Iterator<Item = &'a Node> + 'a {
        ids.iter().map(move |id| &self[*id])
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self[id].parent.map(|p| &self[p])
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self[id].children.iter().map(move |c| &self[*c])
    }

    /// First node in arena order with this address.
    pub fn find_by_address(&self, address: Address) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.address == address)
            .map(NodeId)
    }
}

impl Index<NodeId> for PoolGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}
