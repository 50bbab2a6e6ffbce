//! Root path extraction.
//!
//! Given the BFS order of a built graph and the token a caller wants to join with (or
//! exit to), [`PoolGraph::root_path`] returns the chain of nodes from that token up to
//! the root. The input node carries 100% of the amount; every ancestor carries 0, its
//! amount being implied by its one active child. Siblings of the input under its first
//! ancestor are kept as deactivated placeholders with index 0. Higher ancestors keep
//! their other children with their original indices.
//!
//! Entering at a pool keeps that pool on the path: the chain is
//! `[input, pool copy, ..., root copy]` and the pool copy's own children are deactivated.
//!
//! The chain is written into a fresh arena. The source graph is only read.

use ethers::types::{Address, U256};
use tracing::debug;

use super::error::PoolGraphError;
use super::nodes::{Node, NodeId};
use super::PoolGraph;
use crate::normalization::one;

/// Chain of nodes from an input token up to the root, in its own arena.
#[derive(Debug, Clone)]
pub struct NodePath {
    graph: PoolGraph,
    order: Vec<NodeId>,
}

impl NodePath {
    /// Arena holding the chain and the deactivated siblings. Its root is the root copy.
    pub fn graph(&self) -> &PoolGraph {
        &self.graph
    }

    /// Handles in chain order: input first, root last.
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.resolve(&self.order)
    }

    pub fn input(&self) -> &Node {
        &self.graph[self.order[0]]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_parts(self) -> (PoolGraph, Vec<NodeId>) {
        (self.graph, self.order)
    }
}

impl PoolGraph {
    /// Extracts the path from `input_token` to the root.
    ///
    /// `ordered` must be a BFS order of this graph (root first). Ancestor copies are
    /// indexed `starting_index + 1`, `starting_index + 2`, ... from the input upwards.
    /// When `input_token` is a pool, that pool's copy is the first ancestor.
    ///
    /// # Errors
    ///
    /// [`PoolGraphError::InvalidInputToken`] when the token is the root's own token, is
    /// not a valid address, or does not appear in `ordered`.
    pub fn root_path(
        &self,
        ordered: &[NodeId],
        input_token: &str,
        starting_index: usize,
    ) -> Result<NodePath, PoolGraphError> {
        let invalid = || PoolGraphError::InvalidInputToken(input_token.to_string());

        let input: Address = input_token.trim().parse().map_err(|_| invalid())?;
        let root = ordered.first().map(|id| &self[*id]).ok_or_else(invalid)?;
        if root.address == input {
            return Err(invalid());
        }

        let matched_id = ordered
            .iter()
            .copied()
            .find(|id| self[*id].address == input)
            .ok_or_else(invalid)?;
        let matched = &self[matched_id];

        let mut path = PoolGraph::empty();
        // A leaf entry takes its own slot among the parent's children. A pool entry keeps
        // its copy on the path and the synthesized input hangs in front of its children.
        let (input_node, mut on_path, mut ancestor) = if matched.is_leaf {
            let leaf = Node {
                proportion_of_parent: one(),
                index: 0,
                ..matched.clone()
            };
            (leaf, Some(matched_id), matched.parent)
        } else {
            let (synth, _) =
                Node::input(0, matched.address, matched.decimals, matched.parent, one());
            (synth, None, Some(matched_id))
        };
        let input_id = path.push(input_node);
        path.node_mut(input_id).parent = None;

        let mut order = vec![input_id];
        let mut previous = input_id;
        let mut next_index = starting_index + 1;
        let mut first_ancestor = true;

        while let Some(original_id) = ancestor {
            let original = &self[original_id];
            // Ancestors carry no amount of their own; the active child implies it.
            let copy_id = path.push(Node {
                proportion_of_parent: U256::zero(),
                index: next_index,
                children: Vec::new(),
                parent: None,
                ..original.clone()
            });

            let mut children = Vec::with_capacity(original.children.len() + 1);
            if on_path.is_none() {
                children.push(previous);
            }
            for &child in &original.children {
                if Some(child) == on_path {
                    children.push(previous);
                } else {
                    let sibling = self.copy_subtree(child, copy_id, &mut path);
                    if first_ancestor {
                        path.node_mut(sibling).index = 0;
                    }
                    children.push(sibling);
                }
            }
            path.node_mut(copy_id).children = children;
            path.node_mut(previous).parent = Some(copy_id);

            order.push(copy_id);
            previous = copy_id;
            on_path = Some(original_id);
            first_ancestor = false;
            next_index += 1;
            ancestor = original.parent;
        }
        path.set_root(previous);

        debug!(
            "Root path for {:?}: {} nodes, {} placeholders",
            input,
            order.len(),
            path.len() - order.len()
        );
        Ok(NodePath { graph: path, order })
    }

    /// Deep-copies the subtree at `id` into `into`, under `parent`.
    fn copy_subtree(&self, id: NodeId, parent: NodeId, into: &mut PoolGraph) -> NodeId {
        let original = &self[id];
        let copy_id = into.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            ..original.clone()
        });
        let children = original
            .children
            .iter()
            .map(|&child| self.copy_subtree(child, copy_id, into))
            .collect();
        into.node_mut(copy_id).children = children;
        copy_id
    }
}
