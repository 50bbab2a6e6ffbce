use ethers::types::Address;
use std::collections::VecDeque;

use super::nodes::{Node, NodeId};
use super::PoolGraph;

impl PoolGraph {
    /// Breadth-first order starting at the root: root, its children in declared order,
    /// then grandchildren, and so on. Each node appears once even if it were reachable
    /// through more than one parent.
    pub fn order_by_bfs(&self) -> Vec<NodeId> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut marked = vec![false; self.len()];
        let mut ordered = Vec::with_capacity(self.len());
        let mut queue = VecDeque::new();

        marked[self.root_id().get()] = true;
        queue.push_back(self.root_id());

        while let Some(id) = queue.pop_front() {
            ordered.push(id);
            for &child in &self[id].children {
                if !marked[child.get()] {
                    marked[child.get()] = true;
                    queue.push_back(child);
                }
            }
        }
        ordered
    }
}

/// Addresses of the leaf (input/output) nodes, in the order given.
pub fn leaf_addresses<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<Address> {
    nodes
        .into_iter()
        .filter(|n| n.is_leaf)
        .map(|n| n.address)
        .collect()
}

/// True when every node that splits into several children can be exited proportionally.
pub fn is_proportional_pools<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> bool {
    nodes
        .into_iter()
        .all(|n| n.children.len() <= 1 || n.is_proportional_exit)
}
