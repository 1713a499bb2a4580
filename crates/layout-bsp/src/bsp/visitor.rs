//! Visitor pattern for partition tree leaves.
//!
//! Visitors allow custom processing of finished regions without coupling the
//! traversal to a particular consumer.

use super::node::{NodeId, PartitionNode};

/// Visitor for processing leaves during a depth-first walk.
///
/// Leaves are visited first-child first (top before bottom, left before
/// right), which is also the order the adjacency builder discovers them.
pub trait LeafVisitor<T> {
    /// Called once for each leaf.
    fn visit(&mut self, id: NodeId, node: &PartitionNode<T>);
}

/// A simple visitor that collects the ids of all visited leaves.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<NodeId>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected ids.
    pub fn into_ids(self) -> Vec<NodeId> {
        self.collected
    }

    /// Returns a reference to the collected ids.
    pub fn ids(&self) -> &[NodeId] {
        &self.collected
    }
}

impl<T> LeafVisitor<T> for CollectingVisitor {
    fn visit(&mut self, id: NodeId, _node: &PartitionNode<T>) {
        self.collected.push(id);
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<T, F> LeafVisitor<T> for FnVisitor<F>
where
    F: FnMut(NodeId, &PartitionNode<T>),
{
    fn visit(&mut self, id: NodeId, node: &PartitionNode<T>) {
        (self.func)(id, node);
    }
}
