//! Region graph node.

use std::collections::BTreeSet;
use std::fmt;

use crate::{NodeId, Rect};

/// Index of a region inside a [`RectGraph`](super::RectGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) usize);

impl RegionId {
    /// Returns the slot of the region in its graph.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A rectangle together with the regions it shares an edge with.
///
/// The neighbour set is read-only from the outside: edges are only added or
/// removed through [`RectGraph`](super::RectGraph), which always updates both
/// ends, so `a` lists `b` exactly when `b` lists `a`.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    pub(crate) rect: Rect,
    pub(crate) neighbours: BTreeSet<RegionId>,
    pub(crate) payload: T,
    pub(crate) partition_node: Option<NodeId>,
}

impl<T> GraphNode<T> {
    pub(crate) fn new(rect: Rect, payload: T, partition_node: Option<NodeId>) -> Self {
        Self {
            rect,
            neighbours: BTreeSet::new(),
            payload,
            partition_node,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Returns the ids of all neighbouring regions, in ascending order.
    #[inline]
    pub fn neighbours(&self) -> &BTreeSet<RegionId> {
        &self.neighbours
    }

    #[inline]
    pub fn is_neighbour(&self, id: RegionId) -> bool {
        self.neighbours.contains(&id)
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Returns the partition tree leaf this region was built from, if any.
    #[inline]
    pub fn partition_node(&self) -> Option<NodeId> {
        self.partition_node
    }
}
