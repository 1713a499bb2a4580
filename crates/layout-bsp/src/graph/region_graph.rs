//! Arena-backed graph of rectangles with symmetric neighbour sets.

use tracing::trace;

use crate::{NodeId, PartitionError, Rect, Result};

use super::node::{GraphNode, RegionId};

/// A set of rectangular regions and the adjacency between them.
///
/// Regions live in slots addressed by [`RegionId`]. Removing a region frees
/// its slot; ids of other regions stay valid. Every edge mutation goes
/// through a paired operation ([`connect`](Self::connect),
/// [`unlink`](Self::unlink), [`disconnect`](Self::disconnect)), so the
/// neighbour relation is symmetric and never contains self-loops.
#[derive(Debug, Clone)]
pub struct RectGraph<T> {
    slots: Vec<Option<GraphNode<T>>>,
    len: usize,
}

impl<T> Default for RectGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RectGraph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty graph with room for `capacity` regions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Returns the number of live regions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds an unconnected region.
    pub fn insert(&mut self, rect: Rect, payload: T) -> RegionId {
        self.insert_node(GraphNode::new(rect, payload, None))
    }

    pub(crate) fn insert_node(&mut self, node: GraphNode<T>) -> RegionId {
        let id = RegionId(self.slots.len());
        self.slots.push(Some(node));
        self.len += 1;
        id
    }

    pub(crate) fn insert_from_partition(
        &mut self,
        rect: Rect,
        payload: T,
        partition_node: NodeId,
    ) -> RegionId {
        self.insert_node(GraphNode::new(rect, payload, Some(partition_node)))
    }

    #[inline]
    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: RegionId) -> Option<&GraphNode<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Returns a region for payload updates. Neighbours stay read-only.
    #[inline]
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut GraphNode<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Iterates over live regions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &GraphNode<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (RegionId(index), node)))
    }

    /// Iterates over the ids of live regions in slot order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Returns every edge once, as `(lower id, higher id)`.
    pub fn edges(&self) -> Vec<(RegionId, RegionId)> {
        self.iter()
            .flat_map(|(id, node)| {
                node.neighbours
                    .range(id..)
                    .filter(move |&&other| other != id)
                    .map(move |&other| (id, other))
            })
            .collect()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.iter().map(|(_, node)| node.degree()).sum::<usize>() / 2
    }

    /// Makes `a` and `b` neighbours of each other.
    ///
    /// Returns `false` if they already were.
    pub fn connect(&mut self, a: RegionId, b: RegionId) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(PartitionError::SelfNeighbour(a));
        }
        Ok(self.link(a, b))
    }

    /// Removes the edge between `a` and `b` from both ends.
    ///
    /// Returns `false` if there was no edge.
    pub fn unlink(&mut self, a: RegionId, b: RegionId) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;
        let removed = self.slots[a.0]
            .as_mut()
            .is_some_and(|node| node.neighbours.remove(&b));
        if let Some(node) = self.slots[b.0].as_mut() {
            node.neighbours.remove(&a);
        }
        Ok(removed)
    }

    /// Connects `id` to every candidate whose rectangle shares an edge with
    /// its own (see [`are_disjoint`](crate::are_disjoint)).
    ///
    /// Candidates equal to `id` or no longer in the graph are ignored.
    /// Returns the number of candidates now adjacent to `id`.
    pub fn connect_adjacent<I>(&mut self, id: RegionId, candidates: I) -> Result<usize>
    where
        I: IntoIterator<Item = RegionId>,
    {
        let rect = *self.get(id).ok_or(PartitionError::UnknownRegion(id))?.rect();
        let mut connected = 0;
        for candidate in candidates {
            let adjacent = candidate != id
                && self
                    .get(candidate)
                    .is_some_and(|other| !rect.is_disjoint_from(other.rect()));
            if adjacent {
                self.link(id, candidate);
                connected += 1;
            }
        }
        Ok(connected)
    }

    /// Removes `id` from every neighbour's set and clears its own set.
    ///
    /// Afterwards no region lists `id` and `id` lists no region.
    pub fn disconnect(&mut self, id: RegionId) -> Result<()> {
        let node = self
            .get_mut(id)
            .ok_or(PartitionError::UnknownRegion(id))?;
        let neighbours = std::mem::take(&mut node.neighbours);
        for neighbour in neighbours {
            if let Some(other) = self.get_mut(neighbour) {
                other.neighbours.remove(&id);
            }
        }
        Ok(())
    }

    /// Disconnects a region and takes it out of the graph.
    ///
    /// The returned node has an empty neighbour set.
    pub fn remove(&mut self, id: RegionId) -> Result<GraphNode<T>> {
        self.disconnect(id)?;
        let node = self.slots[id.0]
            .take()
            .ok_or(PartitionError::UnknownRegion(id))?;
        self.len -= 1;
        trace!(region = %id, "removed region");
        Ok(node)
    }

    /// Checks that every edge is present at both ends and no region lists
    /// itself.
    pub fn is_symmetric(&self) -> bool {
        self.iter().all(|(id, node)| {
            node.neighbours.iter().all(|&other| {
                other != id && self.get(other).is_some_and(|n| n.neighbours.contains(&id))
            })
        })
    }

    /// Builds a new graph holding only the regions in `order`, renumbered
    /// `0..order.len()` in that order. Edges to regions left out are dropped.
    pub(crate) fn into_ordered<U, F>(mut self, order: &[RegionId], mut payload: F) -> RectGraph<U>
    where
        F: FnMut(&Rect, T) -> U,
    {
        let mut renumbered = vec![None; self.slots.len()];
        let mut kept = Vec::with_capacity(order.len());
        for &id in order {
            if let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) {
                renumbered[id.0] = Some(RegionId(kept.len()));
                kept.push(node);
            }
        }

        let mut graph = RectGraph::with_capacity(kept.len());
        for node in kept {
            let GraphNode {
                rect,
                neighbours,
                payload: old,
                partition_node,
            } = node;
            let mut fresh = GraphNode::new(rect, payload(&rect, old), partition_node);
            fresh.neighbours = neighbours
                .into_iter()
                .filter_map(|other| renumbered.get(other.0).copied().flatten())
                .collect();
            graph.insert_node(fresh);
        }
        graph
    }

    fn check(&self, id: RegionId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(PartitionError::UnknownRegion(id))
        }
    }

    /// Adds the edge at both ends. Callers guarantee both ids are live.
    fn link(&mut self, a: RegionId, b: RegionId) -> bool {
        if a == b {
            return false;
        }
        let added = self.slots[a.0]
            .as_mut()
            .is_some_and(|node| node.neighbours.insert(b));
        if let Some(node) = self.slots[b.0].as_mut() {
            node.neighbours.insert(a);
        }
        added
    }
}
