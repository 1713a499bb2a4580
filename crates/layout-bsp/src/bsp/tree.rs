//! Partition tree container and the frontier-driven generation engine.

use tracing::{debug, trace};

use crate::rng::SplitSampler;
use crate::{Axis, PartitionError, Rect, Result};

use super::config::{GenerationConfig, GenerationReport};
use super::node::{NodeId, PartitionNode};
use super::visitor::{CollectingVisitor, LeafVisitor};

/// An axis-aligned binary space partitioning tree over an integer rectangle.
///
/// The tree owns every node in an arena addressed by [`NodeId`] and keeps a
/// *frontier*: the ordered list of leaves that may still be split. Splitting
/// a node replaces it in the frontier with its two children. Leaves for which
/// no split axis fits are retired from the frontier and stay leaves for good.
///
/// # Generation
///
/// ```ignore
/// use layout_bsp::{GenerationConfig, PartitionTree, Rect};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let rect = Rect::new(0, 0, 64, 48)?;
/// let config = GenerationConfig::default().with_min_size(4, 4);
/// let tree = PartitionTree::generate_random(rect, &config, &mut rng)?;
/// ```
///
/// # Staged generation
///
/// Nodes beyond `max_depth` are skipped rather than retired, so calling
/// [`generate`](Self::generate) again with a deeper budget picks up where the
/// previous call stopped:
///
/// ```ignore
/// for depth in 1..=6 {
///     tree.generate(&config.clone().with_max_depth(depth), &mut rng)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PartitionTree<T = ()> {
    nodes: Vec<PartitionNode<T>>,
    frontier: Vec<NodeId>,
}

impl PartitionTree {
    /// Creates a tree with a single root node covering `rect`.
    ///
    /// The root is at depth 0, carries `initial_axis` as its split axis, and
    /// seeds the frontier. A root created with [`Axis::None`] never splits.
    pub fn new(rect: Rect, initial_axis: Axis) -> Self {
        Self::with_payload(rect, initial_axis)
    }

    /// Creates a tree with a random initial axis and grows it with `config`.
    pub fn generate_random<S>(rect: Rect, config: &GenerationConfig, rng: &mut S) -> Result<Self>
    where
        S: SplitSampler + ?Sized,
    {
        Self::generate_random_with_payload(rect, config, rng)
    }
}

impl<T> PartitionTree<T> {
    /// Creates a tree whose nodes can carry a payload of type `T`.
    pub fn with_payload(rect: Rect, initial_axis: Axis) -> Self {
        let root = PartitionNode::new(rect, initial_axis, 0, None);
        Self {
            nodes: vec![root],
            frontier: vec![NodeId(0)],
        }
    }

    /// Payload-carrying counterpart of [`PartitionTree::generate_random`].
    pub fn generate_random_with_payload<S>(
        rect: Rect,
        config: &GenerationConfig,
        rng: &mut S,
    ) -> Result<Self>
    where
        S: SplitSampler + ?Sized,
    {
        config.validate()?;
        let initial_axis = if rng.sample_range(0..=1) == 0 {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let mut tree = Self::with_payload(rect, initial_axis);
        tree.generate(config, rng)?;
        Ok(tree)
    }

    /// Returns the id of the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the root node.
    #[inline]
    pub fn root_node(&self) -> &PartitionNode<T> {
        &self.nodes[0]
    }

    /// Returns the node with the given id, if it belongs to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&PartitionNode<T>> {
        self.nodes.get(id.0)
    }

    /// Returns the leaves still eligible for splitting, in processing order.
    #[inline]
    pub fn frontier(&self) -> &[NodeId] {
        &self.frontier
    }

    /// Iterates over every node in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PartitionNode<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Returns the total number of nodes, internal nodes included.
    pub fn node_count(&self) -> usize {
        self.count_nodes(self.root())
    }

    /// Returns the number of levels in the tree.
    ///
    /// Levels are counted from 1: a lone root reports 1, a root with two leaf
    /// children reports 2. This is one more than the largest zero-based
    /// [`PartitionNode::depth`] in the tree.
    pub fn max_depth(&self) -> usize {
        self.count_levels(self.root())
    }

    /// Returns all leaves in depth-first order (first child before second).
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut visitor = CollectingVisitor::new();
        self.visit_leaves(&mut visitor);
        visitor.into_ids()
    }

    /// Walks the tree depth-first and hands every leaf to `visitor`.
    pub fn visit_leaves<V: LeafVisitor<T>>(&self, visitor: &mut V) {
        self.visit_leaves_from(self.root(), visitor);
    }

    /// Attaches `payload` to a node, returning the previous payload.
    pub fn set_payload(&mut self, id: NodeId, payload: T) -> Result<Option<T>> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(PartitionError::UnknownNode(id))?;
        Ok(node.payload_slot().replace(payload))
    }

    /// Splits a leaf along `axis`, `size` units from its origin.
    ///
    /// Both children inherit `axis` as their split axis and sit one level
    /// deeper than the node. If the node was in the frontier it is replaced
    /// there by its children; in any case the children are appended to the
    /// frontier. Returns `(first, second)`: top/bottom or left/right.
    ///
    /// Fails without touching the tree if the node is unknown, already split,
    /// `axis` is [`Axis::None`], or `size` does not leave both halves
    /// non-empty.
    pub fn split(&mut self, id: NodeId, axis: Axis, size: i32) -> Result<(NodeId, NodeId)> {
        let node = self.node(id).ok_or(PartitionError::UnknownNode(id))?;
        if !node.is_leaf() {
            return Err(PartitionError::AlreadySplit(id));
        }
        let (first_rect, second_rect) = node.rect().split_at(axis, size)?;
        let depth = node.depth() + 1;

        let first = NodeId(self.nodes.len());
        let second = NodeId(self.nodes.len() + 1);
        self.nodes.push(PartitionNode::new(first_rect, axis, depth, Some(id)));
        self.nodes.push(PartitionNode::new(second_rect, axis, depth, Some(id)));
        self.nodes[id.0].set_children(first, second);

        if let Some(position) = self.frontier.iter().position(|&open| open == id) {
            self.frontier.remove(position);
        }
        self.frontier.push(first);
        self.frontier.push(second);

        trace!(node = %id, ?axis, size, depth, "split partition node");
        Ok((first, second))
    }

    /// Grows the tree by working through the frontier under `config`.
    ///
    /// A cursor walks the frontier. The node under the cursor is:
    ///
    /// - skipped (cursor advances, node stays, no iteration used) when its
    ///   depth has reached `max_depth`;
    /// - retired from the frontier when no split axis fits;
    /// - otherwise split at a random offset in `min..=extent - min` along the
    ///   chosen axis, its children appended to the frontier.
    ///
    /// Retiring and splitting each use one iteration. The call ends when the
    /// frontier is empty, the cursor runs off its end, or `max_iterations` is
    /// used up. Running out of room is not an error.
    pub fn generate<S>(&mut self, config: &GenerationConfig, rng: &mut S) -> Result<GenerationReport>
    where
        S: SplitSampler + ?Sized,
    {
        config.validate()?;

        let mut report = GenerationReport::default();
        let mut cursor = 0;

        while cursor < self.frontier.len() && config.iterations_left(report.iterations) {
            let id = self.frontier[cursor];
            let node = &self.nodes[id.0];

            if config.depth_exhausted(node.depth()) {
                cursor += 1;
                continue;
            }

            let axis = node.determine_split_axis(
                config.min_width,
                config.min_height,
                config.allow_either_axis,
            );

            if axis.is_none() {
                self.frontier.remove(cursor);
                report.terminated += 1;
            } else {
                let min = config.min_extent(axis);
                let size = rng.sample_range(min..=node.rect().extent(axis) - min);
                self.split(id, axis, size)?;
                report.splits += 1;
            }
            report.iterations += 1;
        }

        debug!(
            iterations = report.iterations,
            splits = report.splits,
            terminated = report.terminated,
            frontier = self.frontier.len(),
            nodes = self.nodes.len(),
            "partition generation finished"
        );
        Ok(report)
    }

    fn count_nodes(&self, id: NodeId) -> usize {
        match self.nodes[id.0].children() {
            Some((first, second)) => 1 + self.count_nodes(first) + self.count_nodes(second),
            None => 1,
        }
    }

    fn count_levels(&self, id: NodeId) -> usize {
        match self.nodes[id.0].children() {
            Some((first, second)) => 1 + self.count_levels(first).max(self.count_levels(second)),
            None => 1,
        }
    }

    fn visit_leaves_from<V: LeafVisitor<T>>(&self, id: NodeId, visitor: &mut V) {
        let node = &self.nodes[id.0];
        match node.children() {
            Some((first, second)) => {
                self.visit_leaves_from(first, visitor);
                self.visit_leaves_from(second, visitor);
            }
            None => visitor.visit(id, node),
        }
    }
}
