//! Partition tree node implementation.

use std::fmt;

use crate::{Axis, Rect};

/// Index of a node inside a [`PartitionTree`](super::PartitionTree).
///
/// Ids are only meaningful for the tree that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the position of the node in its tree's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the partition tree.
///
/// Nodes live in the tree's arena and refer to each other by [`NodeId`].
/// The parent link is a plain id and never owns anything. A node is either
/// a leaf (no children) or split into exactly two children that cover its
/// rectangle without gaps or overlap.
///
/// # Depth conventions
///
/// [`depth`](Self::depth) is zero-based: the root is at depth 0 and each child
/// sits one deeper than its parent. [`PartitionTree::max_depth`] counts
/// levels instead and reports 1 for a lone root.
///
/// [`PartitionTree::max_depth`]: super::PartitionTree::max_depth
#[derive(Debug, Clone)]
pub struct PartitionNode<T = ()> {
    rect: Rect,

    /// Axis of the split that created this node (inherited orientation).
    split_axis: Axis,

    depth: usize,

    parent: Option<NodeId>,

    /// `[first, second]`: top/bottom or left/right depending on the split.
    children: Option<[NodeId; 2]>,

    payload: Option<T>,
}

impl<T> PartitionNode<T> {
    pub(crate) fn new(rect: Rect, split_axis: Axis, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            rect,
            split_axis,
            depth,
            parent,
            children: None,
            payload: None,
        }
    }

    /// Returns the rectangle covered by this node.
    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Returns the axis of the split that created this node.
    ///
    /// For the root this is the initial axis the tree was created with.
    #[inline]
    pub fn split_axis(&self) -> Axis {
        self.split_axis
    }

    /// Returns the zero-based depth (0 for the root).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the parent, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns both children, or `None` for a leaf.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children.map(|[first, second]| (first, second))
    }

    /// Returns the top (horizontal split) or left (vertical split) child.
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|[first, _]| first)
    }

    /// Returns the bottom (horizontal split) or right (vertical split) child.
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|[_, second]| second)
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns the application data attached to this node, if any.
    #[inline]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    #[inline]
    pub(crate) fn payload_slot(&mut self) -> &mut Option<T> {
        &mut self.payload
    }

    #[inline]
    pub(crate) fn set_children(&mut self, first: NodeId, second: NodeId) {
        self.children = Some([first, second]);
    }

    /// Determines the axis to split this node over next.
    ///
    /// The axis orthogonal to [`split_axis`](Self::split_axis) is preferred so
    /// orientations alternate. A split along an axis is possible when half the
    /// divided extent still meets the minimum for that axis
    /// (`height / 2 >= min_height` for [`Axis::Horizontal`],
    /// `width / 2 >= min_width` for [`Axis::Vertical`], integer division).
    ///
    /// If the preferred axis does not fit and `allow_either_axis` is set, the
    /// same axis is tried again. Returns [`Axis::None`] when nothing fits or
    /// when the node's own axis is `None`.
    pub fn determine_split_axis(
        &self,
        min_width: i32,
        min_height: i32,
        allow_either_axis: bool,
    ) -> Axis {
        let preferred = self.split_axis.orthogonal();
        if preferred.is_none() {
            return Axis::None;
        }

        let fits = |axis: Axis| {
            let min = match axis {
                Axis::Horizontal => min_height,
                Axis::Vertical => min_width,
                Axis::None => return false,
            };
            self.rect.extent(axis) / 2 >= min
        };

        if fits(preferred) {
            preferred
        } else if allow_either_axis && fits(self.split_axis) {
            self.split_axis
        } else {
            Axis::None
        }
    }
}

impl<T> fmt::Display for PartitionNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rect = {}, depth = {}, axis = {:?}, leaf = {}",
            self.rect,
            self.depth,
            self.split_axis,
            self.is_leaf()
        )
    }
}
