//! Error type shared by the partition tree, region graph and division service.

use thiserror::Error;

use crate::{Axis, NodeId, RegionId};

/// Precondition violations reported by the layout operations.
///
/// Running out of room to split is not an error: it is reported as
/// [`Axis::None`] or as a final leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// A rectangle was given a non-positive width or height.
    #[error("rectangle must have positive dimensions, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// The far corner of a rectangle does not fit in `i32`.
    #[error("rectangle {width}x{height} at ({x}, {y}) exceeds the coordinate range")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// A split offset does not leave both halves with a positive extent.
    #[error("split size {size} is outside 1..{extent} along {axis:?}")]
    InvalidSplitSize { axis: Axis, size: i32, extent: i32 },

    /// A split was requested along [`Axis::None`].
    #[error("cannot split along Axis::None")]
    NoSplitAxis,

    /// An extent is too small to hold two parts of the requested minimum.
    #[error("extent {extent} cannot be split into two parts of at least {min_extent}")]
    ExtentTooSmall { extent: i32, min_extent: i32 },

    /// The node id does not belong to this tree.
    #[error("partition node {0} does not exist")]
    UnknownNode(NodeId),

    /// The node already has children.
    #[error("partition node {0} has already been split")]
    AlreadySplit(NodeId),

    /// The region id does not refer to a live region in this graph.
    #[error("region {0} does not exist")]
    UnknownRegion(RegionId),

    /// A region cannot be its own neighbour.
    #[error("region {0} cannot neighbour itself")]
    SelfNeighbour(RegionId),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Result alias for layout operations.
pub type Result<T> = std::result::Result<T, PartitionError>;
