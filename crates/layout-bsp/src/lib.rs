//! Procedural subdivision of integer rectangles.
//!
//! Two strategies carve a bounding rectangle into non-overlapping regions:
//!
//! - [`PartitionTree`]: a binary space partitioning tree grown from a frontier
//!   of splittable leaves under size, depth and iteration budgets. Its leaves
//!   are turned into an adjacency graph with [`build_adjacency`].
//! - [`divide_rectangle`]: a recursive divider that alternates the split
//!   axis by depth and maintains the adjacency graph while it splits.
//!
//! Both produce a [`RectGraph`] in which two regions are neighbours exactly
//! when they share an edge of positive length.
//!
//! Randomness is always injected through [`SplitSampler`]; [`FixedSeed`]
//! makes staged runs reproducible.

pub mod bsp;
pub mod division;
mod error;
pub mod graph;
pub mod rect;
pub mod rng;

pub use bsp::{
    CollectingVisitor, FnVisitor, GenerationConfig, GenerationReport, LeafVisitor, NodeId,
    PartitionNode, PartitionTree,
};
pub use division::{DivisionConfig, divide_rectangle, divide_region};
pub use error::{PartitionError, Result};
pub use graph::{GraphNode, RectGraph, RegionId, build_adjacency};
pub use rect::{Axis, Rect, are_disjoint, boundary_intersection, split_horizontally, split_vertically};
pub use rng::{FixedSeed, SplitSampler};
