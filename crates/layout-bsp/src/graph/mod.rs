//! Region adjacency graphs.
//!
//! A [`RectGraph`] stores rectangles with symmetric neighbour sets. It is
//! produced from a partition tree by [`build_adjacency`] and directly by the
//! [division service](crate::division).

mod builder;
mod node;
mod region_graph;

pub use builder::build_adjacency;
pub use node::{GraphNode, RegionId};
pub use region_graph::RectGraph;
