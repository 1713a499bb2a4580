//! Axis-aligned binary space partitioning of integer rectangles.
//!
//! This module provides a partition tree that recursively divides a
//! rectangle into non-overlapping smaller rectangles. The tree supports:
//!
//! - Random generation under minimum-size, depth and iteration budgets
//! - Staged generation: re-invoking the engine with a larger depth budget
//!   resumes nodes a previous call skipped
//! - Manual splits at a chosen offset
//!
//! # Example
//!
//! ```ignore
//! use layout_bsp::{Axis, GenerationConfig, PartitionTree, Rect};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut tree = PartitionTree::new(Rect::new(0, 0, 80, 60)?, Axis::Horizontal);
//! tree.generate(&GenerationConfig::default().with_min_size(6, 6), &mut rng)?;
//!
//! for leaf in tree.leaves() {
//!     println!("{}", tree.node(leaf).unwrap());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`PartitionTree`]: arena of nodes plus the frontier of splittable leaves
//! - [`PartitionNode`]: rectangle, inherited split axis, depth, parent/children
//! - [`GenerationConfig`]: size constraints and budgets for one generation call
//! - [`LeafVisitor`]: visitor trait for walking finished regions

mod config;
mod node;
mod tree;
mod visitor;

// Re-export main types
pub use config::{GenerationConfig, GenerationReport};
pub use node::{NodeId, PartitionNode};
pub use tree::PartitionTree;
pub use visitor::{CollectingVisitor, FnVisitor, LeafVisitor};
