//! Top-down division of a rectangle straight into a region graph.
//!
//! Unlike the partition tree, the division service keeps no tree. It splits
//! recursively, alternating the axis by recursion depth (even depths split
//! top/bottom, odd depths left/right), and rewires the neighbour graph after
//! every split: the children are linked to each other, take over the parent's
//! neighbours they still touch, and the parent is removed.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::{RectGraph, RegionId};
use crate::rect::split_randomly;
use crate::rng::SplitSampler;
use crate::{Axis, PartitionError, Rect, Result};

/// Constraints for [`divide_rectangle`] and [`divide_region`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct DivisionConfig<T = ()> {
    /// Lower depth bound. Validated against `max_depth` but never forces a
    /// split the size constraints reject.
    pub min_depth: usize,
    /// Regions at this recursion depth are not divided further.
    pub max_depth: usize,
    pub min_width: i32,
    pub min_height: i32,
    /// Payload cloned into every region the division creates.
    pub default_payload: T,
}

impl<T: Default> Default for DivisionConfig<T> {
    fn default() -> Self {
        Self {
            min_depth: 1,
            max_depth: 1,
            min_width: 2,
            min_height: 2,
            default_payload: T::default(),
        }
    }
}

impl<T> DivisionConfig<T> {
    /// Sets the depth bounds.
    pub fn with_depth(mut self, min_depth: usize, max_depth: usize) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    /// Sets the minimal region size.
    pub fn with_min_size(mut self, min_width: i32, min_height: i32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Replaces the payload given to new regions.
    pub fn with_default_payload<U>(self, default_payload: U) -> DivisionConfig<U> {
        DivisionConfig {
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            min_width: self.min_width,
            min_height: self.min_height,
            default_payload,
        }
    }

    /// Returns `true` if halving the width keeps it at or above `min_width`.
    #[inline]
    pub fn can_divide_vertically(&self, rect: &Rect) -> bool {
        rect.width() / 2 >= self.min_width
    }

    /// Returns `true` if halving the height keeps it at or above `min_height`.
    #[inline]
    pub fn can_divide_horizontally(&self, rect: &Rect) -> bool {
        rect.height() / 2 >= self.min_height
    }

    /// A region is only divided while both dimensions stay viable, whichever
    /// axis the current depth picks.
    #[inline]
    pub fn can_divide(&self, rect: &Rect) -> bool {
        self.can_divide_horizontally(rect) && self.can_divide_vertically(rect)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_width < 1 {
            return Err(PartitionError::InvalidConfig("min_width must be at least 1"));
        }
        if self.min_height < 1 {
            return Err(PartitionError::InvalidConfig("min_height must be at least 1"));
        }
        if self.min_depth > self.max_depth {
            return Err(PartitionError::InvalidConfig(
                "min_depth must not exceed max_depth",
            ));
        }
        Ok(())
    }
}

/// Axis used at a given recursion depth.
#[inline]
pub fn division_axis(depth: usize) -> Axis {
    if depth % 2 == 0 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Divides `rect` and returns the resulting regions with their adjacency.
///
/// Regions are numbered in depth-first order, first half before second.
/// Every region carries a clone of `config.default_payload`.
pub fn divide_rectangle<T, S>(
    rect: Rect,
    config: &DivisionConfig<T>,
    rng: &mut S,
) -> Result<RectGraph<T>>
where
    T: Clone,
    S: SplitSampler + ?Sized,
{
    config.validate()?;

    let mut graph = RectGraph::new();
    let root = graph.insert(rect, config.default_payload.clone());
    let mut leaves = Vec::new();
    divide(&mut graph, root, 0, config, rng, &mut leaves)?;

    let graph = graph.into_ordered(&leaves, |_, payload| payload);
    debug!(
        regions = graph.len(),
        edges = graph.edge_count(),
        "rectangle divided"
    );
    Ok(graph)
}

/// Divides a region already living in `graph`.
///
/// Edges between the region and the rest of the graph are handed down to the
/// leaves that still touch the other side. Returns the ids of the leaves in
/// depth-first order; if the region cannot be divided that is just `[id]`
/// and the graph is unchanged. Otherwise the region itself is removed.
pub fn divide_region<T, S>(
    graph: &mut RectGraph<T>,
    id: RegionId,
    config: &DivisionConfig<T>,
    rng: &mut S,
) -> Result<Vec<RegionId>>
where
    T: Clone,
    S: SplitSampler + ?Sized,
{
    config.validate()?;
    if !graph.contains(id) {
        return Err(PartitionError::UnknownRegion(id));
    }

    let mut leaves = Vec::new();
    divide(graph, id, 0, config, rng, &mut leaves)?;
    debug!(region = %id, leaves = leaves.len(), "region divided");
    Ok(leaves)
}

fn divide<T, S>(
    graph: &mut RectGraph<T>,
    id: RegionId,
    depth: usize,
    config: &DivisionConfig<T>,
    rng: &mut S,
    leaves: &mut Vec<RegionId>,
) -> Result<()>
where
    T: Clone,
    S: SplitSampler + ?Sized,
{
    let node = graph.get(id).ok_or(PartitionError::UnknownRegion(id))?;
    let rect = *node.rect();
    if depth >= config.max_depth || !config.can_divide(&rect) {
        leaves.push(id);
        return Ok(());
    }

    let axis = division_axis(depth);
    let outside: Vec<RegionId> = node.neighbours().iter().copied().collect();
    let (first_rect, second_rect) = split_randomly(&rect, axis, 1, rng)?;

    let first = graph.insert(first_rect, config.default_payload.clone());
    let second = graph.insert(second_rect, config.default_payload.clone());
    graph.connect(first, second)?;
    graph.connect_adjacent(first, outside.iter().copied())?;
    graph.connect_adjacent(second, outside)?;
    graph.remove(id)?;
    trace!(region = %id, ?axis, depth, "divided region");

    divide(graph, first, depth + 1, config, rng, leaves)?;
    divide(graph, second, depth + 1, config, rng, leaves)
}
