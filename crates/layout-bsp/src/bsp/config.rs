//! Constraints driving partition tree generation.

use serde::{Deserialize, Serialize};

use crate::{PartitionError, Result};

/// Constraints for [`PartitionTree::generate`](super::PartitionTree::generate).
///
/// `None` budgets are unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Minimal width of a rectangle produced by a vertical split.
    pub min_width: i32,
    /// Minimal height of a rectangle produced by a horizontal split.
    pub min_height: i32,
    /// Nodes at or below this zero-based depth are skipped but kept in the
    /// frontier, so a later call with a larger budget resumes them.
    pub max_depth: Option<usize>,
    /// Maximum number of frontier nodes processed (split or retired) per call.
    pub max_iterations: Option<usize>,
    /// Allow splitting along the same axis again when the alternating axis
    /// no longer fits.
    pub allow_either_axis: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            max_depth: None,
            max_iterations: None,
            allow_either_axis: true,
        }
    }
}

impl GenerationConfig {
    /// Sets the minimal rectangle size.
    pub fn with_min_size(mut self, min_width: i32, min_height: i32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Sets the depth budget.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets whether the same axis may be reused.
    pub fn with_either_axis(mut self, allow: bool) -> Self {
        self.allow_either_axis = allow;
        self
    }

    /// Checks the minimal sizes are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.min_width < 1 {
            return Err(PartitionError::InvalidConfig("min_width must be at least 1"));
        }
        if self.min_height < 1 {
            return Err(PartitionError::InvalidConfig("min_height must be at least 1"));
        }
        Ok(())
    }

    /// Minimal extent along `axis` (height for horizontal, width for vertical).
    pub(crate) fn min_extent(&self, axis: crate::Axis) -> i32 {
        match axis {
            crate::Axis::Horizontal => self.min_height,
            crate::Axis::Vertical | crate::Axis::None => self.min_width,
        }
    }

    pub(crate) fn depth_exhausted(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    pub(crate) fn iterations_left(&self, iteration: usize) -> bool {
        self.max_iterations.is_none_or(|max| iteration < max)
    }
}

/// Outcome of one generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Frontier nodes processed (each one counts against `max_iterations`).
    pub iterations: usize,
    /// Nodes split into two children.
    pub splits: usize,
    /// Nodes retired from the frontier because no axis fit.
    pub terminated: usize,
}
