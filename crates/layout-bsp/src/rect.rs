//! Integer axis-aligned rectangles and the predicates partitioning relies on.

use std::fmt;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::rng::SplitSampler;
use crate::{PartitionError, Result};

/// Orientation of a split.
///
/// `Horizontal` cuts along a horizontal line, producing a top and a bottom
/// part (the height is divided). `Vertical` cuts along a vertical line,
/// producing a left and a right part (the width is divided).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    /// No legal split exists. A terminal marker, not an error.
    #[default]
    None,
    /// Divide the height: top and bottom parts.
    Horizontal,
    /// Divide the width: left and right parts.
    Vertical,
}

impl Axis {
    /// Returns the other split orientation. `None` stays `None`.
    #[inline]
    pub fn orthogonal(self) -> Axis {
        match self {
            Axis::None => Axis::None,
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Returns `true` for [`Axis::None`].
    #[inline]
    pub fn is_none(self) -> bool {
        self == Axis::None
    }
}

/// An axis-aligned rectangle with integer coordinates and positive size.
///
/// `min` is the origin corner `(x, y)`, `max` is `(x + width, y + height)`.
/// Rectangles are immutable; splitting produces new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RectFields")]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Deserialize)]
struct RectFields {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl TryFrom<RectFields> for Rect {
    type Error = PartitionError;

    fn try_from(fields: RectFields) -> Result<Self> {
        Rect::new(fields.x, fields.y, fields.width, fields.height)
    }
}

impl Rect {
    /// Creates a rectangle, rejecting non-positive dimensions and a far
    /// corner outside the `i32` range.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(PartitionError::InvalidDimensions { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(PartitionError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Creates a rectangle from an origin corner and a size vector.
    pub fn from_origin_size(origin: Point2<i32>, size: Vector2<i32>) -> Result<Self> {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the origin (minimum) corner.
    #[inline]
    pub fn min(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }

    /// Returns the corner opposite the origin.
    #[inline]
    pub fn max(&self) -> Point2<i32> {
        Point2::new(self.x + self.width, self.y + self.height)
    }

    /// Returns `(width, height)` as a vector.
    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        Vector2::new(self.width, self.height)
    }

    /// Returns the center point.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Computes the area. Widened to `i64` so large layouts cannot overflow.
    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Returns the extent a split along `axis` divides.
    ///
    /// Height for [`Axis::Horizontal`], width for [`Axis::Vertical`], zero for
    /// [`Axis::None`].
    #[inline]
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::None => 0,
            Axis::Horizontal => self.height,
            Axis::Vertical => self.width,
        }
    }

    /// Splits the rectangle along `axis`, `size` units from the origin.
    ///
    /// Returns `(first, second)`: top/bottom for [`Axis::Horizontal`],
    /// left/right for [`Axis::Vertical`]. Both parts always have positive
    /// size and their areas add up to this rectangle's area.
    pub fn split_at(&self, axis: Axis, size: i32) -> Result<(Rect, Rect)> {
        let extent = self.extent(axis);
        if axis.is_none() {
            return Err(PartitionError::NoSplitAxis);
        }
        if size <= 0 || size >= extent {
            return Err(PartitionError::InvalidSplitSize { axis, size, extent });
        }

        let parts = match axis {
            Axis::Horizontal => (
                Rect::new(self.x, self.y, self.width, size)?,
                Rect::new(self.x, self.y + size, self.width, self.height - size)?,
            ),
            Axis::Vertical => (
                Rect::new(self.x, self.y, size, self.height)?,
                Rect::new(self.x + size, self.y, self.width - size, self.height)?,
            ),
            Axis::None => unreachable!("rejected above"),
        };
        Ok(parts)
    }

    /// Returns `true` if this rectangle shares no edge segment with `other`.
    ///
    /// See [`are_disjoint`].
    #[inline]
    pub fn is_disjoint_from(&self, other: &Rect) -> bool {
        are_disjoint(self, other)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {}, y: {}, width: {}, height: {})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Tests whether two rectangles are disjoint for adjacency purposes.
///
/// The four gaps `a.max.x - b.min.x`, `b.max.x - a.min.x`, `a.max.y - b.min.y`
/// and `b.max.y - a.min.y` are computed. Any negative gap means the
/// rectangles do not cover each other on that axis. Two or more zero gaps
/// mean they only touch at a corner, which also counts as disjoint. Exactly
/// one zero gap means they share an edge segment of positive length.
pub fn are_disjoint(a: &Rect, b: &Rect) -> bool {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    let (bx, by) = (i64::from(b.x), i64::from(b.y));

    let gaps = [
        ax + i64::from(a.width) - bx,
        bx + i64::from(b.width) - ax,
        ay + i64::from(a.height) - by,
        by + i64::from(b.height) - ay,
    ];

    if gaps.iter().any(|&gap| gap < 0) {
        return true;
    }
    gaps.iter().filter(|&&gap| gap == 0).count() >= 2
}

/// Returns the corners of the overlap box of `a` and `b`.
///
/// The first point is the per-axis maximum of the minimum corners, the second
/// the per-axis minimum of the maximum corners. For edge-adjacent rectangles
/// this collapses into the shared boundary segment (equal `x` or equal `y`).
/// When the first point exceeds the second on some axis the rectangles are
/// apart on that axis.
pub fn boundary_intersection(a: &Rect, b: &Rect) -> (Point2<i32>, Point2<i32>) {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    (
        Point2::new(a_min.x.max(b_min.x), a_min.y.max(b_min.y)),
        Point2::new(a_max.x.min(b_max.x), a_max.y.min(b_max.y)),
    )
}

/// Randomly splits `rect` along `axis` with both parts at least `min_extent`.
///
/// The offset is sampled from `min_extent..=extent - min_extent`.
pub fn split_randomly<S>(
    rect: &Rect,
    axis: Axis,
    min_extent: i32,
    rng: &mut S,
) -> Result<(Rect, Rect)>
where
    S: SplitSampler + ?Sized,
{
    if axis.is_none() {
        return Err(PartitionError::NoSplitAxis);
    }
    let extent = rect.extent(axis);
    if min_extent < 1 || extent <= 1 || extent - min_extent < min_extent {
        return Err(PartitionError::ExtentTooSmall { extent, min_extent });
    }
    let size = rng.sample_range(min_extent..=extent - min_extent);
    rect.split_at(axis, size)
}

/// Randomly splits `rect` into a top and a bottom part.
///
/// Fails when the height is 1 or less (or below `2 * min_extent`).
pub fn split_horizontally<S>(rect: &Rect, min_extent: i32, rng: &mut S) -> Result<(Rect, Rect)>
where
    S: SplitSampler + ?Sized,
{
    split_randomly(rect, Axis::Horizontal, min_extent, rng)
}

/// Randomly splits `rect` into a left and a right part.
///
/// Fails when the width is 1 or less (or below `2 * min_extent`).
pub fn split_vertically<S>(rect: &Rect, min_extent: i32, rng: &mut S) -> Result<(Rect, Rect)>
where
    S: SplitSampler + ?Sized,
{
    split_randomly(rect, Axis::Vertical, min_extent, rng)
}
