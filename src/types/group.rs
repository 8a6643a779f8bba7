use serde::{Deserialize, Serialize};

use super::Cell;

/// Screen-space interval owned by one group of the primary sort row.
///
/// Extents are stored left to right in the primary row's value order, so
/// `index` is also the group's position in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExtent {
    /// Rank of the group's value in the primary row's value order
    pub index: usize,
    /// The shared value of every column in the group
    pub value: Cell,
    /// X position of the group's left edge
    pub start: f64,
    /// X position of the group's right edge
    pub end: f64,
}

impl GroupExtent {
    /// Width of the interval (0 for a group with no columns)
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// True if `x` lies within `[start, end]`
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }
}

/// One bar of the draw list, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRect {
    /// Column data-index the bar represents
    pub column: usize,
    /// Display slot of the bar (0 = leftmost)
    pub order: usize,
    /// X position of the bar's left edge
    pub x: f64,
    /// Bar width (excludes bar padding)
    pub width: f64,
}

/// Rectangle highlighted while hovering over a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}
