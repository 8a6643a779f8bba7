//! Layout engine for bar positions and hit testing.
//!
//! This module handles:
//! - Computing the screen-space extent of each group of the primary sort row
//! - Resolving bar sizes, including bars stretched to a fixed plot width
//! - Mapping column indices to x positions and back (hover/brush lookups)

mod extents;
mod mapper;

pub use extents::{compute_extents, padding_gaps, BarMetrics};
pub use mapper::CoordinateMapper;
