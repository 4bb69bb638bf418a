//! Layout engine: scroll anchors and the visible column/row arrays.
//!
//! This module handles:
//! - Mapping scroll anchors to pixel offsets per axis ([`ScrollDimension`])
//! - Fixed and scrollable partitions, left and right alignment
//! - Building the per-frame visible columns and rows ([`ViewLayout`])
//! - Hit testing canvas offsets against the visible arrays

mod scroll_dimension;
mod view_layout;

pub use scroll_dimension::{Axis, AxisExtents, ScrollAnchor, ScrollAnchorLimits, ScrollDimension};
pub use view_layout::{
    LayoutInputs, LinedHoverCell, ScrollableViewport, ViewLayout, ViewLayoutColumn, ViewLayoutRow,
};
