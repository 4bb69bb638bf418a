//! Immutable value types for grid coordinates and areas.
//!
//! Grid coordinates are `usize` indices (active column index, subgrid row
//! index). Pixel geometry uses `f32` like the rest of the layout code.

mod point;
mod rectangle;
mod start_length;

pub use point::Point;
pub use rectangle::{Corner, PixelRect, Rectangle};
pub use start_length::StartLength;
