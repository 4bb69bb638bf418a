use serde::{Deserialize, Serialize};

/// A cell coordinate: `x` is the active column index, `y` the subgrid row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns a copy with `x` replaced.
    pub const fn with_x(self, x: usize) -> Self {
        Self { x, y: self.y }
    }

    /// Returns a copy with `y` replaced.
    pub const fn with_y(self, y: usize) -> Self {
        Self { x: self.x, y }
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}
