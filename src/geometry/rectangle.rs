use serde::{Deserialize, Serialize};

use super::{Point, StartLength};

/// Which corner of a rectangle a gesture started from.
///
/// The opposite corner is the one that moves while a drag extends the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Corner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    fn from_reversed(x_reversed: bool, y_reversed: bool) -> Self {
        match (x_reversed, y_reversed) {
            (false, false) => Corner::TopLeft,
            (true, false) => Corner::TopRight,
            (false, true) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        }
    }

    fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }
}

/// An area of cells. `width`/`height` count cells; `x + width` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub first_corner: Corner,
}

impl Rectangle {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            first_corner: Corner::TopLeft,
        }
    }

    /// A 1x1 rectangle at `point`.
    pub const fn single_cell(point: Point) -> Self {
        Self::new(point.x, point.y, 1, 1)
    }

    /// Build from per-axis start/length pairs that may run backwards.
    ///
    /// The first corner records which way each axis was dragged.
    pub fn from_start_lengths(xs: StartLength, ys: StartLength) -> Self {
        let (x, width) = xs.to_unsigned();
        let (y, height) = ys.to_unsigned();
        Self {
            x,
            y,
            width,
            height,
            first_corner: Corner::from_reversed(xs.is_reversed(), ys.is_reversed()),
        }
    }

    /// Rectangle covering `first..=last` on both axes, anchored at `first`.
    pub fn from_first_last(first: Point, last: Point) -> Self {
        Self::from_start_lengths(
            StartLength::create_exclusive_from_first_last(first.x, last.x),
            StartLength::create_exclusive_from_first_last(first.y, last.y),
        )
    }

    pub const fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn exclusive_bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub const fn exclusive_right(&self) -> usize {
        self.x + self.width
    }

    pub const fn exclusive_bottom(&self) -> usize {
        self.y + self.height
    }

    pub const fn size(&self) -> usize {
        self.width * self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn is_single_cell(&self) -> bool {
        self.width == 1 && self.height == 1
    }

    /// The inclusive cell the gesture started from.
    pub fn first_corner_point(&self) -> Point {
        let right = self.exclusive_right().saturating_sub(1);
        let bottom = self.exclusive_bottom().saturating_sub(1);
        Point::new(
            if self.first_corner.is_right() { right } else { self.x },
            if self.first_corner.is_bottom() { bottom } else { self.y },
        )
    }

    /// The inclusive cell diagonally opposite the first corner.
    pub fn last_corner_point(&self) -> Point {
        let right = self.exclusive_right().saturating_sub(1);
        let bottom = self.exclusive_bottom().saturating_sub(1);
        Point::new(
            if self.first_corner.is_right() { self.x } else { right },
            if self.first_corner.is_bottom() { self.y } else { bottom },
        )
    }

    pub const fn contains_x(&self, x: usize) -> bool {
        x >= self.x && x < self.x + self.width
    }

    pub const fn contains_y(&self, y: usize) -> bool {
        y >= self.y && y < self.y + self.height
    }

    pub const fn contains(&self, x: usize, y: usize) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }

    /// Shift/grow for `count` columns inserted at `index`.
    pub fn x_range_inserted(self, index: usize, count: usize) -> Self {
        let (x, width) = interval_inserted(self.x, self.width, index, count);
        Self { x, width, ..self }
    }

    /// Shift/grow for `count` rows inserted at `index`.
    pub fn y_range_inserted(self, index: usize, count: usize) -> Self {
        let (y, height) = interval_inserted(self.y, self.height, index, count);
        Self { y, height, ..self }
    }

    /// Returns `None` when every column of the rectangle was deleted.
    pub fn x_range_deleted(self, index: usize, count: usize) -> Option<Self> {
        let (x, width) = interval_deleted(self.x, self.width, index, count)?;
        Some(Self { x, width, ..self })
    }

    /// Returns `None` when every row of the rectangle was deleted.
    pub fn y_range_deleted(self, index: usize, count: usize) -> Option<Self> {
        let (y, height) = interval_deleted(self.y, self.height, index, count)?;
        Some(Self { y, height, ..self })
    }
}

fn interval_inserted(start: usize, length: usize, index: usize, count: usize) -> (usize, usize) {
    if index <= start {
        (start + count, length)
    } else if index < start + length {
        (start, length + count)
    } else {
        (start, length)
    }
}

fn interval_deleted(
    start: usize,
    length: usize,
    index: usize,
    count: usize,
) -> Option<(usize, usize)> {
    let end = start + length;
    let deleted_end = index + count;
    if deleted_end <= start {
        return Some((start - count, length));
    }
    if index >= end {
        return Some((start, length));
    }
    let overlap = end.min(deleted_end) - start.max(index);
    let remaining = length - overlap;
    if remaining == 0 {
        None
    } else {
        Some((start.min(index), remaining))
    }
}

/// A pixel rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlap of two rectangles; zero sized when they do not overlap.
    pub fn intersection(&self, other: &PixelRect) -> PixelRect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        PixelRect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        !self.intersection(other).is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_backward_drags_normalise_to_same_area() {
        let forward = Rectangle::from_first_last(Point::new(2, 2), Point::new(5, 5));
        let backward = Rectangle::from_first_last(Point::new(5, 5), Point::new(2, 2));
        assert_eq!((forward.x, forward.y, forward.width, forward.height), (2, 2, 4, 4));
        assert_eq!(
            (backward.x, backward.y, backward.width, backward.height),
            (2, 2, 4, 4)
        );
        assert_eq!(forward.first_corner, Corner::TopLeft);
        assert_eq!(backward.first_corner, Corner::BottomRight);
    }

    #[test]
    fn corners_track_the_anchor() {
        let rect = Rectangle::from_first_last(Point::new(6, 1), Point::new(2, 4));
        assert_eq!(rect.first_corner, Corner::TopRight);
        assert_eq!(rect.first_corner_point(), Point::new(6, 1));
        assert_eq!(rect.last_corner_point(), Point::new(2, 4));
        assert_eq!(rect.top_left(), Point::new(2, 1));
        assert_eq!(rect.exclusive_bottom_right(), Point::new(7, 5));
        assert_eq!(rect.size(), 20);
    }

    #[test]
    fn pixel_rect_intersection() {
        let cell = PixelRect::new(60.0, 20.0, 100.0, 20.0);
        let viewport = PixelRect::new(100.0, 0.0, 350.0, 200.0);
        assert_eq!(cell.intersection(&viewport), PixelRect::new(100.0, 20.0, 60.0, 20.0));
        assert!(cell.intersects(&viewport));

        let fixed = PixelRect::new(0.0, 0.0, 100.0, 200.0);
        let beside = PixelRect::new(100.0, 0.0, 50.0, 20.0);
        assert!(beside.intersection(&fixed).is_empty());
        assert!(!beside.intersects(&fixed));
    }

    #[test]
    fn rows_deleted_inside_shrinks() {
        let rect = Rectangle::new(0, 5, 1, 5);
        let after = rect.y_range_deleted(6, 2).unwrap();
        assert_eq!((after.y, after.height), (5, 3));
    }

    #[test]
    fn rows_deleted_before_shifts() {
        let rect = Rectangle::new(0, 5, 1, 2);
        let after = rect.y_range_deleted(0, 3).unwrap();
        assert_eq!((after.y, after.height), (2, 2));
    }

    #[test]
    fn rows_deleted_overlapping_start() {
        let rect = Rectangle::new(0, 5, 1, 4);
        let after = rect.y_range_deleted(3, 4).unwrap();
        assert_eq!((after.y, after.height), (3, 2));
    }

    #[test]
    fn rows_deleted_covering_everything() {
        let rect = Rectangle::new(0, 5, 1, 2);
        assert!(rect.y_range_deleted(4, 10).is_none());
    }

    #[test]
    fn columns_inserted_inside_grows() {
        let rect = Rectangle::new(2, 0, 3, 1);
        assert_eq!(rect.x_range_inserted(3, 2).width, 5);
        assert_eq!(rect.x_range_inserted(2, 2).x, 4);
        assert_eq!(rect.x_range_inserted(5, 2), rect);
    }

    #[test]
    fn pixel_rect_contains_is_half_open() {
        let r = PixelRect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(10.0, 14.9));
        assert!(!r.contains(15.0, 12.0));
    }
}
