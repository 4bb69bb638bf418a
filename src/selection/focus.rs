//! The focused cell.

use tracing::debug;

use super::index_after_move;
use crate::geometry::Point;
use crate::subgrid::SubgridId;

/// Single focused cell of the grid, or none.
///
/// The point may go stale when rows or columns change underneath it; the
/// grid forwards index adjustments and reindex restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    current: Option<Point>,
    subgrid: Option<SubgridId>,
    main_subgrid: SubgridId,
}

impl Focus {
    pub fn new(main_subgrid: SubgridId) -> Self {
        Self {
            current: None,
            subgrid: None,
            main_subgrid,
        }
    }

    pub fn current_subgrid_point(&self) -> Option<Point> {
        self.current
    }

    pub fn current_x(&self) -> Option<usize> {
        self.current.map(|p| p.x)
    }

    pub fn current_y(&self) -> Option<usize> {
        self.current.map(|p| p.y)
    }

    pub fn subgrid(&self) -> Option<SubgridId> {
        self.subgrid
    }

    pub fn main_subgrid(&self) -> SubgridId {
        self.main_subgrid
    }

    pub fn is_main_subgrid_grid_point_focused(&self, x: usize, y: usize) -> bool {
        self.subgrid == Some(self.main_subgrid) && self.current == Some(Point::new(x, y))
    }

    pub fn is_main_subgrid_row_focused(&self, y: usize) -> bool {
        self.subgrid == Some(self.main_subgrid) && self.current_y() == Some(y)
    }

    /// Returns whether the focus changed.
    pub fn set(&mut self, point: Point, subgrid: SubgridId) -> bool {
        if self.current == Some(point) && self.subgrid == Some(subgrid) {
            return false;
        }
        self.current = Some(point);
        self.subgrid = Some(subgrid);
        debug!(x = point.x, y = point.y, %subgrid, "focus set");
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.current = None;
        self.subgrid = None;
        true
    }

    /// Move by `(dx, dy)` within `column_count` x `row_count`. Without focus
    /// nothing moves. Returns the new point when it changed.
    pub fn try_move(
        &mut self,
        dx: isize,
        dy: isize,
        column_count: usize,
        row_count: usize,
    ) -> Option<Point> {
        let current = self.current?;
        let subgrid = self.subgrid?;
        if column_count == 0 || row_count == 0 {
            return None;
        }
        let target = Point::new(
            offset_clamped(current.x, dx, column_count),
            offset_clamped(current.y, dy, row_count),
        );
        if self.set(target, subgrid) {
            Some(target)
        } else {
            None
        }
    }

    pub fn rows_inserted(&mut self, subgrid: SubgridId, index: usize, count: usize) {
        if self.subgrid != Some(subgrid) {
            return;
        }
        if let Some(point) = &mut self.current {
            if point.y >= index {
                point.y += count;
            }
        }
    }

    /// Focus on a deleted row is cleared.
    pub fn rows_deleted(&mut self, subgrid: SubgridId, index: usize, count: usize) {
        if self.subgrid != Some(subgrid) {
            return;
        }
        if let Some(point) = self.current {
            if point.y >= index + count {
                self.current = Some(point.with_y(point.y - count));
            } else if point.y >= index {
                self.clear();
            }
        }
    }

    pub fn rows_moved(&mut self, subgrid: SubgridId, old_index: usize, new_index: usize, count: usize) {
        if self.subgrid != Some(subgrid) {
            return;
        }
        if let Some(point) = &mut self.current {
            point.y = index_after_move(point.y, old_index, new_index, count);
        }
    }

    pub fn columns_inserted(&mut self, index: usize, count: usize) {
        if let Some(point) = &mut self.current {
            if point.x >= index {
                point.x += count;
            }
        }
    }

    pub fn columns_deleted(&mut self, index: usize, count: usize) {
        if let Some(point) = self.current {
            if point.x >= index + count {
                self.current = Some(point.with_x(point.x - count));
            } else if point.x >= index {
                self.clear();
            }
        }
    }

    pub fn columns_moved(&mut self, old_index: usize, new_index: usize, count: usize) {
        if let Some(point) = &mut self.current {
            point.x = index_after_move(point.x, old_index, new_index, count);
        }
    }
}

fn offset_clamped(value: usize, delta: isize, count: usize) -> usize {
    let moved = if delta < 0 {
        value.saturating_sub(delta.unsigned_abs())
    } else {
        value.saturating_add(delta.unsigned_abs())
    };
    moved.min(count - 1)
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

    const MAIN: SubgridId = SubgridId(1);

    #[test]
    fn main_subgrid_queries() {
        let mut focus = Focus::new(MAIN);
        assert!(!focus.is_main_subgrid_row_focused(0));
        focus.set(Point::new(2, 3), MAIN);
        assert!(focus.is_main_subgrid_grid_point_focused(2, 3));
        assert!(focus.is_main_subgrid_row_focused(3));
        focus.set(Point::new(2, 0), SubgridId(0));
        assert!(!focus.is_main_subgrid_row_focused(0));
    }

    #[test]
    fn try_move_clamps_to_bounds() {
        let mut focus = Focus::new(MAIN);
        assert_eq!(focus.try_move(1, 0, 5, 5), None);
        focus.set(Point::new(4, 0), MAIN);
        assert_eq!(focus.try_move(1, 0, 5, 5), None);
        assert_eq!(focus.try_move(-2, 10, 5, 5), Some(Point::new(2, 4)));
    }

    #[test]
    fn deleted_row_clears_focus() {
        let mut focus = Focus::new(MAIN);
        focus.set(Point::new(0, 5), MAIN);
        focus.rows_deleted(MAIN, 0, 2);
        assert_eq!(focus.current_y(), Some(3));
        focus.rows_deleted(MAIN, 3, 1);
        assert_eq!(focus.current_subgrid_point(), None);
        assert_eq!(focus.subgrid(), None);
    }
}
