//! Per-cell paint memo.
//!
//! Each visible cell slot carries the fingerprint of its last paint. A
//! painter computes the new fingerprint first; when it equals the stored one
//! the draw is skipped and the stored measured width reused.

use crate::geometry::PixelRect;
use crate::layout::{ScrollableViewport, ViewLayoutColumn, ViewLayoutRow};
use std::collections::HashMap;
use crate::subgrid::SubgridId;

/// Everything that decides how a cell looks.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPaintFingerprint {
    pub bounds: PixelRect,
    pub clip: PixelRect,
    pub text: String,
    pub font: String,
    pub color: String,
    pub background_color: String,
    pub selected: bool,
    pub focused: bool,
    pub hovered: bool,
}

/// Logical identity of the cell shown in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LogicalCell {
    active_column_index: usize,
    subgrid: SubgridId,
    subgrid_row_index: usize,
}

/// A visible cell as handed to painters.
#[derive(Debug, Clone)]
pub struct ViewCell {
    pub bounds: PixelRect,
    /// Part of `bounds` that may be drawn. Scrollable cells partly scrolled
    /// under the fixed columns or rows are cut back to the scrollable viewport.
    pub clip: PixelRect,
    pub view_column: ViewLayoutColumn,
    pub view_row: ViewLayoutRow,
    pub subgrid: SubgridId,
    /// Fingerprint of the last paint of this slot, if it still shows the
    /// same logical cell.
    pub paint_fingerprint: Option<CellPaintFingerprint>,
    /// Content width measured by the last paint.
    pub measured_width: Option<f32>,
}

impl ViewCell {
    fn new(
        view_column: ViewLayoutColumn,
        view_row: ViewLayoutRow,
        viewport: &ScrollableViewport,
    ) -> Self {
        let bounds = PixelRect::new(
            view_column.left,
            view_row.top,
            view_column.width,
            view_row.height,
        );
        Self {
            bounds,
            clip: viewport.clip(bounds, view_column.fixed, view_row.fixed),
            view_column,
            view_row,
            subgrid: view_row.subgrid,
            paint_fingerprint: None,
            measured_width: None,
        }
    }

    fn logical(&self) -> LogicalCell {
        LogicalCell {
            active_column_index: self.view_column.active_column_index,
            subgrid: self.subgrid,
            subgrid_row_index: self.view_row.subgrid_row_index,
        }
    }
}

/// Row-major cells for the visible columns and rows.
#[derive(Debug, Default)]
pub struct ViewCellCache {
    cells: Vec<ViewCell>,
    column_count: usize,
}

impl ViewCellCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the slots for a new layout. A cell keeps its fingerprint when
    /// the same logical cell was visible before, wherever its slot was.
    pub fn sync(
        &mut self,
        columns: &[ViewLayoutColumn],
        rows: &[ViewLayoutRow],
        viewport: &ScrollableViewport,
    ) {
        let mut previous: HashMap<LogicalCell, ViewCell> = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|cell| (cell.logical(), cell))
            .collect();
        let mut cells = Vec::with_capacity(columns.len() * rows.len());
        for row in rows {
            for column in columns {
                let mut cell = ViewCell::new(*column, *row, viewport);
                if let Some(old) = previous.remove(&cell.logical()) {
                    cell.paint_fingerprint = old.paint_fingerprint;
                    cell.measured_width = old.measured_width;
                }
                cells.push(cell);
            }
        }
        self.cells = cells;
        self.column_count = columns.len();
    }

    pub fn cells(&self) -> &[ViewCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [ViewCell] {
        &mut self.cells
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&ViewCell> {
        if column >= self.column_count {
            return None;
        }
        self.cells.get(row * self.column_count + column)
    }

    /// Forget every fingerprint so the next paint draws everything.
    pub fn reset_fingerprints(&mut self) {
        for cell in &mut self.cells {
            cell.paint_fingerprint = None;
        }
    }

    /// Forget the fingerprints of cells drawn inside `area`, which is about
    /// to be cleared.
    pub fn reset_fingerprints_in(&mut self, area: &PixelRect) {
        for cell in self.cells.iter_mut().filter(|c| c.clip.intersects(area)) {
            cell.paint_fingerprint = None;
        }
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

    const MAIN: SubgridId = SubgridId(1);

    fn column(index: usize, active_column_index: usize, left: f32, fixed: bool) -> ViewLayoutColumn {
        ViewLayoutColumn {
            index,
            active_column_index,
            left,
            width: 100.0,
            right_plus1: left + 100.0,
            fixed,
        }
    }

    fn row(index: usize, subgrid_row_index: usize, top: f32) -> ViewLayoutRow {
        ViewLayoutRow {
            index,
            subgrid: MAIN,
            subgrid_row_index,
            top,
            height: 20.0,
            bottom_plus1: top + 20.0,
            fixed: false,
            main: true,
        }
    }

    fn viewport() -> ScrollableViewport {
        ScrollableViewport {
            left: 100.0,
            right: 450.0,
            top: 0.0,
            bottom: 200.0,
        }
    }

    fn fingerprint(text: &str) -> CellPaintFingerprint {
        CellPaintFingerprint {
            bounds: PixelRect::default(),
            clip: PixelRect::default(),
            text: text.to_string(),
            font: String::new(),
            color: String::new(),
            background_color: String::new(),
            selected: false,
            focused: false,
            hovered: false,
        }
    }

    #[test]
    fn scrolled_cells_are_clipped_to_viewport() {
        let mut cache = ViewCellCache::new();
        let columns = [column(0, 0, 0.0, true), column(1, 1, 60.0, false)];
        cache.sync(&columns, &[row(0, 0, 0.0)], &viewport());

        let fixed = cache.get(0, 0).unwrap();
        assert_eq!(fixed.clip, fixed.bounds);
        let scrolled = cache.get(1, 0).unwrap();
        assert_eq!(scrolled.bounds.x, 60.0);
        assert_eq!(scrolled.clip, PixelRect::new(100.0, 0.0, 60.0, 20.0));
    }

    #[test]
    fn fingerprints_follow_logical_cells_across_slots() {
        let mut cache = ViewCellCache::new();
        let rows = [row(0, 0, 0.0), row(1, 1, 20.0)];
        cache.sync(&[column(0, 1, 100.0, false)], &rows, &viewport());
        cache.cells_mut()[1].paint_fingerprint = Some(fingerprint("r1"));

        // Scrolled by one row: row 1 now sits in the first slot.
        let rows = [row(0, 1, 0.0), row(1, 2, 20.0)];
        cache.sync(&[column(0, 1, 100.0, false)], &rows, &viewport());
        assert_eq!(cache.get(0, 0).unwrap().paint_fingerprint, Some(fingerprint("r1")));
        assert!(cache.get(0, 1).unwrap().paint_fingerprint.is_none());
    }

    #[test]
    fn reset_in_area_only_touches_overlapping_cells() {
        let mut cache = ViewCellCache::new();
        let columns = [column(0, 0, 0.0, true), column(1, 1, 100.0, false)];
        cache.sync(&columns, &[row(0, 0, 0.0)], &viewport());
        for cell in cache.cells_mut() {
            cell.paint_fingerprint = Some(fingerprint("x"));
        }
        cache.reset_fingerprints_in(&PixelRect::new(100.0, 0.0, 350.0, 200.0));
        assert!(cache.get(0, 0).unwrap().paint_fingerprint.is_some());
        assert!(cache.get(1, 0).unwrap().paint_fingerprint.is_none());
    }
}
