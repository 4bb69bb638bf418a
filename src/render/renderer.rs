//! Frame painting.

use tracing::trace;

use super::canvas::CellCanvas;
use super::fingerprint::ViewCellCache;
use super::painter::{CellPaintState, CellPainter, TextCellPainter};
use crate::behavior::SharedUiState;
use crate::error::Result;
use crate::geometry::{PixelRect, Point};
use crate::grid::GridCore;
use crate::layout::{ScrollableViewport, ViewLayout, ViewLayoutColumn, ViewLayoutRow};
use crate::subgrid::SubgridRole;

/// Counters for one painted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub painted: usize,
    pub skipped: usize,
}

/// Layout the cell cache was last synced to.
struct SyncedLayout {
    compute_count: u64,
    canvas_size: (f32, f32),
    grid_lines_color: String,
    viewport: ScrollableViewport,
    columns: Vec<ViewLayoutColumn>,
    rows: Vec<ViewLayoutRow>,
}

impl SyncedLayout {
    fn capture(layout: &ViewLayout, canvas_size: (f32, f32), grid_lines_color: &str) -> Self {
        Self {
            compute_count: layout.compute_count(),
            canvas_size,
            grid_lines_color: grid_lines_color.to_string(),
            viewport: layout.scrollable_viewport(),
            columns: layout.columns().to_vec(),
            rows: layout.rows().to_vec(),
        }
    }

    /// Whether anything outside the scrollable bands moved.
    fn fixed_partitions_differ(&self, other: &SyncedLayout) -> bool {
        self.canvas_size != other.canvas_size
            || self.grid_lines_color != other.grid_lines_color
            || self.viewport != other.viewport
            || !fixed_columns(&self.columns).eq(fixed_columns(&other.columns))
            || !top_rows(&self.rows, &self.viewport).eq(top_rows(&other.rows, &other.viewport))
    }

    /// Canvas areas whose cells or grid lines moved between the two layouts.
    fn moved_bands(&self, other: &SyncedLayout) -> Vec<PixelRect> {
        let (width, height) = self.canvas_size;
        let viewport = &self.viewport;
        let mut bands = Vec::new();
        if !scrollable_columns(&self.columns).eq(scrollable_columns(&other.columns)) {
            bands.push(PixelRect::new(viewport.left, 0.0, width - viewport.left, height));
        }
        if !lower_rows(&self.rows, viewport).eq(lower_rows(&other.rows, &other.viewport)) {
            bands.push(PixelRect::new(0.0, viewport.top, width, height - viewport.top));
        }
        bands
    }
}

fn fixed_columns(columns: &[ViewLayoutColumn]) -> impl Iterator<Item = &ViewLayoutColumn> {
    columns.iter().filter(|c| c.fixed)
}

fn scrollable_columns(columns: &[ViewLayoutColumn]) -> impl Iterator<Item = &ViewLayoutColumn> {
    columns.iter().filter(|c| !c.fixed)
}

/// Header and fixed main rows, above the scrollable viewport.
fn top_rows<'a>(
    rows: &'a [ViewLayoutRow],
    viewport: &'a ScrollableViewport,
) -> impl Iterator<Item = &'a ViewLayoutRow> {
    rows.iter().filter(|r| r.fixed && r.top < viewport.top)
}

/// Scrollable rows plus the trailing rows that follow them.
fn lower_rows<'a>(
    rows: &'a [ViewLayoutRow],
    viewport: &'a ScrollableViewport,
) -> impl Iterator<Item = &'a ViewLayoutRow> {
    rows.iter().filter(|r| !r.fixed || r.top >= viewport.top)
}

/// Paints the visible cells, skipping cells whose fingerprint is unchanged.
///
/// A new layout only clears the bands that moved: scrolling horizontally
/// clears the scrollable columns, scrolling vertically the scrollable rows.
/// Cells in the fixed partitions keep their fingerprints. A change to the
/// fixed partitions, the canvas size or a column drag overlay clears the
/// whole canvas.
pub struct GridRenderer {
    cache: ViewCellCache,
    painter: Box<dyn CellPainter>,
    fingerprinting: bool,
    force_repaint: bool,
    synced: Option<SyncedLayout>,
    overlay_drawn: bool,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new(Box::new(TextCellPainter))
    }
}

impl GridRenderer {
    pub fn new(painter: Box<dyn CellPainter>) -> Self {
        Self {
            cache: ViewCellCache::new(),
            painter,
            fingerprinting: true,
            force_repaint: false,
            synced: None,
            overlay_drawn: false,
        }
    }

    pub fn cache(&self) -> &ViewCellCache {
        &self.cache
    }

    /// Turning fingerprint comparison off only costs extra draws.
    pub fn set_fingerprinting(&mut self, enabled: bool) {
        self.fingerprinting = enabled;
    }

    /// Draw every cell on the next frame.
    pub fn force_repaint(&mut self) {
        self.force_repaint = true;
    }

    pub fn render(
        &mut self,
        core: &mut GridCore,
        shared: &SharedUiState,
        canvas: &mut dyn CellCanvas,
    ) -> Result<PaintStats> {
        let layout = &core.view_layout;
        let settings = &core.settings;
        let mut force = std::mem::replace(&mut self.force_repaint, false);

        let overlay = shared.column_drag.is_some() || self.overlay_drawn;
        let stale = self
            .synced
            .as_ref()
            .map_or(true, |synced| synced.compute_count != layout.compute_count());
        if stale || overlay {
            let canvas_size = (core.canvas_width, core.canvas_height);
            let current = SyncedLayout::capture(layout, canvas_size, &settings.grid_lines_color);
            let cleared = match self.synced.as_ref() {
                Some(previous) if !overlay && !current.fixed_partitions_differ(previous) => {
                    current.moved_bands(previous)
                }
                _ => {
                    force = true;
                    vec![PixelRect::new(0.0, 0.0, canvas_size.0, canvas_size.1)]
                }
            };
            self.cache.sync(layout.columns(), layout.rows(), &current.viewport);
            for area in &cleared {
                canvas.fill_rect(*area, &settings.grid_lines_color)?;
                self.cache.reset_fingerprints_in(area);
            }
            trace!(bands = cleared.len(), force, "cell cache synced");
            self.synced = Some(current);
        }

        let mut stats = PaintStats::default();
        let mut widths = Vec::new();
        for cell in self.cache.cells_mut() {
            let x = cell.view_column.active_column_index;
            let y = cell.view_row.subgrid_row_index;
            let Some(subgrid) = core.subgrid(cell.subgrid) else {
                continue;
            };
            let header = subgrid.role() == SubgridRole::Header;
            let text = core
                .columns
                .active_field(x)
                .map(|field| subgrid.data_server().get_view_value(field, y).to_string())
                .unwrap_or_default();
            let state = CellPaintState {
                text: &text,
                selected: core.selection.is_cell_selected(x, y, cell.subgrid)
                    || (header && core.selection.is_column_selected(x)),
                focused: core.focus.subgrid() == Some(cell.subgrid)
                    && core.focus.current_subgrid_point() == Some(Point::new(x, y)),
                hovered: shared.hover.is_some_and(|h| {
                    h.column.active_column_index == x
                        && h.row.subgrid == cell.subgrid
                        && h.row.subgrid_row_index == y
                }),
                header,
            };
            let fingerprint = self.painter.fingerprint(cell, &state, settings);
            let unchanged = cell.paint_fingerprint.as_ref() == Some(&fingerprint);
            if self.fingerprinting && !force && unchanged {
                stats.skipped += 1;
            } else {
                let width = self.painter.paint(canvas, cell, &fingerprint, settings)?;
                cell.paint_fingerprint = Some(fingerprint);
                cell.measured_width = Some(width);
                stats.painted += 1;
            }
            if subgrid.is_main() {
                if let Some(width) = cell.measured_width {
                    widths.push((x, width));
                }
            }
        }

        self.overlay_drawn = false;
        if let Some(drag) = shared.column_drag {
            if let Some(width) = core.columns.active_column_width(drag.active_column_index) {
                canvas.stroke_rect(
                    PixelRect::new(drag.pointer_x - width / 2.0, 0.0, width, core.canvas_height),
                    &settings.focus_border_color,
                    2.0,
                )?;
                self.overlay_drawn = true;
            }
        }

        for (active_index, width) in widths {
            core.columns.record_content_width(active_index, width);
        }
        trace!(painted = stats.painted, skipped = stats.skipped, "frame painted");
        Ok(stats)
    }
}
