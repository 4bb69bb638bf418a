//! Visible columns and rows for the current frame.

use serde::Serialize;
use tracing::{trace, warn};

use super::{Axis, AxisExtents, ScrollAnchor, ScrollDimension};
use crate::columns::ColumnsManager;
use crate::geometry::PixelRect;
use crate::settings::GridSettings;
use crate::subgrid::{Subgrid, SubgridId};

/// A column visible in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewLayoutColumn {
    /// Position in the visible column array
    pub index: usize,
    pub active_column_index: usize,
    /// Canvas x of the first pixel (negative when partly scrolled under fixed columns)
    pub left: f32,
    pub width: f32,
    pub right_plus1: f32,
    pub fixed: bool,
}

/// A row visible in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewLayoutRow {
    /// Position in the visible row array
    pub index: usize,
    pub subgrid: SubgridId,
    pub subgrid_row_index: usize,
    pub top: f32,
    pub height: f32,
    pub bottom_plus1: f32,
    pub fixed: bool,
    /// Row of the main (scrollable) subgrid
    pub main: bool,
}

/// Result of hit testing a canvas offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinedHoverCell {
    pub column: ViewLayoutColumn,
    pub row: ViewLayoutRow,
    /// The offset lies on the grid line left of the cell.
    pub is_column_lined: bool,
    /// The offset lies on the grid line above the cell.
    pub is_row_lined: bool,
}

/// Canvas area the scrollable columns and rows are painted into. Fixed
/// columns lie left of it and fixed rows above it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollableViewport {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ScrollableViewport {
    /// Clip `bounds` on the axes where the cell scrolls.
    pub fn clip(&self, bounds: PixelRect, column_fixed: bool, row_fixed: bool) -> PixelRect {
        let mut clip = bounds;
        if !column_fixed {
            clip = clip.intersection(&PixelRect::new(
                self.left,
                bounds.y,
                self.right - self.left,
                bounds.height,
            ));
        }
        if !row_fixed {
            clip = clip.intersection(&PixelRect::new(
                clip.x,
                self.top,
                clip.width,
                self.bottom - self.top,
            ));
        }
        clip
    }
}

/// Borrowed view of the grid state the layout is computed from.
#[derive(Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub settings: &'a GridSettings,
    pub columns: &'a ColumnsManager,
    pub subgrids: &'a [Subgrid],
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl<'a> LayoutInputs<'a> {
    pub fn new(
        settings: &'a GridSettings,
        columns: &'a ColumnsManager,
        subgrids: &'a [Subgrid],
        canvas_width: f32,
        canvas_height: f32,
    ) -> Self {
        Self {
            settings,
            columns,
            subgrids,
            canvas_width,
            canvas_height,
        }
    }

    pub fn main_subgrid_position(&self) -> Option<usize> {
        self.subgrids.iter().position(Subgrid::is_main)
    }

    pub fn horizontal_extents(&self) -> AxisExtents {
        AxisExtents {
            item_sizes: self.columns.active_column_widths(),
            fixed_count: self.columns.fixed_column_count(),
            gap: self.settings.grid_lines_v_width,
            fixed_gap: self.settings.effective_fixed_lines_v_width(),
            leading: 0.0,
            trailing: 0.0,
            canvas_extent: self.canvas_width,
            smooth: self.settings.scroll_horizontally_smoothly,
            right_aligned: self.settings.grid_right_aligned,
        }
    }

    pub fn vertical_extents(&self) -> AxisExtents {
        let settings = self.settings;
        let default_height = settings.default_row_height;
        let gap = settings.grid_lines_h_width;
        let total = |subgrids: &[Subgrid]| -> f32 {
            subgrids
                .iter()
                .map(|s| s.total_height(default_height, gap))
                .sum()
        };
        let (leading, trailing, item_sizes) = match self.main_subgrid_position() {
            Some(main) => {
                let (before, rest) = self.subgrids.split_at(main);
                let (main_subgrid, after) = match rest.split_first() {
                    Some(split) => split,
                    None => return AxisExtents::default(),
                };
                (
                    total(before),
                    total(after),
                    main_subgrid.row_heights(default_height),
                )
            }
            None => (total(self.subgrids), 0.0, Vec::new()),
        };
        AxisExtents {
            item_sizes,
            fixed_count: settings.fixed_row_count,
            gap,
            fixed_gap: settings.effective_fixed_lines_h_width(),
            leading,
            trailing,
            canvas_extent: self.canvas_height,
            smooth: settings.scroll_vertically_smoothly,
            right_aligned: false,
        }
    }
}

/// Both scroll dimensions plus the visible arrays built from them.
///
/// Invalidation only marks state stale. The visible arrays are rebuilt by
/// [`ViewLayout::compute`], which the host runs once per animation frame;
/// the `invalidate_*` methods return `true` when that frame still needs
/// requesting, so any number of invalidations before the frame collapse into
/// one compute.
#[derive(Debug, Clone)]
pub struct ViewLayout {
    horizontal: ScrollDimension,
    vertical: ScrollDimension,
    column_scroll_anchor: ScrollAnchor,
    row_scroll_anchor: ScrollAnchor,
    columns: Vec<ViewLayoutColumn>,
    previous_columns: Vec<ViewLayoutColumn>,
    rows: Vec<ViewLayoutRow>,
    columns_valid: bool,
    rows_valid: bool,
    frame_requested: bool,
    compute_count: u64,
    v_gap: f32,
    fixed_v_gap: f32,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLayout {
    pub fn new() -> Self {
        Self {
            horizontal: ScrollDimension::new(Axis::Horizontal),
            vertical: ScrollDimension::new(Axis::Vertical),
            column_scroll_anchor: ScrollAnchor::default(),
            row_scroll_anchor: ScrollAnchor::default(),
            columns: Vec::new(),
            previous_columns: Vec::new(),
            rows: Vec::new(),
            columns_valid: false,
            rows_valid: false,
            frame_requested: false,
            compute_count: 0,
            v_gap: 0.0,
            fixed_v_gap: 0.0,
        }
    }

    pub fn horizontal(&self) -> &ScrollDimension {
        &self.horizontal
    }

    pub fn vertical(&self) -> &ScrollDimension {
        &self.vertical
    }

    pub fn column_scroll_anchor(&self) -> ScrollAnchor {
        self.column_scroll_anchor
    }

    pub fn row_scroll_anchor(&self) -> ScrollAnchor {
        self.row_scroll_anchor
    }

    pub fn columns(&self) -> &[ViewLayoutColumn] {
        &self.columns
    }

    pub fn previous_columns(&self) -> &[ViewLayoutColumn] {
        &self.previous_columns
    }

    pub fn rows(&self) -> &[ViewLayoutRow] {
        &self.rows
    }

    pub fn scrollable_viewport(&self) -> ScrollableViewport {
        let left = self.horizontal.start();
        let top = self.vertical.start();
        ScrollableViewport {
            left,
            right: left + self.horizontal.viewport_size(),
            top,
            bottom: top + self.vertical.viewport_size(),
        }
    }

    /// Number of compute passes that rebuilt the visible arrays.
    pub fn compute_count(&self) -> u64 {
        self.compute_count
    }

    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn needs_compute(&self) -> bool {
        !self.columns_valid
            || !self.rows_valid
            || !self.horizontal.is_valid()
            || !self.vertical.is_valid()
    }

    fn request_frame(&mut self) -> bool {
        !std::mem::replace(&mut self.frame_requested, true)
    }

    /// Scroll both axes back to the fixed/scrollable boundary.
    pub fn reset(&mut self) -> bool {
        self.horizontal.reset();
        self.vertical.reset();
        self.column_scroll_anchor = self.horizontal.anchor_limits().start();
        self.row_scroll_anchor = self.vertical.anchor_limits().start();
        self.invalidate_all()
    }

    /// Column widths, count, fixed count or canvas width changed.
    pub fn invalidate_horizontal(&mut self) -> bool {
        self.horizontal.invalidate();
        self.columns_valid = false;
        self.request_frame()
    }

    /// Row heights, row count, subgrids or canvas height changed.
    pub fn invalidate_vertical(&mut self) -> bool {
        self.vertical.invalidate();
        self.rows_valid = false;
        self.request_frame()
    }

    pub fn invalidate_all(&mut self) -> bool {
        self.horizontal.invalidate();
        self.vertical.invalidate();
        self.columns_valid = false;
        self.rows_valid = false;
        self.request_frame()
    }

    /// Request a frame without invalidating geometry (repaint only).
    pub fn invalidate_paint(&mut self) -> bool {
        self.request_frame()
    }

    /// Recompute the scroll dimensions if they are stale. Scroll handlers
    /// call this so they work against current geometry; the visible arrays
    /// are left for the frame pass, which then finds the dimensions valid.
    pub fn ensure_dimensions_valid(&mut self, inputs: &LayoutInputs<'_>) {
        let horizontal = self.horizontal.ensure_valid(|| inputs.horizontal_extents());
        let vertical = self.vertical.ensure_valid(|| inputs.vertical_extents());
        if horizontal {
            self.column_scroll_anchor = self.clamped_column_anchor(inputs, self.column_scroll_anchor);
            self.columns_valid = false;
        }
        if vertical {
            self.row_scroll_anchor = self.clamped_row_anchor(inputs, self.row_scroll_anchor);
            self.rows_valid = false;
        }
    }

    fn clamped_column_anchor(&self, inputs: &LayoutInputs<'_>, anchor: ScrollAnchor) -> ScrollAnchor {
        if inputs.settings.scrolling_enabled {
            self.horizontal.clamp_anchor(anchor)
        } else {
            self.horizontal.anchor_limits().start()
        }
    }

    fn clamped_row_anchor(&self, inputs: &LayoutInputs<'_>, anchor: ScrollAnchor) -> ScrollAnchor {
        if inputs.settings.scrolling_enabled {
            self.vertical.clamp_anchor(anchor)
        } else {
            self.vertical.anchor_limits().start()
        }
    }

    /// The animation frame pass. Rebuilds whatever was invalidated and
    /// returns whether anything was rebuilt.
    pub fn compute(&mut self, inputs: &LayoutInputs<'_>) -> bool {
        self.frame_requested = false;
        if !self.needs_compute() {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        // Explicitly set anchors may be out of range.
        self.column_scroll_anchor = self.clamped_column_anchor(inputs, self.column_scroll_anchor);
        self.row_scroll_anchor = self.clamped_row_anchor(inputs, self.row_scroll_anchor);

        if !self.columns_valid {
            self.compute_columns(inputs);
            self.columns_valid = true;
        }
        if !self.rows_valid {
            self.compute_rows(inputs);
            self.rows_valid = true;
        }
        self.compute_count += 1;
        trace!(
            columns = self.columns.len(),
            rows = self.rows.len(),
            column_anchor = ?self.column_scroll_anchor,
            row_anchor = ?self.row_scroll_anchor,
            "view layout computed"
        );
        true
    }

    fn compute_columns(&mut self, inputs: &LayoutInputs<'_>) {
        self.v_gap = inputs.settings.grid_lines_v_width;
        self.fixed_v_gap = inputs.settings.effective_fixed_lines_v_width();

        let dim = &self.horizontal;
        let mut columns = Vec::new();
        for (active_index, left) in dim.fixed_item_offsets().into_iter().enumerate() {
            let width = dim.item_size(active_index);
            columns.push(ViewLayoutColumn {
                index: columns.len(),
                active_column_index: active_index,
                left,
                width,
                right_plus1: left + width,
                fixed: true,
            });
        }

        if dim.has_scrollable_items() {
            let origin = dim.start();
            let viewport_end = origin + dim.viewport_size();
            let viewport_start = dim.viewport_start_for_anchor(self.column_scroll_anchor);
            for active_index in dim.fixed_count()..dim.item_count() {
                let left = origin + dim.scrollable_item_left(active_index) - viewport_start;
                if left + dim.item_span(active_index) <= origin {
                    continue;
                }
                if left >= viewport_end {
                    break;
                }
                let width = dim.item_size(active_index);
                columns.push(ViewLayoutColumn {
                    index: columns.len(),
                    active_column_index: active_index,
                    left,
                    width,
                    right_plus1: left + width,
                    fixed: false,
                });
            }
        }

        self.previous_columns = std::mem::replace(&mut self.columns, columns);
    }

    fn compute_rows(&mut self, inputs: &LayoutInputs<'_>) {
        let settings = inputs.settings;
        let default_height = settings.default_row_height;
        let gap = settings.grid_lines_h_width;
        let dim = &self.vertical;
        let mut rows: Vec<ViewLayoutRow> = Vec::new();

        let push_row = |rows: &mut Vec<ViewLayoutRow>,
                        subgrid: &Subgrid,
                        subgrid_row_index: usize,
                        top: f32,
                        fixed: bool| {
            let height = subgrid.row_height(subgrid_row_index, default_height);
            rows.push(ViewLayoutRow {
                index: rows.len(),
                subgrid: subgrid.id(),
                subgrid_row_index,
                top,
                height,
                bottom_plus1: top + height,
                fixed,
                main: subgrid.is_main(),
            });
            top + height
        };

        let main_position = inputs.main_subgrid_position();
        let (before, main, after) = match main_position {
            Some(position) => {
                let (before, rest) = inputs.subgrids.split_at(position);
                match rest.split_first() {
                    Some((main, after)) => (before, Some(main), after),
                    None => (before, None, rest),
                }
            }
            None => (inputs.subgrids, None, &[][..]),
        };

        let mut y = 0.0;
        for subgrid in before {
            for row_index in 0..subgrid.row_count() {
                y = push_row(&mut rows, subgrid, row_index, y, true) + gap;
            }
        }

        let mut main_end = y;
        if let Some(main) = main {
            for (row_index, top) in dim.fixed_item_offsets().into_iter().enumerate() {
                main_end = push_row(&mut rows, main, row_index, top, true) + gap;
            }
            if dim.fixed_count() > 0 {
                main_end += dim.extents().fixed_gap - gap;
            }
            if dim.has_scrollable_items() {
                let origin = dim.start();
                let viewport_end = origin + dim.viewport_size();
                let viewport_start = dim.viewport_start_for_anchor(self.row_scroll_anchor);
                for row_index in dim.fixed_count()..dim.item_count() {
                    let top = origin + dim.scrollable_item_left(row_index) - viewport_start;
                    if top + dim.item_span(row_index) <= origin {
                        continue;
                    }
                    if top >= viewport_end {
                        break;
                    }
                    main_end = push_row(&mut rows, main, row_index, top, false) + gap;
                }
                main_end = main_end.min(viewport_end);
            }
        }

        // Trailing subgrids follow the main rows but never leave the canvas bottom area.
        let mut y = main_end.max(dim.start());
        for subgrid in after {
            for row_index in 0..subgrid.row_count() {
                if y >= inputs.canvas_height {
                    break;
                }
                y = push_row(&mut rows, subgrid, row_index, y, true) + gap;
            }
        }

        self.rows = rows;
    }

    /// Explicit anchor override. Takes effect, clamped, at the next compute.
    pub fn set_column_scroll_anchor(&mut self, index: usize, offset: f32) -> bool {
        self.column_scroll_anchor = ScrollAnchor::new(index, offset);
        self.columns_valid = false;
        self.request_frame()
    }

    pub fn set_row_scroll_anchor(&mut self, index: usize, offset: f32) -> bool {
        self.row_scroll_anchor = ScrollAnchor::new(index, offset);
        self.rows_valid = false;
        self.request_frame()
    }

    fn apply_column_anchor(&mut self, anchor: ScrollAnchor) -> bool {
        if anchor == self.column_scroll_anchor {
            return false;
        }
        self.column_scroll_anchor = anchor;
        self.columns_valid = false;
        self.request_frame();
        true
    }

    fn apply_row_anchor(&mut self, anchor: ScrollAnchor) -> bool {
        if anchor == self.row_scroll_anchor {
            return false;
        }
        self.row_scroll_anchor = anchor;
        self.rows_valid = false;
        self.request_frame();
        true
    }

    /// Column whose area, including its left grid line, contains canvas `x`.
    /// `None` for unused space before or after the columns.
    pub fn find_left_grid_line_inclusive_column_from_offset(
        &self,
        x: f32,
    ) -> Option<&ViewLayoutColumn> {
        find_line_inclusive(&self.columns, x, |c| c.left, |c| c.right_plus1)
    }

    /// Row whose area, including its top grid line, contains canvas `y`.
    pub fn find_top_grid_line_inclusive_row_from_offset(&self, y: f32) -> Option<&ViewLayoutRow> {
        find_line_inclusive(&self.rows, y, |r| r.top, |r| r.bottom_plus1)
    }

    /// Hit test a canvas offset.
    pub fn find_cell_at_offset(&self, x: f32, y: f32) -> Option<LinedHoverCell> {
        let column = *self.find_left_grid_line_inclusive_column_from_offset(x)?;
        let row = *self.find_top_grid_line_inclusive_row_from_offset(y)?;
        Some(LinedHoverCell {
            column,
            row,
            is_column_lined: x < column.left,
            is_row_lined: y < row.top,
        })
    }

    /// Reverse lookup by active column index: current frame first, then the
    /// previous frame.
    pub fn try_get_column_with_active_index(
        &self,
        active_column_index: usize,
    ) -> Option<&ViewLayoutColumn> {
        self.columns
            .iter()
            .find(|c| c.active_column_index == active_column_index)
            .or_else(|| {
                self.previous_columns
                    .iter()
                    .find(|c| c.active_column_index == active_column_index)
            })
    }

    pub fn try_get_row_with_subgrid_row_index(
        &self,
        subgrid: SubgridId,
        subgrid_row_index: usize,
    ) -> Option<&ViewLayoutRow> {
        self.rows
            .iter()
            .find(|r| r.subgrid == subgrid && r.subgrid_row_index == subgrid_row_index)
    }

    /// Gap between two columns, used to find the grid line following `column`.
    pub fn grid_line_width_after(&self, column: &ViewLayoutColumn) -> f32 {
        let last_fixed = self.horizontal.fixed_count();
        if column.fixed && column.active_column_index + 1 == last_fixed {
            self.fixed_v_gap
        } else {
            self.v_gap
        }
    }

    /// Scrollable main rows fully inside the viewport.
    pub fn fully_visible_scrollable_row_count(&self) -> usize {
        let origin = self.vertical.start();
        let end = origin + self.vertical.viewport_size();
        self.rows
            .iter()
            .filter(|r| r.main && !r.fixed && r.top >= origin && r.bottom_plus1 <= end)
            .count()
    }

    /// Scroll so the cell is visible. Returns whether either anchor moved.
    pub fn ensure_column_row_are_in_view(
        &mut self,
        inputs: &LayoutInputs<'_>,
        x: usize,
        y: usize,
        for_focus: bool,
    ) -> bool {
        let column_scrolled = self.ensure_column_in_view(inputs, x, for_focus);
        let row_scrolled = self.ensure_row_in_view(inputs, y, for_focus);
        column_scrolled || row_scrolled
    }

    pub fn ensure_column_in_view(
        &mut self,
        inputs: &LayoutInputs<'_>,
        active_column_index: usize,
        for_focus: bool,
    ) -> bool {
        if !inputs.settings.scrolling_enabled {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        match anchor_to_bring_into_view(
            &self.horizontal,
            self.column_scroll_anchor,
            active_column_index,
            for_focus,
        ) {
            Some(anchor) => self.apply_column_anchor(anchor),
            None => false,
        }
    }

    pub fn ensure_row_in_view(
        &mut self,
        inputs: &LayoutInputs<'_>,
        main_row_index: usize,
        for_focus: bool,
    ) -> bool {
        if !inputs.settings.scrolling_enabled {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        match anchor_to_bring_into_view(
            &self.vertical,
            self.row_scroll_anchor,
            main_row_index,
            for_focus,
        ) {
            Some(anchor) => self.apply_row_anchor(anchor),
            None => false,
        }
    }

    /// Anchor that scrolls `active_column_index` into view on the side
    /// opposite the current anchor. Logs a warning when the column is not on
    /// that side; the anchor is still computed.
    pub fn calculate_column_scroll_anchor_to_scroll_into_view(
        &mut self,
        inputs: &LayoutInputs<'_>,
        active_column_index: usize,
    ) -> ScrollAnchor {
        self.ensure_dimensions_valid(inputs);
        let right_aligned = inputs.settings.grid_right_aligned;
        let dim = &self.horizontal;
        let anchor_index = self.column_scroll_anchor.index;
        let opposite = if right_aligned {
            active_column_index <= anchor_index
        } else {
            active_column_index >= anchor_index
        };
        if !opposite {
            warn!(
                active_column_index,
                anchor_index, right_aligned, "scroll into view target is on the anchor side"
            );
        }
        dim.calculate_scroll_anchor_to_scroll_into_view(active_column_index, right_aligned)
    }

    /// Step the horizontal anchor by whole columns. `false` at a limit.
    pub fn scroll_columns_by(&mut self, inputs: &LayoutInputs<'_>, delta: isize) -> bool {
        if !inputs.settings.scrolling_enabled || delta == 0 {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = self.horizontal.step_anchor(self.column_scroll_anchor, delta);
        self.apply_column_anchor(anchor)
    }

    pub fn scroll_rows_by(&mut self, inputs: &LayoutInputs<'_>, delta: isize) -> bool {
        if !inputs.settings.scrolling_enabled || delta == 0 {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = self.vertical.step_anchor(self.row_scroll_anchor, delta);
        self.apply_row_anchor(anchor)
    }

    /// Wheel scrolling. Snapped axes move at least one item per call.
    pub fn scroll_horizontal_pixels_by(&mut self, inputs: &LayoutInputs<'_>, dx: f32) -> bool {
        if !inputs.settings.scrolling_enabled || dx == 0.0 {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = pixels_by(&self.horizontal, self.column_scroll_anchor, dx);
        self.apply_column_anchor(anchor)
    }

    pub fn scroll_vertical_pixels_by(&mut self, inputs: &LayoutInputs<'_>, dy: f32) -> bool {
        if !inputs.settings.scrolling_enabled || dy == 0.0 {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = pixels_by(&self.vertical, self.row_scroll_anchor, dy);
        self.apply_row_anchor(anchor)
    }

    /// Scrollbar positioning: scrollable-space pixel at the viewport's left edge.
    pub fn set_horizontal_viewport_start(&mut self, inputs: &LayoutInputs<'_>, start: f32) -> bool {
        if !inputs.settings.scrolling_enabled {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = self.horizontal.calculate_scroll_anchor(start);
        self.apply_column_anchor(anchor)
    }

    pub fn set_vertical_viewport_start(&mut self, inputs: &LayoutInputs<'_>, start: f32) -> bool {
        if !inputs.settings.scrolling_enabled {
            return false;
        }
        self.ensure_dimensions_valid(inputs);
        let anchor = self.vertical.calculate_scroll_anchor(start);
        self.apply_row_anchor(anchor)
    }

    /// Current horizontal viewport start in scrollable space.
    pub fn horizontal_viewport_start(&self) -> f32 {
        self.horizontal.viewport_start_for_anchor(self.column_scroll_anchor)
    }

    pub fn vertical_viewport_start(&self) -> f32 {
        self.vertical.viewport_start_for_anchor(self.row_scroll_anchor)
    }
}

fn find_line_inclusive<T, S, E>(items: &[T], offset: f32, start: S, end: E) -> Option<&T>
where
    S: Fn(&T) -> f32,
    E: Fn(&T) -> f32,
{
    let first = items.first()?;
    if offset < start(first) {
        return None;
    }
    // Items are in canvas order; each one owns the line before it.
    items.iter().find(|item| offset < end(item))
}

fn pixels_by(dim: &ScrollDimension, anchor: ScrollAnchor, delta: f32) -> ScrollAnchor {
    let start = dim.viewport_start_for_anchor(anchor) + delta;
    let moved = dim.calculate_scroll_anchor(start);
    if moved == anchor && !dim.extents().smooth {
        let step = if delta > 0.0 { 1 } else { -1 };
        dim.step_anchor(anchor, step)
    } else {
        moved
    }
}

fn anchor_to_bring_into_view(
    dim: &ScrollDimension,
    anchor: ScrollAnchor,
    index: usize,
    for_focus: bool,
) -> Option<ScrollAnchor> {
    if index < dim.fixed_count() || index >= dim.item_count() || !dim.overflowed() {
        return None;
    }
    let viewport_start = dim.viewport_start_for_anchor(anchor);
    let viewport_end = viewport_start + dim.viewport_size();
    let item_start = dim.scrollable_item_left(index);
    let item_size = dim.item_size(index);
    let item_end = item_start + item_size;
    if item_start >= viewport_start && item_end <= viewport_end {
        return None;
    }
    // An item wider than the viewport counts as in view once any of it shows.
    if for_focus
        && item_size > dim.viewport_size()
        && item_start < viewport_end
        && item_end > viewport_start
    {
        return None;
    }

    let right_aligned = dim.extents().right_aligned;
    let target = if item_start < viewport_start {
        if right_aligned {
            dim.calculate_scroll_anchor_to_scroll_into_view(index, true)
        } else {
            dim.clamp_anchor(ScrollAnchor::new(index, 0.0))
        }
    } else if right_aligned {
        dim.clamp_anchor(ScrollAnchor::new(index, 0.0))
    } else {
        dim.calculate_scroll_anchor_to_scroll_into_view(index, false)
    };
    (target != anchor).then_some(target)
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
    use crate::data::{HeaderDataServer, RowArrayDataServer, SchemaField};
    use crate::subgrid::SubgridRole;

    struct Fixture {
        settings: GridSettings,
        columns: ColumnsManager,
        subgrids: Vec<Subgrid>,
    }

    impl Fixture {
        fn new(column_count: usize, row_count: usize) -> Self {
            let settings = GridSettings {
                grid_lines_v_width: 0.0,
                grid_lines_h_width: 0.0,
                ..GridSettings::default()
            };
            let fields: Vec<SchemaField> = (0..column_count)
                .map(|i| SchemaField::new(i, format!("f{i}")))
                .collect();
            let columns = ColumnsManager::new(&fields, &settings);
            let rows = (0..row_count).map(|_| Vec::new()).collect();
            let subgrids = vec![
                Subgrid::new(SubgridId(0), SubgridRole::Header, Box::new(HeaderDataServer::new())),
                Subgrid::new(SubgridId(1), SubgridRole::Main, Box::new(RowArrayDataServer::new(rows))),
            ];
            Self {
                settings,
                columns,
                subgrids,
            }
        }

        fn inputs(&self, width: f32, height: f32) -> LayoutInputs<'_> {
            LayoutInputs::new(&self.settings, &self.columns, &self.subgrids, width, height)
        }
    }

    #[test]
    fn compute_builds_header_and_visible_main_rows() {
        let fx = Fixture::new(5, 100);
        let mut layout = ViewLayout::new();
        assert!(layout.invalidate_all());
        assert!(layout.compute(&fx.inputs(250.0, 100.0)));
        // Header row plus 4 main rows of 20 px in the remaining 80 px.
        assert_eq!(layout.rows().len(), 5);
        assert!(!layout.rows()[0].main);
        assert_eq!(layout.rows()[1].top, 20.0);
        // 100 px columns in 250 px: columns 0, 1 and part of 2.
        assert_eq!(layout.columns().len(), 3);
        assert_eq!(layout.columns()[2].left, 200.0);
    }

    #[test]
    fn invalidations_coalesce_into_one_frame() {
        let fx = Fixture::new(5, 10);
        let mut layout = ViewLayout::new();
        assert!(layout.invalidate_horizontal());
        assert!(!layout.invalidate_vertical());
        assert!(!layout.set_column_scroll_anchor(1, 0.0));
        assert!(layout.compute(&fx.inputs(250.0, 100.0)));
        assert!(!layout.compute(&fx.inputs(250.0, 100.0)));
        assert_eq!(layout.compute_count(), 1);
    }

    #[test]
    fn grid_line_belongs_to_next_column() {
        let mut fx = Fixture::new(3, 1);
        fx.settings.grid_lines_v_width = 1.0;
        let mut layout = ViewLayout::new();
        layout.invalidate_all();
        layout.compute(&fx.inputs(400.0, 100.0));
        let col = layout.find_left_grid_line_inclusive_column_from_offset(100.0).unwrap();
        assert_eq!(col.active_column_index, 1);
        let hit = layout.find_cell_at_offset(100.0, 25.0).unwrap();
        assert!(hit.is_column_lined);
        assert!(layout.find_left_grid_line_inclusive_column_from_offset(350.0).is_none());
    }

    #[test]
    fn previous_frame_lookup_survives_scroll() {
        let fx = Fixture::new(10, 1);
        let mut layout = ViewLayout::new();
        layout.invalidate_all();
        layout.compute(&fx.inputs(250.0, 100.0));
        assert!(layout.scroll_columns_by(&fx.inputs(250.0, 100.0), 3));
        layout.compute(&fx.inputs(250.0, 100.0));
        assert!(layout.columns().iter().all(|c| c.active_column_index != 0));
        assert!(layout.try_get_column_with_active_index(0).is_some());
    }

    #[test]
    fn ensure_in_view_scrolls_right_then_left() {
        let fx = Fixture::new(10, 1);
        let inputs = fx.inputs(250.0, 100.0);
        let mut layout = ViewLayout::new();
        layout.invalidate_all();
        layout.compute(&inputs);
        assert!(layout.ensure_column_in_view(&inputs, 6, false));
        layout.compute(&inputs);
        let col = layout.try_get_column_with_active_index(6).unwrap();
        assert!(col.right_plus1 <= 250.0);
        assert!(!layout.ensure_column_in_view(&inputs, 6, false));
        assert!(layout.ensure_column_in_view(&inputs, 1, false));
        assert_eq!(layout.column_scroll_anchor(), ScrollAnchor::new(1, 0.0));
    }

    #[test]
    fn scroll_columns_by_stops_at_limits() {
        let fx = Fixture::new(4, 1);
        let inputs = fx.inputs(250.0, 100.0);
        let mut layout = ViewLayout::new();
        layout.invalidate_all();
        layout.compute(&inputs);
        assert!(!layout.scroll_columns_by(&inputs, -1));
        assert!(layout.scroll_columns_by(&inputs, 1));
        layout.compute(&inputs);
        while layout.scroll_columns_by(&inputs, 1) {
            layout.compute(&inputs);
        }
        let limits = layout.horizontal().anchor_limits();
        assert_eq!(layout.column_scroll_anchor(), limits.finish());
    }

    #[test]
    fn scrolling_disabled_pins_anchor() {
        let mut fx = Fixture::new(10, 1);
        fx.settings.scrolling_enabled = false;
        let inputs = fx.inputs(250.0, 100.0);
        let mut layout = ViewLayout::new();
        layout.set_column_scroll_anchor(5, 0.0);
        layout.compute(&inputs);
        assert_eq!(layout.column_scroll_anchor(), ScrollAnchor::new(0, 0.0));
        assert!(!layout.scroll_columns_by(&inputs, 1));
    }
}
