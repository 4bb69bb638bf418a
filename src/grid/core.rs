//! State shared by the grid API and its behaviours.

use tracing::debug;

use super::clipboard;
use super::events::GridEvent;
use crate::columns::ColumnsManager;
use crate::data::{DataServer, SchemaServer};
use crate::layout::{LayoutInputs, LinedHoverCell, ViewLayout};
use crate::selection::{Focus, Selection};
use crate::settings::GridSettings;
use crate::subgrid::{Subgrid, SubgridId, SubgridRole};

/// Everything a behaviour may read or mutate.
///
/// Fields are public so behaviours can borrow them disjointly; the helper
/// methods keep the cross-cutting updates (selection bounds, layout
/// invalidation, host events) consistent.
pub struct GridCore {
    pub settings: GridSettings,
    pub schema: Box<dyn SchemaServer>,
    pub columns: ColumnsManager,
    pub subgrids: Vec<Subgrid>,
    pub main_subgrid: SubgridId,
    pub view_layout: ViewLayout,
    pub selection: Selection,
    pub focus: Focus,
    pub canvas_width: f32,
    pub canvas_height: f32,
    events: Vec<GridEvent>,
}

impl GridCore {
    pub fn new(
        settings: GridSettings,
        schema: Box<dyn SchemaServer>,
        subgrids: Vec<Subgrid>,
        main_subgrid: SubgridId,
    ) -> Self {
        let mut columns = ColumnsManager::new(schema.get_fields(), &settings);
        columns.set_fixed_column_count(settings.fixed_column_count);
        let selection = Selection::new(&settings);
        let mut core = Self {
            settings,
            schema,
            columns,
            subgrids,
            main_subgrid,
            view_layout: ViewLayout::new(),
            selection,
            focus: Focus::new(main_subgrid),
            canvas_width: 0.0,
            canvas_height: 0.0,
            events: Vec::new(),
        };
        core.sync_selection_bounds();
        core
    }

    /// Run `f` with the layout and the inputs it is computed from.
    pub fn with_layout<R>(&mut self, f: impl FnOnce(&mut ViewLayout, &LayoutInputs<'_>) -> R) -> R {
        let Self {
            settings,
            columns,
            subgrids,
            view_layout,
            canvas_width,
            canvas_height,
            ..
        } = self;
        let inputs = LayoutInputs::new(settings, columns, subgrids, *canvas_width, *canvas_height);
        f(view_layout, &inputs)
    }

    pub fn compute_layout(&mut self) -> bool {
        self.with_layout(|layout, inputs| layout.compute(inputs))
    }

    pub fn subgrid(&self, id: SubgridId) -> Option<&Subgrid> {
        self.subgrids.iter().find(|s| s.id() == id)
    }

    pub fn subgrid_mut(&mut self, id: SubgridId) -> Option<&mut Subgrid> {
        self.subgrids.iter_mut().find(|s| s.id() == id)
    }

    pub fn subgrid_role(&self, id: SubgridId) -> Option<SubgridRole> {
        self.subgrid(id).map(Subgrid::role)
    }

    pub fn main_data_server(&self) -> Option<&dyn DataServer> {
        self.subgrid(self.main_subgrid).map(Subgrid::data_server)
    }

    pub fn main_row_count(&self) -> usize {
        self.subgrid(self.main_subgrid).map_or(0, Subgrid::row_count)
    }

    pub fn column_count(&self) -> usize {
        self.columns.active_column_count()
    }

    /// Keep whole-row and whole-column areas spanning the current extent.
    pub fn sync_selection_bounds(&mut self) {
        let columns = self.column_count();
        let rows = self.main_row_count();
        self.selection.set_bounds(columns, rows);
    }

    /// Hit test against the last computed layout.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<LinedHoverCell> {
        self.view_layout.find_cell_at_offset(x, y)
    }

    pub fn invalidate_paint(&mut self) {
        self.view_layout.invalidate_paint();
    }

    pub fn invalidate_horizontal(&mut self) {
        self.view_layout.invalidate_horizontal();
    }

    pub fn invalidate_vertical(&mut self) {
        self.view_layout.invalidate_vertical();
    }

    pub fn invalidate_all(&mut self) {
        self.view_layout.invalidate_all();
    }

    /// Scroll so the main subgrid cell is visible.
    pub fn ensure_in_view(&mut self, x: usize, y: usize, for_focus: bool) -> bool {
        self.with_layout(|layout, inputs| layout.ensure_column_row_are_in_view(inputs, x, y, for_focus))
    }

    pub fn ensure_column_in_view(&mut self, x: usize, for_focus: bool) -> bool {
        self.with_layout(|layout, inputs| layout.ensure_column_in_view(inputs, x, for_focus))
    }

    pub fn ensure_row_in_view(&mut self, y: usize, for_focus: bool) -> bool {
        self.with_layout(|layout, inputs| layout.ensure_row_in_view(inputs, y, for_focus))
    }

    pub fn scroll_columns_by(&mut self, delta: isize) -> bool {
        self.with_layout(|layout, inputs| layout.scroll_columns_by(inputs, delta))
    }

    pub fn scroll_rows_by(&mut self, delta: isize) -> bool {
        self.with_layout(|layout, inputs| layout.scroll_rows_by(inputs, delta))
    }

    pub fn scroll_pixels_by(&mut self, dx: f32, dy: f32) -> bool {
        self.with_layout(|layout, inputs| {
            let horizontal = layout.scroll_horizontal_pixels_by(inputs, dx);
            let vertical = layout.scroll_vertical_pixels_by(inputs, dy);
            horizontal || vertical
        })
    }

    /// Move the active column at `from` next to the one at `target`, carrying
    /// selection and focus along.
    pub fn move_active_column(&mut self, from: usize, target: usize, after: bool) -> bool {
        let moved = if after {
            self.columns.move_column_after(from, target)
        } else {
            self.columns.move_column_before(from, target)
        };
        if !moved {
            return false;
        }
        let to = ColumnsManager::moved_to(from, target, after);
        self.selection.columns_moved(from, to, 1);
        self.focus.columns_moved(from, to, 1);
        self.invalidate_horizontal();
        self.push_event(GridEvent::ColumnsChanged);
        true
    }

    pub fn hide_active_column(&mut self, active_index: usize) -> bool {
        if !self.columns.hide_active_column(active_index) {
            return false;
        }
        self.selection.columns_deleted(active_index, 1);
        self.focus.columns_deleted(active_index, 1);
        self.sync_selection_bounds();
        self.invalidate_horizontal();
        self.push_event(GridEvent::ColumnsChanged);
        true
    }

    /// Bring a hidden field back as an active column at `at` (or at the end).
    pub fn show_field(&mut self, field_index: usize, at: Option<usize>) -> bool {
        if !self.columns.show_field(field_index, at) {
            return false;
        }
        self.sync_selection_bounds();
        if let Some(active_index) = self.columns.active_index_of_field(field_index) {
            self.selection.columns_inserted(active_index, 1);
            self.focus.columns_inserted(active_index, 1);
        }
        self.invalidate_horizontal();
        self.push_event(GridEvent::ColumnsChanged);
        true
    }

    pub fn set_active_column_width(&mut self, active_index: usize, width: f32) -> bool {
        if !self
            .columns
            .set_active_column_width(active_index, width, &self.settings)
        {
            return false;
        }
        self.invalidate_horizontal();
        true
    }

    /// Fit a column to the widest content painted in it so far.
    pub fn autosize_active_column(&mut self, active_index: usize) -> bool {
        if !self
            .columns
            .autosize_active_column(active_index, &self.settings)
        {
            return false;
        }
        self.invalidate_horizontal();
        self.push_event(GridEvent::ColumnsChanged);
        true
    }

    /// Tab separated text of the main subgrid selection.
    pub fn selection_to_text(&self) -> Option<String> {
        let server = self.main_data_server()?;
        clipboard::selection_to_tsv(&self.selection, &self.columns, server, self.main_subgrid)
    }

    pub fn push_event(&mut self, event: GridEvent) {
        debug!(?event, "grid event");
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }
}
