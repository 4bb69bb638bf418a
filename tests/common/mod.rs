//! Common test fixture: a grid with a header row over a main subgrid of
//! text cells, driven by a virtual-time scheduler.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use revgrid::behavior::{PointerEvent, Propagation};
use revgrid::data::{DataValue, FieldListSchemaServer, RowArrayDataServer};
use revgrid::geometry::Rectangle;
use revgrid::grid::Grid;
use revgrid::render::{PaintStats, RecordingCanvas};
use revgrid::scheduler::{ManualScheduler, TimerPurpose};
use revgrid::settings::{GridSettings, ModifierKeys};
use revgrid::subgrid::SubgridId;

pub const HEADER: SubgridId = SubgridId(0);
pub const MAIN: SubgridId = SubgridId(1);

/// Defaults with zero-width grid lines so cell geometry is round numbers:
/// columns are 100 px wide, rows 20 px high, the header row sits at y 0..20.
pub fn settings() -> GridSettings {
    GridSettings {
        grid_lines_v_width: 0.0,
        grid_lines_h_width: 0.0,
        ..GridSettings::default()
    }
}

/// Row-major text rows, `"r{row}c{column}"`.
pub fn text_rows(columns: usize, rows: usize) -> Vec<Vec<DataValue>> {
    (0..rows)
        .map(|r| (0..columns).map(|c| DataValue::from(format!("r{r}c{c}"))).collect())
        .collect()
}

pub struct TestGrid {
    pub grid: Grid,
    pub scheduler: ManualScheduler,
    pub canvas: RecordingCanvas,
}

impl TestGrid {
    pub fn new(settings: GridSettings, columns: usize, rows: usize, width: f32, height: f32) -> Self {
        let data = RowArrayDataServer::new(text_rows(columns, rows));
        Self::with_data(settings, columns, data, width, height)
    }

    /// Grid over an arbitrary main data server with `columns` fields.
    pub fn with_data(
        settings: GridSettings,
        columns: usize,
        data: RowArrayDataServer,
        width: f32,
        height: f32,
    ) -> Self {
        let names: Vec<String> = (0..columns).map(|c| format!("Col{c}")).collect();
        let scheduler = ManualScheduler::new();
        let mut grid = Grid::with_header(
            settings,
            Box::new(FieldListSchemaServer::from_names(&names)),
            Box::new(data),
            Box::new(scheduler.clone()),
        )
        .expect("grid builds");
        grid.resize_canvas(width, height);
        let mut test = Self {
            grid,
            scheduler,
            canvas: RecordingCanvas::new(),
        };
        test.frame();
        test.grid.drain_events();
        test
    }

    /// 10 columns by 50 rows on a canvas wide enough for every column.
    pub fn standard() -> Self {
        Self::new(settings(), 10, 50, 1000.0, 400.0)
    }

    /// 10 columns by 50 rows on a canvas showing 4.5 columns and 9 main rows.
    pub fn narrow() -> Self {
        Self::new(settings(), 10, 50, 450.0, 200.0)
    }

    /// Run the animation frame: compute the layout and paint.
    pub fn frame(&mut self) -> PaintStats {
        self.scheduler.take_frame_request();
        self.grid.on_animation_frame(&mut self.canvas).expect("frame paints")
    }

    /// Advance virtual time one millisecond at a time, delivering due timers
    /// to the grid. Returns the purposes of the timers that fired.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerPurpose> {
        let mut fired = Vec::new();
        for _ in 0..ms {
            for (handle, purpose) in self.scheduler.advance(1) {
                self.grid.fire_timer(handle).expect("timer handled");
                fired.push(purpose);
            }
        }
        fired
    }

    /// Canvas centre of main cell `(x, y)` in the last computed layout.
    pub fn cell_center(&self, x: usize, y: usize) -> (f32, f32) {
        let layout = &self.grid.core().view_layout;
        let column = layout
            .try_get_column_with_active_index(x)
            .expect("column visible");
        let row = layout
            .try_get_row_with_subgrid_row_index(MAIN, y)
            .expect("row visible");
        (column.left + column.width / 2.0, row.top + row.height / 2.0)
    }

    /// Canvas centre of the header cell over column `x`.
    pub fn header_center(&self, x: usize) -> (f32, f32) {
        let layout = &self.grid.core().view_layout;
        let column = layout
            .try_get_column_with_active_index(x)
            .expect("column visible");
        let row = layout
            .try_get_row_with_subgrid_row_index(HEADER, 0)
            .expect("header visible");
        (column.left + column.width / 2.0, row.top + row.height / 2.0)
    }

    pub fn down(&mut self, (x, y): (f32, f32), modifiers: ModifierKeys) -> Propagation {
        self.grid
            .pointer_down(PointerEvent::at(x, y).with_modifiers(modifiers))
            .expect("pointer down")
    }

    pub fn move_to(&mut self, (x, y): (f32, f32)) -> Propagation {
        self.grid.pointer_move(PointerEvent::at(x, y)).expect("pointer move")
    }

    pub fn up(&mut self, (x, y): (f32, f32)) -> Propagation {
        self.grid.pointer_up(PointerEvent::at(x, y)).expect("pointer up")
    }

    pub fn click_cell(&mut self, x: usize, y: usize, modifiers: ModifierKeys) {
        let at = self.cell_center(x, y);
        self.down(at, modifiers);
        self.up(at);
    }

    /// Geometry of the last selection area, ignoring its first corner.
    pub fn last_area(&self) -> (usize, usize, usize, usize) {
        let area = self.grid.selection().last_area().expect("selection area");
        rect(&area.rectangle)
    }
}

pub fn rect(r: &Rectangle) -> (usize, usize, usize, usize) {
    (r.x, r.y, r.width, r.height)
}
