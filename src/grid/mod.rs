//! The grid: composition root and public API.
//!
//! A [`Grid`] owns the settings, columns, subgrids, layout, selection and
//! focus (in [`GridCore`]), the behaviour chain, the renderer and a boxed
//! [`Scheduler`]. Hosts feed it input events, data notifications, fired
//! timers and animation frames, and drain [`GridEvent`]s back out.

mod clipboard;
mod core;
mod events;

pub use self::clipboard::{escape_cell_value, selection_to_tsv};
pub use self::core::GridCore;
pub use self::events::GridEvent;

use std::any::Any;

use tracing::{debug, info, warn};

use crate::behavior::{
    BehaviorChain, BehaviorContext, BehaviorId, KeyEvent, PointerEvent, Propagation,
    SharedUiState, UiBehavior,
};
use crate::data::{DataNotification, DataServer, HeaderDataServer, SchemaNotification, SchemaServer};
use crate::error::{GridError, Result};
use crate::geometry::Point;
use crate::render::{CellCanvas, GridRenderer, PaintStats};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::selection::{Focus, ReindexSnapshot, RestoreOptions, Selection};
use crate::settings::{GridSettings, ModifierKeys};
use crate::subgrid::{Subgrid, SubgridId, SubgridRole};

/// Wheel input in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    pub modifiers: ModifierKeys,
}

pub struct Grid {
    core: GridCore,
    shared: SharedUiState,
    chain: BehaviorChain,
    renderer: GridRenderer,
    scheduler: Box<dyn Scheduler>,
    reindex_snapshot: Option<ReindexSnapshot>,
    last_selection_version: u64,
    last_focus: (Option<Point>, Option<SubgridId>),
    frame_scheduled: bool,
}

impl Grid {
    /// Build a grid over `subgrids`, stacked in the given order. Exactly one
    /// must have the main role.
    pub fn new(
        settings: GridSettings,
        schema: Box<dyn SchemaServer>,
        subgrids: Vec<(SubgridRole, Box<dyn DataServer>)>,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self> {
        let subgrids: Vec<Subgrid> = subgrids
            .into_iter()
            .enumerate()
            .map(|(i, (role, server))| Subgrid::new(SubgridId(i), role, server))
            .collect();
        let mut mains = subgrids.iter().filter(|s| s.is_main()).map(Subgrid::id);
        let main_subgrid = match (mains.next(), mains.next()) {
            (Some(main), None) => main,
            (None, _) => {
                return Err(GridError::assertion("GNM20931", "grid needs a main subgrid"));
            }
            (Some(_), Some(_)) => {
                return Err(GridError::assertion(
                    "GNM20932",
                    "grid has more than one main subgrid",
                ));
            }
        };
        info!(
            subgrids = subgrids.len(),
            fields = schema.field_count(),
            "grid created"
        );
        let core = GridCore::new(settings, schema, subgrids, main_subgrid);
        let mut grid = Self {
            last_selection_version: core.selection.version(),
            last_focus: (None, None),
            core,
            shared: SharedUiState::default(),
            chain: BehaviorChain::standard(),
            renderer: GridRenderer::default(),
            scheduler,
            reindex_snapshot: None,
            frame_scheduled: false,
        };
        grid.core.invalidate_all();
        grid.flush();
        Ok(grid)
    }

    /// A header subgrid above a main subgrid.
    pub fn with_header(
        settings: GridSettings,
        schema: Box<dyn SchemaServer>,
        main: Box<dyn DataServer>,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self> {
        Self::new(
            settings,
            schema,
            vec![
                (
                    SubgridRole::Header,
                    Box::new(HeaderDataServer::new()) as Box<dyn DataServer>,
                ),
                (SubgridRole::Main, main),
            ],
            scheduler,
        )
    }

    pub fn core(&self) -> &GridCore {
        &self.core
    }

    /// Direct state access. Call [`Grid::flush`] afterwards so frame requests
    /// and events go out.
    pub fn core_mut(&mut self) -> &mut GridCore {
        &mut self.core
    }

    pub fn settings(&self) -> &GridSettings {
        &self.core.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.core.selection
    }

    pub fn focus(&self) -> &Focus {
        &self.core.focus
    }

    pub fn shared(&self) -> &SharedUiState {
        &self.shared
    }

    pub fn chain(&self) -> &BehaviorChain {
        &self.chain
    }

    pub fn renderer_mut(&mut self) -> &mut GridRenderer {
        &mut self.renderer
    }

    pub fn main_subgrid(&self) -> SubgridId {
        self.core.main_subgrid
    }

    pub fn set_settings(&mut self, settings: GridSettings) {
        let core = &mut self.core;
        core.selection.apply_settings(&settings);
        core.columns.set_fixed_column_count(settings.fixed_column_count);
        core.settings = settings;
        core.sync_selection_bounds();
        core.invalidate_all();
        self.renderer.force_repaint();
        self.flush();
    }

    pub fn set_settings_json(&mut self, json: &str) -> Result<()> {
        self.set_settings(GridSettings::from_json(json)?);
        Ok(())
    }

    pub fn resize_canvas(&mut self, width: f32, height: f32) {
        self.core.canvas_width = width;
        self.core.canvas_height = height;
        self.core.invalidate_all();
        self.flush();
    }

    fn dispatch<F>(&mut self, handler: F) -> Result<Propagation>
    where
        F: FnMut(&mut dyn UiBehavior, &mut BehaviorContext<'_>) -> Result<Propagation>,
    {
        let mut ctx = BehaviorContext {
            core: &mut self.core,
            shared: &mut self.shared,
            scheduler: self.scheduler.as_mut(),
        };
        let result = self.chain.dispatch(&mut ctx, handler);
        self.after_dispatch()?;
        result
    }

    fn after_dispatch(&mut self) -> Result<()> {
        self.flush();
        if std::mem::replace(&mut self.shared.synthetic_pointer_move, false) {
            if let Some((x, y)) = self.shared.last_pointer {
                self.pointer_move(PointerEvent::at(x, y))?;
            }
        }
        Ok(())
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> Result<Propagation> {
        self.shared.last_pointer = Some((event.x, event.y));
        self.dispatch(|behavior, ctx| behavior.on_pointer_down(ctx, &event))
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Result<Propagation> {
        self.shared.last_pointer = Some((event.x, event.y));
        self.dispatch(|behavior, ctx| behavior.on_pointer_move(ctx, &event))
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Result<Propagation> {
        self.shared.last_pointer = Some((event.x, event.y));
        self.dispatch(|behavior, ctx| behavior.on_pointer_up(ctx, &event))
    }

    pub fn pointer_leave(&mut self) -> Result<Propagation> {
        self.shared.last_pointer = None;
        self.dispatch(|behavior, ctx| behavior.on_pointer_leave(ctx))
    }

    pub fn key_down(&mut self, event: KeyEvent) -> Result<Propagation> {
        self.dispatch(|behavior, ctx| behavior.on_key_down(ctx, &event))
    }

    /// Scroll by wheel deltas. Shift turns vertical wheel motion horizontal.
    pub fn wheel(&mut self, event: WheelEvent) -> bool {
        let (dx, dy) = if event.modifiers.shift && event.delta_x == 0.0 {
            (event.delta_y, 0.0)
        } else {
            (event.delta_x, event.delta_y)
        };
        let scrolled = self.core.scroll_pixels_by(dx, dy);
        self.flush();
        scrolled
    }

    pub fn scroll_columns_by(&mut self, delta: isize) -> bool {
        let scrolled = self.core.scroll_columns_by(delta);
        self.flush();
        scrolled
    }

    pub fn scroll_rows_by(&mut self, delta: isize) -> bool {
        let scrolled = self.core.scroll_rows_by(delta);
        self.flush();
        scrolled
    }

    pub fn set_column_scroll_anchor(&mut self, index: usize, offset: f32) {
        self.core.view_layout.set_column_scroll_anchor(index, offset);
        self.flush();
    }

    pub fn set_row_scroll_anchor(&mut self, index: usize, offset: f32) {
        self.core.view_layout.set_row_scroll_anchor(index, offset);
        self.flush();
    }

    /// Animation frame: compute the layout, then paint it.
    pub fn on_animation_frame(&mut self, canvas: &mut dyn CellCanvas) -> Result<PaintStats> {
        self.frame_scheduled = false;
        if self.core.compute_layout() && self.chain.is_enabled(BehaviorId::Hover) {
            self.shared.hover = self
                .shared
                .last_pointer
                .and_then(|(x, y)| self.core.cell_at(x, y));
        }
        let stats = self.renderer.render(&mut self.core, &self.shared, canvas)?;
        self.flush();
        Ok(stats)
    }

    /// Compute the layout without painting.
    pub fn compute_layout(&mut self) -> bool {
        self.frame_scheduled = false;
        let computed = self.core.compute_layout();
        self.flush();
        computed
    }

    /// Deliver a fired timer. Returns whether any behaviour owned it.
    pub fn fire_timer(&mut self, handle: TimerHandle) -> Result<bool> {
        let mut ctx = BehaviorContext {
            core: &mut self.core,
            shared: &mut self.shared,
            scheduler: self.scheduler.as_mut(),
        };
        let owned = self.chain.dispatch_timer(&mut ctx, handle)?;
        if !owned {
            warn!(?handle, "fired timer has no owner");
        }
        self.after_dispatch()?;
        Ok(owned)
    }

    pub fn on_data_notification(
        &mut self,
        subgrid: SubgridId,
        notification: DataNotification,
    ) -> Result<()> {
        let main = self.core.main_subgrid;
        let core = &mut self.core;
        let target = core
            .subgrids
            .iter_mut()
            .find(|s| s.id() == subgrid)
            .ok_or(GridError::UnknownSubgrid(subgrid.0))?;
        match notification {
            DataNotification::BeginChange => core.selection.begin_change(),
            DataNotification::EndChange => core.selection.end_change(),
            DataNotification::RowsInserted { index, count } => {
                target.rows_inserted(index, count);
                core.selection.rows_inserted(subgrid, index, count);
                core.focus.rows_inserted(subgrid, index, count);
                core.sync_selection_bounds();
                core.invalidate_vertical();
            }
            DataNotification::RowsDeleted { index, count } => {
                target.rows_deleted(index, count);
                core.selection.rows_deleted(subgrid, index, count);
                core.focus.rows_deleted(subgrid, index, count);
                core.sync_selection_bounds();
                core.invalidate_vertical();
            }
            DataNotification::AllRowsDeleted => {
                target.clear_row_heights();
                if subgrid == main {
                    core.selection.clear();
                    core.focus.clear();
                }
                core.sync_selection_bounds();
                core.invalidate_vertical();
            }
            DataNotification::RowsMoved {
                old_index,
                new_index,
                count,
            } => {
                core.selection.rows_moved(subgrid, old_index, new_index, count);
                core.focus.rows_moved(subgrid, old_index, new_index, count);
                core.invalidate_vertical();
            }
            DataNotification::RowsLoaded | DataNotification::InvalidateAll => {
                core.sync_selection_bounds();
                core.invalidate_vertical();
                self.renderer.force_repaint();
            }
            DataNotification::InvalidateRows { .. }
            | DataNotification::InvalidateRow { .. }
            | DataNotification::InvalidateRowColumns { .. }
            | DataNotification::InvalidateRowCells { .. }
            | DataNotification::InvalidateCell { .. } => core.invalidate_paint(),
            DataNotification::PreReindex => {
                if subgrid == main {
                    let server = target.data_server();
                    self.reindex_snapshot = Some(ReindexSnapshot::capture(
                        &core.selection,
                        &core.focus,
                        server,
                        main,
                    ));
                }
            }
            DataNotification::PostReindex { all_rows_kept } => {
                if subgrid == main {
                    target.clear_row_heights();
                    let options = RestoreOptions::from(&core.settings);
                    let server = target.data_server();
                    match self.reindex_snapshot.take() {
                        Some(snapshot) => snapshot.restore(
                            &mut core.selection,
                            &mut core.focus,
                            server,
                            options,
                        ),
                        None => {
                            warn!("post-reindex without a pre-reindex snapshot");
                            core.selection.clear();
                            core.focus.clear();
                        }
                    }
                    debug!(all_rows_kept, "reindex finished");
                }
                core.sync_selection_bounds();
                core.invalidate_vertical();
            }
        }
        self.flush();
        Ok(())
    }

    pub fn on_schema_notification(&mut self, notification: SchemaNotification) {
        let core = &mut self.core;
        match notification {
            SchemaNotification::BeginChange | SchemaNotification::EndChange => return,
            SchemaNotification::FieldsInserted { index, count } => {
                core.columns
                    .fields_inserted(core.schema.get_fields(), index, count, &core.settings);
                let mut inserted: Vec<usize> = (index..index + count)
                    .filter_map(|field| core.columns.active_index_of_field(field))
                    .collect();
                inserted.sort_unstable();
                for active_index in inserted {
                    core.selection.columns_inserted(active_index, 1);
                    core.focus.columns_inserted(active_index, 1);
                }
            }
            SchemaNotification::FieldsDeleted { index, count } => {
                let mut removed: Vec<usize> = (index..index + count)
                    .filter_map(|field| core.columns.active_index_of_field(field))
                    .collect();
                removed.sort_unstable_by(|a, b| b.cmp(a));
                core.columns.fields_deleted(core.schema.get_fields(), index, count);
                for active_index in removed {
                    core.selection.columns_deleted(active_index, 1);
                    core.focus.columns_deleted(active_index, 1);
                }
            }
            SchemaNotification::AllFieldsDeleted => {
                core.columns.all_fields_deleted();
                core.selection.clear();
                core.focus.clear();
            }
            SchemaNotification::SchemaChanged => {
                core.columns
                    .schema_changed(core.schema.get_fields(), &core.settings);
                core.selection.clear();
                core.focus.clear();
            }
        }
        // Revalidate the fixed count against the new column count.
        core.columns
            .set_fixed_column_count(core.settings.fixed_column_count);
        if core
            .focus
            .current_x()
            .is_some_and(|x| x >= core.columns.active_column_count())
        {
            core.focus.clear();
        }
        core.sync_selection_bounds();
        core.invalidate_horizontal();
        core.push_event(GridEvent::ColumnsChanged);
        self.flush();
    }

    /// Run `f` on the main subgrid's data server if it is a `T`. Changes made
    /// this way must be announced through [`Grid::on_data_notification`].
    pub fn with_main_data<T: Any, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let main = self.core.main_subgrid;
        self.core
            .subgrid_mut(main)?
            .data_server_mut()
            .as_any_mut()?
            .downcast_mut::<T>()
            .map(f)
    }

    /// Run `f` on the schema server if it is a `T`. Announce changes through
    /// [`Grid::on_schema_notification`].
    pub fn with_schema<T: Any, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.core
            .schema
            .as_any_mut()?
            .downcast_mut::<T>()
            .map(f)
    }

    pub fn selection_to_text(&self) -> Option<String> {
        self.core.selection_to_text()
    }

    /// Abort every gesture and cancel every live timer.
    pub fn detach(&mut self) {
        let mut ctx = BehaviorContext {
            core: &mut self.core,
            shared: &mut self.shared,
            scheduler: self.scheduler.as_mut(),
        };
        self.chain.cancel_all(&mut ctx);
        for handle in self.scheduler.live_timers() {
            self.scheduler.cancel(handle);
        }
        self.shared = SharedUiState::default();
        debug!("grid detached");
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        self.core.take_events()
    }

    /// Queue change events and ask for an animation frame when the layout
    /// wants one.
    pub fn flush(&mut self) {
        let version = self.core.selection.version();
        if version != self.last_selection_version {
            self.last_selection_version = version;
            self.core.invalidate_paint();
            self.core.push_event(GridEvent::SelectionChanged { version });
        }
        let focus = (
            self.core.focus.current_subgrid_point(),
            self.core.focus.subgrid(),
        );
        if focus != self.last_focus {
            self.last_focus = focus;
            self.core.invalidate_paint();
            self.core.push_event(GridEvent::FocusChanged {
                point: focus.0,
                subgrid: focus.1,
            });
        }
        if self.core.view_layout.is_frame_requested() && !self.frame_scheduled {
            self.frame_scheduled = true;
            self.scheduler.request_animation_frame();
        }
    }
}
