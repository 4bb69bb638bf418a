//! Mouse cell selection with drag extension and autoscroll.
//!
//! `Idle -> Armed` on a primary press over a selectable cell, `Armed ->
//! Dragging` once the pointer reaches another cell, `-> Idle` on release.
//! While dragging outside the scrollable area the selection keeps growing
//! one cell per 25 ms tick in the pointer's direction.

use tracing::debug;

use super::{BehaviorContext, BehaviorId, PointerButton, PointerEvent, Propagation, UiBehavior};
use crate::error::Result;
use crate::geometry::Point;
use crate::grid::{GridCore, GridEvent};
use crate::layout::LinedHoverCell;
use crate::scheduler::{TimerHandle, TimerPurpose};
use crate::selection::SelectionAreaTypeSpecifier;
use crate::settings::ModifierKeys;
use crate::subgrid::{SubgridId, SubgridRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Cells,
    /// Started on a header cell; extends whole columns.
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectState {
    Idle,
    Armed {
        origin: Point,
        subgrid: SubgridId,
        kind: DragKind,
    },
    Dragging {
        origin: Point,
        current: Point,
        subgrid: SubgridId,
        kind: DragKind,
    },
}

#[derive(Debug)]
pub struct CellSelectionBehavior {
    state: SelectState,
    autoscroll_timer: Option<TimerHandle>,
    /// Direction of the pointer relative to the scrollable area, per axis.
    autoscroll_direction: (isize, isize),
}

impl Default for CellSelectionBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSelectionBehavior {
    pub fn new() -> Self {
        Self {
            state: SelectState::Idle,
            autoscroll_timer: None,
            autoscroll_direction: (0, 0),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectState::Dragging { .. })
    }

    /// `(dx, dy)` of the pointer relative to the scrollable area; `(0, 0)`
    /// when inside.
    fn outside_direction(core: &GridCore, x: f32, y: f32) -> (isize, isize) {
        let axis = |value: f32, start: f32, size: f32| -> isize {
            if value < start {
                -1
            } else if value >= start + size {
                1
            } else {
                0
            }
        };
        let h = core.view_layout.horizontal();
        let v = core.view_layout.vertical();
        (
            axis(x, h.start(), h.viewport_size()),
            axis(y, v.start(), v.viewport_size()),
        )
    }

    fn press_header(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        cell: &LinedHoverCell,
        modifiers: ModifierKeys,
    ) -> Propagation {
        if !ctx.core.settings.mouse_column_selection {
            return Propagation::Continue;
        }
        let settings = &ctx.core.settings;
        let extend = modifiers.has(settings.extend_last_selection_area_modifier_key);
        let add = modifiers.has(settings.add_toggle_selection_area_modifier_key);
        let main = ctx.core.main_subgrid;
        let x = cell.column.active_column_index;
        let selection = &mut ctx.core.selection;

        let origin_x = match selection.extend_origin() {
            Some((origin, subgrid)) if extend && subgrid == main => origin.x,
            _ => x,
        };
        selection.begin_change();
        if extend && origin_x != x {
            selection.replace_last_area_with_columns(Point::new(origin_x, 0), Point::new(x, 0), main);
        } else {
            if !add {
                selection.clear();
            }
            selection.select_columns(x, x, main);
        }
        selection.set_extend_origin(Point::new(origin_x, 0), main);
        selection.end_change();
        ctx.core.invalidate_paint();

        self.state = SelectState::Armed {
            origin: Point::new(origin_x, 0),
            subgrid: main,
            kind: DragKind::Columns,
        };
        debug!(column = x, "column selection armed");
        Propagation::Handled
    }

    fn press_cell(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        cell: &LinedHoverCell,
        modifiers: ModifierKeys,
    ) -> Result<Propagation> {
        let settings = &ctx.core.settings;
        if !settings.mouse_cell_selection {
            return Ok(Propagation::Continue);
        }
        let secondary = settings.mouse_row_selection
            && modifiers.has(settings.secondary_selection_area_type_specifier_modifier_key);
        let extend = modifiers.has(settings.extend_last_selection_area_modifier_key);
        let add = modifiers.has(settings.add_toggle_selection_area_modifier_key);
        let does_toggle = settings.add_toggle_selection_area_modifier_key_does_toggle;
        let specifier = if secondary {
            SelectionAreaTypeSpecifier::Secondary
        } else {
            SelectionAreaTypeSpecifier::Primary
        };

        let point = Point::new(cell.column.active_column_index, cell.row.subgrid_row_index);
        let subgrid = cell.row.subgrid;
        let selection = &mut ctx.core.selection;

        let origin = match selection.extend_origin() {
            Some((origin, origin_subgrid)) if extend && origin_subgrid == subgrid => {
                selection.update_last_selection_area(point.x, point.y, subgrid)?;
                Some(origin)
            }
            _ if add && does_toggle => {
                if selection.select_toggle_cell(point.x, point.y, subgrid, specifier) {
                    Some(point)
                } else {
                    None
                }
            }
            _ if add => {
                selection.select_add_cell(point.x, point.y, subgrid, specifier);
                Some(point)
            }
            _ => {
                selection.select_only_cell(point.x, point.y, subgrid, specifier);
                Some(point)
            }
        };

        if !extend {
            ctx.core.focus.set(point, subgrid);
        }
        ctx.core.invalidate_paint();
        ctx.core.push_event(GridEvent::CellClicked { point, subgrid });

        self.state = match origin {
            Some(origin) => SelectState::Armed {
                origin,
                subgrid,
                kind: DragKind::Cells,
            },
            None => SelectState::Idle,
        };
        debug!(x = point.x, y = point.y, %subgrid, extend, add, "cell selection armed");
        Ok(Propagation::Handled)
    }

    /// Make `target` the moving corner of the last area.
    fn drag_to(
        ctx: &mut BehaviorContext<'_>,
        origin: Point,
        target: Point,
        subgrid: SubgridId,
        kind: DragKind,
    ) -> Result<bool> {
        let changed = match kind {
            DragKind::Cells => ctx
                .core
                .selection
                .update_last_selection_area(target.x, target.y, subgrid)?,
            DragKind::Columns => ctx.core.selection.replace_last_area_with_columns(
                Point::new(origin.x, 0),
                Point::new(target.x, 0),
                subgrid,
            ),
        };
        if changed {
            ctx.core.invalidate_paint();
        }
        Ok(changed)
    }

    /// One autoscroll tick: grow the selection by one cell towards the
    /// pointer and scroll that cell into view.
    fn autoscroll_step(&mut self, ctx: &mut BehaviorContext<'_>) -> Result<()> {
        let SelectState::Dragging {
            origin,
            current,
            subgrid,
            kind,
        } = self.state
        else {
            return Ok(());
        };
        let (dx, dy) = self.autoscroll_direction;
        let column_count = ctx.core.column_count();
        let row_count = if subgrid == ctx.core.main_subgrid && kind == DragKind::Cells {
            ctx.core.main_row_count()
        } else {
            0
        };
        let step = |value: usize, delta: isize, count: usize| -> usize {
            if count == 0 {
                return value;
            }
            let moved = if delta < 0 {
                value.saturating_sub(1)
            } else if delta > 0 {
                value + 1
            } else {
                value
            };
            moved.min(count - 1)
        };
        let target = Point::new(step(current.x, dx, column_count), step(current.y, dy, row_count));
        if target != current {
            Self::drag_to(ctx, origin, target, subgrid, kind)?;
            self.state = SelectState::Dragging {
                origin,
                current: target,
                subgrid,
                kind,
            };
        }
        if dx != 0 {
            ctx.core.ensure_column_in_view(target.x, false);
        }
        if dy != 0 && row_count > 0 {
            ctx.core.ensure_row_in_view(target.y, false);
        }
        Ok(())
    }
}

impl UiBehavior for CellSelectionBehavior {
    fn id(&self) -> BehaviorId {
        BehaviorId::CellSelection
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        if event.button != PointerButton::Primary {
            return Ok(Propagation::Continue);
        }
        ctx.cancel(&mut self.autoscroll_timer);
        self.state = SelectState::Idle;
        let Some(cell) = ctx.core.cell_at(event.x, event.y) else {
            return Ok(Propagation::Continue);
        };
        match ctx.core.subgrid_role(cell.row.subgrid) {
            Some(SubgridRole::Header) => Ok(self.press_header(ctx, &cell, event.modifiers)),
            Some(SubgridRole::Main | SubgridRole::Filter | SubgridRole::Summary) => {
                self.press_cell(ctx, &cell, event.modifiers)
            }
            None => Ok(Propagation::Continue),
        }
    }

    fn on_pointer_move(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        let (origin, current, subgrid, kind) = match self.state {
            SelectState::Idle => return Ok(Propagation::Continue),
            SelectState::Armed {
                origin,
                subgrid,
                kind,
            } => (origin, origin, subgrid, kind),
            SelectState::Dragging {
                origin,
                current,
                subgrid,
                kind,
            } => (origin, current, subgrid, kind),
        };

        let (dx, dy) = Self::outside_direction(ctx.core, event.x, event.y);
        let dy = if kind == DragKind::Columns { 0 } else { dy };
        if (dx, dy) != (0, 0) {
            self.state = SelectState::Dragging {
                origin,
                current,
                subgrid,
                kind,
            };
            self.autoscroll_direction = (dx, dy);
            if self.autoscroll_timer.is_none() {
                self.autoscroll_step(ctx)?;
                ctx.reschedule(&mut self.autoscroll_timer, TimerPurpose::SelectionAutoScroll);
            }
            return Ok(Propagation::Handled);
        }

        ctx.cancel(&mut self.autoscroll_timer);
        let Some(cell) = ctx.core.cell_at(event.x, event.y) else {
            return Ok(Propagation::Handled);
        };
        let target = match kind {
            DragKind::Cells if cell.row.subgrid != subgrid => return Ok(Propagation::Handled),
            DragKind::Cells => Point::new(cell.column.active_column_index, cell.row.subgrid_row_index),
            DragKind::Columns => Point::new(cell.column.active_column_index, 0),
        };
        if target == current {
            return Ok(Propagation::Handled);
        }
        Self::drag_to(ctx, origin, target, subgrid, kind)?;
        self.state = SelectState::Dragging {
            origin,
            current: target,
            subgrid,
            kind,
        };
        Ok(Propagation::Handled)
    }

    fn on_pointer_up(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        ctx.cancel(&mut self.autoscroll_timer);
        match std::mem::replace(&mut self.state, SelectState::Idle) {
            SelectState::Idle => Ok(Propagation::Continue),
            SelectState::Armed { .. } | SelectState::Dragging { .. } => Ok(Propagation::Handled),
        }
    }

    fn on_timer(&mut self, ctx: &mut BehaviorContext<'_>, handle: TimerHandle) -> Result<bool> {
        if self.autoscroll_timer != Some(handle) {
            return Ok(false);
        }
        self.autoscroll_timer = None;
        if self.is_dragging() && self.autoscroll_direction != (0, 0) {
            self.autoscroll_step(ctx)?;
            ctx.reschedule(&mut self.autoscroll_timer, TimerPurpose::SelectionAutoScroll);
        }
        Ok(true)
    }

    fn cancel(&mut self, ctx: &mut BehaviorContext<'_>) {
        ctx.cancel(&mut self.autoscroll_timer);
        self.state = SelectState::Idle;
        self.autoscroll_direction = (0, 0);
    }
}
