//! Dragging a header cell to reorder (or hide) columns.
//!
//! `Idle -> Armed` on ctrl + primary press over a non-fixed header column,
//! `Armed -> Dragging` on the first move, `-> Idle` on release. While
//! dragging, hover and cell selection are detached; they come back 50 ms
//! after the release, followed by a replayed pointer move so hover catches
//! up with the pointer.

use serde::Serialize;
use tracing::debug;

use super::{
    BehaviorContext, BehaviorId, ChainRequest, Cursor, PointerButton, PointerEvent, Propagation,
    UiBehavior,
};
use crate::error::Result;
use crate::grid::GridCore;
use crate::scheduler::{TimerHandle, TimerPurpose};
use crate::subgrid::SubgridRole;

/// Behaviours suspended for the length of a drag.
const DETACHED_DURING_DRAG: [BehaviorId; 2] = [BehaviorId::Hover, BehaviorId::CellSelection];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollDirection {
    Left,
    Right,
}

impl ScrollDirection {
    fn delta(self) -> isize {
        match self {
            ScrollDirection::Left => -1,
            ScrollDirection::Right => 1,
        }
    }
}

/// What releasing the pointer at its current position would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragAction {
    /// Drop next to the column at active index `target`.
    Move { target: usize, after: bool },
    /// Pointer past the scrollable area. `off_grid` is set when it left the
    /// canvas altogether, which is the only place a drop may hide the column.
    Scroll {
        direction: Option<ScrollDirection>,
        off_grid: bool,
    },
    /// Inside the dead zone around the dragged column.
    None,
}

/// Drag in progress, published for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnDrag {
    pub active_column_index: usize,
    pub pointer_x: f32,
    pub action: DragAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MoveState {
    Idle,
    Armed { active_column_index: usize },
    Dragging { active_column_index: usize, action: DragAction },
}

#[derive(Debug)]
pub struct ColumnMovingBehavior {
    state: MoveState,
    edge_scroll_timer: Option<TimerHandle>,
    reattach_timer: Option<TimerHandle>,
}

impl Default for ColumnMovingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMovingBehavior {
    pub fn new() -> Self {
        Self {
            state: MoveState::Idle,
            edge_scroll_timer: None,
            reattach_timer: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MoveState::Dragging { .. })
    }

    /// Classify a pointer position during a drag of `dragged`.
    pub fn classify(core: &GridCore, dragged: usize, x: f32, y: f32) -> DragAction {
        let horizontal = core.view_layout.horizontal();
        let scroll_start = horizontal.start();
        let scroll_end = scroll_start + horizontal.viewport_size();
        let off_grid = x < 0.0 || y < 0.0 || x >= core.canvas_width || y >= core.canvas_height;

        if x < scroll_start {
            return DragAction::Scroll {
                direction: Some(ScrollDirection::Left),
                off_grid,
            };
        }
        if x >= scroll_end {
            return DragAction::Scroll {
                direction: Some(ScrollDirection::Right),
                off_grid,
            };
        }
        if off_grid {
            return DragAction::Scroll {
                direction: None,
                off_grid,
            };
        }

        let layout = &core.view_layout;
        let Some(target) = layout.find_left_grid_line_inclusive_column_from_offset(x) else {
            // Unused space after the last column.
            return match layout.columns().last() {
                Some(last) if !last.fixed && last.active_column_index != dragged => DragAction::Move {
                    target: last.active_column_index,
                    after: true,
                },
                _ => DragAction::None,
            };
        };
        if target.fixed || target.active_column_index == dragged {
            return DragAction::None;
        }
        let half_target = target.width / 2.0;
        if let Some(source) = layout.try_get_column_with_active_index(dragged) {
            if x >= source.left - half_target && x < source.right_plus1 + half_target {
                return DragAction::None;
            }
        }
        DragAction::Move {
            target: target.active_column_index,
            after: x >= target.left + half_target,
        }
    }

    fn start_drag(ctx: &mut BehaviorContext<'_>, active_column_index: usize) {
        for id in DETACHED_DURING_DRAG {
            ctx.shared.requests.push(ChainRequest::Detach(id));
        }
        ctx.shared.hover = None;
        ctx.shared.cursor = Cursor::Move;
        debug!(active_column_index, "column drag started");
    }

    fn update_drag(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        active_column_index: usize,
        event: &PointerEvent,
    ) {
        let action = Self::classify(ctx.core, active_column_index, event.x, event.y);
        self.state = MoveState::Dragging {
            active_column_index,
            action,
        };
        ctx.shared.column_drag = Some(ColumnDrag {
            active_column_index,
            pointer_x: event.x,
            action,
        });
        match action {
            DragAction::Scroll {
                direction: Some(direction),
                ..
            } => {
                if self.edge_scroll_timer.is_none() {
                    ctx.core.scroll_columns_by(direction.delta());
                    ctx.reschedule(&mut self.edge_scroll_timer, TimerPurpose::ColumnMoveEdgeScroll);
                }
            }
            DragAction::Scroll { direction: None, .. } | DragAction::Move { .. } | DragAction::None => {
                ctx.cancel(&mut self.edge_scroll_timer);
            }
        }
        ctx.core.invalidate_paint();
    }

    fn finish_drag(&mut self, ctx: &mut BehaviorContext<'_>, active_column_index: usize, action: DragAction) {
        ctx.cancel(&mut self.edge_scroll_timer);
        let hideable = ctx.core.settings.columns_reorderable_hideable;
        let committed = match action {
            DragAction::Move { target, after } => {
                ctx.core.move_active_column(active_column_index, target, after)
            }
            DragAction::Scroll { off_grid: true, .. } if hideable => {
                ctx.core.hide_active_column(active_column_index)
            }
            DragAction::Scroll { .. } | DragAction::None => false,
        };
        debug!(active_column_index, ?action, committed, "column drag finished");
        ctx.shared.column_drag = None;
        ctx.shared.cursor = Cursor::Default;
        ctx.core.invalidate_paint();
        ctx.reschedule(&mut self.reattach_timer, TimerPurpose::ReattachBehaviors);
    }

    fn reattach(ctx: &mut BehaviorContext<'_>) {
        for id in DETACHED_DURING_DRAG {
            ctx.shared.requests.push(ChainRequest::Reattach(id));
        }
    }
}

impl UiBehavior for ColumnMovingBehavior {
    fn id(&self) -> BehaviorId {
        BehaviorId::ColumnMoving
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        if self.reattach_timer.is_some() {
            ctx.cancel(&mut self.reattach_timer);
            Self::reattach(ctx);
        }
        if event.button != PointerButton::Primary
            || !event.modifiers.ctrl
            || !ctx.core.settings.columns_reorderable
        {
            return Ok(Propagation::Continue);
        }
        let Some(cell) = ctx.core.cell_at(event.x, event.y) else {
            return Ok(Propagation::Continue);
        };
        if cell.column.fixed || ctx.core.subgrid_role(cell.row.subgrid) != Some(SubgridRole::Header) {
            return Ok(Propagation::Continue);
        }
        self.state = MoveState::Armed {
            active_column_index: cell.column.active_column_index,
        };
        debug!(active_column_index = cell.column.active_column_index, "column move armed");
        Ok(Propagation::Handled)
    }

    fn on_pointer_move(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        match self.state {
            MoveState::Idle => Ok(Propagation::Continue),
            MoveState::Armed {
                active_column_index,
            } => {
                Self::start_drag(ctx, active_column_index);
                self.update_drag(ctx, active_column_index, event);
                Ok(Propagation::Handled)
            }
            MoveState::Dragging {
                active_column_index,
                ..
            } => {
                self.update_drag(ctx, active_column_index, event);
                Ok(Propagation::Handled)
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        match std::mem::replace(&mut self.state, MoveState::Idle) {
            MoveState::Idle => Ok(Propagation::Continue),
            MoveState::Armed { .. } => Ok(Propagation::Handled),
            MoveState::Dragging {
                active_column_index,
                action,
            } => {
                self.finish_drag(ctx, active_column_index, action);
                Ok(Propagation::Handled)
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut BehaviorContext<'_>, handle: TimerHandle) -> Result<bool> {
        if self.edge_scroll_timer == Some(handle) {
            self.edge_scroll_timer = None;
            if let MoveState::Dragging {
                action:
                    DragAction::Scroll {
                        direction: Some(direction),
                        ..
                    },
                ..
            } = self.state
            {
                ctx.core.scroll_columns_by(direction.delta());
                ctx.reschedule(&mut self.edge_scroll_timer, TimerPurpose::ColumnMoveEdgeScroll);
            }
            return Ok(true);
        }
        if self.reattach_timer == Some(handle) {
            self.reattach_timer = None;
            Self::reattach(ctx);
            ctx.shared.synthetic_pointer_move = true;
            debug!("behaviors reattached after column drag");
            return Ok(true);
        }
        Ok(false)
    }

    fn cancel(&mut self, ctx: &mut BehaviorContext<'_>) {
        ctx.cancel(&mut self.edge_scroll_timer);
        ctx.cancel(&mut self.reattach_timer);
        if self.is_dragging() {
            ctx.shared.column_drag = None;
            ctx.shared.cursor = Cursor::Default;
        }
        self.state = MoveState::Idle;
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
    use crate::behavior::SharedUiState;
    use crate::data::{DataValue, FieldListSchemaServer, HeaderDataServer, RowArrayDataServer};
    use crate::scheduler::ManualScheduler;
    use crate::settings::{GridSettings, ModifierKeys};
    use crate::subgrid::{Subgrid, SubgridId, SubgridRole};

    /// 10 columns of 100 px on a 450 x 200 canvas, header row at y 0..20.
    fn core() -> GridCore {
        let names: Vec<String> = (0..10).map(|c| format!("Col{c}")).collect();
        let rows: Vec<Vec<DataValue>> = (0..20)
            .map(|r| (0..10).map(|c| DataValue::from(format!("r{r}c{c}"))).collect())
            .collect();
        let settings = GridSettings {
            grid_lines_v_width: 0.0,
            grid_lines_h_width: 0.0,
            ..GridSettings::default()
        };
        let mut core = GridCore::new(
            settings,
            Box::new(FieldListSchemaServer::from_names(&names)),
            vec![
                Subgrid::new(SubgridId(0), SubgridRole::Header, Box::new(HeaderDataServer::new())),
                Subgrid::new(SubgridId(1), SubgridRole::Main, Box::new(RowArrayDataServer::new(rows))),
            ],
            SubgridId(1),
        );
        core.canvas_width = 450.0;
        core.canvas_height = 200.0;
        core.compute_layout();
        core
    }

    struct Fixture {
        core: GridCore,
        shared: SharedUiState,
        scheduler: ManualScheduler,
        behavior: ColumnMovingBehavior,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                core: core(),
                shared: SharedUiState::default(),
                scheduler: ManualScheduler::new(),
                behavior: ColumnMovingBehavior::new(),
            }
        }

        fn run<R>(
            &mut self,
            f: impl FnOnce(&mut ColumnMovingBehavior, &mut BehaviorContext<'_>) -> R,
        ) -> R {
            let mut ctx = BehaviorContext {
                core: &mut self.core,
                shared: &mut self.shared,
                scheduler: &mut self.scheduler,
            };
            f(&mut self.behavior, &mut ctx)
        }

        fn down(&mut self, x: f32, y: f32, modifiers: ModifierKeys) -> Propagation {
            let event = PointerEvent::at(x, y).with_modifiers(modifiers);
            self.run(|b, ctx| b.on_pointer_down(ctx, &event)).unwrap()
        }

        fn move_to(&mut self, x: f32, y: f32) -> Propagation {
            let event = PointerEvent::at(x, y);
            self.run(|b, ctx| b.on_pointer_move(ctx, &event)).unwrap()
        }

        fn up(&mut self, x: f32, y: f32) -> Propagation {
            let event = PointerEvent::at(x, y);
            self.run(|b, ctx| b.on_pointer_up(ctx, &event)).unwrap()
        }
    }

    #[test]
    fn scroll_direction_steps() {
        assert_eq!(ScrollDirection::Left.delta(), -1);
        assert_eq!(ScrollDirection::Right.delta(), 1);
    }

    #[test]
    fn press_without_ctrl_is_left_to_selection() {
        let mut f = Fixture::new();
        assert_eq!(f.down(150.0, 10.0, ModifierKeys::NONE), Propagation::Continue);
        assert_eq!(f.behavior.state, MoveState::Idle);
    }

    #[test]
    fn armed_release_schedules_nothing() {
        let mut f = Fixture::new();
        assert_eq!(f.down(150.0, 10.0, ModifierKeys::ctrl()), Propagation::Handled);
        assert_eq!(
            f.behavior.state,
            MoveState::Armed {
                active_column_index: 1
            }
        );

        assert_eq!(f.up(150.0, 10.0), Propagation::Handled);
        assert_eq!(f.behavior.state, MoveState::Idle);
        assert!(f.scheduler.pending_purposes().is_empty());
        assert!(f.shared.requests.is_empty());
        assert!(f.shared.column_drag.is_none());
    }

    #[test]
    fn first_move_detaches_hover_and_selection() {
        let mut f = Fixture::new();
        f.down(150.0, 10.0, ModifierKeys::ctrl());
        f.move_to(350.0, 10.0);
        assert!(f.behavior.is_dragging());
        assert_eq!(
            f.shared.requests,
            vec![
                ChainRequest::Detach(BehaviorId::Hover),
                ChainRequest::Detach(BehaviorId::CellSelection)
            ]
        );
        assert_eq!(f.shared.cursor, Cursor::Move);
    }

    #[test]
    fn cancel_mid_drag_clears_drag_and_edge_timer() {
        let mut f = Fixture::new();
        f.down(150.0, 10.0, ModifierKeys::ctrl());
        f.move_to(470.0, 10.0);
        assert!(f.shared.column_drag.is_some());
        assert_eq!(
            f.scheduler.pending_purposes(),
            vec![TimerPurpose::ColumnMoveEdgeScroll]
        );

        f.run(|b, ctx| b.cancel(ctx));
        assert_eq!(f.behavior.state, MoveState::Idle);
        assert!(f.shared.column_drag.is_none());
        assert_eq!(f.shared.cursor, Cursor::Default);
        assert!(f.scheduler.pending_purposes().is_empty());
    }

    #[test]
    fn cancel_after_release_drops_pending_reattach() {
        let mut f = Fixture::new();
        f.down(150.0, 10.0, ModifierKeys::ctrl());
        f.move_to(350.0, 10.0);
        f.up(350.0, 10.0);
        assert_eq!(f.scheduler.pending_purposes(), vec![TimerPurpose::ReattachBehaviors]);

        f.run(|b, ctx| b.cancel(ctx));
        assert!(f.scheduler.pending_purposes().is_empty());
        assert!(f.behavior.reattach_timer.is_none());
    }
}
