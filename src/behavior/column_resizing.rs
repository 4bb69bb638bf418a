use tracing::debug;

use super::{BehaviorContext, BehaviorId, Cursor, PointerButton, PointerEvent, Propagation, UiBehavior};
use crate::error::Result;
use crate::grid::{GridCore, GridEvent};
use crate::subgrid::SubgridRole;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResizeState {
    Idle,
    Resizing {
        active_column_index: usize,
        start_x: f32,
        start_width: f32,
    },
}

/// Drags the grid line right of a header cell to change the column width.
#[derive(Debug)]
pub struct ColumnResizingBehavior {
    state: ResizeState,
}

impl Default for ColumnResizingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnResizingBehavior {
    pub fn new() -> Self {
        Self {
            state: ResizeState::Idle,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Active index of the column whose right grid line lies under the pointer
    /// in a header row.
    fn grip_at(core: &GridCore, x: f32, y: f32) -> Option<usize> {
        let row = core.view_layout.find_top_grid_line_inclusive_row_from_offset(y)?;
        if core.subgrid_role(row.subgrid) != Some(SubgridRole::Header) {
            return None;
        }
        let half_grip = core.settings.column_resize_grip_width / 2.0;
        let layout = &core.view_layout;
        layout
            .columns()
            .iter()
            .find(|column| {
                let line_centre = column.right_plus1 + layout.grid_line_width_after(column) / 2.0;
                (x - line_centre).abs() <= half_grip
            })
            .map(|column| column.active_column_index)
    }
}

impl UiBehavior for ColumnResizingBehavior {
    fn id(&self) -> BehaviorId {
        BehaviorId::ColumnResizing
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        if event.button != PointerButton::Primary {
            return Ok(Propagation::Continue);
        }
        let Some(active_column_index) = Self::grip_at(ctx.core, event.x, event.y) else {
            return Ok(Propagation::Continue);
        };
        let Some(start_width) = ctx.core.columns.active_column_width(active_column_index) else {
            return Ok(Propagation::Continue);
        };
        self.state = ResizeState::Resizing {
            active_column_index,
            start_x: event.x,
            start_width,
        };
        ctx.shared.cursor = Cursor::ColResize;
        debug!(active_column_index, start_width, "column resize started");
        Ok(Propagation::Handled)
    }

    fn on_pointer_move(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        match self.state {
            ResizeState::Resizing {
                active_column_index,
                start_x,
                start_width,
            } => {
                let width = start_width + (event.x - start_x);
                ctx.core.set_active_column_width(active_column_index, width);
                Ok(Propagation::Handled)
            }
            ResizeState::Idle => {
                let over_grip = Self::grip_at(ctx.core, event.x, event.y).is_some();
                if over_grip {
                    ctx.shared.cursor = Cursor::ColResize;
                } else if ctx.shared.cursor == Cursor::ColResize {
                    ctx.shared.cursor = Cursor::Default;
                }
                Ok(Propagation::Continue)
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        match std::mem::replace(&mut self.state, ResizeState::Idle) {
            ResizeState::Resizing {
                active_column_index,
                ..
            } => {
                debug!(active_column_index, "column resize finished");
                ctx.core.push_event(GridEvent::ColumnsChanged);
                Ok(Propagation::Handled)
            }
            ResizeState::Idle => Ok(Propagation::Continue),
        }
    }

    fn on_pointer_leave(&mut self, ctx: &mut BehaviorContext<'_>) -> Result<Propagation> {
        if !self.is_resizing() && ctx.shared.cursor == Cursor::ColResize {
            ctx.shared.cursor = Cursor::Default;
        }
        Ok(Propagation::Continue)
    }

    fn cancel(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.is_resizing() && ctx.shared.cursor == Cursor::ColResize {
            ctx.shared.cursor = Cursor::Default;
        }
        self.state = ResizeState::Idle;
    }
}
