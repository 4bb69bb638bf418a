use super::{BehaviorContext, BehaviorId, Propagation, PointerEvent, UiBehavior};
use crate::error::Result;

/// Tracks the hovered cell. Never consumes events.
#[derive(Debug, Default)]
pub struct HoverBehavior;

impl HoverBehavior {
    pub fn new() -> Self {
        Self
    }

    fn set_hover(ctx: &mut BehaviorContext<'_>, position: Option<(f32, f32)>) {
        let hover = position.and_then(|(x, y)| ctx.core.cell_at(x, y));
        let same_cell = match (&ctx.shared.hover, &hover) {
            (Some(a), Some(b)) => {
                a.column.active_column_index == b.column.active_column_index
                    && a.row.subgrid == b.row.subgrid
                    && a.row.subgrid_row_index == b.row.subgrid_row_index
            }
            (None, None) => true,
            _ => false,
        };
        ctx.shared.hover = hover;
        if !same_cell {
            ctx.core.invalidate_paint();
        }
    }
}

impl UiBehavior for HoverBehavior {
    fn id(&self) -> BehaviorId {
        BehaviorId::Hover
    }

    fn on_pointer_move(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &PointerEvent,
    ) -> Result<Propagation> {
        Self::set_hover(ctx, Some((event.x, event.y)));
        Ok(Propagation::Continue)
    }

    fn on_pointer_leave(&mut self, ctx: &mut BehaviorContext<'_>) -> Result<Propagation> {
        Self::set_hover(ctx, None);
        Ok(Propagation::Continue)
    }

    fn cancel(&mut self, ctx: &mut BehaviorContext<'_>) {
        ctx.shared.hover = None;
    }
}
