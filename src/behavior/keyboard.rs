use tracing::debug;

use super::{BehaviorContext, BehaviorId, Key, KeyEvent, Propagation, UiBehavior};
use crate::error::Result;
use crate::geometry::Point;
use crate::grid::GridEvent;
use crate::selection::{SelectionAreaType, SelectionAreaTypeSpecifier};

/// Focus movement and selection shortcuts on the main subgrid.
#[derive(Debug, Default)]
pub struct KeyboardNavigationBehavior;

impl KeyboardNavigationBehavior {
    pub fn new() -> Self {
        Self
    }

    /// `(dx, dy)` for a navigation key. Large values clamp at the edges.
    fn navigation_delta(ctx: &BehaviorContext<'_>, event: &KeyEvent) -> Option<(isize, isize)> {
        let visible = ctx.core.view_layout.fully_visible_scrollable_row_count().max(1);
        let page = isize::try_from(visible).unwrap_or(isize::MAX);
        let far = isize::MAX / 2;
        let delta = match event.key {
            Key::ArrowLeft => (-1, 0),
            Key::ArrowRight => (1, 0),
            Key::ArrowUp => (0, -1),
            Key::ArrowDown => (0, 1),
            Key::PageUp => (0, -page),
            Key::PageDown => (0, page),
            Key::Home if event.modifiers.ctrl => (0, -far),
            Key::End if event.modifiers.ctrl => (0, far),
            Key::Home => (-far, 0),
            Key::End => (far, 0),
            Key::Escape | Key::Character(_) | Key::Other(_) => return None,
        };
        Some(delta)
    }

    fn navigate(ctx: &mut BehaviorContext<'_>, dx: isize, dy: isize, extend: bool) -> Result<bool> {
        let core = &mut *ctx.core;
        let main = core.main_subgrid;
        let column_count = core.column_count();
        let row_count = core.main_row_count();
        if column_count == 0 || row_count == 0 {
            return Ok(false);
        }
        if core.focus.subgrid() != Some(main) || core.focus.current_subgrid_point().is_none() {
            core.focus.set(Point::new(0, 0), main);
            core.selection
                .select_only_focused_cell(&core.focus, SelectionAreaTypeSpecifier::Primary);
            core.ensure_in_view(0, 0, true);
            core.invalidate_paint();
            return Ok(true);
        }

        let origin = core
            .selection
            .extend_origin()
            .filter(|(_, subgrid)| *subgrid == main)
            .map(|(point, _)| point);
        let Some(target) = core.focus.try_move(dx, dy, column_count, row_count) else {
            return Ok(false);
        };

        match origin {
            Some(origin) if extend => {
                let last_type = core.selection.last_area().map(|a| a.area_type);
                match last_type {
                    Some(SelectionAreaType::Row) => {
                        core.selection.replace_last_area_with_rows(origin, target, main);
                    }
                    Some(SelectionAreaType::Column) => {
                        core.selection.replace_last_area_with_columns(origin, target, main);
                    }
                    Some(SelectionAreaType::Rectangle) | None => {
                        core.selection
                            .update_last_selection_area(target.x, target.y, main)?;
                    }
                }
            }
            Some(_) | None => {
                core.selection
                    .select_only_focused_cell(&core.focus, SelectionAreaTypeSpecifier::LastOrPrimary);
            }
        }
        core.ensure_in_view(target.x, target.y, true);
        core.invalidate_paint();
        debug!(x = target.x, y = target.y, extend, "focus moved by keyboard");
        Ok(true)
    }
}

impl UiBehavior for KeyboardNavigationBehavior {
    fn id(&self) -> BehaviorId {
        BehaviorId::KeyboardNavigation
    }

    fn on_key_down(
        &mut self,
        ctx: &mut BehaviorContext<'_>,
        event: &KeyEvent,
    ) -> Result<Propagation> {
        let shortcut = event.modifiers.ctrl || event.modifiers.meta;
        match &event.key {
            Key::Character('a' | 'A') if shortcut => {
                let main = ctx.core.main_subgrid;
                ctx.core.selection.select_all_rows(main);
                ctx.core.invalidate_paint();
                return Ok(Propagation::Handled);
            }
            Key::Character('c' | 'C') if shortcut => {
                if let Some(text) = ctx.core.selection_to_text() {
                    ctx.core.push_event(GridEvent::Copy { text });
                }
                return Ok(Propagation::Handled);
            }
            Key::Escape => {
                if ctx.core.selection.clear() {
                    ctx.core.invalidate_paint();
                }
                return Ok(Propagation::Handled);
            }
            _ => {}
        }

        let Some((dx, dy)) = Self::navigation_delta(ctx, event) else {
            return Ok(Propagation::Continue);
        };
        let extend = event
            .modifiers
            .has(ctx.core.settings.extend_last_selection_area_modifier_key);
        Self::navigate(ctx, dx, dy, extend)?;
        Ok(Propagation::Handled)
    }
}
