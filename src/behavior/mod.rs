//! Pointer and keyboard behaviours.
//!
//! Input events run through an ordered [`BehaviorChain`]. Each behaviour may
//! handle an event (stopping it) or let it continue down the chain.
//! Behaviours share transient UI state through [`SharedUiState`] and ask the
//! chain to detach or reattach other behaviours by pushing
//! [`ChainRequest`]s, which the chain applies once the current event is done.

mod cell_selection;
mod column_moving;
mod column_resizing;
mod hover;
mod keyboard;

pub use cell_selection::CellSelectionBehavior;
pub use column_moving::{ColumnDrag, ColumnMovingBehavior, DragAction, ScrollDirection};
pub use column_resizing::ColumnResizingBehavior;
pub use hover::HoverBehavior;
pub use keyboard::KeyboardNavigationBehavior;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grid::GridCore;
use crate::layout::LinedHoverCell;
use crate::scheduler::{Scheduler, TimerHandle, TimerPurpose};
use crate::settings::ModifierKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// DOM `MouseEvent.button` numbering.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            _ => PointerButton::Primary,
        }
    }
}

/// Pointer position in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub button: PointerButton,
    pub modifiers: ModifierKeys,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Escape,
    Character(char),
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => Key::Other(other.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: ModifierKeys,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: ModifierKeys::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Whether an event should reach later behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Handled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorId {
    Hover,
    ColumnResizing,
    ColumnMoving,
    CellSelection,
    KeyboardNavigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRequest {
    Detach(BehaviorId),
    Reattach(BehaviorId),
}

/// Pointer cursor hint for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cursor {
    #[default]
    Default,
    ColResize,
    Move,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::ColResize => "col-resize",
            Cursor::Move => "move",
        }
    }
}

/// Transient UI state shared by the behaviours and read by the renderer.
#[derive(Debug, Clone, Default)]
pub struct SharedUiState {
    pub hover: Option<LinedHoverCell>,
    pub cursor: Cursor,
    /// Last pointer position seen by the grid.
    pub last_pointer: Option<(f32, f32)>,
    pub column_drag: Option<ColumnDrag>,
    /// Pending detach/reattach requests, applied after the current event.
    pub requests: Vec<ChainRequest>,
    /// Set by a behaviour that wants a pointer move replayed at
    /// `last_pointer` once the current dispatch finishes.
    pub synthetic_pointer_move: bool,
}

/// What a behaviour gets to work with.
pub struct BehaviorContext<'a> {
    pub core: &'a mut GridCore,
    pub shared: &'a mut SharedUiState,
    pub scheduler: &'a mut dyn Scheduler,
}

impl BehaviorContext<'_> {
    /// Schedule a timer, cancelling `slot`'s previous one first.
    pub fn reschedule(&mut self, slot: &mut Option<TimerHandle>, purpose: TimerPurpose) {
        if let Some(previous) = slot.take() {
            self.scheduler.cancel(previous);
        }
        *slot = Some(self.scheduler.schedule(purpose));
    }

    pub fn cancel(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// One link of the behaviour chain. Every handler defaults to letting the
/// event continue.
pub trait UiBehavior {
    fn id(&self) -> BehaviorId;

    fn on_pointer_down(
        &mut self,
        _ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        Ok(Propagation::Continue)
    }

    fn on_pointer_move(
        &mut self,
        _ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        Ok(Propagation::Continue)
    }

    fn on_pointer_up(
        &mut self,
        _ctx: &mut BehaviorContext<'_>,
        _event: &PointerEvent,
    ) -> Result<Propagation> {
        Ok(Propagation::Continue)
    }

    fn on_pointer_leave(&mut self, _ctx: &mut BehaviorContext<'_>) -> Result<Propagation> {
        Ok(Propagation::Continue)
    }

    fn on_key_down(
        &mut self,
        _ctx: &mut BehaviorContext<'_>,
        _event: &KeyEvent,
    ) -> Result<Propagation> {
        Ok(Propagation::Continue)
    }

    /// Handle a fired timer. Returns whether this behaviour owned it.
    fn on_timer(
        &mut self,
        _ctx: &mut BehaviorContext<'_>,
        _handle: TimerHandle,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Abort any gesture in progress and cancel its timers.
    fn cancel(&mut self, _ctx: &mut BehaviorContext<'_>) {}
}

struct Link {
    behavior: Box<dyn UiBehavior>,
    enabled: bool,
}

/// Ordered behaviours with per-link enabled flags.
pub struct BehaviorChain {
    links: Vec<Link>,
}

impl Default for BehaviorChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl BehaviorChain {
    pub fn new(behaviors: Vec<Box<dyn UiBehavior>>) -> Self {
        Self {
            links: behaviors
                .into_iter()
                .map(|behavior| Link {
                    behavior,
                    enabled: true,
                })
                .collect(),
        }
    }

    /// Hover, column resizing, column moving, cell selection, keyboard.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(HoverBehavior::new()),
            Box::new(ColumnResizingBehavior::new()),
            Box::new(ColumnMovingBehavior::new()),
            Box::new(CellSelectionBehavior::new()),
            Box::new(KeyboardNavigationBehavior::new()),
        ])
    }

    pub fn ids(&self) -> Vec<BehaviorId> {
        self.links.iter().map(|l| l.behavior.id()).collect()
    }

    pub fn is_enabled(&self, id: BehaviorId) -> bool {
        self.links
            .iter()
            .any(|l| l.enabled && l.behavior.id() == id)
    }

    pub fn set_enabled(&mut self, id: BehaviorId, enabled: bool) {
        for link in self.links.iter_mut().filter(|l| l.behavior.id() == id) {
            if link.enabled != enabled {
                debug!(?id, enabled, "behavior link toggled");
                link.enabled = enabled;
            }
        }
    }

    /// Run `handler` over enabled behaviours in order until one handles the
    /// event, then apply chain requests.
    pub fn dispatch<F>(&mut self, ctx: &mut BehaviorContext<'_>, mut handler: F) -> Result<Propagation>
    where
        F: FnMut(&mut dyn UiBehavior, &mut BehaviorContext<'_>) -> Result<Propagation>,
    {
        let mut outcome = Propagation::Continue;
        for link in self.links.iter_mut().filter(|l| l.enabled) {
            if handler(link.behavior.as_mut(), ctx)? == Propagation::Handled {
                outcome = Propagation::Handled;
                break;
            }
        }
        self.apply_requests(ctx.shared);
        Ok(outcome)
    }

    /// Deliver a fired timer to its owner. Detached behaviours still own their
    /// timers, so every link is offered the timer.
    pub fn dispatch_timer(&mut self, ctx: &mut BehaviorContext<'_>, handle: TimerHandle) -> Result<bool> {
        let mut owned = false;
        for link in &mut self.links {
            if link.behavior.on_timer(ctx, handle)? {
                owned = true;
                break;
            }
        }
        self.apply_requests(ctx.shared);
        Ok(owned)
    }

    /// Abort every gesture and cancel every timer the behaviours hold.
    pub fn cancel_all(&mut self, ctx: &mut BehaviorContext<'_>) {
        for link in &mut self.links {
            link.behavior.cancel(ctx);
            link.enabled = true;
        }
        ctx.shared.requests.clear();
    }

    fn apply_requests(&mut self, shared: &mut SharedUiState) {
        for request in std::mem::take(&mut shared.requests) {
            match request {
                ChainRequest::Detach(id) => self.set_enabled(id, false),
                ChainRequest::Reattach(id) => self.set_enabled(id, true),
            }
        }
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
    use test_case::test_case;

    #[test_case("ArrowUp" => Key::ArrowUp)]
    #[test_case("c" => Key::Character('c'))]
    #[test_case("Tab" => Key::Other("Tab".to_string()))]
    fn dom_keys_map(key: &str) -> Key {
        Key::from_dom(key)
    }

    #[test]
    fn standard_chain_order() {
        let chain = BehaviorChain::standard();
        assert_eq!(
            chain.ids(),
            vec![
                BehaviorId::Hover,
                BehaviorId::ColumnResizing,
                BehaviorId::ColumnMoving,
                BehaviorId::CellSelection,
                BehaviorId::KeyboardNavigation
            ]
        );
    }

    #[test]
    fn requests_toggle_enabled_flags() {
        let mut chain = BehaviorChain::standard();
        let mut shared = SharedUiState::default();
        shared.requests.push(ChainRequest::Detach(BehaviorId::Hover));
        chain.apply_requests(&mut shared);
        assert!(!chain.is_enabled(BehaviorId::Hover));
        shared.requests.push(ChainRequest::Reattach(BehaviorId::Hover));
        chain.apply_requests(&mut shared);
        assert!(chain.is_enabled(BehaviorId::Hover));
        assert!(shared.requests.is_empty());
    }
}
