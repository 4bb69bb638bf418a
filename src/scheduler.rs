//! Deferred work: animation frames and gesture timers.
//!
//! The engine never touches the event loop itself. Everything deferred goes
//! through a [`Scheduler`]; the browser view implements it with
//! `requestAnimationFrame`/`setTimeout`, tests drive a [`ManualScheduler`]
//! in virtual time. Every handle handed out here is cancelled by its owner on
//! the terminal transition of its gesture.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// What a timer is for; also fixes its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Re-check loop while a selection drag is outside the scrollable area.
    SelectionAutoScroll,
    /// Step loop while a column drag sits past the scrollable edge.
    ColumnMoveEdgeScroll,
    /// Deferred re-attach of behaviours detached during a column drag.
    ReattachBehaviors,
}

impl TimerPurpose {
    pub const fn delay_ms(self) -> u32 {
        match self {
            TimerPurpose::SelectionAutoScroll => 25,
            TimerPurpose::ColumnMoveEdgeScroll => 400,
            TimerPurpose::ReattachBehaviors => 50,
        }
    }
}

pub trait Scheduler {
    /// Ask for one animation frame. Repeated requests before the frame runs
    /// are harmless.
    fn request_animation_frame(&mut self);

    /// One-shot timer firing after `purpose.delay_ms()`.
    fn schedule(&mut self, purpose: TimerPurpose) -> TimerHandle;

    /// Cancel a timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Handles scheduled and neither fired nor cancelled.
    fn live_timers(&self) -> Vec<TimerHandle>;
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    purpose: TimerPurpose,
    due_ms: u64,
}

#[derive(Debug, Default)]
struct ManualState {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<PendingTimer>,
    frame_requested: bool,
    frame_requests: u64,
}

/// Virtual-time scheduler. Clones share state, so a test can keep one clone
/// while the grid owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Advance virtual time and return the timers that came due, in due order.
    pub fn advance(&self, ms: u64) -> Vec<(TimerHandle, TimerPurpose)> {
        let mut state = self.state.borrow_mut();
        state.now_ms += ms;
        let now = state.now_ms;
        let mut due: Vec<PendingTimer> = Vec::new();
        state.pending.retain(|t| {
            if t.due_ms <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due_ms, t.handle));
        due.into_iter().map(|t| (t.handle, t.purpose)).collect()
    }

    /// Consume a pending frame request.
    pub fn take_frame_request(&self) -> bool {
        std::mem::replace(&mut self.state.borrow_mut().frame_requested, false)
    }

    /// Total frame requests made, coalesced or not.
    pub fn frame_request_count(&self) -> u64 {
        self.state.borrow().frame_requests
    }

    pub fn pending_purposes(&self) -> Vec<TimerPurpose> {
        self.state.borrow().pending.iter().map(|t| t.purpose).collect()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.state.borrow().pending.iter().any(|t| t.handle == handle)
    }
}

impl Scheduler for ManualScheduler {
    fn request_animation_frame(&mut self) {
        let mut state = self.state.borrow_mut();
        state.frame_requested = true;
        state.frame_requests += 1;
    }

    fn schedule(&mut self, purpose: TimerPurpose) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let handle = TimerHandle(state.next_handle);
        state.next_handle += 1;
        let due_ms = state.now_ms + u64::from(purpose.delay_ms());
        state.pending.push(PendingTimer {
            handle,
            purpose,
            due_ms,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let mut state = self.state.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|t| t.handle != handle);
        if state.pending.len() != before {
            debug!(?handle, "timer cancelled");
        }
    }

    fn live_timers(&self) -> Vec<TimerHandle> {
        self.state.borrow().pending.iter().map(|t| t.handle).collect()
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

    #[test]
    fn timers_fire_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.schedule(TimerPurpose::ColumnMoveEdgeScroll);
        let fast = scheduler.schedule(TimerPurpose::SelectionAutoScroll);
        assert!(scheduler.advance(24).is_empty());
        assert_eq!(
            scheduler.advance(1),
            vec![(fast, TimerPurpose::SelectionAutoScroll)]
        );
        assert!(scheduler.is_pending(slow));
        assert_eq!(scheduler.advance(1000).len(), 1);
        assert!(scheduler.live_timers().is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(TimerPurpose::ReattachBehaviors);
        scheduler.cancel(handle);
        assert!(scheduler.advance(100).is_empty());
    }

    #[test]
    fn clones_share_state() {
        let observer = ManualScheduler::new();
        let mut owned: Box<dyn Scheduler> = Box::new(observer.clone());
        owned.request_animation_frame();
        owned.request_animation_frame();
        assert!(observer.take_frame_request());
        assert!(!observer.take_frame_request());
        assert_eq!(observer.frame_request_count(), 2);
    }
}
