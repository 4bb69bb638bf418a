//! Browser scheduler over `requestAnimationFrame` and `setTimeout`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::scheduler::{Scheduler, TimerHandle, TimerPurpose};

/// What woke the view up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup {
    Frame,
    Timer(TimerHandle),
}

pub(crate) type WakeupSink = Rc<dyn Fn(Wakeup)>;

#[derive(Default)]
struct WebSchedulerState {
    next_handle: u64,
    /// Live timers and their `setTimeout` ids.
    timeouts: HashMap<TimerHandle, i32>,
    frame_pending: bool,
    sink: Option<WakeupSink>,
}

/// Clones share state; the view keeps one to install the wakeup sink.
#[derive(Clone, Default)]
pub(crate) struct WebScheduler {
    state: Rc<RefCell<WebSchedulerState>>,
}

impl WebScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_sink(&self, sink: Option<WakeupSink>) {
        self.state.borrow_mut().sink = sink;
    }

    fn wake(state: &Rc<RefCell<WebSchedulerState>>, wakeup: Wakeup) {
        let sink = {
            let mut s = state.borrow_mut();
            match wakeup {
                Wakeup::Frame => s.frame_pending = false,
                Wakeup::Timer(handle) => {
                    // Cancelled between the browser queueing it and running it.
                    if s.timeouts.remove(&handle).is_none() {
                        return;
                    }
                }
            }
            s.sink.clone()
        };
        if let Some(sink) = sink {
            sink(wakeup);
        }
    }
}

impl Scheduler for WebScheduler {
    fn request_animation_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let mut s = self.state.borrow_mut();
            if s.frame_pending {
                return;
            }
            s.frame_pending = true;
        }
        let weak = Rc::downgrade(&self.state);
        let callback = Closure::once_into_js(move || {
            if let Some(state) = weak.upgrade() {
                WebScheduler::wake(&state, Wakeup::Frame);
            }
        });
        if window
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            warn!("requestAnimationFrame failed");
            self.state.borrow_mut().frame_pending = false;
        }
    }

    fn schedule(&mut self, purpose: TimerPurpose) -> TimerHandle {
        let handle = {
            let mut s = self.state.borrow_mut();
            s.next_handle += 1;
            TimerHandle(s.next_handle)
        };
        let Some(window) = web_sys::window() else {
            return handle;
        };
        let weak = Rc::downgrade(&self.state);
        let callback = Closure::once_into_js(move || {
            if let Some(state) = weak.upgrade() {
                WebScheduler::wake(&state, Wakeup::Timer(handle));
            }
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            i32::try_from(purpose.delay_ms()).unwrap_or(i32::MAX),
        ) {
            Ok(id) => {
                self.state.borrow_mut().timeouts.insert(handle, id);
            }
            Err(_) => warn!(?purpose, "setTimeout failed"),
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let id = self.state.borrow_mut().timeouts.remove(&handle);
        if let (Some(id), Some(window)) = (id, web_sys::window()) {
            window.clear_timeout_with_handle(id);
        }
    }

    fn live_timers(&self) -> Vec<TimerHandle> {
        self.state.borrow().timeouts.keys().copied().collect()
    }
}
