//! Browser view: `RevGridView` exported to JavaScript.
//!
//! The view owns a [`Grid`] inside shared state that the DOM listeners,
//! animation frames and timers all reach through. Listeners are stored as
//! `Closure`s and removed on [`RevGridView::destroy`].
//!
//! Presses and leaves are taken from the canvas; moves and releases from the
//! document, so drags keep tracking the pointer past the canvas edges.
//!
//! ```javascript
//! import init, { RevGridView } from 'revgrid';
//! await init();
//! const grid = new RevGridView(canvas, ['Name', 'Qty'], devicePixelRatio);
//! grid.set_event_callback((event) => console.log(event.type));
//! grid.load_rows([['apples', 3], ['pears', 5]]);
//! ```

mod scheduler;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use tracing::{debug, error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent as DomWheelEvent,
};

use self::scheduler::{Wakeup, WebScheduler};
use self::surface::Canvas2dSurface;
use crate::behavior::{Key, KeyEvent, PointerButton, PointerEvent, Propagation};
use crate::data::{DataNotification, DataValue, FieldListSchemaServer, RowArrayDataServer};
use crate::error::GridError;
use crate::grid::{Grid, GridEvent, WheelEvent};
use crate::settings::{GridSettings, ModifierKeys};

fn to_js(e: GridError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn mouse_modifiers(event: &MouseEvent) -> ModifierKeys {
    ModifierKeys {
        alt: event.alt_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
    }
}

fn key_modifiers(event: &KeyboardEvent) -> ModifierKeys {
    ModifierKeys {
        alt: event.alt_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
    }
}

fn copy_to_clipboard(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let pending = window.navigator().clipboard().write_text(text);
    let on_rejected = Closure::once(|e: JsValue| warn!(?e, "clipboard write failed"));
    // The returned promise only chains further handlers.
    let _ = pending.catch(&on_rejected);
    // Lives until the write settles.
    on_rejected.forget();
}

struct ViewState {
    grid: Grid,
    surface: Canvas2dSurface,
    event_callback: Option<Function>,
}

struct MouseListener {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

#[wasm_bindgen]
pub struct RevGridView {
    state: Rc<RefCell<ViewState>>,
    scheduler: WebScheduler,
    mouse_listeners: Vec<MouseListener>,
    wheel_listener: Option<Closure<dyn FnMut(DomWheelEvent)>>,
    key_listener: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl RevGridView {
    /// Create a grid over `canvas` with one column per field name.
    ///
    /// Pointer, wheel and keyboard listeners are attached straight away:
    /// presses, leaves, wheel and keys on the canvas, moves and releases on
    /// the document.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(canvas: HtmlCanvasElement, field_names: JsValue, dpr: f32) -> Result<RevGridView, JsValue> {
        console_error_panic_hook::set_once();

        let names: Vec<String> = serde_wasm_bindgen::from_value(field_names)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let surface = Canvas2dSurface::new(canvas.clone(), dpr).map_err(to_js)?;
        let (width, height) = surface.logical_size();

        let scheduler = WebScheduler::new();
        let mut grid = Grid::with_header(
            GridSettings::default(),
            Box::new(FieldListSchemaServer::from_names(&names)),
            Box::new(RowArrayDataServer::new(Vec::new())),
            Box::new(scheduler.clone()),
        )
        .map_err(to_js)?;
        grid.resize_canvas(width, height);

        let state = Rc::new(RefCell::new(ViewState {
            grid,
            surface,
            event_callback: None,
        }));

        let weak = Rc::downgrade(&state);
        scheduler.set_sink(Some(Rc::new(move |wakeup| {
            if let Some(state) = weak.upgrade() {
                Self::handle_wakeup(&state, wakeup);
            }
        })));

        // Canvas needs a tabindex to receive key events.
        if let Err(e) = canvas.set_attribute("tabindex", "0") {
            warn!(?e, "canvas tabindex not set");
        }

        let canvas_target = EventTarget::from(canvas.clone());
        let document_target = EventTarget::from(document);
        let mut mouse_listeners: Vec<MouseListener> = Vec::new();
        for (name, listen_on) in [
            ("mousedown", &canvas_target),
            ("mouseleave", &canvas_target),
            ("mousemove", &document_target),
            ("mouseup", &document_target),
        ] {
            let state = state.clone();
            let target = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let rect = target.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                let pointer = PointerEvent::at(x, y)
                    .with_button(PointerButton::from_dom(event.button()))
                    .with_modifiers(mouse_modifiers(&event));
                let handled = Self::internal_pointer(&state, name, pointer);
                if handled && name == "mousedown" {
                    event.prevent_default();
                    if let Err(e) = target.focus() {
                        warn!(?e, "canvas focus failed");
                    }
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            add_listener(listen_on, name, closure.as_ref());
            mouse_listeners.push(MouseListener {
                target: listen_on.clone(),
                name,
                closure,
            });
        }

        let wheel_listener = {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |event: DomWheelEvent| {
                let wheel = WheelEvent {
                    delta_x: event.delta_x() as f32,
                    delta_y: event.delta_y() as f32,
                    modifiers: mouse_modifiers(&event),
                };
                if state.borrow_mut().grid.wheel(wheel) {
                    event.prevent_default();
                }
                Self::flush_events(&state);
            }) as Box<dyn FnMut(DomWheelEvent)>);
            add_listener(&canvas_target, "wheel", closure.as_ref());
            Some(closure)
        };

        let key_listener = {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                let key = KeyEvent::new(Key::from_dom(&event.key()))
                    .with_modifiers(key_modifiers(&event));
                let result = state.borrow_mut().grid.key_down(key);
                match result {
                    Ok(Propagation::Handled) => event.prevent_default(),
                    Ok(Propagation::Continue) => {}
                    Err(e) => error!(%e, "key handling failed"),
                }
                Self::flush_events(&state);
            }) as Box<dyn FnMut(KeyboardEvent)>);
            add_listener(&canvas_target, "keydown", closure.as_ref());
            Some(closure)
        };

        debug!(fields = names.len(), width, height, "grid view created");
        Ok(RevGridView {
            state,
            scheduler,
            mouse_listeners,
            wheel_listener,
            key_listener,
        })
    }

    /// Replace the grid settings from a plain object.
    #[wasm_bindgen]
    pub fn set_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: GridSettings = serde_wasm_bindgen::from_value(settings)?;
        self.state.borrow_mut().grid.set_settings(settings);
        Self::flush_events(&self.state);
        Ok(())
    }

    /// Replace every main row. `rows` is an array of arrays of strings,
    /// numbers, booleans or nulls.
    #[wasm_bindgen]
    pub fn load_rows(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Vec<DataValue>> = serde_wasm_bindgen::from_value(rows)?;
        {
            let mut s = self.state.borrow_mut();
            let main = s.grid.main_subgrid();
            let notifications = s
                .grid
                .with_main_data(|server: &mut RowArrayDataServer| {
                    let cleared = server.clear();
                    let inserted = server.insert_rows(0, rows);
                    [cleared, inserted]
                })
                .ok_or_else(|| JsValue::from_str("main data is not a row array"))?;
            s.grid
                .on_data_notification(main, DataNotification::BeginChange)
                .map_err(to_js)?;
            for notification in notifications {
                s.grid.on_data_notification(main, notification).map_err(to_js)?;
            }
            s.grid
                .on_data_notification(main, DataNotification::EndChange)
                .map_err(to_js)?;
        }
        Self::flush_events(&self.state);
        Ok(())
    }

    /// Receives every grid event as a plain object with a `type` field.
    #[wasm_bindgen]
    pub fn set_event_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().event_callback = callback;
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, physical_width: u32, physical_height: u32, dpr: f32) -> Result<(), JsValue> {
        {
            let mut s = self.state.borrow_mut();
            s.surface
                .resize(physical_width, physical_height, dpr)
                .map_err(to_js)?;
            let (width, height) = s.surface.logical_size();
            s.grid.resize_canvas(width, height);
            s.grid.renderer_mut().force_repaint();
        }
        Self::flush_events(&self.state);
        Ok(())
    }

    /// Paint now instead of waiting for the next animation frame.
    #[wasm_bindgen]
    pub fn render(&mut self) -> Result<(), JsValue> {
        Self::paint(&self.state).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn scroll_columns_by(&mut self, delta: i32) -> bool {
        let scrolled = self.state.borrow_mut().grid.scroll_columns_by(delta as isize);
        Self::flush_events(&self.state);
        scrolled
    }

    #[wasm_bindgen]
    pub fn scroll_rows_by(&mut self, delta: i32) -> bool {
        let scrolled = self.state.borrow_mut().grid.scroll_rows_by(delta as isize);
        Self::flush_events(&self.state);
        scrolled
    }

    /// Tab separated text of the current selection.
    #[wasm_bindgen]
    pub fn selection_text(&self) -> Option<String> {
        self.state.borrow().grid.selection_to_text()
    }

    /// Selected main rows.
    #[wasm_bindgen]
    #[allow(clippy::cast_possible_truncation)]
    pub fn selected_rows(&self) -> Vec<u32> {
        let s = self.state.borrow();
        let main = s.grid.main_subgrid();
        s.grid
            .selection()
            .selected_row_indices(main)
            .into_iter()
            .map(|row| row as u32)
            .collect()
    }

    /// Remove every listener and cancel pending timers.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        let canvas = self.state.borrow().surface.canvas().clone();
        for listener in self.mouse_listeners.drain(..) {
            remove_listener(&listener.target, listener.name, listener.closure.as_ref());
        }
        if let Some(closure) = self.wheel_listener.take() {
            remove_listener(&canvas, "wheel", closure.as_ref());
        }
        if let Some(closure) = self.key_listener.take() {
            remove_listener(&canvas, "keydown", closure.as_ref());
        }
        self.scheduler.set_sink(None);
        self.state.borrow_mut().grid.detach();
        debug!("grid view destroyed");
    }
}

fn add_listener(target: &EventTarget, name: &str, callback: &JsValue) {
    if let Err(e) = target.add_event_listener_with_callback(name, callback.unchecked_ref()) {
        warn!(?e, name, "listener not attached");
    }
}

fn remove_listener(target: &EventTarget, name: &str, callback: &JsValue) {
    if let Err(e) = target.remove_event_listener_with_callback(name, callback.unchecked_ref()) {
        warn!(?e, name, "listener not removed");
    }
}

impl Drop for RevGridView {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl RevGridView {
    fn internal_pointer(state: &Rc<RefCell<ViewState>>, kind: &str, event: PointerEvent) -> bool {
        let result = {
            let mut s = state.borrow_mut();
            let result = match kind {
                "mousedown" => s.grid.pointer_down(event),
                "mousemove" => s.grid.pointer_move(event),
                "mouseup" => s.grid.pointer_up(event),
                _ => s.grid.pointer_leave(),
            };
            let cursor = s.grid.shared().cursor.as_css();
            if let Err(e) = s.surface.canvas().style().set_property("cursor", cursor) {
                warn!(?e, cursor, "cursor not set");
            }
            result
        };
        Self::flush_events(state);
        match result {
            Ok(propagation) => propagation == Propagation::Handled,
            Err(e) => {
                error!(%e, kind, "pointer handling failed");
                false
            }
        }
    }

    fn handle_wakeup(state: &Rc<RefCell<ViewState>>, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Frame => {
                if let Err(e) = Self::paint(state) {
                    error!(%e, "frame failed");
                }
            }
            Wakeup::Timer(handle) => {
                let result = state.borrow_mut().grid.fire_timer(handle);
                if let Err(e) = result {
                    error!(%e, ?handle, "timer failed");
                }
                Self::flush_events(state);
            }
        }
    }

    fn paint(state: &Rc<RefCell<ViewState>>) -> crate::error::Result<()> {
        {
            let s = &mut *state.borrow_mut();
            s.grid.on_animation_frame(&mut s.surface)?;
        }
        Self::flush_events(state);
        Ok(())
    }

    /// Hand queued grid events to the host. Runs with the state unborrowed so
    /// the callback may call back into the view.
    fn flush_events(state: &Rc<RefCell<ViewState>>) {
        let (events, callback) = {
            let mut s = state.borrow_mut();
            (s.grid.drain_events(), s.event_callback.clone())
        };
        for event in events {
            if let GridEvent::Copy { text } = &event {
                copy_to_clipboard(text);
            }
            let Some(callback) = callback.as_ref() else {
                continue;
            };
            match serde_wasm_bindgen::to_value(&event) {
                Ok(value) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                        warn!(?e, "event callback threw");
                    }
                }
                Err(e) => error!(%e, "event serialization failed"),
            }
        }
    }
}
