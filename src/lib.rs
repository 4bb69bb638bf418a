//! revgrid - canvas data grid engine for the web
//!
//! Drives a virtualized data grid on a Canvas 2D surface via WebAssembly:
//! - Scroll anchors with fixed and scrollable columns and rows
//! - Multi-area selection (cells, rows, columns) with a single focus
//! - Pointer behaviours: hover, column resize, column drag-move, drag selection
//! - Keyboard navigation and copy as tab separated text
//! - Selection kept across reindexing (sort/filter) of the data
//! - Per-cell fingerprints so unchanged cells are not repainted
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { RevGridView } from 'revgrid';
//! await init();
//! const grid = new RevGridView(canvas, ['Name', 'Qty'], devicePixelRatio);
//! grid.load_rows([['apples', 3], ['pears', 5]]);
//! ```
//!
//! # Usage (Rust)
//!
//! The engine itself is target independent. [`grid::Grid`] takes data and
//! schema servers plus a [`scheduler::Scheduler`] and is driven by input
//! events, fired timers and animation frames.

// Model
pub mod columns;
pub mod data;
pub mod error;
pub mod geometry;
pub mod selection;
pub mod settings;
pub mod subgrid;

// View and interaction
pub mod behavior;
pub mod grid;
pub mod layout;
pub mod render;
pub mod scheduler;

#[cfg(target_arch = "wasm32")]
mod web;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use grid::{Grid, GridEvent};
pub use settings::GridSettings;
#[cfg(target_arch = "wasm32")]
pub use web::RevGridView;

/// Parse settings JSON and return them with every default filled in.
///
/// # Errors
/// Returns an error if the JSON does not describe grid settings.
#[wasm_bindgen]
pub fn resolve_settings(json: &str) -> std::result::Result<String, JsValue> {
    let settings = GridSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&settings)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
