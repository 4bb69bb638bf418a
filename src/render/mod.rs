//! Cell painting.
//!
//! The renderer walks the visible cells of the last computed layout and hands
//! each to a [`CellPainter`]. Painting goes through the [`CellCanvas`] trait;
//! the browser view implements it over a Canvas 2D context and tests use
//! [`RecordingCanvas`].

pub mod canvas;
pub mod fingerprint;
pub mod painter;
pub mod renderer;

pub use canvas::{CellCanvas, DrawOp, RecordingCanvas};
pub use fingerprint::{CellPaintFingerprint, ViewCell, ViewCellCache};
pub use painter::{CellPaintState, CellPainter, TextCellPainter};
pub use renderer::{GridRenderer, PaintStats};
