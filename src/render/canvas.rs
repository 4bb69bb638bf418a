//! Drawing surface abstraction.

use crate::error::Result;
use crate::geometry::PixelRect;

/// The subset of a 2D canvas the grid paints with.
pub trait CellCanvas {
    fn fill_rect(&mut self, rect: PixelRect, color: &str) -> Result<()>;

    fn stroke_rect(&mut self, rect: PixelRect, color: &str, line_width: f32) -> Result<()>;

    /// Draw `text` with its left baseline-middle at `(x, y)`, clipped to `clip`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &str,
        color: &str,
        clip: PixelRect,
    ) -> Result<()>;

    fn measure_text(&mut self, text: &str, font: &str) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: PixelRect, color: String },
    StrokeRect { rect: PixelRect, color: String },
    FillText {
        text: String,
        x: f32,
        y: f32,
        clip: PixelRect,
    },
}

/// Canvas that records draw calls. Text is measured at a fixed advance per
/// character.
#[derive(Debug)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    pub char_width: f32,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            char_width: 7.0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                DrawOp::FillRect { .. } | DrawOp::StrokeRect { .. } => None,
            })
            .collect()
    }
}

impl CellCanvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: PixelRect, color: &str) -> Result<()> {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: &str, _line_width: f32) -> Result<()> {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: color.to_string(),
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        _font: &str,
        _color: &str,
        clip: PixelRect,
    ) -> Result<()> {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            clip,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, _font: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}
