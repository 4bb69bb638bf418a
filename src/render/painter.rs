//! Cell painters.

use super::canvas::CellCanvas;
use super::fingerprint::{CellPaintFingerprint, ViewCell};
use crate::error::Result;
use crate::settings::GridSettings;

/// Per-cell state resolved by the renderer before painting.
#[derive(Debug, Clone, Copy)]
pub struct CellPaintState<'a> {
    pub text: &'a str,
    pub selected: bool,
    pub focused: bool,
    pub hovered: bool,
    pub header: bool,
}

pub trait CellPainter {
    /// Fingerprint of what [`CellPainter::paint`] would draw. Must cover
    /// every input that changes the output.
    fn fingerprint(
        &self,
        cell: &ViewCell,
        state: &CellPaintState<'_>,
        settings: &GridSettings,
    ) -> CellPaintFingerprint;

    /// Draw the cell and return the measured content width.
    fn paint(
        &self,
        canvas: &mut dyn CellCanvas,
        cell: &ViewCell,
        fingerprint: &CellPaintFingerprint,
        settings: &GridSettings,
    ) -> Result<f32>;
}

/// Background, text and focus border, all kept inside the cell's clip.
#[derive(Debug, Default)]
pub struct TextCellPainter;

impl CellPainter for TextCellPainter {
    fn fingerprint(
        &self,
        cell: &ViewCell,
        state: &CellPaintState<'_>,
        settings: &GridSettings,
    ) -> CellPaintFingerprint {
        let background_color = if state.selected {
            &settings.selection_background_color
        } else if state.hovered {
            &settings.hover_background_color
        } else {
            &settings.background_color
        };
        let font = if state.header {
            format!("bold {}", settings.font)
        } else {
            settings.font.clone()
        };
        CellPaintFingerprint {
            bounds: cell.bounds,
            clip: cell.clip,
            text: state.text.to_string(),
            font,
            color: settings.color.clone(),
            background_color: background_color.clone(),
            selected: state.selected,
            focused: state.focused,
            hovered: state.hovered,
        }
    }

    fn paint(
        &self,
        canvas: &mut dyn CellCanvas,
        cell: &ViewCell,
        fingerprint: &CellPaintFingerprint,
        settings: &GridSettings,
    ) -> Result<f32> {
        let bounds = cell.bounds;
        let clip = cell.clip;
        let width = canvas.measure_text(&fingerprint.text, &fingerprint.font);
        if clip.is_empty() {
            return Ok(width);
        }
        canvas.fill_rect(clip, &fingerprint.background_color)?;
        if !fingerprint.text.is_empty() {
            canvas.fill_text(
                &fingerprint.text,
                bounds.x + settings.cell_padding,
                bounds.y + bounds.height / 2.0,
                &fingerprint.font,
                &fingerprint.color,
                clip,
            )?;
        }
        if fingerprint.focused {
            canvas.stroke_rect(clip, &settings.focus_border_color, 1.0)?;
        }
        Ok(width)
    }
}
