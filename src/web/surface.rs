//! Canvas 2D drawing surface.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{GridError, Result};
use crate::geometry::PixelRect;
use crate::render::CellCanvas;

fn js_error(e: JsValue) -> GridError {
    GridError::Render(format!("{e:?}"))
}

pub(crate) struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f32,
}

impl Canvas2dSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement, dpr: f32) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| GridError::Render("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("context is not CanvasRenderingContext2d".into()))?;
        let mut surface = Self { canvas, ctx, dpr };
        surface.apply_scale()?;
        Ok(surface)
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Size in logical pixels.
    pub(crate) fn logical_size(&self) -> (f32, f32) {
        (
            self.canvas.width() as f32 / self.dpr,
            self.canvas.height() as f32 / self.dpr,
        )
    }

    pub(crate) fn resize(&mut self, physical_width: u32, physical_height: u32, dpr: f32) -> Result<()> {
        self.canvas.set_width(physical_width.max(1));
        self.canvas.set_height(physical_height.max(1));
        self.dpr = dpr;
        self.apply_scale()
    }

    fn apply_scale(&mut self) -> Result<()> {
        let dpr = f64::from(self.dpr);
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(js_error)
    }
}

impl CellCanvas for Canvas2dSurface {
    fn fill_rect(&mut self, rect: PixelRect, color: &str) -> Result<()> {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        Ok(())
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: &str, line_width: f32) -> Result<()> {
        let inset = f64::from(line_width) / 2.0;
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(line_width));
        self.ctx.stroke_rect(
            f64::from(rect.x) + inset,
            f64::from(rect.y) + inset,
            (f64::from(rect.width) - 2.0 * inset).max(0.0),
            (f64::from(rect.height) - 2.0 * inset).max(0.0),
        );
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &str,
        color: &str,
        clip: PixelRect,
    ) -> Result<()> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.begin_path();
        ctx.rect(
            f64::from(clip.x),
            f64::from(clip.y),
            f64::from(clip.width),
            f64::from(clip.height),
        );
        ctx.clip();
        ctx.set_font(font);
        ctx.set_fill_style_str(color);
        ctx.set_text_baseline("middle");
        let drawn = ctx.fill_text(text, f64::from(x), f64::from(y));
        ctx.restore();
        drawn.map_err(js_error)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn measure_text(&mut self, text: &str, font: &str) -> f32 {
        self.ctx.set_font(font);
        self.ctx
            .measure_text(text)
            .map(|metrics| metrics.width() as f32)
            .unwrap_or(0.0)
    }
}
