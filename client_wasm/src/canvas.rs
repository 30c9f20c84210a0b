//! Canvas 2D render surface

use game_core::{RenderSurface, TextSize};
use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "black";
const FOREGROUND: &str = "white";
const DASH: f64 = 10.0;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Base font size in pixels, scaled with the canvas width
    font_px: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut surface = Self {
            canvas,
            ctx,
            font_px: 20.0,
        };
        surface.fit_font();
        Ok(surface)
    }

    /// Resize the backing store and rescale text
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.fit_font();
    }

    fn fit_font(&mut self) {
        self.font_px = (f64::from(self.canvas.width()) / 30.0).max(10.0);
    }

    fn font(&self, size: TextSize) -> String {
        let px = match size {
            TextSize::Small => self.font_px * 0.7,
            TextSize::Medium => self.font_px * 0.8,
            TextSize::Large => self.font_px,
        };
        format!("{}px sans-serif", px.round())
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn background(&mut self) {
        let (w, h) = self.size();
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn circle(&mut self, center: Vec2, radius: f32) {
        self.ctx.set_fill_style_str(FOREGROUND);
        self.ctx.begin_path();
        let drawn = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius),
            0.0,
            std::f64::consts::TAU,
        );
        if drawn.is_ok() {
            self.ctx.fill();
        }
    }

    fn rect(&mut self, pos: Vec2, size: Vec2) {
        self.ctx.set_fill_style_str(FOREGROUND);
        self.ctx.fill_rect(
            f64::from(pos.x),
            f64::from(pos.y),
            f64::from(size.x),
            f64::from(size.y),
        );
    }

    fn dashed_line(&mut self, from: Vec2, to: Vec2) {
        let dash = js_sys::Array::of2(&DASH.into(), &DASH.into());
        self.ctx.set_stroke_style_str(FOREGROUND);
        // A failed dash pattern just draws a solid line
        let _ = self.ctx.set_line_dash(&dash);
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.ctx.stroke();
        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
    }

    fn text(&mut self, text: &str, at: Vec2, size: TextSize) {
        self.ctx.set_fill_style_str(FOREGROUND);
        self.ctx.set_font(&self.font(size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        if let Err(e) = self.ctx.fill_text(text, f64::from(at.x), f64::from(at.y)) {
            tracing::warn!(error = ?e, text, "text not drawn");
        }
    }
}
