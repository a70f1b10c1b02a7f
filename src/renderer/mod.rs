//! Canvas 2D rendering
//!
//! Every entity is a filled circle. Frames start with a translucent black
//! fill so fast objects leave short trails.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::platform::{Surface, SurfaceError};
use crate::sim::Color;

/// Backdrop alpha painted over the previous frame
const TRAIL_FADE: f64 = 0.1;

/// Match the canvas backing store to its CSS size; returns the new size
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
    let w = canvas.client_width().max(1) as u32;
    let h = canvas.client_height().max(1) as u32;
    canvas.set_width(w);
    canvas.set_height(h);
    (w as f32, h as f32)
}

pub struct CanvasSurface {
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("Canvas 2D context unavailable - drawing disabled");
        }
        Self { ctx }
    }

    fn context(&self) -> Result<&CanvasRenderingContext2d, SurfaceError> {
        self.ctx.as_ref().ok_or(SurfaceError::Unavailable)
    }
}

impl Surface for CanvasSurface {
    fn begin_frame(&mut self, width: f32, height: f32) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(&format!("rgba(0, 0, 0, {})", TRAIL_FADE));
        ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn draw_circle(&mut self, pos: Vec2, radius: f32, color: Color, alpha: f32) -> Result<(), SurfaceError> {
        if !(radius > 0.0) {
            return Ok(());
        }
        let ctx = self.context()?;
        ctx.save();
        ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        ctx.begin_path();
        ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, std::f64::consts::TAU)
            .map_err(|e| SurfaceError::Rejected(format!("{:?}", e)))?;
        ctx.set_fill_style_str(&color.css());
        ctx.fill();
        ctx.restore();
        Ok(())
    }
}
