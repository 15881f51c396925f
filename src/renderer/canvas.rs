//! Canvas 2D painter (wasm only)

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Frame, PaintCommand, Surface};

const FONT_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    /// `None` when the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Current CSS size and device pixel ratio of the canvas
    pub fn surface(&self) -> Surface {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()) as f32;
        Surface::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
            dpr,
        )
    }

    pub fn paint(&self, frame: &Frame) {
        if self.canvas.width() != frame.backing_width {
            self.canvas.set_width(frame.backing_width);
        }
        if self.canvas.height() != frame.backing_height {
            self.canvas.set_height(frame.backing_height);
        }

        let ctx = &self.ctx;
        let scale = frame.scale as f64;
        // Resizing resets context state, so set it every frame
        ctx.set_image_smoothing_enabled(frame.image_smoothing);
        if let Err(e) = ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("canvas transform failed: {:?}", e);
            return;
        }

        let css_w = frame.backing_width as f64 / scale;
        let css_h = frame.backing_height as f64 / scale;
        for command in &frame.commands {
            self.draw(command, css_w, css_h);
        }
    }

    fn draw(&self, command: &PaintCommand, css_w: f64, css_h: f64) {
        let ctx = &self.ctx;
        match command {
            PaintCommand::Clear { color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, css_w, css_h);
            }
            PaintCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(*x as f64, *y as f64, *width as f64, *height as f64);
            }
            PaintCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            PaintCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                if ctx
                    .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                    .is_ok()
                {
                    ctx.fill();
                }
            }
            PaintCommand::Text {
                text,
                pos,
                size,
                align,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.set_font(&format!("{}px {}", size.round(), FONT_FAMILY));
                ctx.set_text_align(align.as_str());
                ctx.set_text_baseline("alphabetic");
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
        }
    }
}
