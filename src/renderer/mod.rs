//! Canvas 2D rendering
//!
//! Renderers are pure functions from a snapshot to a [`Frame`] of paint
//! commands in CSS pixels. The wasm [`canvas::CanvasPainter`] replays a frame
//! onto a `CanvasRenderingContext2d` scaled by the device pixel ratio, with
//! image smoothing disabled so grid art stays crisp.

pub mod breakout;
pub mod snake;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

pub use breakout::render_breakout;
pub use snake::render_snake;
pub use theme::{ColorSpec, Rgba, Theme, ThemeToken};

/// Host render surface (CSS size plus device pixel ratio)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            dpr,
        }
    }

    /// Backing-store size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).round() as u32,
            (self.height * self.dpr).round() as u32,
        )
    }

    /// Uniform fit of a field into the surface, centered
    pub fn viewport(&self, field_width: f32, field_height: f32) -> Viewport {
        let scale = (self.width / field_width).min(self.height / field_height);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let offset = Vec2::new(
            (self.width - field_width * scale) * 0.5,
            (self.height - field_height * scale) * 0.5,
        );
        Viewport { scale, offset }
    }

    /// Map a CSS-pixel point (relative to the canvas) into field units
    pub fn to_field(&self, css_x: f32, css_y: f32, field_width: f32, field_height: f32) -> Vec2 {
        self.viewport(field_width, field_height)
            .to_field(Vec2::new(css_x, css_y))
    }
}

/// Field-to-CSS transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    pub fn to_css(&self, p: Vec2) -> Vec2 {
        self.offset + p * self.scale
    }

    pub fn to_field(&self, css: Vec2) -> Vec2 {
        (css - self.offset) / self.scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One canvas drawing operation (CSS pixels)
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole surface
    Clear { color: Rgba },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        align: TextAlign,
        color: Rgba,
    },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub backing_width: u32,
    pub backing_height: u32,
    /// CSS-to-device scale (the device pixel ratio)
    pub scale: f32,
    pub image_smoothing: bool,
    pub commands: Vec<PaintCommand>,
}

impl Frame {
    pub fn new(surface: &Surface) -> Self {
        let (backing_width, backing_height) = surface.backing_size();
        Self {
            backing_width,
            backing_height,
            scale: surface.dpr,
            image_smoothing: false,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: PaintCommand) {
        self.commands.push(command);
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, align: TextAlign, color: Rgba) {
        self.commands.push(PaintCommand::Text {
            text: text.into(),
            pos,
            size,
            align,
            color,
        });
    }

    /// Centered two-line overlay (title plus hint)
    pub fn overlay(&mut self, surface: &Surface, title: &str, hint: &str, color: Rgba) {
        let center = Vec2::new(surface.width * 0.5, surface.height * 0.5);
        let size = (surface.width.min(surface.height) / 12.0).clamp(12.0, 32.0);
        self.text(title, center, size, TextAlign::Center, color);
        if !hint.is_empty() {
            let below = center + Vec2::new(0.0, size * 1.4);
            self.text(hint, below, size * 0.55, TextAlign::Center, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_size_scales_by_dpr() {
        let surface = Surface::new(300.0, 200.0, 2.0);
        assert_eq!(surface.backing_size(), (600, 400));
        let frame = Frame::new(&surface);
        assert_eq!(frame.scale, 2.0);
        assert!(!frame.image_smoothing);

        // Bad ratios fall back to 1
        assert_eq!(Surface::new(10.0, 10.0, 0.0).dpr, 1.0);
    }

    #[test]
    fn test_viewport_round_trip() {
        let surface = Surface::new(960.0, 600.0, 1.0);
        let vp = surface.viewport(480.0, 400.0);
        assert_eq!(vp.scale, 1.5);
        assert_eq!(vp.offset, Vec2::new(120.0, 0.0));
        let p = Vec2::new(100.0, 50.0);
        assert!((vp.to_field(vp.to_css(p)) - p).length() < 1e-4);
        assert_eq!(surface.to_field(120.0, 0.0, 480.0, 400.0), Vec2::ZERO);
    }
}
