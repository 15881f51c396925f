//! Brick Breaker renderer
//!
//! Cosmetic effects only; nothing here feeds back into the simulation:
//! - Ball trail with opacity ramping down by age
//! - Destroyed bricks fade out over `effects.destroy_animation_ms`
//! - Damaged bricks lose opacity with health

use glam::Vec2;

use super::theme::{Rgba, Theme, resolve};
use super::{Frame, PaintCommand, Surface, TextAlign};
use crate::config::{BreakoutColors, BreakoutConfig};
use crate::levels::BrickKind;
use crate::sim::{Brick, BreakoutSnapshot, GamePhase};

/// Peak opacity of the newest trail point
const TRAIL_ALPHA: f32 = 0.5;

/// Remaining opacity of a brick destroyed at `destroyed_at_ms`
pub fn destroy_fade(destroyed_at_ms: f64, now_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 0.0;
    }
    let t = ((now_ms - destroyed_at_ms) / duration_ms).clamp(0.0, 1.0);
    (1.0 - t) as f32
}

/// Opacity of trail point `index` (0 = newest) out of `len`
pub fn trail_alpha(index: usize, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    TRAIL_ALPHA * (1.0 - index as f32 / len as f32)
}

fn brick_color(colors: &BreakoutColors, kind: BrickKind, theme: Theme) -> Rgba {
    let spec = match kind {
        BrickKind::Normal => &colors.brick_normal,
        BrickKind::Strong => &colors.brick_strong,
        BrickKind::Metal => &colors.brick_metal,
        BrickKind::Indestructible => &colors.brick_indestructible,
    };
    resolve(spec, theme)
}

/// Brick opacity: fading tombstones, health-scaled live bricks
fn brick_alpha(brick: &Brick, now_ms: f64, config: &BreakoutConfig) -> f32 {
    if brick.destroyed {
        return match brick.destroyed_at_ms {
            Some(at) => destroy_fade(at, now_ms, config.effects.destroy_animation_ms),
            None => 0.0,
        };
    }
    match (brick.health, brick.max_health) {
        (Some(health), Some(max)) if max > 0 => 0.4 + 0.6 * health as f32 / max as f32,
        _ => 1.0,
    }
}

pub fn render_breakout(
    snapshot: &BreakoutSnapshot,
    config: &BreakoutConfig,
    surface: &Surface,
    theme: Theme,
) -> Frame {
    let colors = &config.colors;
    let text = resolve(&colors.text, theme);
    let vp = surface.viewport(snapshot.field_width, snapshot.field_height);

    let mut frame = Frame::new(surface);
    frame.push(PaintCommand::Clear {
        color: resolve(&colors.background, theme),
    });

    for brick in &snapshot.bricks {
        let alpha = brick_alpha(brick, snapshot.time_ms, config);
        if alpha <= 0.0 {
            continue;
        }
        let min = vp.to_css(brick.aabb.min);
        frame.push(PaintCommand::FillRect {
            x: min.x,
            y: min.y,
            width: brick.aabb.width() * vp.scale,
            height: brick.aabb.height() * vp.scale,
            color: brick_color(colors, brick.kind, theme).with_alpha(alpha),
        });
    }

    let ball = &snapshot.ball;
    if config.effects.trail && ball.launched {
        let trail = resolve(&colors.trail, theme);
        let len = ball.trail.len();
        // Oldest first so newer points overlap older ones
        for (i, pos) in ball.trail.iter().enumerate().rev() {
            let age = i as f32 / len as f32;
            frame.push(PaintCommand::FillCircle {
                center: vp.to_css(*pos),
                radius: ball.radius * vp.scale * (1.0 - age * 0.5),
                color: trail.with_alpha(trail_alpha(i, len)),
            });
        }
    }

    let paddle = &snapshot.paddle;
    let paddle_min = vp.to_css(paddle.aabb().min);
    frame.push(PaintCommand::FillRect {
        x: paddle_min.x,
        y: paddle_min.y,
        width: paddle.width * vp.scale,
        height: paddle.height * vp.scale,
        color: resolve(&colors.paddle, theme),
    });

    if snapshot.phase != GamePhase::Lost {
        frame.push(PaintCommand::FillCircle {
            center: vp.to_css(ball.pos),
            radius: ball.radius * vp.scale,
            color: resolve(&colors.ball, theme),
        });
    }

    let hud_size = (14.0 * vp.scale).clamp(10.0, 18.0);
    let hud_y = vp.offset.y + hud_size + 4.0;
    let left = vp.offset.x + 6.0;
    let right = vp.offset.x + snapshot.field_width * vp.scale - 6.0;
    frame.text(
        format!("Score: {}", snapshot.score),
        Vec2::new(left, hud_y),
        hud_size,
        TextAlign::Left,
        text,
    );
    frame.text(
        format!("Level {}  Lives {}", snapshot.level, snapshot.lives),
        Vec2::new(right, hud_y),
        hud_size,
        TextAlign::Right,
        text,
    );
    if snapshot.combo > 1 {
        frame.text(
            format!("Combo x{}", snapshot.combo),
            Vec2::new(surface.width * 0.5, hud_y),
            hud_size,
            TextAlign::Center,
            text,
        );
    }

    match snapshot.phase {
        GamePhase::Idle => frame.overlay(surface, "Brick Breaker", "Press Space or click to start", text),
        GamePhase::Playing if !ball.launched => {
            frame.overlay(surface, "", "Press Space or click to launch", text)
        }
        GamePhase::Paused => frame.overlay(surface, "Paused", "Press Space to resume", text),
        GamePhase::LevelComplete => frame.overlay(
            surface,
            &format!("{} cleared", snapshot.level_name),
            "Press Space for the next level",
            text,
        ),
        GamePhase::Won => frame.overlay(
            surface,
            "You Win!",
            &format!("Final score {} - best {}", snapshot.score, snapshot.highscore),
            text,
        ),
        GamePhase::Lost => frame.overlay(
            surface,
            "Game Over",
            &format!("Score {} - best {}", snapshot.score, snapshot.highscore),
            text,
        ),
        _ => {}
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Persistence;
    use crate::sim::{ArcadeEngine, BreakoutEngine};

    fn snapshot() -> (BreakoutSnapshot, BreakoutConfig) {
        let config = BreakoutConfig::default();
        let mut engine = BreakoutEngine::new(config.clone(), Persistence::in_memory())
            .unwrap()
            .with_seed(12);
        engine.start();
        for _ in 0..5 {
            engine.advance(1000.0 / 60.0);
        }
        (engine.snapshot(), config)
    }

    #[test]
    fn test_destroy_fade_ramps_to_zero() {
        assert_eq!(destroy_fade(100.0, 100.0, 300.0), 1.0);
        assert!((destroy_fade(100.0, 250.0, 300.0) - 0.5).abs() < 1e-6);
        assert_eq!(destroy_fade(100.0, 400.0, 300.0), 0.0);
        assert_eq!(destroy_fade(100.0, 1000.0, 300.0), 0.0);
        assert_eq!(destroy_fade(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_trail_alpha_ramps_with_recency() {
        assert_eq!(trail_alpha(0, 8), TRAIL_ALPHA);
        assert!(trail_alpha(1, 8) > trail_alpha(7, 8));
        assert!(trail_alpha(7, 8) > 0.0);
        assert_eq!(trail_alpha(0, 0), 0.0);
    }

    #[test]
    fn test_live_bricks_and_trail_are_painted() {
        let (snap, config) = snapshot();
        let surface = Surface::new(480.0, 400.0, 1.0);
        let frame = render_breakout(&snap, &config, &surface, Theme::Light);

        let rects = frame
            .commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillRect { .. }))
            .count();
        // Every brick of the first level plus the paddle
        assert_eq!(rects, snap.bricks.len() + 1);

        let circles = frame
            .commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillCircle { .. }))
            .count();
        assert_eq!(circles, snap.ball.trail.len() + 1);
    }

    #[test]
    fn test_faded_tombstones_are_skipped() {
        let (mut snap, config) = snapshot();
        snap.bricks[0].destroyed = true;
        snap.bricks[0].health = Some(0);
        snap.bricks[0].destroyed_at_ms = Some(0.0);
        snap.time_ms = config.effects.destroy_animation_ms + 1.0;
        let surface = Surface::new(480.0, 400.0, 1.0);
        let frame = render_breakout(&snap, &config, &surface, Theme::Light);
        let rects = frame
            .commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillRect { .. }))
            .count();
        assert_eq!(rects, snap.bricks.len());
    }

    #[test]
    fn test_bricks_scale_with_surface() {
        let (snap, config) = snapshot();
        let surface = Surface::new(960.0, 800.0, 1.0);
        let frame = render_breakout(&snap, &config, &surface, Theme::Dark);
        let first = frame.commands.iter().find_map(|c| match c {
            PaintCommand::FillRect { width, .. } => Some(*width),
            _ => None,
        });
        assert_eq!(first, Some(snap.bricks[0].aabb.width() * 2.0));
    }
}
