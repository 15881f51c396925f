//! Brick Breaker entities
//!
//! Bricks are tombstoned: a destroyed brick stays in its slot with
//! `destroyed = true` so indices stay stable and the renderer can fade it out.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, clamp_span, direction_from_degrees};
use crate::config::{BreakoutConfig, ConfigError};
use crate::levels::{BrickKind, Level};

/// Held keyboard direction for the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaddleDir {
    Left,
    Right,
}

impl PaddleDir {
    fn sign(self) -> f32 {
        match self {
            PaddleDir::Left => -1.0,
            PaddleDir::Right => 1.0,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paddle {
    /// Center x
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Keyboard speed per reference frame
    pub speed: f32,
    /// Pointer/touch target center, `None` when keyboard-driven
    pub target_x: Option<f32>,
    pub held: Option<PaddleDir>,
}

impl Paddle {
    /// Centered paddle for a fresh level
    pub fn new(config: &BreakoutConfig) -> Self {
        Self {
            x: config.field.width * 0.5,
            y: config.paddle_y(),
            width: config.paddle.width,
            height: config.paddle.height,
            speed: config.paddle.speed,
            target_x: None,
            held: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_rect(self.x - self.width * 0.5, self.y, self.width, self.height)
    }

    /// Hold (or release with `None`) a keyboard direction
    pub fn hold(&mut self, dir: Option<PaddleDir>) {
        self.held = dir;
        if dir.is_some() {
            self.target_x = None;
        }
    }

    /// Follow a pointer target
    pub fn aim(&mut self, x: f32) {
        self.target_x = Some(x);
        self.held = None;
    }

    /// Release all control
    pub fn release(&mut self) {
        self.held = None;
        self.target_x = None;
    }

    /// Integrate one frame and clamp to the field
    pub fn integrate(&mut self, dt: f32, smoothing: f32, field_width: f32) {
        if let Some(dir) = self.held {
            self.x += dir.sign() * self.speed * dt;
        } else if let Some(target) = self.target_x {
            let t = (smoothing * dt).min(1.0);
            self.x += (target - self.x) * t;
        }
        self.x = clamp_span(self.x, self.width * 0.5, 0.0, field_width);
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Scalar speed per reference frame
    pub speed: f32,
    /// Past positions, newest first
    pub trail: VecDeque<Vec2>,
    pub launched: bool,
}

impl Ball {
    /// A fresh ball resting on the paddle
    pub fn parked(paddle: &Paddle, radius: f32, speed: f32) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            speed,
            trail: VecDeque::new(),
            launched: false,
        };
        ball.ride(paddle);
        ball
    }

    /// Keep an unlaunched ball centered on top of the paddle
    pub fn ride(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.x, paddle.y - self.radius - 1.0);
    }

    /// Leave the paddle heading `angle_deg` (from +x, y down)
    pub fn launch(&mut self, angle_deg: f32) {
        self.vel = direction_from_degrees(angle_deg) * self.speed;
        self.launched = true;
    }

    /// Record current position to trail
    pub fn record_trail(&mut self, max_len: usize) {
        self.trail.push_front(self.pos);
        self.trail.truncate(max_len);
    }
}

/// Outcome of a ball striking a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Health dropped but the brick survives
    Damaged,
    Destroyed,
    /// Indestructible or already destroyed
    Deflected,
}

/// A brick instance derived from a level cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brick {
    pub id: u32,
    pub row: usize,
    pub col: usize,
    pub aabb: Aabb,
    pub kind: BrickKind,
    /// Remaining hits (`None` = indestructible)
    pub health: Option<u8>,
    pub max_health: Option<u8>,
    pub destroyed: bool,
    /// Engine time of destruction (drives the fade-out)
    pub destroyed_at_ms: Option<f64>,
    pub points: u32,
}

impl Brick {
    /// Apply one ball hit at engine time `now_ms`
    pub fn hit(&mut self, now_ms: f64) -> BrickHit {
        if self.destroyed {
            return BrickHit::Deflected;
        }
        let Some(health) = self.health.as_mut() else {
            return BrickHit::Deflected;
        };
        *health = health.saturating_sub(1);
        if *health == 0 {
            self.destroyed = true;
            self.destroyed_at_ms = Some(now_ms);
            BrickHit::Destroyed
        } else {
            BrickHit::Damaged
        }
    }

    /// Still needs destroying for the level to clear
    pub fn blocks_clear(&self) -> bool {
        !self.destroyed && self.kind.is_destructible()
    }
}

/// Lay a level's grid out over the field
pub fn build_bricks(level: &Level, config: &BreakoutConfig) -> Result<Vec<Brick>, ConfigError> {
    let layout = &config.bricks;
    let columns = level.columns().max(1) as f32;
    let usable = config.field.width - layout.side_padding * 2.0;
    let brick_width = (usable - layout.gap * (columns - 1.0)) / columns;
    if !(brick_width > 0.0) {
        return Err(ConfigError::NotPositive {
            field: "brick width",
            value: brick_width as f64,
        });
    }

    let rows = level.rows.len() as f32;
    let bottom = layout.top_offset + rows * layout.height + (rows - 1.0).max(0.0) * layout.gap;
    // Leave room for the ball to pass between the lowest row and the paddle
    if bottom + config.ball.radius * 2.0 >= config.paddle_y() {
        return Err(ConfigError::LevelTooTall { id: level.id });
    }

    let mut bricks = Vec::new();
    for (row, cells) in level.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let Some(def) = cell else { continue };
            let x = layout.side_padding + col as f32 * (brick_width + layout.gap);
            let y = layout.top_offset + row as f32 * (layout.height + layout.gap);
            let max_health = def.kind.max_health();
            bricks.push(Brick {
                id: bricks.len() as u32,
                row,
                col,
                aabb: Aabb::from_rect(x, y, brick_width, layout.height),
                kind: def.kind,
                health: max_health,
                max_health,
                destroyed: false,
                destroyed_at_ms: None,
                points: def.points(),
            });
        }
    }
    Ok(bricks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::builtin_levels;
    use proptest::prelude::*;

    fn brick(kind: BrickKind) -> Brick {
        Brick {
            id: 0,
            row: 0,
            col: 0,
            aabb: Aabb::from_rect(0.0, 0.0, 10.0, 10.0),
            kind,
            health: kind.max_health(),
            max_health: kind.max_health(),
            destroyed: false,
            destroyed_at_ms: None,
            points: kind.default_points(),
        }
    }

    #[test]
    fn test_metal_takes_three_hits() {
        let mut b = brick(BrickKind::Metal);
        assert_eq!(b.hit(1.0), BrickHit::Damaged);
        assert_eq!(b.hit(2.0), BrickHit::Damaged);
        assert_eq!(b.hit(3.0), BrickHit::Destroyed);
        assert!(b.destroyed);
        assert_eq!(b.destroyed_at_ms, Some(3.0));
        // Tombstone ignores further hits
        assert_eq!(b.hit(4.0), BrickHit::Deflected);
        assert_eq!(b.destroyed_at_ms, Some(3.0));
    }

    #[test]
    fn test_indestructible_never_breaks() {
        let mut b = brick(BrickKind::Indestructible);
        for t in 0..50 {
            assert_eq!(b.hit(t as f64), BrickHit::Deflected);
        }
        assert!(!b.destroyed);
        assert!(!b.blocks_clear());
    }

    #[test]
    fn test_layout_fits_field() {
        let config = BreakoutConfig::default();
        for level in builtin_levels() {
            let bricks = build_bricks(&level, &config).unwrap();
            assert_eq!(
                bricks.iter().filter(|b| b.blocks_clear()).count(),
                level.destructible_count()
            );
            for b in &bricks {
                assert!(b.aabb.min.x >= config.bricks.side_padding - 1e-3);
                assert!(b.aabb.max.x <= config.field.width - config.bricks.side_padding + 1e-3);
                assert!(b.aabb.max.y < config.paddle_y());
            }
            // Neighbours never overlap
            for pair in bricks.windows(2) {
                assert!(!pair[0].aabb.intersects(&pair[1].aabb));
            }
        }
    }

    #[test]
    fn test_too_tall_level_rejected() {
        let rows: Vec<&str> = std::iter::repeat("n").take(40).collect();
        let level = Level::from_ascii(3, "tower", &rows, 1.0);
        assert_eq!(
            build_bricks(&level, &BreakoutConfig::default()),
            Err(ConfigError::LevelTooTall { id: 3 })
        );
    }

    #[test]
    fn test_paddle_keyboard_and_pointer() {
        let config = BreakoutConfig::default();
        let mut paddle = Paddle::new(&config);
        let start = paddle.x;

        paddle.hold(Some(PaddleDir::Right));
        paddle.integrate(1.0, 0.3, config.field.width);
        assert!((paddle.x - (start + config.paddle.speed)).abs() < 1e-4);

        paddle.aim(0.0);
        assert!(paddle.held.is_none());
        for _ in 0..200 {
            paddle.integrate(1.0, 0.3, config.field.width);
        }
        // Clamped so the paddle stays on the field
        assert!((paddle.x - config.paddle.width * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_trail_is_bounded() {
        let config = BreakoutConfig::default();
        let paddle = Paddle::new(&config);
        let mut ball = Ball::parked(&paddle, 6.0, 5.0);
        for i in 0..20 {
            ball.pos.x = i as f32;
            ball.record_trail(8);
        }
        assert_eq!(ball.trail.len(), 8);
        assert_eq!(ball.trail.front().map(|p| p.x), Some(19.0));
    }

    proptest! {
        #[test]
        fn prop_health_is_monotonic(kind_idx in 0usize..4, hits in 0usize..10) {
            let kind = [BrickKind::Normal, BrickKind::Strong, BrickKind::Metal, BrickKind::Indestructible][kind_idx];
            let mut b = brick(kind);
            let mut last = b.health;
            for i in 0..hits {
                b.hit(i as f64);
                match (last, b.health) {
                    (Some(prev), Some(now)) => prop_assert!(now <= prev),
                    (None, None) => {}
                    _ => prop_assert!(false, "health kind changed"),
                }
                prop_assert_eq!(b.destroyed, b.health == Some(0));
                last = b.health;
            }
        }
    }
}
