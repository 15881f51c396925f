//! Brick Breaker engine
//!
//! Continuous simulation advanced once per display frame. Each frame:
//! 1. Integrate the paddle (held key or smoothed pointer follow)
//! 2. Integrate the ball and record its trail
//! 3. Walls (left/right/top reflect; the bottom is a miss)
//! 4. Paddle bounce with angle remap (only while the ball is falling)
//! 5. At most one brick contact, first in collection order
//! 6. Level-clear check

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::clock::Clock;
use super::collision::{ball_box_collision, paddle_bounce, resolve_box_contact};
use super::entities::{Ball, Brick, BrickHit, Paddle, PaddleDir, build_bricks};
use super::lifecycle::{ArcadeEngine, GamePhase, GameSummary, Hooks, Lifecycle, SummaryDetails};
use super::scoring::{ComboTracker, brick_score};
use crate::config::{BreakoutConfig, ConfigError};
use crate::highscores::HighScores;
use crate::levels::{Level, builtin_levels, validate_levels};
use crate::persistence::Persistence;

/// Launch arc: `-90° ± LAUNCH_SPREAD_DEG / 2`
const LAUNCH_SPREAD_DEG: f32 = 90.0;

/// Read-only view of a Brick Breaker game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub highscore: u64,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    pub level_name: String,
    pub level_count: usize,
    pub combo: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    /// Simulated engine time (drives destroy fades)
    pub time_ms: f64,
    pub field_width: f32,
    pub field_height: f32,
    pub highscores: HighScores,
}

pub struct BreakoutEngine {
    config: BreakoutConfig,
    levels: Vec<Level>,
    level_index: usize,
    lifecycle: Lifecycle,
    persistence: Persistence,
    rng: Pcg32,
    paddle: Paddle,
    ball: Ball,
    bricks: Vec<Brick>,
    combo: ComboTracker,
    score: u64,
    highscore: u64,
    highscores: HighScores,
    lives: u32,
    bricks_destroyed: usize,
    time_ms: f64,
}

impl BreakoutEngine {
    /// Engine over the built-in level set
    pub fn new(config: BreakoutConfig, persistence: Persistence) -> Result<Self, ConfigError> {
        Self::with_levels(config, builtin_levels(), persistence)
    }

    /// Engine over a host-supplied level set
    pub fn with_levels(
        config: BreakoutConfig,
        levels: Vec<Level>,
        persistence: Persistence,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_levels(&levels)?;
        // Fail fast on any level that does not fit the field
        let bricks = build_bricks(&levels[0], &config)?;
        for level in &levels[1..] {
            build_bricks(level, &config)?;
        }

        let highscores = persistence.highscores(&config.storage.key, config.storage.max_entries);
        let best: u64 = persistence.get(&config.storage.best_key(), 0);
        let highscore = best.max(highscores.top_score().unwrap_or(0));

        let paddle = Paddle::new(&config);
        let speed = config.ball.speed * levels[0].speed_multiplier;
        let ball = Ball::parked(&paddle, config.ball.radius, speed);
        let clock = Clock::frame(config.physics.target_frame_ms, config.physics.max_frame_ms);
        let scoring = &config.scoring;
        let combo = ComboTracker::new(
            scoring.combo_timeout_ms,
            scoring.combo_multiplier,
            scoring.max_combo,
        );

        Ok(Self {
            lifecycle: Lifecycle::new("brick-breaker", clock),
            persistence,
            rng: Pcg32::seed_from_u64(rand::random()),
            paddle,
            ball,
            bricks,
            combo,
            score: 0,
            highscore,
            highscores,
            lives: config.game.lives,
            bricks_destroyed: 0,
            time_ms: 0.0,
            level_index: 0,
            levels,
            config,
        })
    }

    /// Reseed the launch-angle RNG (deterministic runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Hold a keyboard direction (`None` releases)
    pub fn move_paddle(&mut self, dir: Option<PaddleDir>) {
        self.paddle.hold(dir);
    }

    /// Steer the paddle center toward `x` (field units)
    pub fn set_paddle_position(&mut self, x: f32) {
        self.paddle.aim(x);
    }

    /// Drop both keyboard and pointer control
    pub fn release_paddle(&mut self) {
        self.paddle.release();
    }

    /// Launch the parked ball at a random upward angle
    pub fn launch_ball(&mut self) -> bool {
        if self.lifecycle.phase() != GamePhase::Playing || self.ball.launched {
            return false;
        }
        // r in (0, 1) keeps the angle strictly inside (-135°, -45°)
        let r: f32 = self.rng.random_range(f32::EPSILON..1.0);
        let angle = -90.0 + (r - 0.5) * LAUNCH_SPREAD_DEG;
        self.ball.launch(angle);
        log::debug!("ball launched at {:.1}°", angle);
        true
    }

    /// Continue from `LevelComplete` to the next level
    pub fn next_level(&mut self) -> bool {
        if self.lifecycle.phase() != GamePhase::LevelComplete
            || self.level_index + 1 >= self.levels.len()
        {
            return false;
        }
        self.level_index += 1;
        self.load_level();
        self.lifecycle.transition(GamePhase::Playing);
        self.lifecycle
            .hooks_mut()
            .level_changed(self.level_index as u32 + 1);
        true
    }

    fn current_level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    /// Fresh bricks, paddle, and parked ball for the current level
    fn load_level(&mut self) {
        // Every level was laid out once at construction
        self.bricks = build_bricks(self.current_level(), &self.config).unwrap_or_default();
        self.paddle = Paddle::new(&self.config);
        self.respawn_ball();
        self.combo.reset();
    }

    fn respawn_ball(&mut self) {
        let speed = self.config.ball.speed * self.current_level().speed_multiplier;
        self.ball = Ball::parked(&self.paddle, self.config.ball.radius, speed);
    }

    fn init_run(&mut self) {
        self.level_index = 0;
        self.lives = self.config.game.lives;
        self.bricks_destroyed = 0;
        self.time_ms = 0.0;
        self.load_level();
        if self.score != 0 {
            self.score = 0;
            self.lifecycle.hooks_mut().score_changed(0);
        }
    }

    fn add_points(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.lifecycle.hooks_mut().score_changed(self.score);
        if self.score > self.highscore {
            self.highscore = self.score;
            let key = self.config.storage.best_key();
            self.persistence.set(&key, &self.highscore);
        }
    }

    /// One display frame of `dt` reference frames
    fn update(&mut self, dt: f32) {
        let field_w = self.config.field.width;
        let field_h = self.config.field.height;

        self.paddle
            .integrate(dt, self.config.paddle.smoothing, field_w);

        if !self.ball.launched {
            self.ball.ride(&self.paddle);
            return;
        }

        self.ball.pos += self.ball.vel * dt;
        if self.config.effects.trail {
            self.ball.record_trail(self.config.effects.trail_length);
        }

        let r = self.ball.radius;
        if self.ball.pos.x - r < 0.0 {
            self.ball.pos.x = r;
            self.ball.vel.x = self.ball.vel.x.abs();
        } else if self.ball.pos.x + r > field_w {
            self.ball.pos.x = field_w - r;
            self.ball.vel.x = -self.ball.vel.x.abs();
        }
        if self.ball.pos.y - r < 0.0 {
            self.ball.pos.y = r;
            self.ball.vel.y = self.ball.vel.y.abs();
        }

        if self.ball.pos.y - r > field_h {
            self.lose_life();
            return;
        }

        // Only a falling ball can hit the paddle
        if self.ball.vel.y > 0.0 && self.paddle.aabb().intersects_circle(self.ball.pos, r) {
            let physics = &self.config.physics;
            self.ball.vel = paddle_bounce(
                self.ball.pos.x,
                self.paddle.x,
                self.paddle.width,
                self.ball.speed,
                physics.max_bounce_angle_deg,
                physics.min_vertical_ratio * self.ball.speed,
            );
            self.ball.pos.y = self.paddle.y - r;
            self.combo.reset();
        }

        self.collide_bricks();

        if !self.bricks.iter().any(Brick::blocks_clear) {
            self.level_cleared();
        }
    }

    /// First live brick in collection order wins
    // TODO: pick the closest contact when two bricks overlap the ball in one frame
    fn collide_bricks(&mut self) {
        let (pos, vel, r) = (self.ball.pos, self.ball.vel, self.ball.radius);
        let found = self
            .bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.destroyed)
            .find_map(|(i, b)| ball_box_collision(pos, r, vel, &b.aabb).map(|c| (i, c)));
        let Some((index, contact)) = found else {
            return;
        };

        let now = self.time_ms;
        let brick = &mut self.bricks[index];
        let (new_pos, new_vel) = resolve_box_contact(pos, vel, r, &brick.aabb, &contact);
        self.ball.pos = new_pos;
        self.ball.vel = new_vel;
        log::debug!("brick {} hit on {:?}", brick.id, contact.side);

        if !brick.kind.is_destructible() {
            return;
        }
        let points = brick.points;
        let outcome = brick.hit(now);
        let factor = self.combo.register_hit(now);
        if outcome == BrickHit::Destroyed {
            self.bricks_destroyed += 1;
            self.add_points(brick_score(points, factor));
        }
    }

    fn level_cleared(&mut self) {
        self.add_points(self.config.scoring.level_complete_bonus);
        self.paddle.release();
        if self.level_index + 1 < self.levels.len() {
            self.lifecycle.transition(GamePhase::LevelComplete);
        } else {
            self.end_run(GamePhase::Won);
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo.reset();
        log::debug!("ball lost, {} lives left", self.lives);
        if self.lives == 0 {
            self.ball.launched = false;
            self.end_run(GamePhase::Lost);
        } else {
            self.respawn_ball();
        }
    }

    fn end_run(&mut self, outcome: GamePhase) {
        let storage = &self.config.storage;
        self.highscores = self
            .persistence
            .add_highscore(&storage.key, self.score, storage.max_entries);
        self.paddle.release();
        self.lifecycle.transition(outcome);

        let bricks_total = self.levels[..=self.level_index]
            .iter()
            .map(Level::destructible_count)
            .sum();
        let summary = GameSummary {
            outcome,
            score: self.score,
            highscore: self.highscore,
            details: SummaryDetails::Breakout {
                level: self.level_index as u32 + 1,
                bricks_destroyed: self.bricks_destroyed,
                bricks_total,
            },
        };
        log::info!(
            "brick-breaker {}: score {} level {}",
            outcome,
            self.score,
            self.level_index + 1
        );
        self.lifecycle.hooks_mut().game_ended(&summary);
    }
}

impl ArcadeEngine for BreakoutEngine {
    type Snapshot = BreakoutSnapshot;

    fn phase(&self) -> GamePhase {
        self.lifecycle.phase()
    }

    fn start(&mut self) -> bool {
        if !self.lifecycle.phase().can_start() {
            return false;
        }
        self.init_run();
        self.lifecycle.transition(GamePhase::Playing);
        self.lifecycle.hooks_mut().level_changed(1);
        self.launch_ball()
    }

    fn pause(&mut self) -> bool {
        if self.lifecycle.phase() != GamePhase::Playing {
            return false;
        }
        self.paddle.release();
        self.lifecycle.transition(GamePhase::Paused)
    }

    fn resume(&mut self) -> bool {
        self.lifecycle.phase() == GamePhase::Paused && self.lifecycle.transition(GamePhase::Playing)
    }

    fn reset(&mut self) {
        self.init_run();
        self.lifecycle.transition(GamePhase::Idle);
    }

    fn advance(&mut self, elapsed_ms: f64) {
        let Some((dt, ms)) = self.lifecycle.clock().frame_delta(elapsed_ms) else {
            return;
        };
        self.time_ms += ms;
        self.update(dt);
    }

    fn snapshot(&self) -> BreakoutSnapshot {
        let level = self.current_level();
        BreakoutSnapshot {
            phase: self.lifecycle.phase(),
            score: self.score,
            highscore: self.highscore,
            lives: self.lives,
            level: self.level_index as u32 + 1,
            level_name: level.name.clone(),
            level_count: self.levels.len(),
            combo: self.combo.combo(),
            paddle: self.paddle.clone(),
            ball: self.ball.clone(),
            bricks: self.bricks.clone(),
            time_ms: self.time_ms,
            field_width: self.config.field.width,
            field_height: self.config.field.height,
            highscores: self.highscores.clone(),
        }
    }

    fn clock_armed(&self) -> bool {
        self.lifecycle.clock().is_armed()
    }

    fn set_hooks(&mut self, hooks: Hooks) {
        self.lifecycle.set_hooks(hooks);
    }
}
