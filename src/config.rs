//! Game configuration
//!
//! Each game has a full config with documented defaults and a matching
//! `*Overrides` type whose fields are all optional. Hosts pass overrides
//! (usually as JSON); [`SnakeConfig::merged`] / [`BreakoutConfig::merged`]
//! copy every present field section by section and then validate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::DEFAULT_MAX_ENTRIES;
use crate::renderer::theme::{ColorSpec, ThemeToken};

/// Invalid configuration, reported at engine construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {size}")]
    GridTooSmall { size: u32, min: u32 },
    #[error("grid size must be at most {max}, got {size}")]
    GridTooLarge { size: u32, max: u32 },
    #[error("snake of length {length} does not fit a {size}x{size} grid")]
    SnakeTooLong { length: u32, size: u32 },
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("paddle width {paddle} does not fit field width {field}")]
    PaddleTooWide { paddle: f32, field: f32 },
    #[error("level set is empty")]
    NoLevels,
    #[error("level {id} ({name}) has no destructible bricks")]
    EmptyLevel { id: u32, name: String },
    #[error("bricks of level {id} do not fit between top offset and paddle")]
    LevelTooTall { id: u32 },
}

/// Largest Snake grid side; food placement scans every cell
pub const MAX_GRID: u32 = 256;

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

// ============================================================================
// SHARED SECTIONS
// ============================================================================

/// Where the high-score list lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub key: String,
    pub max_entries: usize,
}

impl StorageConfig {
    /// Key for the single best score
    pub fn best_key(&self) -> String {
        format!("{}:best", self.key)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroCount {
                field: "storage.maxEntries",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageOverrides {
    pub key: Option<String>,
    pub max_entries: Option<usize>,
}

impl StorageOverrides {
    fn apply(self, target: &mut StorageConfig) {
        set(&mut target.key, self.key);
        set(&mut target.max_entries, self.max_entries);
    }
}

// ============================================================================
// SNAKE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeColors {
    pub background: ColorSpec,
    pub grid: ColorSpec,
    pub snake_head: ColorSpec,
    pub snake_body: ColorSpec,
    pub food: ColorSpec,
    pub text: ColorSpec,
}

impl Default for SnakeColors {
    fn default() -> Self {
        Self {
            background: ThemeToken::Background.into(),
            grid: ThemeToken::Border.into(),
            snake_head: ThemeToken::Foreground.into(),
            snake_body: ThemeToken::Muted.into(),
            food: ThemeToken::Destructive.into(),
            text: ThemeToken::Foreground.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeColorsOverrides {
    pub background: Option<ColorSpec>,
    pub grid: Option<ColorSpec>,
    pub snake_head: Option<ColorSpec>,
    pub snake_body: Option<ColorSpec>,
    pub food: Option<ColorSpec>,
    pub text: Option<ColorSpec>,
}

impl SnakeColorsOverrides {
    fn apply(self, target: &mut SnakeColors) {
        set(&mut target.background, self.background);
        set(&mut target.grid, self.grid);
        set(&mut target.snake_head, self.snake_head);
        set(&mut target.snake_body, self.snake_body);
        set(&mut target.food, self.food);
        set(&mut target.text, self.text);
    }
}

/// Board dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Cells per side (the board is square)
    pub size: u32,
    /// Segments at game start
    pub initial_length: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 20,
            initial_length: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOverrides {
    pub size: Option<u32>,
    pub initial_length: Option<u32>,
}

impl GridOverrides {
    fn apply(self, target: &mut GridConfig) {
        set(&mut target.size, self.size);
        set(&mut target.initial_length, self.initial_length);
    }
}

/// Tick timing, in milliseconds per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakePhysics {
    pub initial_speed_ms: f64,
    /// Interval reduction per food eaten
    pub speed_increment_ms: f64,
    /// Fastest allowed interval
    pub min_speed_ms: f64,
}

impl Default for SnakePhysics {
    fn default() -> Self {
        Self {
            initial_speed_ms: 150.0,
            speed_increment_ms: 2.0,
            min_speed_ms: 60.0,
        }
    }
}

impl SnakePhysics {
    /// Interval after `foods_eaten` foods
    pub fn interval_ms(&self, foods_eaten: u64) -> f64 {
        (self.initial_speed_ms - foods_eaten as f64 * self.speed_increment_ms)
            .max(self.min_speed_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakePhysicsOverrides {
    pub initial_speed_ms: Option<f64>,
    pub speed_increment_ms: Option<f64>,
    pub min_speed_ms: Option<f64>,
}

impl SnakePhysicsOverrides {
    fn apply(self, target: &mut SnakePhysics) {
        set(&mut target.initial_speed_ms, self.initial_speed_ms);
        set(&mut target.speed_increment_ms, self.speed_increment_ms);
        set(&mut target.min_speed_ms, self.min_speed_ms);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeScoring {
    pub points_per_food: u64,
}

impl Default for SnakeScoring {
    fn default() -> Self {
        Self { points_per_food: 10 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeScoringOverrides {
    pub points_per_food: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeInputConfig {
    /// Minimum swipe length in CSS pixels
    pub swipe_threshold: f32,
}

impl Default for SnakeInputConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeInputOverrides {
    pub swipe_threshold: Option<f32>,
}

/// Complete Snake configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeConfig {
    pub colors: SnakeColors,
    pub grid: GridConfig,
    pub physics: SnakePhysics,
    pub scoring: SnakeScoring,
    pub input: SnakeInputConfig,
    pub storage: StorageConfig,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            colors: SnakeColors::default(),
            grid: GridConfig::default(),
            physics: SnakePhysics::default(),
            scoring: SnakeScoring::default(),
            input: SnakeInputConfig::default(),
            storage: StorageConfig {
                key: "snake-highscores".to_string(),
                max_entries: DEFAULT_MAX_ENTRIES,
            },
        }
    }
}

/// Partial Snake configuration; absent fields keep their defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeOverrides {
    pub colors: SnakeColorsOverrides,
    pub grid: GridOverrides,
    pub physics: SnakePhysicsOverrides,
    pub scoring: SnakeScoringOverrides,
    pub input: SnakeInputOverrides,
    pub storage: StorageOverrides,
}

impl SnakeOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SnakeConfig {
    /// Apply overrides field by field, then validate
    pub fn merged(mut self, overrides: SnakeOverrides) -> Result<Self, ConfigError> {
        overrides.colors.apply(&mut self.colors);
        overrides.grid.apply(&mut self.grid);
        overrides.physics.apply(&mut self.physics);
        set(&mut self.scoring.points_per_food, overrides.scoring.points_per_food);
        set(&mut self.input.swipe_threshold, overrides.input.swipe_threshold);
        overrides.storage.apply(&mut self.storage);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        const MIN_GRID: u32 = 2;
        if self.grid.size < MIN_GRID {
            return Err(ConfigError::GridTooSmall {
                size: self.grid.size,
                min: MIN_GRID,
            });
        }
        if self.grid.size > MAX_GRID {
            return Err(ConfigError::GridTooLarge {
                size: self.grid.size,
                max: MAX_GRID,
            });
        }
        if self.grid.initial_length == 0 {
            return Err(ConfigError::ZeroCount {
                field: "grid.initialLength",
            });
        }
        // The starting snake lies along one row and must leave a cell for food
        if self.grid.initial_length >= self.grid.size {
            return Err(ConfigError::SnakeTooLong {
                length: self.grid.initial_length,
                size: self.grid.size,
            });
        }
        positive("physics.initialSpeedMs", self.physics.initial_speed_ms)?;
        positive("physics.minSpeedMs", self.physics.min_speed_ms)?;
        non_negative("physics.speedIncrementMs", self.physics.speed_increment_ms)?;
        non_negative("input.swipeThreshold", self.input.swipe_threshold as f64)?;
        self.storage.validate()
    }
}

// ============================================================================
// BRICK BREAKER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutColors {
    pub background: ColorSpec,
    pub paddle: ColorSpec,
    pub ball: ColorSpec,
    pub trail: ColorSpec,
    pub text: ColorSpec,
    pub brick_normal: ColorSpec,
    pub brick_strong: ColorSpec,
    pub brick_metal: ColorSpec,
    pub brick_indestructible: ColorSpec,
}

impl Default for BreakoutColors {
    fn default() -> Self {
        Self {
            background: ThemeToken::Background.into(),
            paddle: ThemeToken::Foreground.into(),
            ball: ThemeToken::Foreground.into(),
            trail: ThemeToken::Muted.into(),
            text: ThemeToken::Foreground.into(),
            brick_normal: ThemeToken::Accent.into(),
            brick_strong: ColorSpec::hex("#f59e0b"),
            brick_metal: ColorSpec::hex("#94a3b8"),
            brick_indestructible: ThemeToken::Border.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakoutColorsOverrides {
    pub background: Option<ColorSpec>,
    pub paddle: Option<ColorSpec>,
    pub ball: Option<ColorSpec>,
    pub trail: Option<ColorSpec>,
    pub text: Option<ColorSpec>,
    pub brick_normal: Option<ColorSpec>,
    pub brick_strong: Option<ColorSpec>,
    pub brick_metal: Option<ColorSpec>,
    pub brick_indestructible: Option<ColorSpec>,
}

impl BreakoutColorsOverrides {
    fn apply(self, target: &mut BreakoutColors) {
        set(&mut target.background, self.background);
        set(&mut target.paddle, self.paddle);
        set(&mut target.ball, self.ball);
        set(&mut target.trail, self.trail);
        set(&mut target.text, self.text);
        set(&mut target.brick_normal, self.brick_normal);
        set(&mut target.brick_strong, self.brick_strong);
        set(&mut target.brick_metal, self.brick_metal);
        set(&mut target.brick_indestructible, self.brick_indestructible);
    }
}

/// Play-field size in field units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOverrides {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleConfig {
    pub width: f32,
    pub height: f32,
    /// Keyboard speed, field units per reference frame
    pub speed: f32,
    /// Gap between the paddle's bottom edge and the field bottom
    pub bottom_offset: f32,
    /// Pointer-follow smoothing factor per reference frame
    pub smoothing: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 10.0,
            speed: 8.0,
            bottom_offset: 20.0,
            smoothing: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaddleOverrides {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub speed: Option<f32>,
    pub bottom_offset: Option<f32>,
    pub smoothing: Option<f32>,
}

impl PaddleOverrides {
    fn apply(self, target: &mut PaddleConfig) {
        set(&mut target.width, self.width);
        set(&mut target.height, self.height);
        set(&mut target.speed, self.speed);
        set(&mut target.bottom_offset, self.bottom_offset);
        set(&mut target.smoothing, self.smoothing);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallConfig {
    pub radius: f32,
    /// Base speed, field units per reference frame (scaled by the level)
    pub speed: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 6.0,
            speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallOverrides {
    pub radius: Option<f32>,
    pub speed: Option<f32>,
}

/// How level grids map onto the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickLayout {
    pub height: f32,
    pub gap: f32,
    pub top_offset: f32,
    pub side_padding: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            height: 16.0,
            gap: 4.0,
            top_offset: 40.0,
            side_padding: 16.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrickLayoutOverrides {
    pub height: Option<f32>,
    pub gap: Option<f32>,
    pub top_offset: Option<f32>,
    pub side_padding: Option<f32>,
}

impl BrickLayoutOverrides {
    fn apply(self, target: &mut BrickLayout) {
        set(&mut target.height, self.height);
        set(&mut target.gap, self.gap);
        set(&mut target.top_offset, self.top_offset);
        set(&mut target.side_padding, self.side_padding);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutPhysics {
    /// Paddle edge-hit angle from vertical
    pub max_bounce_angle_deg: f32,
    /// Minimum |vel.y| as a fraction of ball speed
    pub min_vertical_ratio: f32,
    /// Reference frame duration that `dt = 1` corresponds to
    pub target_frame_ms: f64,
    /// Elapsed-time cap per frame
    pub max_frame_ms: f64,
}

impl Default for BreakoutPhysics {
    fn default() -> Self {
        Self {
            max_bounce_angle_deg: 60.0,
            min_vertical_ratio: 0.3,
            target_frame_ms: 1000.0 / 60.0,
            max_frame_ms: 50.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakoutPhysicsOverrides {
    pub max_bounce_angle_deg: Option<f32>,
    pub min_vertical_ratio: Option<f32>,
    pub target_frame_ms: Option<f64>,
    pub max_frame_ms: Option<f64>,
}

impl BreakoutPhysicsOverrides {
    fn apply(self, target: &mut BreakoutPhysics) {
        set(&mut target.max_bounce_angle_deg, self.max_bounce_angle_deg);
        set(&mut target.min_vertical_ratio, self.min_vertical_ratio);
        set(&mut target.target_frame_ms, self.target_frame_ms);
        set(&mut target.max_frame_ms, self.max_frame_ms);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutScoring {
    pub combo_timeout_ms: f64,
    pub combo_multiplier: f32,
    pub max_combo: u32,
    pub level_complete_bonus: u64,
}

impl Default for BreakoutScoring {
    fn default() -> Self {
        Self {
            combo_timeout_ms: 1500.0,
            combo_multiplier: 0.1,
            max_combo: 10,
            level_complete_bonus: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakoutScoringOverrides {
    pub combo_timeout_ms: Option<f64>,
    pub combo_multiplier: Option<f32>,
    pub max_combo: Option<u32>,
    pub level_complete_bonus: Option<u64>,
}

impl BreakoutScoringOverrides {
    fn apply(self, target: &mut BreakoutScoring) {
        set(&mut target.combo_timeout_ms, self.combo_timeout_ms);
        set(&mut target.combo_multiplier, self.combo_multiplier);
        set(&mut target.max_combo, self.max_combo);
        set(&mut target.level_complete_bonus, self.level_complete_bonus);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    pub lives: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self { lives: 3 }
    }
}

/// Cosmetic effects (no gameplay impact)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsConfig {
    pub trail: bool,
    pub trail_length: usize,
    pub destroy_animation_ms: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            trail: true,
            trail_length: 8,
            destroy_animation_ms: 300.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsOverrides {
    pub trail: Option<bool>,
    pub trail_length: Option<usize>,
    pub destroy_animation_ms: Option<f64>,
}

impl EffectsOverrides {
    fn apply(self, target: &mut EffectsConfig) {
        set(&mut target.trail, self.trail);
        set(&mut target.trail_length, self.trail_length);
        set(&mut target.destroy_animation_ms, self.destroy_animation_ms);
    }
}

/// Complete Brick Breaker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakoutConfig {
    pub colors: BreakoutColors,
    pub field: FieldConfig,
    pub paddle: PaddleConfig,
    pub ball: BallConfig,
    pub bricks: BrickLayout,
    pub physics: BreakoutPhysics,
    pub scoring: BreakoutScoring,
    pub game: GameRules,
    pub effects: EffectsConfig,
    pub storage: StorageConfig,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            colors: BreakoutColors::default(),
            field: FieldConfig::default(),
            paddle: PaddleConfig::default(),
            ball: BallConfig::default(),
            bricks: BrickLayout::default(),
            physics: BreakoutPhysics::default(),
            scoring: BreakoutScoring::default(),
            game: GameRules::default(),
            effects: EffectsConfig::default(),
            storage: StorageConfig {
                key: "brick-breaker-highscores".to_string(),
                max_entries: DEFAULT_MAX_ENTRIES,
            },
        }
    }
}

/// Partial Brick Breaker configuration; absent fields keep their defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakoutOverrides {
    pub colors: BreakoutColorsOverrides,
    pub field: FieldOverrides,
    pub paddle: PaddleOverrides,
    pub ball: BallOverrides,
    pub bricks: BrickLayoutOverrides,
    pub physics: BreakoutPhysicsOverrides,
    pub scoring: BreakoutScoringOverrides,
    pub game: GameRulesOverrides,
    pub effects: EffectsOverrides,
    pub storage: StorageOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameRulesOverrides {
    pub lives: Option<u32>,
}

impl BreakoutOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl BreakoutConfig {
    /// Apply overrides field by field, then validate
    pub fn merged(mut self, overrides: BreakoutOverrides) -> Result<Self, ConfigError> {
        overrides.colors.apply(&mut self.colors);
        set(&mut self.field.width, overrides.field.width);
        set(&mut self.field.height, overrides.field.height);
        overrides.paddle.apply(&mut self.paddle);
        set(&mut self.ball.radius, overrides.ball.radius);
        set(&mut self.ball.speed, overrides.ball.speed);
        overrides.bricks.apply(&mut self.bricks);
        overrides.physics.apply(&mut self.physics);
        overrides.scoring.apply(&mut self.scoring);
        set(&mut self.game.lives, overrides.game.lives);
        overrides.effects.apply(&mut self.effects);
        overrides.storage.apply(&mut self.storage);
        self.validate()?;
        Ok(self)
    }

    /// Paddle top edge in field units
    pub fn paddle_y(&self) -> f32 {
        self.field.height - self.paddle.bottom_offset - self.paddle.height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field.width", self.field.width as f64)?;
        positive("field.height", self.field.height as f64)?;
        positive("paddle.width", self.paddle.width as f64)?;
        positive("paddle.height", self.paddle.height as f64)?;
        positive("paddle.speed", self.paddle.speed as f64)?;
        positive("paddle.smoothing", self.paddle.smoothing as f64)?;
        non_negative("paddle.bottomOffset", self.paddle.bottom_offset as f64)?;
        if self.paddle.width > self.field.width {
            return Err(ConfigError::PaddleTooWide {
                paddle: self.paddle.width,
                field: self.field.width,
            });
        }
        if self.paddle_y() <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "field.height - paddle.bottomOffset - paddle.height",
                value: self.paddle_y() as f64,
            });
        }
        positive("ball.radius", self.ball.radius as f64)?;
        positive("ball.speed", self.ball.speed as f64)?;
        positive("bricks.height", self.bricks.height as f64)?;
        non_negative("bricks.gap", self.bricks.gap as f64)?;
        non_negative("bricks.topOffset", self.bricks.top_offset as f64)?;
        non_negative("bricks.sidePadding", self.bricks.side_padding as f64)?;
        if self.bricks.side_padding * 2.0 >= self.field.width {
            return Err(ConfigError::NotPositive {
                field: "field.width - 2 * bricks.sidePadding",
                value: (self.field.width - self.bricks.side_padding * 2.0) as f64,
            });
        }
        positive("physics.maxBounceAngleDeg", self.physics.max_bounce_angle_deg as f64)?;
        non_negative("physics.minVerticalRatio", self.physics.min_vertical_ratio as f64)?;
        positive("physics.targetFrameMs", self.physics.target_frame_ms)?;
        positive("physics.maxFrameMs", self.physics.max_frame_ms)?;
        non_negative("scoring.comboTimeoutMs", self.scoring.combo_timeout_ms)?;
        non_negative("scoring.comboMultiplier", self.scoring.combo_multiplier as f64)?;
        if self.scoring.max_combo == 0 {
            return Err(ConfigError::ZeroCount {
                field: "scoring.maxCombo",
            });
        }
        if self.game.lives == 0 {
            return Err(ConfigError::ZeroCount { field: "game.lives" });
        }
        non_negative("effects.destroyAnimationMs", self.effects.destroy_animation_ms)?;
        self.storage.validate()
    }
}
