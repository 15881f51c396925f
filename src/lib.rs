//! Arcade Eggs - Snake and Brick Breaker easter-egg engines
//!
//! Core modules:
//! - `sim`: Owned-state engines (lifecycle, clocks, collisions, scoring)
//! - `input`: Keyboard/pointer/touch arbitration into engine commands
//! - `renderer`: Snapshot to canvas paint commands
//! - `persistence`: Best-effort key/value storage and high scores
//! - `config`: Defaults plus partial JSON overrides
//! - `levels`: Brick Breaker level data
//! - `platform`: Browser/native time sources

pub mod config;
pub mod highscores;
pub mod input;
pub mod levels;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{BreakoutConfig, BreakoutOverrides, ConfigError, SnakeConfig, SnakeOverrides};
pub use highscores::{HighScores, HighscoreEntry};
pub use levels::{BrickDef, BrickKind, Level};
pub use persistence::Persistence;
pub use sim::{
    ArcadeEngine, BreakoutEngine, BreakoutSnapshot, GamePhase, GameSummary, Hooks, SnakeEngine,
    SnakeSnapshot,
};
