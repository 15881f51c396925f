//! Simulation module
//!
//! All gameplay logic lives here. Engines own their state outright and are
//! advanced by the host with elapsed wall time:
//! - Seeded RNG only (food placement, launch angles)
//! - Stable iteration order (bricks by index)
//! - No rendering or platform dependencies

pub mod breakout;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod geometry;
pub mod lifecycle;
pub mod scoring;
pub mod snake;

pub use breakout::{BreakoutEngine, BreakoutSnapshot};
pub use clock::{Clock, ClockMode, MAX_SUBSTEPS};
pub use collision::{Contact, ContactSide, ball_box_collision, paddle_bounce, resolve_box_contact};
pub use entities::{Ball, Brick, BrickHit, Paddle, PaddleDir};
pub use geometry::{Aabb, reflect};
pub use lifecycle::{ArcadeEngine, GamePhase, GameSummary, Hooks, Lifecycle, SummaryDetails};
pub use scoring::ComboTracker;
pub use snake::{Direction, GridPos, SnakeEngine, SnakeSnapshot};
