//! Engine lifecycle shared by both games
//!
//! `Lifecycle` owns the phase, the clock, and the host hooks. Every phase
//! change goes through [`Lifecycle::transition`], which keeps the clock armed
//! exactly while the phase is `Playing`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::Clock;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Waiting for the player to start
    Idle,
    /// Active gameplay (clock armed)
    Playing,
    /// Frozen mid-game
    Paused,
    /// Snake died
    GameOver,
    /// Brick Breaker level cleared, waiting for `next_level`
    LevelComplete,
    /// Brick Breaker: every level cleared
    Won,
    /// Brick Breaker: out of lives
    Lost,
}

impl GamePhase {
    /// Run has ended; `start` begins a fresh one
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won | GamePhase::Lost)
    }

    /// Phases from which `start` is accepted
    pub fn can_start(self) -> bool {
        self == GamePhase::Idle || self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
            GamePhase::LevelComplete => "levelComplete",
            GamePhase::Won => "won",
            GamePhase::Lost => "lost",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-game details reported when a run ends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "camelCase")]
pub enum SummaryDetails {
    Snake {
        length: usize,
    },
    #[serde(rename_all = "camelCase")]
    Breakout {
        /// 1-based level reached
        level: u32,
        bricks_destroyed: usize,
        bricks_total: usize,
    },
}

/// End-of-run report handed to `on_game_end`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub outcome: GamePhase,
    pub score: u64,
    pub highscore: u64,
    pub details: SummaryDetails,
}

type StateHook = Box<dyn FnMut(GamePhase, GamePhase)>;
type ScoreHook = Box<dyn FnMut(u64)>;
type EndHook = Box<dyn FnMut(&GameSummary)>;
type LevelHook = Box<dyn FnMut(u32)>;

/// Host callbacks fired on lifecycle transitions
#[derive(Default)]
pub struct Hooks {
    on_state_change: Option<StateHook>,
    on_score_change: Option<ScoreHook>,
    on_game_end: Option<EndHook>,
    on_level_change: Option<LevelHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `(from, to)` on every phase change
    pub fn on_state_change(mut self, f: impl FnMut(GamePhase, GamePhase) + 'static) -> Self {
        self.on_state_change = Some(Box::new(f));
        self
    }

    /// Called with the new score whenever it changes (including resets to 0)
    pub fn on_score_change(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_score_change = Some(Box::new(f));
        self
    }

    /// Called once per terminal transition
    pub fn on_game_end(mut self, f: impl FnMut(&GameSummary) + 'static) -> Self {
        self.on_game_end = Some(Box::new(f));
        self
    }

    /// Called with the 1-based level number when a level is loaded
    pub fn on_level_change(mut self, f: impl FnMut(u32) + 'static) -> Self {
        self.on_level_change = Some(Box::new(f));
        self
    }

    pub(crate) fn score_changed(&mut self, score: u64) {
        if let Some(hook) = self.on_score_change.as_mut() {
            hook(score);
        }
    }

    pub(crate) fn game_ended(&mut self, summary: &GameSummary) {
        if let Some(hook) = self.on_game_end.as_mut() {
            hook(summary);
        }
    }

    pub(crate) fn level_changed(&mut self, level: u32) {
        if let Some(hook) = self.on_level_change.as_mut() {
            hook(level);
        }
    }

    fn state_changed(&mut self, from: GamePhase, to: GamePhase) {
        if let Some(hook) = self.on_state_change.as_mut() {
            hook(from, to);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_state_change", &self.on_state_change.is_some())
            .field("on_score_change", &self.on_score_change.is_some())
            .field("on_game_end", &self.on_game_end.is_some())
            .field("on_level_change", &self.on_level_change.is_some())
            .finish()
    }
}

/// Phase + clock + hooks, embedded in each engine
#[derive(Debug)]
pub struct Lifecycle {
    name: &'static str,
    phase: GamePhase,
    clock: Clock,
    hooks: Hooks,
}

impl Lifecycle {
    pub fn new(name: &'static str, clock: Clock) -> Self {
        Self {
            name,
            phase: GamePhase::Idle,
            clock,
            hooks: Hooks::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    /// Move to `to`, arming or disarming the clock. Returns false if already there.
    pub fn transition(&mut self, to: GamePhase) -> bool {
        let from = self.phase;
        if from == to {
            return false;
        }
        self.phase = to;
        if to == GamePhase::Playing {
            self.clock.arm();
        } else {
            self.clock.disarm();
        }
        log::info!("{}: {} -> {}", self.name, from, to);
        self.hooks.state_changed(from, to);
        true
    }
}

/// Common surface of the two engines
pub trait ArcadeEngine {
    type Snapshot;

    fn phase(&self) -> GamePhase;

    /// Begin a fresh run (from `Idle` or a terminal phase)
    fn start(&mut self) -> bool;

    fn pause(&mut self) -> bool;

    fn resume(&mut self) -> bool;

    /// Back to `Idle` with entities reinitialised
    fn reset(&mut self);

    /// Feed host-elapsed wall time into the engine
    fn advance(&mut self, elapsed_ms: f64);

    fn snapshot(&self) -> Self::Snapshot;

    /// Whether the host should keep scheduling `advance` callbacks
    fn clock_armed(&self) -> bool;

    fn set_hooks(&mut self, hooks: Hooks);

    /// Toggle between `Playing` and `Paused`
    fn toggle_pause(&mut self) -> bool {
        match self.phase() {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_transition_arms_clock_only_while_playing() {
        let mut lc = Lifecycle::new("test", Clock::interval(100.0));
        assert!(!lc.clock().is_armed());

        assert!(lc.transition(GamePhase::Playing));
        assert!(lc.clock().is_armed());

        for phase in [
            GamePhase::Paused,
            GamePhase::GameOver,
            GamePhase::Lost,
            GamePhase::Won,
            GamePhase::LevelComplete,
            GamePhase::Idle,
        ] {
            lc.transition(GamePhase::Playing);
            lc.transition(phase);
            assert!(!lc.clock().is_armed(), "clock left armed in {phase}");
        }
    }

    #[test]
    fn test_state_hook_fires_once_per_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut lc = Lifecycle::new("test", Clock::interval(100.0));
        lc.set_hooks(Hooks::new().on_state_change(move |from, to| sink.borrow_mut().push((from, to))));

        lc.transition(GamePhase::Playing);
        assert!(!lc.transition(GamePhase::Playing));
        lc.transition(GamePhase::Paused);

        assert_eq!(
            *seen.borrow(),
            vec![
                (GamePhase::Idle, GamePhase::Playing),
                (GamePhase::Playing, GamePhase::Paused)
            ]
        );
    }

    #[test]
    fn test_can_start() {
        assert!(GamePhase::Idle.can_start());
        assert!(GamePhase::GameOver.can_start());
        assert!(GamePhase::Lost.can_start());
        assert!(GamePhase::Won.can_start());
        assert!(!GamePhase::Playing.can_start());
        assert!(!GamePhase::Paused.can_start());
        assert!(!GamePhase::LevelComplete.can_start());
    }
}
