//! Snake engine
//!
//! Discrete grid simulation driven by an interval clock. The snake moves one
//! cell per step; the interval shortens with every food eaten down to
//! `physics.min_speed_ms`.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::lifecycle::{ArcadeEngine, GamePhase, GameSummary, Hooks, Lifecycle, SummaryDetails};
use crate::config::{ConfigError, SnakeConfig};
use crate::highscores::HighScores;
use crate::persistence::Persistence;

/// Grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self, size: u32) -> bool {
        let size = grid_side(size);
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

/// Movement direction (screen space, y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Read-only view of a Snake game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeSnapshot {
    pub phase: GamePhase,
    /// Head first
    pub snake: Vec<GridPos>,
    pub direction: Direction,
    pub food: Option<GridPos>,
    pub score: u64,
    pub highscore: u64,
    pub grid_size: u32,
    pub interval_ms: f64,
    pub highscores: HighScores,
}

/// Grid side as a signed coordinate bound
fn grid_side(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

/// Pick a random free cell, or `None` when the snake fills the board
pub(crate) fn place_food(
    snake: &VecDeque<GridPos>,
    size: u32,
    rng: &mut impl Rng,
) -> Option<GridPos> {
    let size = grid_side(size);
    let free: Vec<GridPos> = (0..size)
        .flat_map(|y| (0..size).map(move |x| GridPos::new(x, y)))
        .filter(|cell| !snake.contains(cell))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

pub struct SnakeEngine {
    config: SnakeConfig,
    lifecycle: Lifecycle,
    persistence: Persistence,
    rng: Pcg32,
    snake: VecDeque<GridPos>,
    /// Direction applied on the last step
    direction: Direction,
    /// Direction to apply on the next step
    queued: Direction,
    food: Option<GridPos>,
    score: u64,
    foods_eaten: u64,
    highscores: HighScores,
}

impl SnakeEngine {
    pub fn new(config: SnakeConfig, persistence: Persistence) -> Result<Self, ConfigError> {
        config.validate()?;
        let highscores = persistence.highscores(&config.storage.key, config.storage.max_entries);
        let clock = Clock::interval(config.physics.initial_speed_ms);
        let mut engine = Self {
            lifecycle: Lifecycle::new("snake", clock),
            persistence,
            rng: Pcg32::seed_from_u64(rand::random()),
            snake: VecDeque::new(),
            direction: Direction::Right,
            queued: Direction::Right,
            food: None,
            score: 0,
            foods_eaten: 0,
            highscores,
            config,
        };
        engine.init_entities();
        Ok(engine)
    }

    /// Reseed food placement (deterministic runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self.food = place_food(&self.snake, self.config.grid.size, &mut self.rng);
        self
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn highscore(&self) -> u64 {
        self.highscores.top_score().unwrap_or(0).max(self.score)
    }

    /// Queue a turn for the next step
    ///
    /// Rejected outside `Playing` and when `dir` reverses the direction the
    /// snake actually moved last, regardless of what is already queued.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.lifecycle.phase() != GamePhase::Playing || dir == self.direction.opposite() {
            return false;
        }
        self.queued = dir;
        true
    }

    /// Run one discrete tick (ignored unless `Playing`)
    pub fn step(&mut self) {
        if self.lifecycle.phase() != GamePhase::Playing {
            return;
        }
        self.direction = self.queued;
        let Some(&head) = self.snake.front() else {
            return;
        };
        let next = head.step(self.direction);

        if !next.in_bounds(self.config.grid.size) {
            log::debug!("snake hit the wall at {:?}", next);
            self.end_run();
            return;
        }

        let eating = self.food == Some(next);
        // The tail vacates its cell this step unless the snake grows
        let solid = if eating {
            self.snake.len()
        } else {
            self.snake.len() - 1
        };
        if self.snake.iter().take(solid).any(|seg| *seg == next) {
            log::debug!("snake bit itself at {:?}", next);
            self.end_run();
            return;
        }

        self.snake.push_front(next);
        if !eating {
            self.snake.pop_back();
            return;
        }

        self.foods_eaten += 1;
        self.score += self.config.scoring.points_per_food;
        self.lifecycle.hooks_mut().score_changed(self.score);
        let interval = self.config.physics.interval_ms(self.foods_eaten);
        self.lifecycle.clock_mut().set_period(interval);

        self.food = place_food(&self.snake, self.config.grid.size, &mut self.rng);
        if self.food.is_none() {
            log::info!("snake filled the board");
            self.end_run();
        }
    }

    fn init_entities(&mut self) {
        let size = grid_side(self.config.grid.size);
        let length = grid_side(self.config.grid.initial_length);
        let y = size / 2;
        // Head at the right end, body trailing to the left
        self.snake = (0..length).rev().map(|x| GridPos::new(x, y)).collect();
        self.direction = Direction::Right;
        self.queued = Direction::Right;
        self.foods_eaten = 0;
        self.food = place_food(&self.snake, self.config.grid.size, &mut self.rng);
        self.lifecycle
            .clock_mut()
            .set_period(self.config.physics.initial_speed_ms);
        if self.score != 0 {
            self.score = 0;
            self.lifecycle.hooks_mut().score_changed(0);
        }
    }

    fn end_run(&mut self) {
        let key = self.config.storage.key.clone();
        self.highscores =
            self.persistence
                .add_highscore(&key, self.score, self.config.storage.max_entries);
        self.lifecycle.transition(GamePhase::GameOver);
        let summary = GameSummary {
            outcome: GamePhase::GameOver,
            score: self.score,
            highscore: self.highscore(),
            details: SummaryDetails::Snake {
                length: self.snake.len(),
            },
        };
        log::info!("snake over: score {} length {}", summary.score, self.snake.len());
        self.lifecycle.hooks_mut().game_ended(&summary);
    }
}

impl ArcadeEngine for SnakeEngine {
    type Snapshot = SnakeSnapshot;

    fn phase(&self) -> GamePhase {
        self.lifecycle.phase()
    }

    fn start(&mut self) -> bool {
        if !self.lifecycle.phase().can_start() {
            return false;
        }
        self.init_entities();
        self.lifecycle.transition(GamePhase::Playing)
    }

    fn pause(&mut self) -> bool {
        self.lifecycle.phase() == GamePhase::Playing && self.lifecycle.transition(GamePhase::Paused)
    }

    fn resume(&mut self) -> bool {
        self.lifecycle.phase() == GamePhase::Paused && self.lifecycle.transition(GamePhase::Playing)
    }

    fn reset(&mut self) {
        self.init_entities();
        self.lifecycle.transition(GamePhase::Idle);
    }

    fn advance(&mut self, elapsed_ms: f64) {
        let steps = self.lifecycle.clock_mut().due_steps(elapsed_ms);
        for _ in 0..steps {
            if self.lifecycle.phase() != GamePhase::Playing {
                break;
            }
            self.step();
        }
    }

    fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            phase: self.lifecycle.phase(),
            snake: self.snake.iter().copied().collect(),
            direction: self.direction,
            food: self.food,
            score: self.score,
            highscore: self.highscore(),
            grid_size: self.config.grid.size,
            interval_ms: self
                .lifecycle
                .clock()
                .period()
                .unwrap_or(self.config.physics.initial_speed_ms),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore, UnavailableStore};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> SnakeEngine {
        SnakeEngine::new(SnakeConfig::default(), Persistence::in_memory())
            .unwrap()
            .with_seed(7)
    }

    /// Park the food somewhere the test path never touches
    fn hide_food(engine: &mut SnakeEngine) {
        engine.food = Some(GridPos::new(0, 0));
    }

    #[test]
    fn test_initial_layout() {
        let e = engine();
        let snap = e.snapshot();
        assert_eq!(snap.phase, GamePhase::Idle);
        assert_eq!(
            snap.snake,
            vec![GridPos::new(2, 10), GridPos::new(1, 10), GridPos::new(0, 10)]
        );
        assert_eq!(snap.direction, Direction::Right);
        assert!(!snap.snake.contains(&snap.food.unwrap()));
        assert!(!e.clock_armed());
    }

    #[test]
    fn test_runs_into_right_wall() {
        let mut e = engine();
        assert!(e.start());
        hide_food(&mut e);
        for _ in 0..17 {
            e.step();
            assert_eq!(e.phase(), GamePhase::Playing);
        }
        assert_eq!(e.snapshot().snake[0], GridPos::new(19, 10));
        e.step();
        assert_eq!(e.phase(), GamePhase::GameOver);
        assert!(!e.clock_armed());
        // Head stays at the last legal cell
        assert_eq!(e.snapshot().snake[0], GridPos::new(19, 10));
    }

    #[test]
    fn test_advance_uses_clock() {
        let mut e = engine();
        // Idle: no movement
        e.advance(10_000.0);
        assert_eq!(e.snapshot().snake[0], GridPos::new(2, 10));

        e.start();
        hide_food(&mut e);
        e.advance(149.0);
        assert_eq!(e.snapshot().snake[0], GridPos::new(2, 10));
        e.advance(1.0);
        assert_eq!(e.snapshot().snake[0], GridPos::new(3, 10));
        e.advance(300.0);
        assert_eq!(e.snapshot().snake[0], GridPos::new(5, 10));

        e.pause();
        e.advance(10_000.0);
        assert_eq!(e.snapshot().snake[0], GridPos::new(5, 10));
    }

    #[test]
    fn test_reversal_checks_applied_direction() {
        let mut e = engine();
        e.start();
        hide_food(&mut e);
        assert!(!e.set_direction(Direction::Left));
        // Up then Left within one tick: Left is checked against the applied Right
        assert!(e.set_direction(Direction::Up));
        assert!(!e.set_direction(Direction::Left));
        e.step();
        assert_eq!(e.snapshot().direction, Direction::Up);
        assert_eq!(e.snapshot().snake[0], GridPos::new(2, 9));
        // Now Left is legal
        assert!(e.set_direction(Direction::Left));
    }

    #[test]
    fn test_direction_ignored_when_not_playing() {
        let mut e = engine();
        assert!(!e.set_direction(Direction::Up));
        e.start();
        e.pause();
        assert!(!e.set_direction(Direction::Up));
    }

    #[test]
    fn test_eating_grows_scores_and_speeds_up() {
        let scores = Rc::new(RefCell::new(Vec::new()));
        let sink = scores.clone();
        let mut e = engine();
        e.set_hooks(Hooks::new().on_score_change(move |s| sink.borrow_mut().push(s)));
        e.start();
        e.food = Some(GridPos::new(3, 10));

        e.step();
        let snap = e.snapshot();
        assert_eq!(snap.snake.len(), 4);
        assert_eq!(snap.score, 10);
        assert_eq!(snap.interval_ms, 148.0);
        assert!(!snap.snake.contains(&snap.food.unwrap()));

        hide_food(&mut e);
        e.step();
        assert_eq!(e.snapshot().snake.len(), 4);
        assert_eq!(*scores.borrow(), vec![10]);
    }

    #[test]
    fn test_tail_cell_is_free_to_enter() {
        let mut e = engine();
        e.start();
        hide_food(&mut e);
        // A 2x2 loop: head chases the tail that moves away on the same tick
        e.snake = VecDeque::from(vec![
            GridPos::new(5, 5),
            GridPos::new(5, 6),
            GridPos::new(6, 6),
            GridPos::new(6, 5),
        ]);
        e.direction = Direction::Up;
        e.queued = Direction::Right;
        e.step();
        assert_eq!(e.phase(), GamePhase::Playing);
        assert_eq!(e.snapshot().snake[0], GridPos::new(6, 5));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut e = engine();
        e.start();
        hide_food(&mut e);
        e.snake = VecDeque::from(vec![
            GridPos::new(5, 5),
            GridPos::new(5, 6),
            GridPos::new(6, 6),
            GridPos::new(6, 5),
            GridPos::new(7, 5),
        ]);
        e.direction = Direction::Up;
        e.queued = Direction::Right;
        e.step();
        assert_eq!(e.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_records_highscore_and_reports() {
        let shared = Rc::new(RefCell::new(MemoryStore::new()));
        let persistence = Persistence::new(shared.clone()).with_date_source(|| "2026-10-19".into());
        let summaries = Rc::new(RefCell::new(Vec::new()));
        let sink = summaries.clone();

        let mut e = SnakeEngine::new(SnakeConfig::default(), persistence)
            .unwrap()
            .with_seed(1);
        e.set_hooks(Hooks::new().on_game_end(move |s| sink.borrow_mut().push(s.clone())));
        e.start();
        e.food = Some(GridPos::new(3, 10));
        e.step();
        hide_food(&mut e);
        for _ in 0..20 {
            e.step();
        }
        assert_eq!(e.phase(), GamePhase::GameOver);

        let summaries = summaries.borrow();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].score, 10);
        assert_eq!(summaries[0].details, SummaryDetails::Snake { length: 4 });
        assert_eq!(e.snapshot().highscores.top_score(), Some(10));

        let stored = shared.borrow().read("snake-highscores").unwrap();
        assert_eq!(stored.as_deref(), Some(r#"[{"score":10,"date":"2026-10-19"}]"#));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut e = engine();
        e.start();
        hide_food(&mut e);
        for _ in 0..18 {
            e.step();
        }
        assert_eq!(e.phase(), GamePhase::GameOver);
        assert!(!e.pause());
        assert!(e.start());
        let snap = e.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.snake.len(), 3);
        assert_eq!(snap.score, 0);
        // start is rejected mid-game
        assert!(!e.start());
    }

    #[test]
    fn test_board_full_ends_game() {
        let config = SnakeConfig::default()
            .merged(
                crate::config::SnakeOverrides::from_json(r#"{"grid":{"size":2,"initialLength":1}}"#)
                    .unwrap(),
            )
            .unwrap();
        let mut e = SnakeEngine::new(config, Persistence::in_memory())
            .unwrap()
            .with_seed(3);
        e.start();
        e.snake = VecDeque::from(vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 1)]);
        e.food = Some(GridPos::new(1, 0));
        e.direction = Direction::Right;
        e.queued = Direction::Right;
        e.step();
        assert_eq!(e.phase(), GamePhase::GameOver);
        assert_eq!(e.snapshot().food, None);
        assert_eq!(e.score(), 10);
    }

    #[test]
    fn test_storage_failure_does_not_break_game() {
        let mut e = SnakeEngine::new(SnakeConfig::default(), Persistence::new(UnavailableStore))
            .unwrap()
            .with_seed(5);
        e.start();
        hide_food(&mut e);
        for _ in 0..18 {
            e.step();
        }
        assert_eq!(e.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = SnakeConfig::default();
        config.grid.size = 0;
        assert!(SnakeEngine::new(config, Persistence::in_memory()).is_err());
    }

    proptest! {
        #[test]
        fn prop_never_reverses_and_food_stays_free(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(proptest::option::of(0usize..4), 1..120),
        ) {
            let mut e = SnakeEngine::new(SnakeConfig::default(), Persistence::in_memory())
                .unwrap()
                .with_seed(seed);
            e.start();
            let mut last = e.snapshot();
            for input in inputs {
                if let Some(i) = input {
                    e.set_direction(Direction::ALL[i]);
                }
                e.step();
                let snap = e.snapshot();
                if snap.phase != GamePhase::Playing {
                    break;
                }
                prop_assert_ne!(snap.direction, last.direction.opposite());
                if let Some(food) = snap.food {
                    prop_assert!(!snap.snake.contains(&food));
                }
                // Grows by exactly one on eating, otherwise constant
                let ate = last.food == Some(snap.snake[0]);
                let expected = last.snake.len() + usize::from(ate);
                prop_assert_eq!(snap.snake.len(), expected);
                // Score only moves when food is eaten
                if !ate {
                    prop_assert_eq!(snap.score, last.score);
                }
                last = snap;
            }
        }
    }
}
