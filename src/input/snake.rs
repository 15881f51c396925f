//! Snake controls
//!
//! Direction keys turn the snake while it is playing; the engine enforces the
//! anti-reversal rule. A touch gesture is a swipe when its dominant axis
//! travels at least `swipe_threshold` CSS pixels, otherwise it is a tap.

use super::Key;
use crate::sim::{ArcadeEngine, Direction, GamePhase, SnakeEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeCommand {
    Turn(Direction),
    Start,
    TogglePause,
    /// Reset and start a fresh run
    Restart,
}

/// Map a swipe vector to a direction (screen space, y down)
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < threshold {
        return None;
    }
    let dir = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(dir)
}

#[derive(Debug, Clone)]
pub struct SnakeControls {
    swipe_threshold: f32,
    touch_origin: Option<(f32, f32)>,
}

impl SnakeControls {
    pub fn new(swipe_threshold: f32) -> Self {
        Self {
            swipe_threshold,
            touch_origin: None,
        }
    }

    /// Space, tap, or click: start a stopped game, toggle pause on a running one
    pub fn action(phase: GamePhase) -> Option<SnakeCommand> {
        match phase {
            GamePhase::Playing | GamePhase::Paused => Some(SnakeCommand::TogglePause),
            p if p.can_start() => Some(SnakeCommand::Start),
            _ => None,
        }
    }

    pub fn on_key_down(&self, key: Key, phase: GamePhase) -> Option<SnakeCommand> {
        if let Some(dir) = key.direction() {
            return (phase == GamePhase::Playing).then_some(SnakeCommand::Turn(dir));
        }
        match key {
            Key::Action => Self::action(phase),
            Key::Pause => Some(SnakeCommand::TogglePause),
            Key::Restart => Some(SnakeCommand::Restart),
            _ => None,
        }
    }

    pub fn on_touch_start(&mut self, x: f32, y: f32) {
        self.touch_origin = Some((x, y));
    }

    /// Finish a gesture: a swipe turns, a tap acts
    pub fn on_touch_end(&mut self, x: f32, y: f32, phase: GamePhase) -> Option<SnakeCommand> {
        let (x0, y0) = self.touch_origin.take()?;
        match swipe_direction(x - x0, y - y0, self.swipe_threshold) {
            Some(dir) => (phase == GamePhase::Playing).then_some(SnakeCommand::Turn(dir)),
            None => Self::action(phase),
        }
    }

    pub fn on_touch_cancel(&mut self) {
        self.touch_origin = None;
    }
}

/// Apply a command to the engine; returns whether it was accepted
pub fn apply(engine: &mut SnakeEngine, command: SnakeCommand) -> bool {
    match command {
        SnakeCommand::Turn(dir) => engine.set_direction(dir),
        SnakeCommand::Start => engine.start(),
        SnakeCommand::TogglePause => engine.toggle_pause(),
        SnakeCommand::Restart => {
            engine.reset();
            engine.start()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnakeConfig;
    use crate::persistence::Persistence;

    #[test]
    fn test_swipe_dominant_axis() {
        assert_eq!(swipe_direction(40.0, 10.0, 30.0), Some(Direction::Right));
        assert_eq!(swipe_direction(-40.0, 35.0, 30.0), Some(Direction::Left));
        assert_eq!(swipe_direction(10.0, -50.0, 30.0), Some(Direction::Up));
        assert_eq!(swipe_direction(0.0, 31.0, 30.0), Some(Direction::Down));
        // Ties go vertical
        assert_eq!(swipe_direction(40.0, 40.0, 30.0), Some(Direction::Down));
    }

    #[test]
    fn test_short_gesture_is_tap() {
        assert_eq!(swipe_direction(20.0, 5.0, 30.0), None);
        let mut controls = SnakeControls::new(30.0);
        controls.on_touch_start(100.0, 100.0);
        assert_eq!(
            controls.on_touch_end(110.0, 104.0, GamePhase::Idle),
            Some(SnakeCommand::Start)
        );
        controls.on_touch_start(100.0, 100.0);
        assert_eq!(
            controls.on_touch_end(100.0, 100.0, GamePhase::Playing),
            Some(SnakeCommand::TogglePause)
        );
    }

    #[test]
    fn test_turns_only_while_playing() {
        let controls = SnakeControls::new(30.0);
        assert_eq!(controls.on_key_down(Key::Up, GamePhase::Idle), None);
        assert_eq!(
            controls.on_key_down(Key::Up, GamePhase::Playing),
            Some(SnakeCommand::Turn(Direction::Up))
        );
        assert_eq!(
            controls.on_key_down(Key::Action, GamePhase::GameOver),
            Some(SnakeCommand::Start)
        );
    }

    #[test]
    fn test_swipe_drives_engine() {
        let mut engine = SnakeEngine::new(SnakeConfig::default(), Persistence::in_memory())
            .unwrap()
            .with_seed(4);
        let mut controls = SnakeControls::new(engine.config().input.swipe_threshold);

        controls.on_touch_start(0.0, 0.0);
        let cmd = controls.on_touch_end(5.0, 5.0, engine.phase());
        assert!(apply(&mut engine, cmd.unwrap()));
        assert_eq!(engine.phase(), GamePhase::Playing);

        controls.on_touch_start(50.0, 50.0);
        let cmd = controls.on_touch_end(52.0, 0.0, engine.phase());
        assert_eq!(cmd, Some(SnakeCommand::Turn(Direction::Up)));
        assert!(apply(&mut engine, cmd.unwrap()));
        engine.step();
        assert_eq!(engine.snapshot().direction, Direction::Up);

        // Reversal swipe is refused by the engine
        controls.on_touch_start(0.0, 0.0);
        let cmd = controls.on_touch_end(0.0, 80.0, engine.phase()).unwrap();
        assert!(!apply(&mut engine, cmd));
    }
}
