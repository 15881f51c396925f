//! Brick Breaker paddle arbitration
//!
//! Keyboard and pointer/touch must never fight over the paddle. A single
//! tri-state [`InputMode`] decides who owns positioning:
//!
//! | event | effect |
//! |-------|--------|
//! | movement key down | mode = Keyboard |
//! | last movement key up | mode = None |
//! | pointer move | ignored in Keyboard, else mode = Pointer |
//! | touch start/move | mode = Pointer |
//! | touch end | mode = None |
//! | engine leaves Playing | mode = None |
//!
//! Action keys and clicks pass through in every mode.

use super::Key;
use crate::sim::{ArcadeEngine, BreakoutEngine, GamePhase, PaddleDir};

/// Who currently owns paddle positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    None,
    Keyboard,
    Pointer,
}

/// Engine-level command produced by the arbiter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakoutCommand {
    /// Hold (or release) a keyboard direction
    Hold(Option<PaddleDir>),
    /// Steer toward a field x coordinate
    Aim(f32),
    /// Drop all paddle control
    Release,
    Start,
    Launch,
    TogglePause,
    NextLevel,
    /// Reset and start a fresh run
    Restart,
}

#[derive(Debug, Clone, Default)]
pub struct PaddleArbiter {
    mode: InputMode,
    left_held: bool,
    right_held: bool,
    /// Most recently pressed direction wins while both are held
    last_pressed: Option<PaddleDir>,
}

impl PaddleArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// The primary action (Space, Enter, click, tap) for a phase
    pub fn action(phase: GamePhase) -> Option<BreakoutCommand> {
        match phase {
            GamePhase::Playing => Some(BreakoutCommand::Launch),
            GamePhase::Paused => Some(BreakoutCommand::TogglePause),
            GamePhase::LevelComplete => Some(BreakoutCommand::NextLevel),
            p if p.can_start() => Some(BreakoutCommand::Start),
            _ => None,
        }
    }

    fn held_direction(&self) -> Option<PaddleDir> {
        match (self.left_held, self.right_held) {
            (true, true) => self.last_pressed,
            (true, false) => Some(PaddleDir::Left),
            (false, true) => Some(PaddleDir::Right),
            (false, false) => None,
        }
    }

    pub fn on_key_down(&mut self, key: Key, phase: GamePhase) -> Option<BreakoutCommand> {
        let dir = match key {
            Key::Left => PaddleDir::Left,
            Key::Right => PaddleDir::Right,
            Key::Action => return Self::action(phase),
            Key::Pause => return Some(BreakoutCommand::TogglePause),
            Key::Restart => return Some(BreakoutCommand::Restart),
            Key::NextLevel => return Some(BreakoutCommand::NextLevel),
            Key::Up | Key::Down | Key::Other => return None,
        };
        match dir {
            PaddleDir::Left => self.left_held = true,
            PaddleDir::Right => self.right_held = true,
        }
        self.last_pressed = Some(dir);
        self.mode = InputMode::Keyboard;
        Some(BreakoutCommand::Hold(self.held_direction()))
    }

    pub fn on_key_up(&mut self, key: Key) -> Option<BreakoutCommand> {
        match key {
            Key::Left => self.left_held = false,
            Key::Right => self.right_held = false,
            _ => return None,
        }
        if self.mode != InputMode::Keyboard {
            return None;
        }
        let held = self.held_direction();
        if held.is_none() {
            self.mode = InputMode::None;
        }
        Some(BreakoutCommand::Hold(held))
    }

    /// Mouse/pen motion in field units
    pub fn on_pointer_move(&mut self, x: f32) -> Option<BreakoutCommand> {
        if self.mode == InputMode::Keyboard {
            return None;
        }
        self.mode = InputMode::Pointer;
        Some(BreakoutCommand::Aim(x))
    }

    /// Touch always takes the paddle, even from the keyboard
    pub fn on_touch_start(&mut self, x: f32) -> Option<BreakoutCommand> {
        self.mode = InputMode::Pointer;
        Some(BreakoutCommand::Aim(x))
    }

    pub fn on_touch_move(&mut self, x: f32) -> Option<BreakoutCommand> {
        self.on_touch_start(x)
    }

    pub fn on_touch_end(&mut self) {
        self.mode = InputMode::None;
    }

    /// The engine left `Playing`
    pub fn on_state_exit(&mut self) -> BreakoutCommand {
        self.mode = InputMode::None;
        self.left_held = false;
        self.right_held = false;
        self.last_pressed = None;
        BreakoutCommand::Release
    }
}

/// Apply a command to the engine; returns whether anything changed
pub fn apply(engine: &mut BreakoutEngine, command: BreakoutCommand) -> bool {
    match command {
        BreakoutCommand::Hold(dir) => {
            engine.move_paddle(dir);
            true
        }
        BreakoutCommand::Aim(x) => {
            engine.set_paddle_position(x);
            true
        }
        BreakoutCommand::Release => {
            engine.release_paddle();
            true
        }
        BreakoutCommand::Start => engine.start(),
        BreakoutCommand::Launch => engine.launch_ball(),
        BreakoutCommand::TogglePause => engine.toggle_pause(),
        BreakoutCommand::NextLevel => engine.next_level(),
        BreakoutCommand::Restart => {
            engine.reset();
            engine.start()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakoutConfig;
    use crate::persistence::Persistence;

    const FRAME: f64 = 1000.0 / 60.0;

    fn playing_engine() -> BreakoutEngine {
        let mut engine = BreakoutEngine::new(BreakoutConfig::default(), Persistence::in_memory())
            .unwrap()
            .with_seed(8);
        engine.start();
        engine
    }

    fn feed(engine: &mut BreakoutEngine, command: Option<BreakoutCommand>) {
        if let Some(command) = command {
            apply(engine, command);
        }
    }

    #[test]
    fn test_keyboard_blocks_pointer_until_release() {
        let mut engine = playing_engine();
        let mut arbiter = PaddleArbiter::new();

        feed(&mut engine, arbiter.on_key_down(Key::Right, GamePhase::Playing));
        assert_eq!(arbiter.mode(), InputMode::Keyboard);
        feed(&mut engine, arbiter.on_key_up(Key::Right));
        assert_eq!(arbiter.mode(), InputMode::None);

        feed(&mut engine, arbiter.on_key_down(Key::Left, GamePhase::Playing));
        // Pointer motion is dropped while the key is held
        assert_eq!(arbiter.on_pointer_move(470.0), None);
        let before = engine.snapshot().paddle.x;
        engine.advance(FRAME);
        let after = engine.snapshot().paddle;
        assert!(after.x < before);
        assert_eq!(after.target_x, None);

        // Paddle stops once the key is released, then the pointer reacquires it
        feed(&mut engine, arbiter.on_key_up(Key::Left));
        let parked = engine.snapshot().paddle.x;
        engine.advance(FRAME);
        assert_eq!(engine.snapshot().paddle.x, parked);

        let cmd = arbiter.on_pointer_move(470.0);
        assert_eq!(cmd, Some(BreakoutCommand::Aim(470.0)));
        assert_eq!(arbiter.mode(), InputMode::Pointer);
        feed(&mut engine, cmd);
        engine.advance(FRAME);
        assert!(engine.snapshot().paddle.x > parked);
    }

    #[test]
    fn test_keyboard_overrides_pointer() {
        let mut arbiter = PaddleArbiter::new();
        arbiter.on_pointer_move(100.0);
        assert_eq!(arbiter.mode(), InputMode::Pointer);
        assert_eq!(
            arbiter.on_key_down(Key::Left, GamePhase::Playing),
            Some(BreakoutCommand::Hold(Some(PaddleDir::Left)))
        );
        assert_eq!(arbiter.mode(), InputMode::Keyboard);
    }

    #[test]
    fn test_both_keys_most_recent_wins() {
        let mut arbiter = PaddleArbiter::new();
        arbiter.on_key_down(Key::Left, GamePhase::Playing);
        assert_eq!(
            arbiter.on_key_down(Key::Right, GamePhase::Playing),
            Some(BreakoutCommand::Hold(Some(PaddleDir::Right)))
        );
        // Releasing Right falls back to the still-held Left
        assert_eq!(
            arbiter.on_key_up(Key::Right),
            Some(BreakoutCommand::Hold(Some(PaddleDir::Left)))
        );
        assert_eq!(arbiter.mode(), InputMode::Keyboard);
    }

    #[test]
    fn test_touch_forces_pointer_and_end_clears() {
        let mut arbiter = PaddleArbiter::new();
        arbiter.on_key_down(Key::Right, GamePhase::Playing);
        assert_eq!(arbiter.on_touch_start(50.0), Some(BreakoutCommand::Aim(50.0)));
        assert_eq!(arbiter.mode(), InputMode::Pointer);
        arbiter.on_touch_end();
        assert_eq!(arbiter.mode(), InputMode::None);
    }

    #[test]
    fn test_state_exit_resets_mode() {
        let mut arbiter = PaddleArbiter::new();
        arbiter.on_key_down(Key::Left, GamePhase::Playing);
        assert_eq!(arbiter.on_state_exit(), BreakoutCommand::Release);
        assert_eq!(arbiter.mode(), InputMode::None);
        // The stale key-up after a pause does not emit anything
        assert_eq!(arbiter.on_key_up(Key::Left), None);
    }

    #[test]
    fn test_actions_pass_in_any_mode() {
        let mut arbiter = PaddleArbiter::new();
        arbiter.on_key_down(Key::Left, GamePhase::Playing);
        assert_eq!(
            arbiter.on_key_down(Key::Pause, GamePhase::Playing),
            Some(BreakoutCommand::TogglePause)
        );
        assert_eq!(
            arbiter.on_key_down(Key::Action, GamePhase::Idle),
            Some(BreakoutCommand::Start)
        );
        assert_eq!(
            arbiter.on_key_down(Key::Action, GamePhase::LevelComplete),
            Some(BreakoutCommand::NextLevel)
        );
        assert_eq!(
            PaddleArbiter::action(GamePhase::Lost),
            Some(BreakoutCommand::Start)
        );
    }

    #[test]
    fn test_restart_command() {
        let mut engine = playing_engine();
        engine.advance(FRAME);
        assert!(apply(&mut engine, BreakoutCommand::Restart));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.time_ms, 0.0);
    }
}
