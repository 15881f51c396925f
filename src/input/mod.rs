//! Input arbitration
//!
//! Turns raw host events (DOM key names, pointer and touch coordinates) into
//! engine commands. Coordinates reaching this module are already in field
//! units; the host maps them with [`Surface::to_field`](crate::renderer::Surface::to_field).

pub mod breakout;
pub mod snake;

pub use breakout::{BreakoutCommand, InputMode, PaddleArbiter};
pub use snake::{SnakeCommand, SnakeControls, swipe_direction};

use crate::sim::Direction;

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Space or Enter: start, launch, continue
    Action,
    /// Escape or P
    Pause,
    Restart,
    NextLevel,
    Other,
}

impl Key {
    /// Parse a `KeyboardEvent.key` value (arrows and WASD)
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowLeft" | "Left" | "a" | "A" => Key::Left,
            "ArrowRight" | "Right" | "d" | "D" => Key::Right,
            "ArrowUp" | "Up" | "w" | "W" => Key::Up,
            "ArrowDown" | "Down" | "s" | "S" => Key::Down,
            " " | "Spacebar" | "Enter" => Key::Action,
            "Escape" | "Esc" | "p" | "P" => Key::Pause,
            "r" | "R" => Key::Restart,
            "n" | "N" => Key::NextLevel,
            _ => Key::Other,
        }
    }

    /// Grid direction for movement keys
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            _ => None,
        }
    }

    /// Whether the browser's default action (scrolling) should be suppressed
    pub fn is_game_key(self) -> bool {
        self != Key::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(Key::parse("ArrowLeft"), Key::Left);
        assert_eq!(Key::parse("d"), Key::Right);
        assert_eq!(Key::parse("W"), Key::Up);
        assert_eq!(Key::parse(" "), Key::Action);
        assert_eq!(Key::parse("Enter"), Key::Action);
        assert_eq!(Key::parse("Escape"), Key::Pause);
        assert_eq!(Key::parse("Tab"), Key::Other);
        assert!(!Key::parse("Shift").is_game_key());
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Key::Down.direction(), Some(Direction::Down));
        assert_eq!(Key::Action.direction(), None);
    }
}
