//! Snake renderer

use glam::Vec2;

use super::theme::{Theme, resolve};
use super::{Frame, PaintCommand, Surface, TextAlign};
use crate::config::SnakeConfig;
use crate::sim::{GamePhase, GridPos, SnakeSnapshot};

/// Integer cell size and board origin, so cells land on whole CSS pixels
fn board_metrics(surface: &Surface, grid: u32) -> (f32, Vec2) {
    let cell = (surface.width.min(surface.height) / grid as f32).floor().max(1.0);
    let board = cell * grid as f32;
    let origin = Vec2::new(
        ((surface.width - board) * 0.5).floor(),
        ((surface.height - board) * 0.5).floor(),
    );
    (cell, origin)
}

pub fn render_snake(
    snapshot: &SnakeSnapshot,
    config: &SnakeConfig,
    surface: &Surface,
    theme: Theme,
) -> Frame {
    let colors = &config.colors;
    let background = resolve(&colors.background, theme);
    let grid_color = resolve(&colors.grid, theme);
    let head = resolve(&colors.snake_head, theme);
    let body = resolve(&colors.snake_body, theme);
    let food = resolve(&colors.food, theme);
    let text = resolve(&colors.text, theme);

    let mut frame = Frame::new(surface);
    frame.push(PaintCommand::Clear { color: background });

    let grid = snapshot.grid_size;
    let (cell, origin) = board_metrics(surface, grid);
    let board = cell * grid as f32;

    for i in 0..=grid {
        let d = i as f32 * cell;
        frame.push(PaintCommand::Line {
            from: origin + Vec2::new(d, 0.0),
            to: origin + Vec2::new(d, board),
            width: 1.0,
            color: grid_color,
        });
        frame.push(PaintCommand::Line {
            from: origin + Vec2::new(0.0, d),
            to: origin + Vec2::new(board, d),
            width: 1.0,
            color: grid_color,
        });
    }

    let cell_rect = |pos: GridPos, color| {
        let inset = if cell > 4.0 { 1.0 } else { 0.0 };
        PaintCommand::FillRect {
            x: origin.x + pos.x as f32 * cell + inset,
            y: origin.y + pos.y as f32 * cell + inset,
            width: cell - inset * 2.0,
            height: cell - inset * 2.0,
            color,
        }
    };

    if let Some(pos) = snapshot.food {
        frame.push(cell_rect(pos, food));
    }
    // Body first so the head draws on top
    for pos in snapshot.snake.iter().skip(1).rev() {
        frame.push(cell_rect(*pos, body));
    }
    if let Some(pos) = snapshot.snake.first() {
        frame.push(cell_rect(*pos, head));
    }

    let hud_size = (cell * 0.8).clamp(10.0, 16.0);
    frame.text(
        format!("Score: {}", snapshot.score),
        origin + Vec2::new(4.0, hud_size + 2.0),
        hud_size,
        TextAlign::Left,
        text,
    );
    frame.text(
        format!("Best: {}", snapshot.highscore),
        origin + Vec2::new(board - 4.0, hud_size + 2.0),
        hud_size,
        TextAlign::Right,
        text,
    );

    match snapshot.phase {
        GamePhase::Idle => frame.overlay(surface, "Snake", "Press Space or tap to start", text),
        GamePhase::Paused => frame.overlay(surface, "Paused", "Press Space to resume", text),
        GamePhase::GameOver => frame.overlay(
            surface,
            "Game Over",
            &format!("Score {} - press Space to play again", snapshot.score),
            text,
        ),
        _ => {}
    }

    frame
}
