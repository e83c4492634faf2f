//! Scene building
//!
//! Turns the game state into a triangle list in window coordinates. The
//! window is the playfield surrounded by walls on the left, right and top;
//! the open bottom is where balls are lost.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{BrickLayout, BrickType, GameEvent, GamePhase, GameState, PowerType, Rect};

/// Per-frame fade of every animation
const FADE: f32 = 0.9;
const MIN_VISIBLE: f32 = 0.01;
const BALL_SEGMENTS: u32 = 16;

/// A brick that was just hit
#[derive(Debug, Clone, Copy, PartialEq)]
struct BrickFlash {
    row: usize,
    col: usize,
    kind: BrickType,
    destroyed: bool,
    strength: f32,
}

/// Short hit animations driven by game events
#[derive(Debug, Default)]
pub struct Effects {
    paddle_flash: f32,
    level_flash: f32,
    bricks: Vec<BrickFlash>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::HitPaddle => self.paddle_flash = 1.0,
            GameEvent::HitBrick {
                row,
                col,
                kind,
                destroyed,
            } => {
                self.bricks.retain(|f| f.row != row || f.col != col);
                self.bricks.push(BrickFlash {
                    row,
                    col,
                    kind,
                    destroyed,
                    strength: 1.0,
                });
            }
            GameEvent::LevelStart { .. } => {
                self.bricks.clear();
                self.level_flash = 1.0;
            }
            GameEvent::GameStopped => *self = Self::default(),
            _ => {}
        }
    }

    /// Fade all animations by one frame
    pub fn update(&mut self) {
        self.paddle_flash = fade(self.paddle_flash);
        self.level_flash = fade(self.level_flash);
        for flash in &mut self.bricks {
            flash.strength = fade(flash.strength);
        }
        self.bricks.retain(|f| f.strength > 0.0);
    }
}

fn fade(value: f32) -> f32 {
    let value = value * FADE;
    if value < MIN_VISIBLE { 0.0 } else { value }
}

/// Top-left corner of the playfield in window coordinates
pub fn playfield_origin() -> Vec2 {
    Vec2::new(WALL_THICKNESS, WALL_THICKNESS)
}

/// Pixels per window unit for a surface of `size`, letterboxed
fn view_scale(size: (u32, u32)) -> f32 {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    (w / WINDOW_WIDTH).min(h / WINDOW_HEIGHT)
}

/// Convert window coordinates to normalized device coordinates
/// Window coords have y down; NDC is -1 to 1 with y up
pub fn world_to_ndc(x: f32, y: f32, size: (u32, u32)) -> (f32, f32) {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    let scale = view_scale(size);
    (
        (x - WINDOW_WIDTH / 2.0) * scale * 2.0 / w,
        -(y - WINDOW_HEIGHT / 2.0) * scale * 2.0 / h,
    )
}

/// Map a cursor position in surface pixels to playfield coordinates
pub fn surface_to_playfield(px: f32, py: f32, size: (u32, u32)) -> Vec2 {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    let scale = view_scale(size);
    let world = Vec2::new(
        (px - w / 2.0) / scale + WINDOW_WIDTH / 2.0,
        (py - h / 2.0) / scale + WINDOW_HEIGHT / 2.0,
    );
    world - playfield_origin()
}

/// Build the full frame
pub fn build_scene(state: &GameState, effects: &Effects) -> Vec<Vertex> {
    let origin = playfield_origin();
    let mut vertices = Vec::with_capacity(4096);

    // Walls and playfield
    vertices.extend(shapes::rect(
        Rect::new(0.0, 0.0, WINDOW_WIDTH, WINDOW_HEIGHT),
        colors::WALL,
    ));
    let field = Rect::new(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT + 1.0).translate(origin);
    let field_color = colors::mix(colors::PLAYFIELD, colors::FLASH, effects.level_flash * 0.15);
    vertices.extend(shapes::rect(field, field_color));

    if state.active_power == PowerType::Break {
        vertices.extend(shapes::rect(
            Rect::new(
                WINDOW_WIDTH - WALL_THICKNESS,
                origin.y + PADDLE_Y - PADDLE_HEIGHT,
                WALL_THICKNESS,
                PADDLE_HEIGHT * 3.0,
            ),
            colors::BREAK_GATE,
        ));
    }

    for (row, col, brick) in state.bricks.iter() {
        let mut color = colors::brick(brick.kind);
        if brick.hits > 0 {
            color = colors::mix(color, colors::PLAYFIELD, 0.3);
        }
        let r = BrickLayout::brick_rect(row, col).translate(origin);
        vertices.extend(shapes::bevel_rect(r, color));
    }

    for flash in &effects.bricks {
        let r = BrickLayout::brick_rect(flash.row, flash.col).translate(origin);
        let color = if flash.destroyed {
            colors::with_alpha(colors::brick(flash.kind), flash.strength * 0.8)
        } else {
            colors::with_alpha(colors::FLASH, flash.strength * 0.6)
        };
        vertices.extend(shapes::rect(r, color));
    }

    if let Some(pill) = &state.pill {
        let r = pill.rect().translate(origin);
        vertices.extend(shapes::capsule(r, colors::pill(pill.power), 10));
        let stripe = Rect::new(r.x + r.height / 2.0, r.center().y - 2.0, r.width - r.height, 4.0);
        vertices.extend(shapes::rect(stripe, colors::FLASH));
    }

    for shot in &state.lasers {
        vertices.extend(shapes::rect(shot.rect().translate(origin), colors::LASER));
    }

    let paddle_color = match state.active_power {
        PowerType::Laser => colors::PADDLE_LASER,
        PowerType::Catch => colors::PADDLE_CATCH,
        _ => colors::PADDLE,
    };
    let paddle_color = colors::mix(paddle_color, colors::FLASH, effects.paddle_flash * 0.7);
    vertices.extend(shapes::capsule(
        state.paddle.rect().translate(origin),
        paddle_color,
        12,
    ));

    for ball in &state.balls {
        vertices.extend(shapes::circle(
            ball.pos + origin,
            ball.radius,
            colors::BALL,
            BALL_SEGMENTS,
        ));
    }

    if !matches!(state.phase, GamePhase::Playing | GamePhase::Serve) {
        vertices.extend(shapes::rect(field, colors::OVERLAY));
    }

    vertices
}

pub fn phase_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Stopped => "Press SPACE to start",
        GamePhase::Serve => "Get ready",
        GamePhase::Playing => "Playing",
        GamePhase::Paused => "Paused",
        GamePhase::GameOver => "Game over",
        GamePhase::Won => "You win!",
    }
}

/// Window title doubling as the HUD
pub fn title(state: &GameState, fps: Option<f32>) -> String {
    let mut title = format!(
        "Breakout - Level {} - Score {:06} - Lives {} - {}",
        state.level,
        state.score,
        state.lives,
        phase_label(state.phase)
    );
    if let Some(fps) = fps {
        title.push_str(&format!(" - {fps:.0} fps"));
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LevelSet;

    fn state() -> GameState {
        GameState::new(LevelSet::builtin().unwrap(), 3)
    }

    #[test]
    fn test_ndc_mapping_exact_aspect() {
        let size = (800, 720);
        assert_eq!(world_to_ndc(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0, size), (0.0, 0.0));
        let (x, y) = world_to_ndc(0.0, 0.0, size);
        assert!((x + 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5);
        let (x, y) = world_to_ndc(WINDOW_WIDTH, WINDOW_HEIGHT, size);
        assert!((x - 1.0).abs() < 1e-5 && (y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ndc_mapping_letterboxed() {
        // Twice as wide: content fills the height, centred horizontally
        let size = (1600 * 2, 1440);
        let (x, y) = world_to_ndc(0.0, 0.0, size);
        assert!((y - 1.0).abs() < 1e-5);
        assert!(x > -1.0 && x < 0.0);
    }

    #[test]
    fn test_surface_to_playfield() {
        let size = (1600, 1440);
        let p = surface_to_playfield(20.0, 20.0, size);
        assert!(p.length() < 1e-4);
        let p = surface_to_playfield(800.0, 720.0, size);
        assert!((p.x - PLAYFIELD_WIDTH / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_effects_fade_out() {
        let mut effects = Effects::new();
        effects.on_event(&GameEvent::HitPaddle);
        effects.on_event(&GameEvent::HitBrick {
            row: 1,
            col: 2,
            kind: BrickType::Red,
            destroyed: true,
        });
        assert_eq!(effects.paddle_flash, 1.0);
        assert_eq!(effects.bricks.len(), 1);
        for _ in 0..100 {
            effects.update();
        }
        assert_eq!(effects.paddle_flash, 0.0);
        assert!(effects.bricks.is_empty());
    }

    #[test]
    fn test_repeated_hit_replaces_flash() {
        let mut effects = Effects::new();
        let hit = GameEvent::HitBrick {
            row: 1,
            col: 2,
            kind: BrickType::Silver,
            destroyed: false,
        };
        effects.on_event(&hit);
        effects.on_event(&hit);
        assert_eq!(effects.bricks.len(), 1);
    }

    #[test]
    fn test_scene_has_every_brick_and_ball() {
        let mut state = state();
        state.start_game();
        let bricks = state.bricks.iter().count();
        let vertices = build_scene(&state, &Effects::new());
        // Background, playfield, bevelled bricks, paddle, ball
        let paddle = shapes::capsule(state.paddle.rect(), colors::PADDLE, 12).len();
        let expected = 6 + 6 + bricks * 18 + paddle + BALL_SEGMENTS as usize * 3;
        assert_eq!(vertices.len(), expected);
    }

    #[test]
    fn test_title_shows_hud() {
        let mut state = state();
        state.score = 420;
        let title = title(&state, Some(59.6));
        assert!(title.contains("Level 1"));
        assert!(title.contains("Score 000420"));
        assert!(title.contains("Lives 5"));
        assert!(title.contains("60 fps"));
        assert!(!super::title(&state, None).contains("fps"));
    }
}
