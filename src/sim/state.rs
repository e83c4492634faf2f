//! Game state and core simulation types
//!
//! Everything the tick function mutates lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::brick::{BrickLayout, PowerType};
use super::events::GameEvent;
use super::levels::LevelSet;
use super::rect::Rect;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running
    Stopped,
    /// Ball placed, waiting for the serve delay to run out
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Last level cleared
    Won,
}

/// Ball state - free-moving or held by a Catch paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    Free,
    /// Held on the paddle at `offset` pixels from its left edge
    Attached { offset: f32, ticks_left: u32 },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Left the playfield, removed at the end of the tick
    pub marked_for_removal: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
            state: BallState::Free,
            marked_for_removal: false,
        }
    }

    /// Advance one tick
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    pub fn upper(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn lower(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Keep direction, change magnitude
    pub fn set_speed(&mut self, speed: f32) {
        self.vel = self.vel.normalize_or_zero() * speed;
    }

    pub fn is_free(&self) -> bool {
        matches!(self.state, BallState::Free)
    }

    /// Follow the paddle while attached
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if let BallState::Attached { offset, .. } = self.state {
            self.pos.x = paddle.x + offset.clamp(0.0, paddle.width);
            self.pos.y = paddle.y - self.radius - 1.0;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: PADDLE_START_X,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            moving_left: false,
            moving_right: false,
        }
    }
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// One keyboard movement step, bounded by the playfield
    pub fn move_step(&mut self) {
        if self.moving_left && self.x > 0.0 {
            self.x = (self.x - PADDLE_MOVE_STEP).max(0.0);
        }
        if self.moving_right && self.right() < PLAYFIELD_WIDTH {
            self.x = (self.x + PADDLE_MOVE_STEP).min(PLAYFIELD_WIDTH - self.width);
        }
    }

    /// Centre the paddle on a mouse x position, clamped to the playfield
    pub fn set_center_x(&mut self, x: f32) {
        let half = self.width / 2.0;
        let x = x.clamp(half, PLAYFIELD_WIDTH - half);
        self.x = x - half;
    }

    /// Resize around the current centre, staying inside the playfield
    pub fn set_width(&mut self, width: f32) {
        let center = self.center_x();
        self.width = width.min(PLAYFIELD_WIDTH);
        self.set_center_x(center);
    }
}

/// A falling power-pill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerPill {
    pub power: PowerType,
    /// Top-left corner
    pub pos: Vec2,
}

impl PowerPill {
    /// Spawn centred on a brick cell
    pub fn from_brick(power: PowerType, brick: Rect) -> Self {
        let center = brick.center();
        Self {
            power,
            pos: Vec2::new(center.x - PILL_WIDTH / 2.0, center.y - PILL_HEIGHT / 2.0),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PILL_WIDTH, PILL_HEIGHT)
    }
}

/// A laser beam fired upward from the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserShot {
    /// Top-left corner
    pub pos: Vec2,
}

impl LaserShot {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, LASER_WIDTH, LASER_HEIGHT)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    /// Level a new game starts at
    pub start_level: u32,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    /// Ticks left before the served ball starts moving
    pub serve_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    pub bricks: BrickLayout,
    pub pill: Option<PowerPill>,
    pub lasers: Vec<LaserShot>,
    /// Power currently in effect (`PowerType::None` when nothing is active)
    pub active_power: PowerType,
    pub laser_cooldown: u32,
    pub levels: LevelSet,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a stopped game showing the start level
    pub fn new(levels: LevelSet, seed: u64) -> Self {
        let bricks = levels.level(START_LEVEL).unwrap_or_default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: START_LEVEL,
            start_level: START_LEVEL,
            lives: START_LIVES,
            score: 0,
            phase: GamePhase::Stopped,
            serve_ticks: 0,
            time_ticks: 0,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks,
            pill: None,
            lasers: Vec::new(),
            active_power: PowerType::None,
            laser_cooldown: 0,
            levels,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Choose the level new games start at; a stopped game shows its layout
    pub fn set_start_level(&mut self, level: u32) {
        self.start_level = level.clamp(1, self.levels.len().max(1) as u32);
        if self.phase == GamePhase::Stopped
            && let Some(layout) = self.levels.level(self.start_level)
        {
            self.level = self.start_level;
            self.bricks = layout;
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// A game is running (possibly paused or serving)
    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Serve | GamePhase::Playing | GamePhase::Paused
        )
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Ball speed for the active power
    pub fn ball_speed(&self) -> f32 {
        if self.active_power == PowerType::Slow {
            BALL_SLOW_SPEED
        } else {
            BALL_SPEED
        }
    }

    /// Start a new game from the start level
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.level = self.start_level;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.emit(GameEvent::GameStart);
        log::info!("Game started at level {}", self.level);

        match self.levels.level(self.level) {
            Some(layout) => {
                self.bricks = layout;
                self.emit(GameEvent::LevelStart { level: self.level });
                self.start_round(SERVE_DELAY_TICKS);
            }
            None => {
                log::warn!("Start level {} does not exist", self.level);
                self.phase = GamePhase::Won;
                self.emit(GameEvent::GameWon);
            }
        }
    }

    /// Stop the running game
    pub fn stop_game(&mut self) {
        self.phase = GamePhase::Stopped;
        self.balls.clear();
        self.pill = None;
        self.lasers.clear();
        self.emit(GameEvent::GameStopped);
        log::info!("Game stopped (score {})", self.score);
    }

    pub fn pause(&mut self) {
        if matches!(self.phase, GamePhase::Serve | GamePhase::Playing) {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = if self.serve_ticks > 0 {
                GamePhase::Serve
            } else {
                GamePhase::Playing
            };
        }
    }

    /// Reset ball, paddle and powers and wait `delay` ticks before serving
    pub fn start_round(&mut self, delay: u32) {
        self.clear_power();
        self.paddle.set_width(PADDLE_WIDTH);
        self.pill = None;
        self.lasers.clear();
        self.balls.clear();

        let id = self.next_entity_id();
        self.balls.push(Ball::new(
            id,
            Vec2::new(BALL_START_X, BALL_START_Y),
            Vec2::new(0.0, BALL_SPEED),
        ));

        self.serve_ticks = delay.max(1);
        self.phase = GamePhase::Serve;
    }

    /// Advance to the next level, or win when none is left
    pub fn advance_level(&mut self) {
        self.emit(GameEvent::LevelComplete { level: self.level });
        self.level += 1;

        match self.levels.level(self.level) {
            Some(layout) => {
                log::info!("Level {} loaded", self.level);
                self.bricks = layout;
                self.emit(GameEvent::LevelStart { level: self.level });
                self.start_round(LEVEL_DELAY_TICKS);
            }
            None => {
                log::info!("All levels cleared, final score {}", self.score);
                self.level -= 1;
                self.balls.clear();
                self.pill = None;
                self.lasers.clear();
                self.phase = GamePhase::Won;
                self.emit(GameEvent::GameWon);
            }
        }
    }

    /// End the active power and undo its effect
    pub fn clear_power(&mut self) {
        match self.active_power {
            PowerType::Enlarge => self.paddle.set_width(PADDLE_WIDTH),
            PowerType::Slow => {
                for ball in &mut self.balls {
                    ball.set_speed(BALL_SPEED);
                }
            }
            PowerType::Catch => {
                let speed = self.ball_speed();
                let paddle = self.paddle.clone();
                for ball in &mut self.balls {
                    super::collision::release_ball(ball, &paddle, speed);
                }
            }
            _ => {}
        }
        self.active_power = PowerType::None;
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}
