//! Breakout - a desktop Arkanoid clone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, bricks, paddle, power-pills, scoring)
//! - `controller`: Maps input to model commands and model events to sounds
//! - `audio`: Procedural sound clips mixed on the audio thread
//! - `renderer`: wgpu rendering of the playfield
//! - `settings`: User preferences persisted as JSON

pub mod audio;
pub mod controller;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::{Action, Controller};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one ball step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (inside the walls)
    pub const PLAYFIELD_WIDTH: f32 = 780.0;
    pub const PLAYFIELD_HEIGHT: f32 = 710.0;
    /// Thickness of the left, right and top walls around the playfield
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Logical window size: playfield plus the side and top walls
    pub const WINDOW_WIDTH: f32 = PLAYFIELD_WIDTH + 2.0 * WALL_THICKNESS;
    pub const WINDOW_HEIGHT: f32 = PLAYFIELD_HEIGHT + WALL_THICKNESS;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_START_X: f32 = 315.0;
    pub const PADDLE_Y: f32 = 670.0;
    /// Pixels per tick while a direction key is held
    pub const PADDLE_MOVE_STEP: f32 = 5.0;
    /// Width multiplier of the Enlarge power
    pub const PADDLE_ENLARGE_FACTOR: f32 = 1.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_X: f32 = 390.0;
    pub const BALL_START_Y: f32 = 450.0;
    /// Pixels per tick
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_SLOW_SPEED: f32 = 3.0;
    /// Maximum bounce angle off the paddle, measured from vertical (degrees)
    pub const BALL_MAX_ANGLE: f32 = 60.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 18;
    pub const BRICK_COLUMNS: usize = 13;
    pub const BRICK_WIDTH: f32 = 58.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 2.0;

    /// Game rules
    pub const START_LEVEL: u32 = 1;
    pub const START_LIVES: u8 = 5;
    /// Serve delay after a lost ball (1 s)
    pub const SERVE_DELAY_TICKS: u32 = 60;
    /// Serve delay after a cleared level (3 s)
    pub const LEVEL_DELAY_TICKS: u32 = 180;

    /// Power-pills
    pub const PILL_WIDTH: f32 = 40.0;
    pub const PILL_HEIGHT: f32 = 18.0;
    pub const PILL_FALL_SPEED: f32 = 2.0;
    pub const PILL_CATCH_POINTS: u64 = 1000;
    pub const BREAK_BONUS_POINTS: u64 = 10_000;
    /// Ticks a caught ball stays on the paddle before auto-launch
    pub const CATCH_HOLD_TICKS: u32 = 180;

    /// Laser shots
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 14.0;
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_COOLDOWN_TICKS: u32 = 15;
}
