//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod brick;
pub mod collision;
pub mod events;
pub mod levels;
pub mod rect;
pub mod state;
pub mod tick;

pub use brick::{Brick, BrickHit, BrickLayout, BrickType, PowerType};
pub use events::{EventBus, GameEvent};
pub use levels::{LevelError, LevelSet, parse_level};
pub use rect::Rect;
pub use state::{Ball, BallState, GamePhase, GameState, LaserShot, Paddle, PowerPill};
pub use tick::{TickInput, activate_power, tick};
