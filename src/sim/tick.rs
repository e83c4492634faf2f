//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. One call
//! is one 1/60 s step; velocities are in pixels per tick.

use glam::Vec2;
use rand::Rng;

use super::brick::{BrickHit, BrickLayout, PowerType};
use super::collision::{
    ball_lost, brick_collisions, catch_ball, paddle_collision, release_ball, wall_collision,
};
use super::events::GameEvent;
use super::state::{Ball, BallState, GamePhase, GameState, LaserShot, PowerPill};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a new game, or stop the running one
    pub start_stop: bool,
    /// Pause toggle
    pub pause: bool,
    /// Release a caught ball / shoot lasers
    pub fire: bool,
    /// Held paddle direction keys
    pub paddle_left: bool,
    pub paddle_right: bool,
    /// Paddle centre from the mouse, in playfield pixels
    pub mouse_x: Option<f32>,
}

/// Degrees between the split balls of a Disruption
const SPLIT_ANGLE: f32 = 20.0;
/// Random extra spread per split ball, in degrees
const SPLIT_JITTER: f32 = 5.0;
/// Horizontal inset of the laser guns from the paddle edges
const LASER_INSET: f32 = 10.0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.start_stop {
        if state.is_playing() {
            state.stop_game();
        } else {
            state.start_game();
        }
        return;
    }

    if input.pause {
        if state.is_paused() {
            state.resume();
        } else {
            state.pause();
        }
    }

    if !matches!(state.phase, GamePhase::Serve | GamePhase::Playing) {
        return;
    }

    state.time_ticks += 1;

    // Paddle: keys first, the mouse overrides
    state.paddle.moving_left = input.paddle_left;
    state.paddle.moving_right = input.paddle_right;
    state.paddle.move_step();
    if let Some(x) = input.mouse_x {
        state.paddle.set_center_x(x);
    }

    if state.active_power == PowerType::Break && state.paddle.right() >= PLAYFIELD_WIDTH {
        log::debug!("Paddle escaped through the break gate");
        state.score += BREAK_BONUS_POINTS;
        state.emit(GameEvent::LevelSkipped);
        state.advance_level();
        return;
    }

    if state.phase == GamePhase::Serve {
        state.serve_ticks = state.serve_ticks.saturating_sub(1);
        if state.serve_ticks == 0 {
            state.phase = GamePhase::Playing;
            state.emit(GameEvent::NewBall);
        }
        return;
    }

    update_lasers(state, input.fire);
    update_balls(state, input.fire);
    update_pill(state);

    if state.bricks.remaining() == 0 {
        state.advance_level();
        return;
    }

    if state.balls.is_empty() {
        lose_life(state);
        return;
    }

    state.normalize_order();
}

/// Move every ball and resolve its collisions
fn update_balls(state: &mut GameState, fire: bool) {
    let speed = state.ball_speed();
    let catching = state.active_power == PowerType::Catch;
    let paddle = state.paddle.clone();

    let mut events = Vec::new();
    let mut hits: Vec<(usize, usize, BrickHit)> = Vec::new();

    for ball in &mut state.balls {
        if let BallState::Attached { offset, ticks_left } = ball.state {
            if fire || ticks_left <= 1 {
                release_ball(ball, &paddle, speed);
            } else {
                ball.state = BallState::Attached {
                    offset,
                    ticks_left: ticks_left - 1,
                };
                ball.update_attached(&paddle);
            }
            continue;
        }

        ball.step();

        if wall_collision(ball).any() {
            events.push(GameEvent::HitWall);
        }

        for cell in brick_collisions(ball, &mut state.bricks) {
            events.push(GameEvent::HitBrick {
                row: cell.row,
                col: cell.col,
                kind: cell.hit.kind,
                destroyed: cell.hit.destroyed,
            });
            hits.push((cell.row, cell.col, cell.hit));
        }

        if paddle_collision(ball, &paddle, speed) {
            events.push(GameEvent::HitPaddle);
            if catching {
                catch_ball(ball, &paddle);
            }
        }

        if ball_lost(ball) {
            ball.marked_for_removal = true;
            events.push(GameEvent::BallLost);
        }
    }

    state.events.extend(events);
    state.balls.retain(|b| !b.marked_for_removal);
    apply_brick_hits(state, &hits);
}

/// Award points and release pills for bricks hit this tick
fn apply_brick_hits(state: &mut GameState, hits: &[(usize, usize, BrickHit)]) {
    for &(row, col, hit) in hits {
        if !hit.destroyed {
            continue;
        }
        state.score += hit.points;

        // One pill at a time, and none while several balls are in play
        if hit.power != PowerType::None && state.pill.is_none() && state.balls.len() <= 1 {
            state.pill = Some(PowerPill::from_brick(
                hit.power,
                BrickLayout::brick_rect(row, col),
            ));
            state.emit(GameEvent::PowerPillReleased { power: hit.power });
        }
    }
}

/// Fall the pill and check whether the paddle caught it
fn update_pill(state: &mut GameState) {
    let Some(pill) = state.pill.as_mut() else {
        return;
    };
    pill.pos.y += PILL_FALL_SPEED;

    if pill.rect().intersects(&state.paddle.rect()) {
        let power = pill.power;
        state.pill = None;
        state.score += PILL_CATCH_POINTS;
        state.emit(GameEvent::PowerPillCaught { power });
        activate_power(state, power);
    } else if pill.pos.y >= PLAYFIELD_HEIGHT {
        state.pill = None;
    }
}

/// Apply a caught power, replacing whatever was active before
pub fn activate_power(state: &mut GameState, power: PowerType) {
    match power {
        PowerType::None => {}
        PowerType::Player => {
            state.lives = state.lives.saturating_add(1);
        }
        _ => {
            state.clear_power();
            state.active_power = power;
            match power {
                PowerType::Slow => {
                    for ball in &mut state.balls {
                        ball.set_speed(BALL_SLOW_SPEED);
                    }
                }
                PowerType::Enlarge => state.paddle.set_width(PADDLE_WIDTH * PADDLE_ENLARGE_FACTOR),
                PowerType::Laser => state.laser_cooldown = 0,
                PowerType::Disruption => split_balls(state),
                _ => {}
            }
        }
    }
    log::debug!("Power {:?} activated", power);
}

/// Split every free ball into three with diverging directions
fn split_balls(state: &mut GameState) {
    let mut spawned = Vec::new();
    let originals: Vec<(Vec2, Vec2)> = state
        .balls
        .iter()
        .filter(|b| b.is_free())
        .map(|b| (b.pos, b.vel))
        .collect();

    for (pos, vel) in originals {
        for side in [-1.0f32, 1.0] {
            let jitter = state.rng.random_range(-SPLIT_JITTER..SPLIT_JITTER);
            let angle = (side * SPLIT_ANGLE + jitter).to_radians();
            let id = state.next_entity_id();
            spawned.push(Ball::new(id, pos, Vec2::from_angle(angle).rotate(vel)));
        }
    }

    state.balls.extend(spawned);
}

/// Fire, move and resolve laser shots
fn update_lasers(state: &mut GameState, fire: bool) {
    state.laser_cooldown = state.laser_cooldown.saturating_sub(1);

    if fire && state.active_power == PowerType::Laser && state.laser_cooldown == 0 {
        let y = state.paddle.y - LASER_HEIGHT;
        state.lasers.push(LaserShot {
            pos: Vec2::new(state.paddle.x + LASER_INSET, y),
        });
        state.lasers.push(LaserShot {
            pos: Vec2::new(state.paddle.right() - LASER_INSET - LASER_WIDTH, y),
        });
        state.laser_cooldown = LASER_COOLDOWN_TICKS;
        state.emit(GameEvent::LaserFired);
    }

    let mut hits = Vec::new();
    let bricks = &mut state.bricks;
    state.lasers.retain_mut(|shot| {
        shot.pos.y -= LASER_SPEED;
        if shot.pos.y + LASER_HEIGHT < 0.0 {
            return false;
        }
        let tip = Vec2::new(shot.pos.x + LASER_WIDTH / 2.0, shot.pos.y);
        // Shots in the gaps between bricks pass through
        let Some((row, col)) = BrickLayout::cell_at(tip.x, tip.y)
            .filter(|&(row, col)| BrickLayout::brick_rect(row, col).contains(tip))
        else {
            return true;
        };
        match bricks.hit(row, col) {
            Some(hit) => {
                hits.push((row, col, hit));
                false
            }
            None => true,
        }
    });

    for &(row, col, hit) in &hits {
        state.emit(GameEvent::HitBrick {
            row,
            col,
            kind: hit.kind,
            destroyed: hit.destroyed,
        });
    }
    apply_brick_hits(state, &hits);
}

/// Last ball gone: take a life, then serve again or end the game
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LastBallLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        log::info!("Game over at level {} with score {}", state.level, state.score);
        state.clear_power();
        state.pill = None;
        state.lasers.clear();
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver);
    } else {
        log::debug!("Ball lost, {} lives left", state.lives);
        state.start_round(SERVE_DELAY_TICKS);
    }
}
