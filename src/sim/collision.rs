//! Collision detection and response
//!
//! Every check is an independent threshold comparison against the ball's
//! bounding edges. There is no sub-stepping: a fast enough ball can tunnel
//! through a brick.

use glam::Vec2;

use super::brick::{BrickHit, BrickLayout};
use super::state::{Ball, BallState, Paddle};
use crate::consts::*;

/// Which walls a ball touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Reflect off the side and top walls, pushing the ball back inside
pub fn wall_collision(ball: &mut Ball) -> WallContact {
    let mut contact = WallContact::default();

    if ball.left() <= 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x = ball.vel.x.abs();
        contact.left = true;
    } else if ball.right() >= PLAYFIELD_WIDTH {
        ball.pos.x = PLAYFIELD_WIDTH - ball.radius;
        ball.vel.x = -ball.vel.x.abs();
        contact.right = true;
    }

    if ball.upper() <= 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
        contact.top = true;
    }

    contact
}

/// Side of the ball that touched a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A brick cell the ball ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHit {
    pub row: usize,
    pub col: usize,
    pub side: Side,
    pub hit: BrickHit,
}

/// Hit bricks under the ball's four edge midpoints and reflect
///
/// The lower and right edges subtract the gap so a ball resting in the gap
/// below/right of a brick doesn't register. Each cell is hit at most once
/// per call and each axis is reflected at most once.
pub fn brick_collisions(ball: &mut Ball, bricks: &mut BrickLayout) -> Vec<CellHit> {
    let center_row = BrickLayout::row_at(ball.pos.y);
    let center_col = BrickLayout::column_at(ball.pos.x);

    let probes = [
        (BrickLayout::row_at(ball.upper()), center_col, Side::Top),
        (BrickLayout::row_at(ball.lower() - BRICK_GAP), center_col, Side::Bottom),
        (center_row, BrickLayout::column_at(ball.left()), Side::Left),
        (center_row, BrickLayout::column_at(ball.right() - BRICK_GAP), Side::Right),
    ];

    let mut hits: Vec<CellHit> = Vec::new();
    for (row, col, side) in probes {
        let (Some(row), Some(col)) = (row, col) else {
            continue;
        };
        if hits.iter().any(|h| h.row == row && h.col == col) {
            continue;
        }
        let Some(hit) = bricks.hit(row, col) else {
            continue;
        };

        match side {
            Side::Top => ball.vel.y = ball.vel.y.abs(),
            Side::Bottom => ball.vel.y = -ball.vel.y.abs(),
            Side::Left => ball.vel.x = ball.vel.x.abs(),
            Side::Right => ball.vel.x = -ball.vel.x.abs(),
        }
        hits.push(CellHit {
            row,
            col,
            side,
            hit,
        });
    }

    hits
}

/// Bounce angle in degrees from vertical for an impact at `ball_x`
///
/// Linear in the impact offset: -max at the paddle's left edge, 0 at the
/// centre, +max at the right edge. Impacts beyond the edges are clamped.
pub fn paddle_bounce_angle(ball_x: f32, paddle_x: f32, paddle_width: f32) -> f32 {
    let relative = 2.0 * ((ball_x - paddle_x) / paddle_width - 0.5);
    relative.clamp(-1.0, 1.0) * BALL_MAX_ANGLE
}

/// Velocity leaving the paddle at `angle` degrees from vertical, upward
pub fn launch_velocity(angle: f32, speed: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(radians.sin() * speed, -radians.cos() * speed)
}

/// True when the ball's lower edge is on the paddle and it is moving down
pub fn touches_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let on_height = ball.lower() >= paddle.y && ball.lower() <= paddle.y + paddle.height;
    let overlaps = ball.right() > paddle.x && ball.left() < paddle.right();
    on_height && overlaps && ball.vel.y > 0.0
}

/// Bounce the ball off the paddle at `speed`; returns false on a miss
pub fn paddle_collision(ball: &mut Ball, paddle: &Paddle, speed: f32) -> bool {
    if !touches_paddle(ball, paddle) {
        return false;
    }
    let angle = paddle_bounce_angle(ball.pos.x, paddle.x, paddle.width);
    ball.vel = launch_velocity(angle, speed);
    ball.pos.y = paddle.y - ball.radius;
    true
}

/// Hold the ball on the paddle (Catch power)
pub fn catch_ball(ball: &mut Ball, paddle: &Paddle) {
    ball.state = BallState::Attached {
        offset: ball.pos.x - paddle.x,
        ticks_left: CATCH_HOLD_TICKS,
    };
    ball.update_attached(paddle);
}

/// Launch a held ball at the bounce angle for its offset
pub fn release_ball(ball: &mut Ball, paddle: &Paddle, speed: f32) {
    if let BallState::Attached { .. } = ball.state {
        ball.update_attached(paddle);
        let angle = paddle_bounce_angle(ball.pos.x, paddle.x, paddle.width);
        ball.vel = launch_velocity(angle, speed);
        ball.state = BallState::Free;
    }
}

/// Ball has fallen past the bottom of the playfield
pub fn ball_lost(ball: &Ball) -> bool {
    ball.upper() >= PLAYFIELD_HEIGHT
}
