//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::{BrickType, PowerType};

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PLAYFIELD: [f32; 4] = [0.04, 0.05, 0.12, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const BREAK_GATE: [f32; 4] = [1.0, 0.3, 0.9, 1.0];
    pub const PADDLE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PADDLE_LASER: [f32; 4] = [0.9, 0.3, 0.3, 1.0];
    pub const PADDLE_CATCH: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.9, 0.4, 1.0];
    pub const FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Dims the playfield while the game isn't running
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.55];

    pub fn brick(kind: BrickType) -> [f32; 4] {
        match kind {
            BrickType::White => [0.95, 0.95, 0.95, 1.0],
            BrickType::Orange => [1.0, 0.55, 0.1, 1.0],
            BrickType::Cyan => [0.2, 0.9, 0.95, 1.0],
            BrickType::Green => [0.2, 0.85, 0.25, 1.0],
            BrickType::Red => [0.9, 0.15, 0.15, 1.0],
            BrickType::Blue => [0.15, 0.35, 0.95, 1.0],
            BrickType::Magenta => [0.9, 0.2, 0.85, 1.0],
            BrickType::Yellow => [0.95, 0.9, 0.2, 1.0],
            BrickType::Grey => [0.5, 0.5, 0.55, 1.0],
            BrickType::Silver => [0.75, 0.75, 0.82, 1.0],
            BrickType::Gold => [0.9, 0.75, 0.25, 1.0],
        }
    }

    pub fn pill(power: PowerType) -> [f32; 4] {
        match power {
            PowerType::None => [0.5, 0.5, 0.5, 1.0],
            PowerType::Slow => [1.0, 0.6, 0.1, 1.0],
            PowerType::Catch => [0.3, 0.9, 0.3, 1.0],
            PowerType::Laser => [0.95, 0.2, 0.2, 1.0],
            PowerType::Enlarge => [0.25, 0.4, 1.0, 1.0],
            PowerType::Disruption => [0.2, 0.9, 0.95, 1.0],
            PowerType::Break => [1.0, 0.3, 0.9, 1.0],
            PowerType::Player => [0.6, 0.6, 0.65, 1.0],
        }
    }

    /// Linear blend of `a` towards `b`
    pub fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        let t = t.clamp(0.0, 1.0);
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ]
    }

    pub fn with_alpha(c: [f32; 4], alpha: f32) -> [f32; 4] {
        [c[0], c[1], c[2], alpha]
    }
}
