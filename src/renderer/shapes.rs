//! Shape generation for 2D primitives
//!
//! All shapes are triangle lists in window coordinates (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::Rect;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, b, color),
    ]
}

/// Rectangle with a lighter top edge and darker bottom edge
pub fn bevel_rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let edge = (r.height * 0.2).max(1.0);
    let light = colors::mix(color, colors::FLASH, 0.4);
    let dark = colors::mix(color, [0.0, 0.0, 0.0, color[3]], 0.4);

    let mut vertices = rect(r, color);
    vertices.extend(rect(Rect::new(r.x, r.y, r.width, edge), light));
    vertices.extend(rect(
        Rect::new(r.x, r.bottom() - edge, r.width, edge),
        dark,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Capsule (rectangle with round ends), used for pills and the paddle
pub fn capsule(r: Rect, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let radius = r.height / 2.0;
    if r.width <= r.height {
        return circle(r.center(), radius, color, segments);
    }
    let mut vertices = rect(
        Rect::new(r.x + radius, r.y, r.width - 2.0 * radius, r.height),
        color,
    );
    vertices.extend(circle(
        Vec2::new(r.left() + radius, r.y + radius),
        radius,
        color,
        segments,
    ));
    vertices.extend(circle(
        Vec2::new(r.right() - radius, r.y + radius),
        radius,
        color,
        segments,
    ));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let vertices = rect(Rect::new(10.0, 20.0, 30.0, 40.0), colors::BALL);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(100.0, 100.0);
        let vertices = circle(center, 8.0, colors::BALL, 16);
        assert_eq!(vertices.len(), 48);
        for v in vertices {
            let p = Vec2::from(v.position);
            assert!(p.distance(center) <= 8.0 + 1e-3);
        }
    }

    #[test]
    fn test_capsule_degenerates_to_circle() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(capsule(r, colors::BALL, 8).len(), 24);
        let r = Rect::new(0.0, 0.0, 40.0, 10.0);
        assert_eq!(capsule(r, colors::BALL, 8).len(), 6 + 48);
    }
}
