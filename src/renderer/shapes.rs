//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::platform::Color;

/// Segments for a circle of the given radius (more for bigger rocks)
pub fn circle_segments(radius: f32) -> u32 {
    (radius * 0.75).clamp(12.0, 64.0) as u32
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
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

/// Generate vertices for a closed polygon outline
///
/// Each edge becomes a quad `line_width` wide, centered on the edge.
pub fn polygon_outline(points: &[Vec2], color: Color, line_width: f32) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let half = line_width / 2.0;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for (i, &p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;
        // Extend past the corners so joints don't leave notches
        let p1 = p1 - dir * half;
        let p2 = p2 + dir * half;

        let a = p1 + perp;
        let b = p1 - perp;
        let c = p2 + perp;
        let d = p2 - perp;

        // Two triangles
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(c.x, c.y, color));

        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(d.x, d.y, color));
    }

    vertices
}
