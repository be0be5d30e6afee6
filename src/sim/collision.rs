//! Collision detection and screen boundary policy
//!
//! Everything in the field is a circle, so a hit is simply
//! `distance(centers) < r1 + r2`.

use glam::Vec2;

/// Check whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Wrap a position that left the screen onto the opposite edge
///
/// Single edge substitution per axis, not a modulo: a position that
/// overshoots by more than a full screen is only moved to the far edge.
pub fn wrap_position(mut pos: Vec2, width: f32, height: f32) -> Vec2 {
    if pos.x < 0.0 {
        pos.x = width;
    } else if pos.x > width {
        pos.x = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = height;
    } else if pos.y > height {
        pos.y = 0.0;
    }
    pos
}

/// True if the position lies outside `[0, width] x [0, height]`
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height
}
