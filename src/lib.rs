//! Asteroid Drift - A screen-wrapped asteroid field arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, registry, tick)
//! - `game_loop`: Session driver (Running / GameOver / Exiting)
//! - `platform`: Renderer, input, clock and audio interfaces
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game constants

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game_loop::GameLoop;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Frame rate the clock is capped at
    pub const TARGET_FPS: u32 = 60;
    /// Longest step a single frame may simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Degrees per second
    pub const PLAYER_TURN_SPEED: f32 = 300.0;
    /// Pixels per second along heading
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_SHOT_SPEED: f32 = 500.0;
    /// Seconds between shots
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;
    pub const PLAYER_LIVES: u8 = 3;
    /// Seconds of invulnerability after losing a life
    pub const PLAYER_INVULNERABLE_TIME: f32 = 2.0;

    pub const SHOT_RADIUS: f32 = 5.0;

    /// Asteroids at or below this radius do not split
    pub const ASTEROID_MIN_RADIUS: f32 = 10.0;
    /// Number of size tiers (small, medium, large); each tier doubles the radius
    pub const ASTEROID_KINDS: u32 = 3;
    /// Seconds between spawns
    pub const ASTEROID_SPAWN_INTERVAL: f32 = 0.8;
    pub const ASTEROID_SPAWN_SPEED_MIN: f32 = 40.0;
    pub const ASTEROID_SPAWN_SPEED_MAX: f32 = 100.0;
    /// Max random deviation (degrees) from the inward edge normal
    pub const ASTEROID_SPAWN_SPREAD: f32 = 30.0;

    /// Split angle range (degrees)
    pub const SPLIT_ANGLE_MIN: f32 = 20.0;
    pub const SPLIT_ANGLE_MAX: f32 = 50.0;
    /// Fragments move faster than their parent
    pub const SPLIT_SPEEDUP: f32 = 1.2;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit heading for a rotation in degrees (0° points along +y)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    rotate_degrees(Vec2::Y, rotation)
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed angle (degrees) that rotates `from` onto `to`
#[inline]
pub fn angle_between_degrees(from: Vec2, to: Vec2) -> f32 {
    from.angle_to(to).to_degrees()
}
