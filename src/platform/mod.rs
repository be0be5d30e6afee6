//! Platform abstraction layer
//!
//! The simulation only talks to the outside world through these traits:
//! - `Renderer`: shapes, HUD overlay, present
//! - `InputSource`: held keys and discrete events
//! - `Clock`: frame pacing
//! - `AudioSink`: fire-and-forget sound effects

pub mod headless;

use glam::Vec2;

/// RGBA color, components in 0.0 - 1.0
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const PLAYER: Color = [1.0, 1.0, 1.0, 1.0];
    /// Player outline while invulnerable
    pub const PLAYER_BLINK: Color = [1.0, 1.0, 1.0, 0.35];
    pub const ASTEROID: Color = [0.65, 0.16, 0.16, 1.0];
    pub const SHOT: Color = [1.0, 1.0, 0.0, 1.0];
}

/// Width of the ship's outline in pixels
pub const PLAYER_LINE_WIDTH: f32 = 2.0;

/// What the HUD shows on top of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub lives: u8,
    /// Show the "GAME OVER - R to restart, Q to quit" prompt
    pub game_over: bool,
}

/// Drawing surface supplied by the frontend
pub trait Renderer {
    /// Start a new frame (clears to background)
    fn clear(&mut self);
    /// Filled circle
    fn draw_circle(&mut self, color: Color, center: Vec2, radius: f32);
    /// Closed polygon outline
    fn draw_polygon(&mut self, color: Color, points: &[Vec2], line_width: f32);
    /// Lives counter / game-over prompt, drawn over everything else
    fn draw_overlay(&mut self, hud: &Hud);
    /// Flip the frame to the screen
    fn present(&mut self);
}

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    RotateLeft,
    RotateRight,
    Thrust,
    Reverse,
    Fire,
    Restart,
    Quit,
}

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed / process asked to exit
    QuitRequested,
    /// Key went down this frame
    KeyPressed(Key),
}

/// Keyboard (or script) state
pub trait InputSource {
    /// Is the key currently held down
    fn is_held(&self, key: Key) -> bool;
    /// Drain events that arrived since the last call
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Frame pacing
pub trait Clock {
    /// Wait for the next frame at `target_fps` and return elapsed milliseconds
    fn tick(&mut self, target_fps: u32) -> u32;
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a shot
    Laser,
    /// Asteroid destroyed or split
    RockBreak,
    /// Player lost a life
    PlayerDeath,
    /// Out of lives
    GameOver,
}

/// Optional audio output
///
/// Implementations that failed to initialize stay silent for the whole
/// session; `play` never fails.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Audio sink that never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

impl<A: AudioSink> AudioSink for Option<A> {
    fn play(&mut self, effect: SoundEffect) {
        if let Some(sink) = self {
            sink.play(effect);
        }
    }
}
