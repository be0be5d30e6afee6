//! Windowless collaborators
//!
//! Used by the native attract-mode runner and by tests: a renderer that
//! only counts draw calls, a scripted keyboard and a clock that never
//! sleeps.

use std::collections::VecDeque;

use glam::Vec2;

use super::{Clock, Color, Hud, InputEvent, InputSource, Key, Renderer};

/// Renderer that records what would have been drawn
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub clears: u64,
    pub circles: u64,
    pub polygons: u64,
    pub overlays: u64,
    pub presents: u64,
    pub last_hud: Option<Hud>,
    /// Calls since the last `clear`, in order
    pub frame_log: Vec<&'static str>,
}

impl Renderer for HeadlessRenderer {
    fn clear(&mut self) {
        self.clears += 1;
        self.frame_log.clear();
    }

    fn draw_circle(&mut self, _color: Color, _center: Vec2, radius: f32) {
        debug_assert!(radius > 0.0);
        self.circles += 1;
        self.frame_log.push("circle");
    }

    fn draw_polygon(&mut self, _color: Color, points: &[Vec2], _line_width: f32) {
        debug_assert!(points.len() >= 3);
        self.polygons += 1;
        self.frame_log.push("polygon");
    }

    fn draw_overlay(&mut self, hud: &Hud) {
        self.overlays += 1;
        self.last_hud = Some(*hud);
        self.frame_log.push("overlay");
    }

    fn present(&mut self) {
        self.presents += 1;
        self.frame_log.push("present");
    }
}

/// Keyboard driven by a looping script
///
/// The script is a list of `(frames, held keys)` segments played in a
/// cycle, one frame per `poll_events` call.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: Vec<(u32, Vec<Key>)>,
    pending: VecDeque<InputEvent>,
    polls: u64,
    /// Request quit once this many frames have been polled
    frame_budget: Option<u64>,
    /// Press restart every N frames (only acted on at the game-over prompt)
    restart_every: Option<u64>,
}

impl ScriptedInput {
    /// Hold the same keys forever
    pub fn holding(keys: &[Key]) -> Self {
        Self::with_script(vec![(1, keys.to_vec())])
    }

    pub fn with_script(script: Vec<(u32, Vec<Key>)>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    pub fn with_restart_every(mut self, frames: u64) -> Self {
        self.restart_every = Some(frames).filter(|&n| n > 0);
        self
    }

    /// Queue a key press for the next poll
    pub fn press(&mut self, key: Key) {
        self.pending.push_back(InputEvent::KeyPressed(key));
    }

    /// Frames polled so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    fn current_keys(&self) -> &[Key] {
        let cycle: u64 = self.script.iter().map(|(n, _)| u64::from(*n)).sum();
        if cycle == 0 {
            return &[];
        }
        let mut t = self.polls.saturating_sub(1) % cycle;
        for (frames, keys) in &self.script {
            let frames = u64::from(*frames);
            if t < frames {
                return keys;
            }
            t -= frames;
        }
        &[]
    }
}

impl InputSource for ScriptedInput {
    fn is_held(&self, key: Key) -> bool {
        self.current_keys().contains(&key)
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.polls += 1;
        let mut events: Vec<InputEvent> = self.pending.drain(..).collect();
        if self.restart_every.is_some_and(|n| self.polls % n == 0) {
            events.push(InputEvent::KeyPressed(Key::Restart));
        }
        if self.frame_budget.is_some_and(|budget| self.polls > budget) {
            events.push(InputEvent::QuitRequested);
        }
        events
    }
}

/// Clock that reports a fixed step without waiting
#[derive(Debug, Default)]
pub struct FixedStepClock {
    /// Milliseconds per tick; `None` follows the requested frame rate
    step_ms: Option<u32>,
    pub elapsed_ms: u64,
}

impl FixedStepClock {
    pub fn new(step_ms: u32) -> Self {
        Self {
            step_ms: Some(step_ms),
            elapsed_ms: 0,
        }
    }
}

impl Clock for FixedStepClock {
    fn tick(&mut self, target_fps: u32) -> u32 {
        let ms = self.step_ms.unwrap_or(1000 / target_fps.max(1));
        self.elapsed_ms += u64::from(ms);
        ms
    }
}
