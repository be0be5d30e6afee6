//! Session driver
//!
//! Owns the [`GameState`] and the platform collaborators, and runs one
//! frame at a time: events, tick, sounds, draw. Frontends either call
//! [`GameLoop::frame`] from their own scheduler (browser animation frames)
//! or hand a [`Clock`] to [`GameLoop::run`].

use crate::consts::MAX_FRAME_DT;
use crate::platform::{AudioSink, Clock, Hud, InputEvent, InputSource, Key, Renderer, SoundEffect};
use crate::sim::{Draw, GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Running totals for one process lifetime (survive restarts)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub shots_fired: u32,
    pub asteroids_destroyed: u32,
    pub lives_lost: u32,
    pub games_over: u32,
    pub restarts: u32,
}

/// A game session wired to its renderer, input and audio
pub struct GameLoop<R: Renderer, I: InputSource, A: AudioSink> {
    pub state: GameState,
    renderer: R,
    input: I,
    audio: A,
    stats: SessionStats,
}

impl<R: Renderer, I: InputSource, A: AudioSink> GameLoop<R, I, A> {
    pub fn new(seed: u64, tuning: Tuning, renderer: R, input: I, audio: A) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            renderer,
            input,
            audio,
            stats: SessionStats::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// One iteration of the loop for the current phase
    ///
    /// Window close quits from any phase; R and Q are only read at the
    /// game-over prompt.
    pub fn frame(&mut self, dt: f32) -> GamePhase {
        for event in self.input.poll_events() {
            match (event, self.state.phase) {
                (InputEvent::QuitRequested, _)
                | (InputEvent::KeyPressed(Key::Quit), GamePhase::GameOver) => {
                    log::info!("Quit requested");
                    self.state.phase = GamePhase::Exiting;
                }
                (InputEvent::KeyPressed(Key::Restart), GamePhase::GameOver) => {
                    self.state.restart();
                    self.stats.restarts += 1;
                }
                _ => {}
            }
        }

        match self.state.phase {
            GamePhase::Running => {
                let input = TickInput::from_source(&self.input);
                tick(&mut self.state, &input, dt);
                self.dispatch_events();
            }
            GamePhase::GameOver => {}
            GamePhase::Exiting => return GamePhase::Exiting,
        }

        self.draw();
        self.stats.frames += 1;
        self.state.phase
    }

    /// Drive frames from `clock` until the session exits
    pub fn run<C: Clock>(&mut self, clock: &mut C) -> SessionStats {
        let target_fps = self.state.tuning.target_fps;
        loop {
            let elapsed_ms = clock.tick(target_fps);
            let dt = (elapsed_ms as f32 / 1000.0).min(MAX_FRAME_DT);
            if self.frame(dt) == GamePhase::Exiting {
                break;
            }
        }
        log::info!("Session ended after {} frames", self.stats.frames);
        self.stats
    }

    /// Turn this tick's events into sounds and stats
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            let effect = match event {
                GameEvent::ShotFired => {
                    self.stats.shots_fired += 1;
                    SoundEffect::Laser
                }
                GameEvent::AsteroidDestroyed { .. } => {
                    self.stats.asteroids_destroyed += 1;
                    SoundEffect::RockBreak
                }
                GameEvent::PlayerHit { .. } => {
                    self.stats.lives_lost += 1;
                    SoundEffect::PlayerDeath
                }
                GameEvent::GameOver => {
                    self.stats.games_over += 1;
                    SoundEffect::GameOver
                }
            };
            self.audio.play(effect);
        }
    }

    /// Entities in id order, then the HUD on top
    fn draw(&mut self) {
        self.renderer.clear();
        for entity in self.state.registry.drawable() {
            entity.draw(&mut self.renderer);
        }
        self.renderer.draw_overlay(&Hud {
            lives: self.state.lives(),
            game_over: self.state.phase == GamePhase::GameOver,
        });
        self.renderer.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{FixedStepClock, HeadlessRenderer, ScriptedInput};
    use crate::sim::Asteroid;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct RecordingAudio(Vec<SoundEffect>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    type TestLoop = GameLoop<HeadlessRenderer, ScriptedInput, RecordingAudio>;

    fn game(tuning: Tuning, input: ScriptedInput) -> TestLoop {
        let mut game = GameLoop::new(
            5,
            tuning,
            HeadlessRenderer::default(),
            input,
            RecordingAudio::default(),
        );
        game.state.field.time_until_spawn = 1.0e6;
        game
    }

    /// Drop a rock on the ship so the next frame costs a life
    fn ram_player(game: &mut TestLoop) {
        let center = game.state.player().map(|p| p.body.position).unwrap_or_default();
        Asteroid::spawn(&mut game.state.registry, center, 40.0, Vec2::ZERO);
        game.state.registry.flush();
    }

    #[test]
    fn test_running_frame_draws_entities_then_overlay() {
        let mut game = game(Tuning::default(), ScriptedInput::default());
        Asteroid::spawn(&mut game.state.registry, Vec2::new(50.0, 50.0), 20.0, Vec2::X);
        game.state.registry.flush();

        assert_eq!(game.frame(DT), GamePhase::Running);
        let r = game.renderer();
        assert_eq!(r.clears, 1);
        assert_eq!(r.circles, 1);
        assert_eq!(r.polygons, 1);
        assert_eq!(r.presents, 1);
        assert_eq!(
            r.last_hud,
            Some(Hud {
                lives: 3,
                game_over: false
            })
        );
        assert_eq!(r.frame_log, vec!["polygon", "circle", "overlay", "present"]);
    }

    #[test]
    fn test_fire_plays_laser() {
        let input = ScriptedInput::holding(&[Key::Fire]);
        let mut game = game(Tuning::default(), input);
        game.frame(DT);
        assert_eq!(game.audio_mut().0, vec![SoundEffect::Laser]);
        assert_eq!(game.stats().shots_fired, 1);
    }

    #[test]
    fn test_game_over_then_restart() {
        let tuning = Tuning {
            player_lives: 1,
            ..Tuning::default()
        };
        let mut game = game(tuning, ScriptedInput::default());
        ram_player(&mut game);

        assert_eq!(game.frame(DT), GamePhase::GameOver);
        assert_eq!(
            game.audio_mut().0,
            vec![SoundEffect::PlayerDeath, SoundEffect::GameOver]
        );
        assert_eq!(
            game.renderer().last_hud,
            Some(Hud {
                lives: 0,
                game_over: true
            })
        );

        // Prompt keeps polling without ticking
        let ticks = game.state.time_ticks;
        assert_eq!(game.frame(DT), GamePhase::GameOver);
        assert_eq!(game.state.time_ticks, ticks);
        assert_eq!(game.audio_mut().0.len(), 2);

        game.input_mut().press(Key::Restart);
        assert_eq!(game.frame(DT), GamePhase::Running);
        assert_eq!(game.state.lives(), 1);
        assert_eq!(game.state.registry.asteroids().count(), 0);
        assert_eq!(game.stats().restarts, 1);
    }

    #[test]
    fn test_restart_and_quit_keys_ignored_while_running() {
        let mut game = game(Tuning::default(), ScriptedInput::default());
        game.input_mut().press(Key::Restart);
        game.input_mut().press(Key::Quit);
        assert_eq!(game.frame(DT), GamePhase::Running);
        assert_eq!(game.stats().restarts, 0);
    }

    #[test]
    fn test_quit_from_game_over_prompt() {
        let tuning = Tuning {
            player_lives: 1,
            ..Tuning::default()
        };
        let mut game = game(tuning, ScriptedInput::default());
        ram_player(&mut game);
        game.frame(DT);

        game.input_mut().press(Key::Quit);
        assert_eq!(game.frame(DT), GamePhase::Exiting);
    }

    #[test]
    fn test_window_close_exits_running_session() {
        let mut game = game(Tuning::default(), ScriptedInput::default().with_frame_budget(3));
        let stats = game.run(&mut FixedStepClock::default());
        assert_eq!(game.phase(), GamePhase::Exiting);
        assert_eq!(stats.frames, 3);
    }

    #[test]
    fn test_run_clamps_long_frames() {
        let input = ScriptedInput::holding(&[Key::Thrust]).with_frame_budget(1);
        let mut game = game(Tuning::default(), input);
        let start = game.state.player().map(|p| p.body.position).unwrap_or_default();
        game.run(&mut FixedStepClock::new(5_000));
        let end = game.state.player().map(|p| p.body.position).unwrap_or_default();
        // 200 px/s for at most MAX_FRAME_DT
        assert!((end - start).length() <= 200.0 * MAX_FRAME_DT + 1e-3);
    }
}
