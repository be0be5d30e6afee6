//! Fixed timestep simulation tick
//!
//! Advances a running session by one frame: spawner, entity physics,
//! player and shot collisions, purge.

use super::entity::{Body, EntityId, Group};
use super::state::{GameEvent, GamePhase, GameState};
use crate::platform::{InputSource, Key};

/// Held controls for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Move forward along the heading
    pub thrust: bool,
    /// Move backward
    pub reverse: bool,
    pub fire: bool,
}

impl TickInput {
    /// Sample the held keys of an input source
    pub fn from_source(source: &impl InputSource) -> Self {
        Self {
            rotate_left: source.is_held(Key::RotateLeft),
            rotate_right: source.is_held(Key::RotateRight),
            thrust: source.is_held(Key::Thrust),
            reverse: source.is_held(Key::Reverse),
            fire: source.is_held(Key::Fire),
        }
    }
}

/// Advance the game state by one timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.time_ticks += 1;

    // Spawner, then every live entity. Shots fired here join before the
    // collision passes below.
    state
        .field
        .update(dt, &mut state.rng, &mut state.registry, &state.tuning);
    state
        .registry
        .update_all(dt, &state.tuning, input, &mut state.events);
    state.registry.flush();

    if collide_player(state) {
        return;
    }
    collide_shots(state);

    state.registry.purge();
    // Fragments become live now and are first tested next tick
    state.registry.flush();

    if state.time_ticks % 60 == 0 {
        log::trace!("tick {}: {:?}", state.time_ticks, state.registry.census());
    }
}

/// Snapshot of a live entity's body
fn live_body(state: &GameState, id: EntityId) -> Option<Body> {
    state
        .registry
        .get(id)
        .filter(|e| e.is_alive())
        .map(|e| e.body().clone())
}

/// Player vs. every asteroid; returns true on game over
fn collide_player(state: &mut GameState) -> bool {
    for rock_id in state.registry.ids_in(Group::Asteroids) {
        let Some(rock) = live_body(state, rock_id) else {
            continue;
        };
        let Some(player) = state.registry.player_mut(state.player_id) else {
            return false;
        };
        if !player.body.alive || !player.collide(&rock) {
            continue;
        }

        let game_over = player.lose_life();
        let lives_left = player.lives;
        state.events.push(GameEvent::PlayerHit { lives_left });
        if game_over {
            log::info!("Game over after {} ticks", state.time_ticks);
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
            return true;
        }
        log::debug!("Player hit, {lives_left} lives left");

        if let Some(fragments) = state
            .registry
            .destroy_asteroid(rock_id, &mut state.rng, &state.tuning)
        {
            state.events.push(GameEvent::AsteroidDestroyed {
                radius: rock.radius,
                fragments,
            });
        }
    }
    false
}

/// Every live shot against every live asteroid; one hit per shot
fn collide_shots(state: &mut GameState) {
    let rocks = state.registry.ids_in(Group::Asteroids);
    for shot_id in state.registry.ids_in(Group::Shots) {
        let Some(shot) = live_body(state, shot_id) else {
            continue;
        };
        for &rock_id in &rocks {
            let Some(rock) = live_body(state, rock_id) else {
                continue;
            };
            if !shot.collides(&rock) {
                continue;
            }

            if let Some(entity) = state.registry.get_mut(shot_id) {
                entity.body_mut().kill();
            }
            if let Some(fragments) = state
                .registry
                .destroy_asteroid(rock_id, &mut state.rng, &state.tuning)
            {
                log::debug!("Shot {shot_id:?} hit asteroid {rock_id:?}");
                state.events.push(GameEvent::AsteroidDestroyed {
                    radius: rock.radius,
                    fragments,
                });
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asteroid::Asteroid;
    use crate::sim::registry::Spawn;
    use crate::sim::shot::Shot;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Session with the spawner pushed far into the future
    fn quiet_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(7, tuning);
        state.field.time_until_spawn = 1.0e6;
        state
    }

    #[test]
    fn test_shot_splits_asteroid_end_to_end() {
        let mut state = quiet_state(Tuning::default());
        let rock = Asteroid::spawn(
            &mut state.registry,
            Vec2::new(100.0, 100.0),
            20.0,
            Vec2::new(10.0, 0.0),
        );
        let shot = state
            .registry
            .spawn(Shot::new(Vec2::new(100.0, 95.0), 0.0, &state.tuning).into());
        state.registry.flush();

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.registry.get(rock).is_none());
        assert!(state.registry.get(shot).is_none());
        let fragments: Vec<&Asteroid> = state.registry.asteroids().collect();
        assert_eq!(fragments.len(), 2);

        let parent_pos = Vec2::new(100.0 + 10.0 * DT, 100.0);
        let mut angles = Vec::new();
        for f in &fragments {
            assert_eq!(f.body.radius, 10.0);
            assert!((f.body.position - parent_pos).length() < 1e-4);
            assert!((f.body.velocity.length() - 12.0).abs() < 1e-3);
            angles.push(Vec2::X.angle_to(f.body.velocity).to_degrees());
        }
        // Mirror-image headings with |angle| in the split range
        assert!((angles[0] + angles[1]).abs() < 1e-3);
        let spread = angles[0].abs();
        assert!(spread >= 20.0 - 1e-3 && spread <= 50.0 + 1e-3, "split angle {spread}");

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::AsteroidDestroyed {
                radius: 20.0,
                fragments: 2
            }]
        );
    }

    #[test]
    fn test_smallest_asteroid_leaves_no_fragments() {
        let mut state = quiet_state(Tuning::default());
        Asteroid::spawn(&mut state.registry, Vec2::new(100.0, 100.0), 10.0, Vec2::ZERO);
        state
            .registry
            .spawn(Shot::new(Vec2::new(100.0, 100.0), 0.0, &state.tuning).into());
        state.registry.flush();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.registry.asteroids().count(), 0);
        assert_eq!(state.registry.shots().count(), 0);
    }

    #[test]
    fn test_shot_hits_at_most_one_asteroid() {
        let mut state = quiet_state(Tuning::default());
        Asteroid::spawn(&mut state.registry, Vec2::new(100.0, 100.0), 10.0, Vec2::ZERO);
        Asteroid::spawn(&mut state.registry, Vec2::new(104.0, 100.0), 10.0, Vec2::ZERO);
        state
            .registry
            .spawn(Shot::new(Vec2::new(102.0, 95.0), 0.0, &state.tuning).into());
        state.registry.flush();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.registry.asteroids().count(), 1);
        assert_eq!(state.registry.shots().count(), 0);
    }

    #[test]
    fn test_fresh_shot_collides_same_tick() {
        let mut state = quiet_state(Tuning::default());
        // Rock parked just past the nose, out of the ship's reach
        Asteroid::spawn(&mut state.registry, Vec2::new(640.0, 392.0), 10.0, Vec2::ZERO);
        state.registry.flush();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);

        assert_eq!(state.registry.asteroids().count(), 0);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::ShotFired);
        assert!(events.contains(&GameEvent::AsteroidDestroyed {
            radius: 10.0,
            fragments: 0
        }));
    }

    #[test]
    fn test_running_to_game_over_with_one_life() {
        let tuning = Tuning {
            player_lives: 1,
            ..Tuning::default()
        };
        let mut state = quiet_state(tuning);
        Asteroid::spawn(&mut state.registry, Vec2::new(640.0, 360.0), 40.0, Vec2::ZERO);
        state.registry.flush();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives(), 0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PlayerHit { lives_left: 0 }, GameEvent::GameOver]
        );

        // Further ticks are no-ops
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_hit_destroys_asteroid_and_grants_invulnerability() {
        let mut state = quiet_state(Tuning::default());
        Asteroid::spawn(&mut state.registry, Vec2::new(640.0, 360.0), 40.0, Vec2::ZERO);
        state.registry.flush();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives(), 2);
        // Parent gone, two fragments sitting on the ship
        assert_eq!(state.registry.asteroids().count(), 2);

        // Fragments overlap the ship but it is immune for now
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives(), 2);
    }

    #[test]
    fn test_spawner_runs_during_tick() {
        let mut state = GameState::new(3, Tuning::default());
        let ticks = (state.tuning.asteroid_spawn_interval / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.registry.asteroids().count() >= 1);
    }

    #[test]
    fn test_from_source_reads_held_keys() {
        struct Held(Vec<Key>);
        impl InputSource for Held {
            fn is_held(&self, key: Key) -> bool {
                self.0.contains(&key)
            }
            fn poll_events(&mut self) -> Vec<crate::platform::InputEvent> {
                Vec::new()
            }
        }

        let input = TickInput::from_source(&Held(vec![Key::Thrust, Key::Fire]));
        assert_eq!(
            input,
            TickInput {
                thrust: true,
                fire: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            TickInput {
                rotate_left: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                thrust: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, DT);
            tick(&mut state2, input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.registry.census(), state2.registry.census());
        let rocks1: Vec<_> = state1.registry.asteroids().map(|a| a.body.clone()).collect();
        let rocks2: Vec<_> = state2.registry.asteroids().map(|a| a.body.clone()).collect();
        assert_eq!(rocks1, rocks2);
    }
}
