//! Game state and core simulation types
//!
//! Everything a session needs to advance deterministically lives here:
//! the entity registry, the spawner, the player handle and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::EntityId;
use super::field::AsteroidField;
use super::player::Player;
use super::registry::Registry;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Out of lives, waiting for restart or quit
    GameOver,
    /// Quit requested; the frontend should stop calling in
    Exiting,
}

/// Something noteworthy that happened during a tick
///
/// Drained by the session driver to trigger sounds and logs.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired,
    AsteroidDestroyed { radius: f32, fragments: usize },
    PlayerHit { lives_left: u8 },
    GameOver,
}

/// Complete state of one game session
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub registry: Registry,
    pub field: AsteroidField,
    /// Handle of the singleton ship
    pub player_id: EntityId,
    pub rng: Pcg32,
    /// Simulation tick counter (since the last restart)
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the ship at screen center
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut registry = Registry::new();
        let player_id = Player::spawn(&mut registry, &tuning);
        registry.flush();
        let field = AsteroidField::new(&tuning);

        log::info!("New session (seed {seed})");
        Self {
            seed,
            phase: GamePhase::Running,
            registry,
            field,
            player_id,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Reset player and asteroid field; the RNG keeps its stream
    pub fn restart(&mut self) {
        self.registry.clear();
        self.player_id = Player::spawn(&mut self.registry, &self.tuning);
        self.registry.flush();
        self.field = AsteroidField::new(&self.tuning);
        self.phase = GamePhase::Running;
        self.time_ticks = 0;
        self.events.clear();
        log::debug!("Session restarted");
    }

    pub fn player(&self) -> Option<&Player> {
        self.registry.player(self.player_id)
    }

    /// Lives left (0 once the ship is gone)
    pub fn lives(&self) -> u8 {
        self.player().map_or(0, |p| p.lives)
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
