//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No platform dependencies beyond the `Renderer` draw calls

pub mod asteroid;
pub mod collision;
pub mod entity;
pub mod field;
pub mod player;
pub mod registry;
pub mod shot;
pub mod state;
pub mod tick;

pub use asteroid::Asteroid;
pub use collision::{circles_overlap, out_of_bounds, wrap_position};
pub use entity::{Body, Draw, Entity, EntityId, Group, Update, UpdateCtx};
pub use field::{AsteroidField, Edge};
pub use player::{Player, Turn};
pub use registry::{Census, Registry, Spawn, SpawnQueue};
pub use shot::Shot;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
