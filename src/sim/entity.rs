//! Entity model shared by every simulated object
//!
//! Each variant carries a [`Body`] (the movable circle) plus its own state.
//! `update` and `draw` are dispatched through the [`Update`] and [`Draw`]
//! capabilities rather than a class hierarchy.

use glam::Vec2;

use super::asteroid::Asteroid;
use super::collision::circles_overlap;
use super::player::Player;
use super::registry::SpawnQueue;
use super::shot::Shot;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::platform::Renderer;
use crate::tuning::Tuning;

/// Stable entity handle (monotonically increasing, never reused in a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// Registry collections an entity can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Updatable,
    Drawable,
    Asteroids,
    Shots,
}

/// A movable circle: the common part of every entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "entity radius must be positive");
        Self {
            position,
            radius,
            velocity: Vec2::ZERO,
            alive: true,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Circle overlap test (symmetric)
    #[inline]
    pub fn collides(&self, other: &Body) -> bool {
        circles_overlap(self.position, self.radius, other.position, other.radius)
    }

    /// Mark for removal at the end of the tick
    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Everything an entity may touch while advancing
pub struct UpdateCtx<'a> {
    pub tuning: &'a Tuning,
    pub input: &'a TickInput,
    /// Entities created during the pass join the registry after it
    pub spawns: &'a mut SpawnQueue,
    pub events: &'a mut Vec<GameEvent>,
}

/// Per-tick physics
pub trait Update {
    fn update(&mut self, dt: f32, ctx: &mut UpdateCtx<'_>);
}

/// Emits draw calls for the current state
pub trait Draw {
    fn draw(&self, renderer: &mut dyn Renderer);
}

/// Any simulated object
#[derive(Debug, Clone)]
pub enum Entity {
    Player(Player),
    Asteroid(Asteroid),
    Shot(Shot),
}

impl Entity {
    pub fn body(&self) -> &Body {
        match self {
            Entity::Player(p) => &p.body,
            Entity::Asteroid(a) => &a.body,
            Entity::Shot(s) => &s.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Entity::Player(p) => &mut p.body,
            Entity::Asteroid(a) => &mut a.body,
            Entity::Shot(s) => &mut s.body,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body().alive
    }

    /// Collections this variant is registered into on construction
    pub fn groups(&self) -> &'static [Group] {
        match self {
            Entity::Player(_) => &[Group::Updatable, Group::Drawable],
            Entity::Asteroid(_) => &[Group::Updatable, Group::Drawable, Group::Asteroids],
            Entity::Shot(_) => &[Group::Updatable, Group::Drawable, Group::Shots],
        }
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match self {
            Entity::Asteroid(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_asteroid_mut(&mut self) -> Option<&mut Asteroid> {
        match self {
            Entity::Asteroid(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_shot(&self) -> Option<&Shot> {
        match self {
            Entity::Shot(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }
}

impl Update for Entity {
    fn update(&mut self, dt: f32, ctx: &mut UpdateCtx<'_>) {
        match self {
            Entity::Player(p) => p.update(dt, ctx),
            Entity::Asteroid(a) => a.update(dt, ctx),
            Entity::Shot(s) => s.update(dt, ctx),
        }
    }
}

impl Draw for Entity {
    fn draw(&self, renderer: &mut dyn Renderer) {
        match self {
            Entity::Player(p) => p.draw(renderer),
            Entity::Asteroid(a) => a.draw(renderer),
            Entity::Shot(s) => s.draw(renderer),
        }
    }
}

impl From<Player> for Entity {
    fn from(p: Player) -> Self {
        Entity::Player(p)
    }
}

impl From<Asteroid> for Entity {
    fn from(a: Asteroid) -> Self {
        Entity::Asteroid(a)
    }
}

impl From<Shot> for Entity {
    fn from(s: Shot) -> Self {
        Entity::Shot(s)
    }
}
