//! The player's ship

use glam::Vec2;

use super::collision::wrap_position;
use super::entity::{Body, Draw, EntityId, Update, UpdateCtx};
use super::registry::Spawn;
use super::shot::Shot;
use super::state::GameEvent;
use crate::platform::{PLAYER_LINE_WIDTH, Renderer, colors};
use crate::tuning::Tuning;
use crate::{heading, normalize_degrees};

/// Which way to turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// The ship: turns, thrusts, fires, and has a limited number of lives
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    /// Heading in degrees, [0, 360)
    pub rotation: f32,
    /// Seconds until the next shot is allowed
    pub shot_cooldown: f32,
    pub lives: u8,
    /// Seconds of remaining collision immunity
    pub invulnerable: f32,
    turn_speed: f32,
    speed: f32,
    shoot_cooldown: f32,
    invulnerable_time: f32,
}

impl Player {
    pub fn new(position: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(position, tuning.player_radius),
            rotation: 0.0,
            shot_cooldown: 0.0,
            lives: tuning.player_lives,
            invulnerable: 0.0,
            turn_speed: tuning.player_turn_speed,
            speed: tuning.player_speed,
            shoot_cooldown: tuning.player_shoot_cooldown,
            invulnerable_time: tuning.player_invulnerable_time,
        }
    }

    /// Create the ship at screen center and register it
    pub fn spawn(registry: &mut impl Spawn, tuning: &Tuning) -> EntityId {
        let center = Vec2::new(tuning.screen_width / 2.0, tuning.screen_height / 2.0);
        registry.spawn(Self::new(center, tuning).into())
    }

    /// Unit vector the nose points along
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading(self.rotation)
    }

    /// Position of the nose (where shots appear)
    pub fn nose(&self) -> Vec2 {
        self.body.position + self.forward() * self.body.radius
    }

    /// Ship outline: nose and two rear corners
    pub fn triangle(&self) -> [Vec2; 3] {
        let forward = self.forward();
        let right = heading(self.rotation + 90.0) * self.body.radius / 1.5;
        let a = self.body.position + forward * self.body.radius;
        let b = self.body.position - forward * self.body.radius - right;
        let c = self.body.position - forward * self.body.radius + right;
        [a, b, c]
    }

    pub fn rotate(&mut self, direction: Turn, dt: f32) {
        let delta = self.turn_speed * dt;
        let rotation = match direction {
            Turn::Left => self.rotation - delta,
            Turn::Right => self.rotation + delta,
        };
        self.rotation = normalize_degrees(rotation);
    }

    /// Translate along the heading; negative `dt` backs up
    pub fn r#move(&mut self, dt: f32, screen: Vec2) {
        self.body.position += self.forward() * self.speed * dt;
        self.body.position = wrap_position(self.body.position, screen.x, screen.y);
    }

    /// Fire if the cooldown allows; returns the new shot's id
    pub fn shoot(&mut self, registry: &mut impl Spawn, tuning: &Tuning) -> Option<EntityId> {
        if self.shot_cooldown > 0.0 {
            return None;
        }
        self.shot_cooldown = self.shoot_cooldown;
        let nose = self.nose();
        let id = registry.spawn(Shot::new(nose, self.rotation, tuning).into());
        log::debug!("Player shot at {} with rotation {:.1}", nose, self.rotation);
        Some(id)
    }

    /// Circle overlap, except while invulnerable
    pub fn collide(&self, other: &Body) -> bool {
        if self.invulnerable > 0.0 {
            return false;
        }
        self.body.collides(other)
    }

    /// Take a hit; returns true when no lives remain
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable = self.invulnerable_time;
        if self.lives == 0 {
            self.body.kill();
            true
        } else {
            false
        }
    }

    /// Count down cooldown and invulnerability timers
    fn tick_timers(&mut self, dt: f32) {
        if self.shot_cooldown > 0.0 {
            self.shot_cooldown = (self.shot_cooldown - dt).max(0.0);
        }
        if self.invulnerable > 0.0 {
            self.invulnerable = (self.invulnerable - dt).max(0.0);
        }
    }
}

impl Update for Player {
    fn update(&mut self, dt: f32, ctx: &mut UpdateCtx<'_>) {
        self.tick_timers(dt);

        let input = ctx.input;
        let screen = Vec2::new(ctx.tuning.screen_width, ctx.tuning.screen_height);
        if input.rotate_left {
            self.rotate(Turn::Left, dt);
        }
        if input.rotate_right {
            self.rotate(Turn::Right, dt);
        }
        if input.thrust {
            self.r#move(dt, screen);
        }
        if input.reverse {
            self.r#move(-dt, screen);
        }
        if input.fire && self.shoot(&mut *ctx.spawns, ctx.tuning).is_some() {
            ctx.events.push(GameEvent::ShotFired);
        }
    }
}

impl Draw for Player {
    fn draw(&self, renderer: &mut dyn Renderer) {
        let color = if self.invulnerable > 0.0 {
            colors::PLAYER_BLINK
        } else {
            colors::PLAYER
        };
        renderer.draw_polygon(color, &self.triangle(), PLAYER_LINE_WIDTH);
    }
}
