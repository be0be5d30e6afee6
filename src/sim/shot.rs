//! Projectiles fired by the player

use glam::Vec2;

use super::collision::out_of_bounds;
use super::entity::{Body, Draw, Update, UpdateCtx};
use crate::heading;
use crate::platform::{Renderer, colors};
use crate::tuning::Tuning;

/// A shot travelling in a straight line; dies when it leaves the screen
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub body: Body,
    /// Heading in degrees at the moment it was fired
    pub rotation: f32,
}

impl Shot {
    pub fn new(position: Vec2, rotation: f32, tuning: &Tuning) -> Self {
        let velocity = heading(rotation) * tuning.player_shot_speed;
        Self {
            body: Body::new(position, tuning.shot_radius).with_velocity(velocity),
            rotation,
        }
    }
}

impl Update for Shot {
    fn update(&mut self, dt: f32, ctx: &mut UpdateCtx<'_>) {
        self.body.position += self.body.velocity * dt;
        if out_of_bounds(
            self.body.position,
            ctx.tuning.screen_width,
            ctx.tuning.screen_height,
        ) {
            self.body.kill();
        }
    }
}

impl Draw for Shot {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_circle(colors::SHOT, self.body.position, self.body.radius);
    }
}
