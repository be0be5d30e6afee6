//! Drifting asteroids and the split rule

use glam::Vec2;
use rand::Rng;

use super::collision::wrap_position;
use super::entity::{Body, Draw, EntityId, Update, UpdateCtx};
use super::registry::Spawn;
use crate::platform::{Renderer, colors};
use crate::rotate_degrees;
use crate::tuning::Tuning;

/// A drifting, screen-wrapping rock
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub body: Body,
}

impl Asteroid {
    pub fn new(position: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            body: Body::new(position, radius).with_velocity(velocity),
        }
    }

    /// Create an asteroid and register it
    pub fn spawn(
        registry: &mut impl Spawn,
        position: Vec2,
        radius: f32,
        velocity: Vec2,
    ) -> EntityId {
        registry.spawn(Self::new(position, radius, velocity).into())
    }

    /// The two fragments this asteroid breaks into for a given split angle
    ///
    /// Returns `None` at or below the minimum radius. Fragments sit at the
    /// parent's position with half its radius (floored) and the parent's
    /// velocity rotated by `+angle` / `-angle` and sped up.
    pub fn split(&self, angle: f32, tuning: &Tuning) -> Option<[Asteroid; 2]> {
        if self.body.radius <= tuning.asteroid_min_radius {
            return None;
        }
        let radius = (self.body.radius / 2.0).floor();
        let pos = self.body.position;
        let vel = self.body.velocity;
        Some([
            Asteroid::new(pos, radius, rotate_degrees(vel, angle) * tuning.split_speedup),
            Asteroid::new(pos, radius, rotate_degrees(vel, -angle) * tuning.split_speedup),
        ])
    }

    /// Kill the asteroid and register its fragments (if any)
    ///
    /// Returns the number of fragments created (0 or 2).
    pub fn destroy(
        &mut self,
        rng: &mut impl Rng,
        registry: &mut impl Spawn,
        tuning: &Tuning,
    ) -> usize {
        self.body.kill();
        let angle = rng.random_range(tuning.split_angle_min..=tuning.split_angle_max);
        let Some(fragments) = self.split(angle, tuning) else {
            return 0;
        };
        log::debug!(
            "Split asteroid at {} into two with radius {} (angle {:.1})",
            self.body.position,
            fragments[0].body.radius,
            angle
        );
        let count = fragments.len();
        for fragment in fragments {
            registry.spawn(fragment.into());
        }
        count
    }
}

impl Update for Asteroid {
    fn update(&mut self, dt: f32, ctx: &mut UpdateCtx<'_>) {
        self.body.position += self.body.velocity * dt;
        self.body.position = wrap_position(
            self.body.position,
            ctx.tuning.screen_width,
            ctx.tuning.screen_height,
        );
    }
}

impl Draw for Asteroid {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_circle(colors::ASTEROID, self.body.position, self.body.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle_between_degrees;
    use crate::sim::registry::{Registry, SpawnQueue};
    use crate::sim::tick::TickInput;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    fn advance(rock: &mut Asteroid, dt: f32, tuning: &Tuning) {
        let input = TickInput::default();
        let mut spawns = SpawnQueue::default();
        let mut events = Vec::new();
        let mut ctx = UpdateCtx {
            tuning,
            input: &input,
            spawns: &mut spawns,
            events: &mut events,
        };
        rock.update(dt, &mut ctx);
    }

    #[test]
    fn test_drift_wraps_each_edge() {
        let t = tuning();
        let (w, h) = (t.screen_width, t.screen_height);
        let cases = [
            (Vec2::new(1.0, 100.0), Vec2::new(-100.0, 0.0), Vec2::new(w, 100.0)),
            (Vec2::new(w - 1.0, 100.0), Vec2::new(100.0, 0.0), Vec2::new(0.0, 100.0)),
            (Vec2::new(200.0, 1.0), Vec2::new(0.0, -100.0), Vec2::new(200.0, h)),
            (Vec2::new(200.0, h - 1.0), Vec2::new(0.0, 100.0), Vec2::new(200.0, 0.0)),
        ];
        for (start, velocity, expected) in cases {
            let mut rock = Asteroid::new(start, 20.0, velocity);
            advance(&mut rock, 0.1, &t);
            assert_eq!(rock.body.position, expected, "from {start} moving {velocity}");
            assert_eq!(rock.body.velocity, velocity);
            assert!(rock.body.alive);
        }
    }

    #[test]
    fn test_drift_inside_screen_does_not_wrap() {
        let t = tuning();
        let mut rock = Asteroid::new(Vec2::new(100.0, 100.0), 20.0, Vec2::new(30.0, -10.0));
        advance(&mut rock, 0.5, &t);
        assert!((rock.body.position - Vec2::new(115.0, 95.0)).length() < 1e-4);
    }

    #[test]
    fn test_large_overshoot_only_substitutes_edge() {
        let t = tuning();
        // Several screens past the left and bottom edges in one step
        let mut rock = Asteroid::new(Vec2::new(10.0, 10.0), 20.0, Vec2::new(-5000.0, 5000.0));
        advance(&mut rock, 1.0, &t);
        assert_eq!(rock.body.position, Vec2::new(t.screen_width, 0.0));
    }

    #[test]
    fn test_split_at_minimum_produces_nothing() {
        let t = tuning();
        let a = Asteroid::new(Vec2::new(100.0, 100.0), t.asteroid_min_radius, Vec2::X);
        assert!(a.split(30.0, &t).is_none());
    }

    #[test]
    fn test_split_halves_radius_and_rotates_velocity() {
        let t = tuning();
        let a = Asteroid::new(Vec2::new(100.0, 100.0), 20.0, Vec2::new(10.0, 0.0));
        let [left, right] = a.split(30.0, &t).expect("radius 20 splits");

        assert_eq!(left.body.radius, 10.0);
        assert_eq!(right.body.radius, 10.0);
        assert_eq!(left.body.position, a.body.position);
        assert_eq!(right.body.position, a.body.position);

        assert!((left.body.velocity.length() - 12.0).abs() < 1e-3);
        assert!((right.body.velocity.length() - 12.0).abs() < 1e-3);
        assert!((angle_between_degrees(a.body.velocity, left.body.velocity) - 30.0).abs() < 1e-3);
        assert!((angle_between_degrees(a.body.velocity, right.body.velocity) + 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_split_floors_odd_radius() {
        let t = tuning();
        let a = Asteroid::new(Vec2::ZERO, 25.0, Vec2::Y);
        let [child, _] = a.split(20.0, &t).expect("radius 25 splits");
        assert_eq!(child.body.radius, 12.0);
    }

    #[test]
    fn test_destroy_registers_fragments() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut registry = Registry::new();
        let mut a = Asteroid::new(Vec2::new(50.0, 50.0), 40.0, Vec2::new(0.0, 30.0));

        let created = a.destroy(&mut rng, &mut registry, &t);
        assert_eq!(created, 2);
        assert!(!a.body.alive);

        registry.flush();
        let fragments: Vec<_> = registry.asteroids().collect();
        assert_eq!(fragments.len(), 2);
        for f in fragments {
            assert_eq!(f.body.radius, 20.0);
        }
    }

    #[test]
    fn test_destroy_small_leaves_no_fragments() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut registry = Registry::new();
        let mut a = Asteroid::new(Vec2::ZERO, 10.0, Vec2::X);

        assert_eq!(a.destroy(&mut rng, &mut registry, &t), 0);
        assert!(!a.body.alive);
        registry.flush();
        assert_eq!(registry.asteroids().count(), 0);
    }

    proptest! {
        #[test]
        fn split_invariants(
            radius in 1.0f32..200.0,
            angle in 20.0f32..=50.0,
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
        ) {
            prop_assume!(Vec2::new(vx, vy).length() > 1.0);
            let t = Tuning::default();
            let parent = Asteroid::new(Vec2::new(300.0, 200.0), radius, Vec2::new(vx, vy));
            match parent.split(angle, &t) {
                None => prop_assert!(radius <= t.asteroid_min_radius),
                Some(children) => {
                    prop_assert!(radius > t.asteroid_min_radius);
                    let parent_speed = parent.body.velocity.length();
                    let mut angles = Vec::new();
                    for child in &children {
                        prop_assert_eq!(child.body.radius, (radius / 2.0).floor());
                        prop_assert!((child.body.velocity.length() - parent_speed * 1.2).abs() < 1e-2);
                        angles.push(angle_between_degrees(parent.body.velocity, child.body.velocity));
                    }
                    prop_assert!((angles[0] - angle).abs() < 1e-2);
                    prop_assert!((angles[1] + angle).abs() < 1e-2);
                }
            }
        }
    }
}
