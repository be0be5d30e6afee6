//! Asteroid spawner
//!
//! Counts down a fixed interval and drops a new asteroid somewhere on the
//! screen perimeter, drifting roughly inward.

use glam::Vec2;
use rand::Rng;

use super::asteroid::Asteroid;
use super::entity::EntityId;
use super::registry::Spawn;
use crate::rotate_degrees;
use crate::tuning::Tuning;

/// Screen edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit direction pointing into the screen
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Point on this edge at fraction `t` (0..=1) along it
    pub fn point(self, t: f32, width: f32, height: f32) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(0.0, t * height),
            Edge::Right => Vec2::new(width, t * height),
            Edge::Top => Vec2::new(t * width, 0.0),
            Edge::Bottom => Vec2::new(t * width, height),
        }
    }
}

/// Periodic asteroid producer
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidField {
    /// Seconds until the next spawn
    pub time_until_spawn: f32,
}

impl AsteroidField {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            time_until_spawn: tuning.asteroid_spawn_interval,
        }
    }

    /// Count down; spawn one asteroid when the interval elapses
    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut impl Rng,
        registry: &mut impl Spawn,
        tuning: &Tuning,
    ) -> Option<EntityId> {
        self.time_until_spawn -= dt;
        if self.time_until_spawn > 0.0 {
            return None;
        }
        self.time_until_spawn = tuning.asteroid_spawn_interval;
        Some(Self::spawn_random(rng, registry, tuning))
    }

    /// Spawn a large asteroid on a random edge with a random heading
    pub fn spawn_random(
        rng: &mut impl Rng,
        registry: &mut impl Spawn,
        tuning: &Tuning,
    ) -> EntityId {
        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        let speed = rng.random_range(tuning.asteroid_spawn_speed_min..=tuning.asteroid_spawn_speed_max);
        let spread = rng.random_range(-tuning.asteroid_spawn_spread..=tuning.asteroid_spawn_spread);
        let velocity = rotate_degrees(edge.inward() * speed, spread);
        let position = edge.point(
            rng.random_range(0.0..=1.0),
            tuning.screen_width,
            tuning.screen_height,
        );
        // Smaller tiers only come from splitting
        let radius = tuning.asteroid_max_radius();

        log::trace!("Spawning asteroid r={radius} at {position} from {edge:?}");
        Asteroid::spawn(registry, position, radius, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::Registry;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_once_per_interval() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut registry = Registry::new();
        let mut field = AsteroidField::new(&t);

        assert!(field.update(0.5, &mut rng, &mut registry, &t).is_none());
        assert!(field.update(0.5, &mut rng, &mut registry, &t).is_some());
        assert!(field.update(0.5, &mut rng, &mut registry, &t).is_none());
        assert_eq!(registry.pending(), 1);
    }

    #[test]
    fn test_spawned_asteroids_on_perimeter_heading_inward() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut registry = Registry::new();
        for _ in 0..200 {
            AsteroidField::spawn_random(&mut rng, &mut registry, &t);
        }
        registry.flush();

        for rock in registry.asteroids() {
            let p = rock.body.position;
            let on_edge = p.x == 0.0 || p.x == t.screen_width || p.y == 0.0 || p.y == t.screen_height;
            assert!(on_edge, "{p} not on the perimeter");
            assert_eq!(rock.body.radius, t.asteroid_max_radius());

            let speed = rock.body.velocity.length();
            assert!(speed >= t.asteroid_spawn_speed_min - 1e-3);
            assert!(speed <= t.asteroid_spawn_speed_max + 1e-3);
        }
    }

    #[test]
    fn test_inward_velocity_within_spread() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut registry = Registry::new();
        for _ in 0..100 {
            AsteroidField::spawn_random(&mut rng, &mut registry, &t);
        }
        registry.flush();
        for rock in registry.asteroids() {
            let p = rock.body.position;
            // Corners touch two edges; the rock must head inward from one of them
            let fits_an_edge = Edge::ALL.iter().any(|&edge| {
                let on_edge = match edge {
                    Edge::Left => p.x == 0.0,
                    Edge::Right => p.x == t.screen_width,
                    Edge::Top => p.y == 0.0,
                    Edge::Bottom => p.y == t.screen_height,
                };
                let angle = edge.inward().angle_to(rock.body.velocity).to_degrees().abs();
                on_edge && angle <= t.asteroid_spawn_spread + 1e-2
            });
            assert!(fits_an_edge, "{p} heading {}", rock.body.velocity);
        }
    }
}
