//! Game tuning and preferences
//!
//! Every gameplay constant the simulation reads. Defaults come from
//! [`crate::consts`]; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Audio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 0.4,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Effective effect volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }
}

/// Gameplay constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub target_fps: u32,

    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_turn_speed: f32,
    pub player_speed: f32,
    pub player_shot_speed: f32,
    pub player_shoot_cooldown: f32,
    pub player_lives: u8,
    pub player_invulnerable_time: f32,

    // === Shots ===
    pub shot_radius: f32,

    // === Asteroids ===
    pub asteroid_min_radius: f32,
    pub asteroid_kinds: u32,
    pub asteroid_spawn_interval: f32,
    pub asteroid_spawn_speed_min: f32,
    pub asteroid_spawn_speed_max: f32,
    pub asteroid_spawn_spread: f32,
    pub split_angle_min: f32,
    pub split_angle_max: f32,
    pub split_speedup: f32,

    pub audio: AudioSettings,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_turn_speed: PLAYER_TURN_SPEED,
            player_speed: PLAYER_SPEED,
            player_shot_speed: PLAYER_SHOT_SPEED,
            player_shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            player_lives: PLAYER_LIVES,
            player_invulnerable_time: PLAYER_INVULNERABLE_TIME,

            shot_radius: SHOT_RADIUS,

            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_kinds: ASTEROID_KINDS,
            asteroid_spawn_interval: ASTEROID_SPAWN_INTERVAL,
            asteroid_spawn_speed_min: ASTEROID_SPAWN_SPEED_MIN,
            asteroid_spawn_speed_max: ASTEROID_SPAWN_SPEED_MAX,
            asteroid_spawn_spread: ASTEROID_SPAWN_SPREAD,
            split_angle_min: SPLIT_ANGLE_MIN,
            split_angle_max: SPLIT_ANGLE_MAX,
            split_speedup: SPLIT_SPEEDUP,

            audio: AudioSettings::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Radius of the given size tier (1 = smallest)
    ///
    /// Tiers double in size so that halving a tier lands on the next one down.
    pub fn asteroid_tier_radius(&self, kind: u32) -> f32 {
        let exponent = kind.saturating_sub(1).min(16);
        self.asteroid_min_radius * (1u32 << exponent) as f32
    }

    /// Largest spawnable radius
    pub fn asteroid_max_radius(&self) -> f32 {
        self.asteroid_tier_radius(self.asteroid_kinds)
    }

    /// Simulation step for one frame at the target rate (seconds)
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        let floats = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_radius", self.player_radius),
            ("player_turn_speed", self.player_turn_speed),
            ("player_speed", self.player_speed),
            ("player_shot_speed", self.player_shot_speed),
            ("player_shoot_cooldown", self.player_shoot_cooldown),
            ("player_invulnerable_time", self.player_invulnerable_time),
            ("shot_radius", self.shot_radius),
            ("asteroid_min_radius", self.asteroid_min_radius),
            ("asteroid_spawn_interval", self.asteroid_spawn_interval),
            ("asteroid_spawn_speed_min", self.asteroid_spawn_speed_min),
            ("asteroid_spawn_speed_max", self.asteroid_spawn_speed_max),
            ("asteroid_spawn_spread", self.asteroid_spawn_spread),
            ("split_angle_min", self.split_angle_min),
            ("split_angle_max", self.split_angle_max),
            ("split_speedup", self.split_speedup),
            ("audio.master_volume", self.audio.master_volume),
            ("audio.sfx_volume", self.audio.sfx_volume),
        ];
        // serde_json reads out-of-range numbers such as 1e39 as infinity
        if let Some(&(field, _)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(TuningError::Invalid {
                field,
                reason: "must be a finite number",
            });
        }

        if self.target_fps == 0 {
            return Err(TuningError::Invalid {
                field: "target_fps",
                reason: "must be at least 1",
            });
        }
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        positive("player_radius", self.player_radius)?;
        positive("player_turn_speed", self.player_turn_speed)?;
        positive("player_speed", self.player_speed)?;
        positive("player_shot_speed", self.player_shot_speed)?;
        positive("player_shoot_cooldown", self.player_shoot_cooldown)?;
        positive("player_invulnerable_time", self.player_invulnerable_time)?;
        positive("shot_radius", self.shot_radius)?;
        // Halving anything above the minimum must leave a radius of at least 1
        if !(self.asteroid_min_radius >= 2.0) {
            return Err(TuningError::Invalid {
                field: "asteroid_min_radius",
                reason: "must be at least 2",
            });
        }
        positive("asteroid_spawn_interval", self.asteroid_spawn_interval)?;
        positive("asteroid_spawn_speed_min", self.asteroid_spawn_speed_min)?;

        if self.player_lives == 0 {
            return Err(TuningError::Invalid {
                field: "player_lives",
                reason: "must be at least 1",
            });
        }
        if self.asteroid_kinds == 0 || self.asteroid_kinds > 8 {
            return Err(TuningError::Invalid {
                field: "asteroid_kinds",
                reason: "must be between 1 and 8",
            });
        }
        if self.asteroid_max_radius() * 2.0 > self.screen_width.min(self.screen_height) {
            return Err(TuningError::Invalid {
                field: "asteroid_kinds",
                reason: "largest asteroid must fit on the screen",
            });
        }
        if self.asteroid_spawn_speed_max < self.asteroid_spawn_speed_min {
            return Err(TuningError::Invalid {
                field: "asteroid_spawn_speed_max",
                reason: "must not be below asteroid_spawn_speed_min",
            });
        }
        if !(self.asteroid_spawn_spread >= 0.0) {
            return Err(TuningError::Invalid {
                field: "asteroid_spawn_spread",
                reason: "must not be negative",
            });
        }
        if !(self.split_angle_min >= 0.0) || self.split_angle_max < self.split_angle_min {
            return Err(TuningError::Invalid {
                field: "split_angle_max",
                reason: "split angle range must be non-negative and ordered",
            });
        }
        if !(self.split_speedup > 1.0) {
            return Err(TuningError::Invalid {
                field: "split_speedup",
                reason: "fragments must be faster than their parent",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.player_lives, 3);
        assert!((tuning.player_shoot_cooldown - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tier_radii_double() {
        let tuning = Tuning::default();
        assert_eq!(tuning.asteroid_tier_radius(1), 10.0);
        assert_eq!(tuning.asteroid_tier_radius(2), 20.0);
        assert_eq!(tuning.asteroid_tier_radius(3), 40.0);
        assert_eq!(tuning.asteroid_max_radius(), 40.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "player_lives": 5, "audio": { "muted": true } }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.player_lives, 5);
        assert!(tuning.audio.muted);
        assert_eq!(tuning.audio.effective_volume(), 0.0);
        // Untouched fields keep defaults
        assert_eq!(tuning.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "shot_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "shot_radius",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "split_speedup": 0.9 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "split_speedup",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "split_angle_min": 60.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let err = Tuning::from_json(r#"{ "asteroid_spawn_speed_max": 1e39 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "asteroid_spawn_speed_max",
                reason: "must be a finite number",
            }
        ));

        for json in [
            r#"{ "split_speedup": 1e39 }"#,
            r#"{ "split_angle_max": 1e39 }"#,
            r#"{ "asteroid_spawn_spread": 1e39 }"#,
            r#"{ "asteroid_min_radius": 1e39 }"#,
            r#"{ "audio": { "sfx_volume": 1e39 } }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(
                matches!(err, TuningError::Invalid { .. }),
                "{json} accepted"
            );
        }
    }

    #[test]
    fn test_largest_tier_must_fit_on_screen() {
        // 10 * 2^6 = 640, twice that is wider than a 720 px tall screen
        let err = Tuning::from_json(r#"{ "asteroid_kinds": 7 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "asteroid_kinds",
                ..
            }
        ));
        assert!(Tuning::from_json(r#"{ "asteroid_kinds": 6 }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
