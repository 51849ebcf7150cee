//! Per-vehicle configuration.
//!
//! `OdysseyConfig` is the in-memory configuration object a spawner applies to
//! a new vehicle before it becomes active. Every field has a default so partial
//! configs deserialize cleanly.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::follow::FollowMode;

/// Default tag carried by player bodies.
pub const DEFAULT_PLAYER_TAG: &str = "Player";

/// Errors raised when validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Value must be strictly positive
    #[error("{field} must be > 0 (got {value})")]
    NotPositive {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },
    /// Value must not be negative
    #[error("{field} must be >= 0 (got {value})")]
    Negative {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },
    /// Value is NaN or infinite
    #[error("{field} must be finite")]
    NotFinite {
        /// Offending field
        field: &'static str,
    },
    /// Player tag is empty
    #[error("player tag must not be empty")]
    EmptyPlayerTag,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration of a single Odyssey vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdysseyConfig {
    // === Movement ===
    /// Top speed reached under full input
    pub move_speed: f32,
    /// Blend rate toward the target velocity while input is held
    pub acceleration: f32,
    /// Blend rate toward rest when input is released
    pub deceleration: f32,

    // === Detection ===
    /// Radius of the mount query around the vehicle center
    pub detection_radius: f32,
    /// Tag identifying player bodies
    pub player_tag: String,
    /// Radius of the vehicle's own collider
    pub body_radius: f32,

    // === Timer ===
    /// Seconds of control before the vehicle disappears
    pub control_time_limit: f32,
    /// Fade the sprite out during the final second
    pub fade_out_effect: bool,

    // === Follow strategy ===
    /// Reparent the rider instead of replaying movement manually
    pub use_parenting_method: bool,

    // === Ascension ===
    /// Drift speed while unoccupied and on screen
    pub ascension_speed: f32,
    /// Drift direction (normalized on use)
    pub ascension_direction: Vec2,
    /// Distance beyond the camera extents at which drifting halts
    pub camera_buffer: f32,

    // === Presentation ===
    /// Half-extents of the sprite bounds; `None` when the vehicle has no renderer
    pub sprite_half_extents: Option<Vec2>,
    /// Scale the vehicle spawns with
    pub scale: Vec2,
    /// Length of the despawn shrink in seconds
    pub shrink_duration: f32,
}

impl Default for OdysseyConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            acceleration: 5.0,
            deceleration: 8.0,

            detection_radius: 2.0,
            player_tag: DEFAULT_PLAYER_TAG.to_string(),
            body_radius: 0.5,

            control_time_limit: 5.0,
            fade_out_effect: true,

            use_parenting_method: true,

            ascension_speed: 2.0,
            ascension_direction: Vec2::Y,
            camera_buffer: 2.0,

            sprite_half_extents: Some(Vec2::new(1.0, 0.5)),
            scale: Vec2::ONE,
            shrink_duration: 0.5,
        }
    }
}

impl OdysseyConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the follow strategy selected by this configuration.
    #[must_use]
    pub const fn follow_mode(&self) -> FollowMode {
        if self.use_parenting_method {
            FollowMode::Parenting
        } else {
            FollowMode::Manual
        }
    }

    /// Sets the control time limit.
    #[must_use]
    pub fn with_time_limit(mut self, seconds: f32) -> Self {
        self.control_time_limit = seconds;
        self
    }

    /// Sets the follow strategy.
    #[must_use]
    pub fn with_follow_mode(mut self, mode: FollowMode) -> Self {
        self.use_parenting_method = matches!(mode, FollowMode::Parenting);
        self
    }

    /// Sets the detection radius.
    #[must_use]
    pub fn with_detection_radius(mut self, radius: f32) -> Self {
        self.detection_radius = radius;
        self
    }

    /// Checks every numeric option for a usable value.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = [
            ("move_speed", self.move_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("detection_radius", self.detection_radius),
            ("body_radius", self.body_radius),
            ("control_time_limit", self.control_time_limit),
            ("ascension_speed", self.ascension_speed),
            ("camera_buffer", self.camera_buffer),
            ("shrink_duration", self.shrink_duration),
            ("ascension_direction.x", self.ascension_direction.x),
            ("ascension_direction.y", self.ascension_direction.y),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let non_negative = [
            ("move_speed", self.move_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("detection_radius", self.detection_radius),
            ("body_radius", self.body_radius),
            ("ascension_speed", self.ascension_speed),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.control_time_limit <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "control_time_limit",
                value: self.control_time_limit,
            });
        }
        if self.shrink_duration <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "shrink_duration",
                value: self.shrink_duration,
            });
        }
        if self.player_tag.is_empty() {
            return Err(ConfigError::EmptyPlayerTag);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OdysseyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.follow_mode(), FollowMode::Parenting);
        assert_eq!(config.player_tag, "Player");
    }

    #[test]
    fn test_builder_helpers() {
        let config = OdysseyConfig::new()
            .with_time_limit(3.0)
            .with_follow_mode(FollowMode::Manual)
            .with_detection_radius(4.0);
        assert_eq!(config.control_time_limit, 3.0);
        assert_eq!(config.follow_mode(), FollowMode::Manual);
        assert_eq!(config.detection_radius, 4.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = OdysseyConfig::new().with_time_limit(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "control_time_limit",
                ..
            })
        ));

        let config = OdysseyConfig {
            deceleration: -1.0,
            ..OdysseyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "deceleration",
                ..
            })
        ));

        let config = OdysseyConfig {
            move_speed: f32::NAN,
            ..OdysseyConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "move_speed"
            })
        );

        let config = OdysseyConfig {
            player_tag: String::new(),
            ..OdysseyConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPlayerTag));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: OdysseyConfig =
            serde_json::from_str(r#"{"move_speed": 12.0, "use_parenting_method": false}"#)
                .expect("partial config should parse");
        assert_eq!(config.move_speed, 12.0);
        assert_eq!(config.follow_mode(), FollowMode::Manual);
        assert_eq!(config.control_time_limit, 5.0);
    }
}
