//! Named settings bundles for Odyssey vehicles.
//!
//! A bundle is a reusable set of tuning values that a spawner applies on top
//! of its template configuration right before the vehicle goes live:
//! - Built-in presets (default, fast, slow)
//! - A library of bundles looked up by name
//! - RON load/save

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OdysseyConfig;

/// Errors that can occur while loading or saving settings bundles.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// RON parse error.
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error.
    #[error("RON serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Bundle name not present in the library.
    #[error("Unknown settings bundle: {0}")]
    UnknownBundle(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

// ============================================================================
// Settings bundle
// ============================================================================

/// A named bundle of tuning values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdysseySettings {
    /// Bundle name.
    pub name: String,
    /// Top speed.
    pub move_speed: f32,
    /// Acceleration blend rate.
    pub acceleration: f32,
    /// Deceleration blend rate.
    pub deceleration: f32,
    /// Mount query radius.
    pub detection_radius: f32,
    /// Tag identifying player bodies.
    pub player_tag: String,
    /// Control time limit in seconds.
    pub control_time_limit: f32,
    /// Fade out during the final second.
    pub fade_out_effect: bool,
    /// Reparent the rider instead of manual following.
    pub use_parenting_method: bool,
}

impl Default for OdysseySettings {
    fn default() -> Self {
        let base = OdysseyConfig::default();
        Self {
            name: "default".to_string(),
            move_speed: base.move_speed,
            acceleration: base.acceleration,
            deceleration: base.deceleration,
            detection_radius: base.detection_radius,
            player_tag: base.player_tag,
            control_time_limit: base.control_time_limit,
            fade_out_effect: base.fade_out_effect,
            use_parenting_method: base.use_parenting_method,
        }
    }
}

impl OdysseySettings {
    /// Default bundle.
    #[must_use]
    pub fn preset_default() -> Self {
        Self::default()
    }

    /// Quick, short-lived ride.
    #[must_use]
    pub fn preset_fast() -> Self {
        Self {
            name: "fast".to_string(),
            move_speed: 15.0,
            acceleration: 8.0,
            control_time_limit: 3.0,
            ..Self::default()
        }
    }

    /// Slow and stable ride with a longer timer.
    #[must_use]
    pub fn preset_slow() -> Self {
        Self {
            name: "slow".to_string(),
            move_speed: 6.0,
            acceleration: 3.0,
            control_time_limit: 8.0,
            ..Self::default()
        }
    }

    /// Writes this bundle's values onto a vehicle configuration.
    ///
    /// Ascension and presentation fields are left untouched.
    pub fn apply_to(&self, config: &mut OdysseyConfig) {
        config.move_speed = self.move_speed;
        config.acceleration = self.acceleration;
        config.deceleration = self.deceleration;
        config.detection_radius = self.detection_radius;
        config.player_tag.clone_from(&self.player_tag);
        config.control_time_limit = self.control_time_limit;
        config.fade_out_effect = self.fade_out_effect;
        config.use_parenting_method = self.use_parenting_method;
    }

    /// Parses a bundle from RON.
    pub fn from_ron(source: &str) -> SettingsResult<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes this bundle to pretty RON.
    pub fn to_ron(&self) -> SettingsResult<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

// ============================================================================
// Settings library
// ============================================================================

/// A set of bundles addressable by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsLibrary {
    /// Bundles in declaration order.
    pub bundles: Vec<OdysseySettings>,
}

impl Default for SettingsLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SettingsLibrary {
    /// Library containing the built-in presets.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            bundles: vec![
                OdysseySettings::preset_default(),
                OdysseySettings::preset_fast(),
                OdysseySettings::preset_slow(),
            ],
        }
    }

    /// Looks up a bundle by name.
    pub fn get(&self, name: &str) -> SettingsResult<&OdysseySettings> {
        self.bundles
            .iter()
            .find(|bundle| bundle.name == name)
            .ok_or_else(|| SettingsError::UnknownBundle(name.to_string()))
    }

    /// Adds a bundle, replacing any bundle with the same name.
    pub fn insert(&mut self, bundle: OdysseySettings) {
        if let Some(existing) = self.bundles.iter_mut().find(|b| b.name == bundle.name) {
            *existing = bundle;
        } else {
            self.bundles.push(bundle);
        }
    }

    /// Parses a library from RON.
    pub fn from_ron(source: &str) -> SettingsResult<Self> {
        Ok(ron::from_str(source)?)
    }
}
