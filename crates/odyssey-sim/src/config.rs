//! Simulation configuration.
//!
//! Loaded from a TOML file; a missing or broken file falls back to defaults
//! with a warning.

use std::fs;
use std::io;
use std::path::Path;

use glam::Vec2;
use odyssey_gameplay::{OdysseyConfig, SpawnerConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "odyssey.toml";

/// Camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Half of the visible height
    pub orthographic_size: f32,
    /// Width divided by height
    pub aspect: f32,
    /// Keep the camera centered on the player
    pub follow_player: bool,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            orthographic_size: 5.0,
            aspect: 16.0 / 9.0,
            follow_player: true,
        }
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Timing ===
    /// Fixed tick length in seconds
    pub dt: f32,
    /// Hard stop after this many ticks
    pub max_ticks: u32,
    /// Seconds between status log lines (0 = never)
    pub status_interval: f32,

    // === Player ===
    /// Where the player starts
    pub player_start: Vec2,
    /// Player walking speed toward the spawner or vehicle
    pub walk_speed: f32,
    /// Input held while riding
    pub ride_input: Vec2,

    // === Vehicle ===
    /// Name of a built-in settings bundle to apply
    pub settings: Option<String>,
    /// Vehicle template
    pub vehicle: OdysseyConfig,
    /// Spawner placing the vehicle
    pub spawner: SpawnerConfig,
    /// Camera used for ascension
    pub camera: CameraSection,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            max_ticks: 3600,
            status_interval: 2.0,

            player_start: Vec2::new(-8.0, 0.0),
            walk_speed: 4.0,
            ride_input: Vec2::new(1.0, 0.0),

            settings: None,
            vehicle: OdysseyConfig::default(),
            spawner: SpawnerConfig::default(),
            camera: CameraSection::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.dt = self.dt.clamp(1.0 / 1000.0, 1.0);
        self.max_ticks = self.max_ticks.clamp(1, 1_000_000);
        self.status_interval = self.status_interval.max(0.0);
        self.walk_speed = self.walk_speed.clamp(0.1, 100.0);
        self.ride_input = self.ride_input.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.camera.orthographic_size = self.camera.orthographic_size.max(0.1);
        self.camera.aspect = self.camera.aspect.max(0.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert!((config.dt - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.vehicle, OdysseyConfig::default());
        assert!(config.spawner.spawn_on_player_trigger);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig {
            dt: 5.0,
            walk_speed: 0.0,
            ride_input: Vec2::new(3.0, -2.0),
            ..SimConfig::default()
        };
        config.validate();

        assert_eq!(config.dt, 1.0);
        assert!((config.walk_speed - 0.1).abs() < 0.001);
        assert_eq!(config.ride_input, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("odyssey.toml");

        let mut config = SimConfig {
            max_ticks: 120,
            settings: Some("fast".to_string()),
            ..SimConfig::default()
        };
        config.vehicle.use_parenting_method = false;
        config.spawner.spawn_points = vec![Vec2::new(2.0, 1.0)];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = SimConfig::load_from(&config_path);
        assert_eq!(loaded.max_ticks, 120);
        assert_eq!(loaded.settings.as_deref(), Some("fast"));
        assert!(!loaded.vehicle.use_parenting_method);
        assert_eq!(loaded.spawner.spawn_points, vec![Vec2::new(2.0, 1.0)]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("odyssey.toml");
        fs::write(
            &config_path,
            "max_ticks = 10\n\n[vehicle]\ncontrol_time_limit = 2.5\n",
        )
        .expect("write");

        let loaded = SimConfig::load_from(&config_path);
        assert_eq!(loaded.max_ticks, 10);
        assert_eq!(loaded.vehicle.control_time_limit, 2.5);
        assert_eq!(loaded.vehicle.move_speed, OdysseyConfig::default().move_speed);
    }

    #[test]
    fn test_config_load_missing_or_invalid() {
        let missing = SimConfig::load_from("/nonexistent/path/odyssey.toml");
        assert_eq!(missing, SimConfig::default());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "dt = \"fast\"").expect("write");
        assert_eq!(SimConfig::load_from(&config_path), SimConfig::default());
    }
}
