//! Odyssey spawner.
//!
//! A spawner puts one vehicle into the scene, either right at start or once a
//! player comes within its trigger radius (after a delay). The vehicle appears
//! at a randomly chosen spawn point, or at the spawner itself when none are
//! configured, with an optional settings bundle applied on top of the template.

use std::fmt;

use glam::Vec2;
use odyssey_common::EntityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, OdysseyConfig, DEFAULT_PLAYER_TAG};
use crate::events::EventBus;
use crate::scene::Scene;
use crate::settings::{OdysseySettings, SettingsLibrary};
use crate::vehicle::{OdysseyError, OdysseySystem};

/// Default delay between trigger and spawn, in seconds.
const DEFAULT_SPAWN_DELAY: f32 = 1.0;

/// Default proximity trigger radius.
const DEFAULT_TRIGGER_RADIUS: f32 = 5.0;

/// Error types for spawner operations.
#[derive(Debug, Error, PartialEq)]
pub enum SpawnError {
    /// This spawner already has a vehicle out
    #[error("Spawner already spawned {0:?}")]
    AlreadySpawned(Option<EntityId>),
    /// Vehicle creation failed
    #[error(transparent)]
    Odyssey(#[from] OdysseyError),
}

/// Result type for spawner operations.
pub type SpawnResult<T> = Result<T, SpawnError>;

/// Configuration for a spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Spawner location; also the fallback spawn position
    pub position: Vec2,
    /// Candidate spawn positions
    pub spawn_points: Vec<Vec2>,
    /// Spawn as soon as the spawner starts
    pub spawn_on_start: bool,
    /// Spawn when a player comes within `trigger_radius`
    pub spawn_on_player_trigger: bool,
    /// Seconds between trigger and spawn
    pub spawn_delay: f32,
    /// Proximity trigger radius
    pub trigger_radius: f32,
    /// Tag identifying player bodies
    pub player_tag: String,
    /// Name of a settings bundle to apply
    pub settings: Option<String>,
    /// Seed for spawn point selection
    pub seed: u64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            spawn_points: Vec::new(),
            spawn_on_start: false,
            spawn_on_player_trigger: true,
            spawn_delay: DEFAULT_SPAWN_DELAY,
            trigger_radius: DEFAULT_TRIGGER_RADIUS,
            player_tag: DEFAULT_PLAYER_TAG.to_string(),
            settings: None,
            seed: 0,
        }
    }
}

// ============================================================================
// Setup validation
// ============================================================================

/// How bad a setup issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// Spawner works, with a fallback
    Warning,
    /// Spawner falls back to defaults for something it needs
    Error,
}

/// A problem found while validating a spawner.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupIssue {
    /// No vehicle template; spawns use the default configuration
    MissingTemplate,
    /// Template fails validation; spawns use the default configuration
    InvalidTemplate(ConfigError),
    /// No spawn points; spawns happen at the spawner
    NoSpawnPoints,
    /// Named settings bundle could not be found
    UnknownSettings(String),
    /// Spawn delay is negative; treated as zero
    NegativeDelay(f32),
    /// Trigger radius is not positive; the trigger never fires
    BadTriggerRadius(f32),
}

impl SetupIssue {
    /// Returns the severity of this issue.
    #[must_use]
    pub const fn severity(&self) -> IssueSeverity {
        match self {
            Self::MissingTemplate | Self::InvalidTemplate(_) | Self::UnknownSettings(_) => {
                IssueSeverity::Error
            },
            Self::NoSpawnPoints | Self::NegativeDelay(_) | Self::BadTriggerRadius(_) => {
                IssueSeverity::Warning
            },
        }
    }
}

impl fmt::Display for SetupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTemplate => write!(f, "no Odyssey template assigned"),
            Self::InvalidTemplate(err) => write!(f, "Odyssey template is invalid: {err}"),
            Self::NoSpawnPoints => write!(f, "no spawn points, using the spawner position"),
            Self::UnknownSettings(name) => write!(f, "unknown settings bundle '{name}'"),
            Self::NegativeDelay(delay) => write!(f, "spawn delay {delay} is negative"),
            Self::BadTriggerRadius(radius) => write!(f, "trigger radius {radius} is not positive"),
        }
    }
}

/// Result of validating a spawner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupReport {
    /// Every issue found
    pub issues: Vec<SetupIssue>,
}

impl SetupReport {
    /// Returns whether nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns whether any issue is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == IssueSeverity::Error)
    }

    /// Returns whether a specific issue was found.
    #[must_use]
    pub fn contains(&self, issue: &SetupIssue) -> bool {
        self.issues.contains(issue)
    }
}

// ============================================================================
// Spawner
// ============================================================================

/// Places a single Odyssey into the scene.
#[derive(Debug)]
pub struct OdysseySpawner {
    config: SpawnerConfig,
    template: Option<OdysseyConfig>,
    settings: Option<OdysseySettings>,
    missing_settings: Option<String>,
    rng: fastrand::Rng,
    has_spawned: bool,
    /// Seconds left before a triggered spawn
    pending: Option<f32>,
    current: Option<EntityId>,
}

impl OdysseySpawner {
    /// Creates a spawner. `template` is the vehicle configuration to spawn.
    #[must_use]
    pub fn new(config: SpawnerConfig, template: Option<OdysseyConfig>) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            template,
            settings: None,
            missing_settings: None,
            has_spawned: false,
            pending: None,
            current: None,
        }
    }

    /// Applies `settings` to every vehicle this spawner creates.
    #[must_use]
    pub fn with_settings(mut self, settings: OdysseySettings) -> Self {
        self.settings = Some(settings);
        self.missing_settings = None;
        self
    }

    /// Resolves the configured bundle name against `library`.
    ///
    /// An unknown name is logged, reported by [`validate`](Self::validate),
    /// and spawns go ahead without a bundle.
    #[must_use]
    pub fn with_library(mut self, library: &SettingsLibrary) -> Self {
        let Some(name) = self.config.settings.clone() else {
            return self;
        };
        match library.get(&name) {
            Ok(bundle) => {
                self.settings = Some(bundle.clone());
                self.missing_settings = None;
            },
            Err(err) => {
                error!("Spawner settings: {err}");
                self.settings = None;
                self.missing_settings = Some(name);
            },
        }
        self
    }

    /// Checks the setup and logs every issue found.
    pub fn validate(&self) -> SetupReport {
        let mut report = SetupReport::default();

        match &self.template {
            None => report.issues.push(SetupIssue::MissingTemplate),
            Some(template) => {
                if let Err(err) = template.validate() {
                    report.issues.push(SetupIssue::InvalidTemplate(err));
                }
            },
        }
        if self.config.spawn_points.is_empty() {
            report.issues.push(SetupIssue::NoSpawnPoints);
        }
        if let Some(name) = &self.missing_settings {
            report.issues.push(SetupIssue::UnknownSettings(name.clone()));
        }
        if self.config.spawn_delay < 0.0 {
            report
                .issues
                .push(SetupIssue::NegativeDelay(self.config.spawn_delay));
        }
        if self.config.spawn_on_player_trigger && self.config.trigger_radius <= 0.0 {
            report
                .issues
                .push(SetupIssue::BadTriggerRadius(self.config.trigger_radius));
        }

        for issue in &report.issues {
            match issue.severity() {
                IssueSeverity::Error => error!("OdysseySpawner: {issue}"),
                IssueSeverity::Warning => warn!("OdysseySpawner: {issue}"),
            }
        }
        report
    }

    /// Spawns immediately if configured to, then validates the setup.
    pub fn start<S: Scene + ?Sized>(
        &mut self,
        system: &mut OdysseySystem,
        scene: &mut S,
        events: &EventBus,
    ) -> SpawnResult<SetupReport> {
        if self.config.spawn_on_start {
            self.spawn(system, scene, events)?;
        }
        Ok(self.validate())
    }

    /// Runs the proximity trigger and the spawn delay countdown.
    ///
    /// Returns the vehicle spawned this tick, if any.
    pub fn tick<S: Scene + ?Sized>(
        &mut self,
        dt: f32,
        system: &mut OdysseySystem,
        scene: &mut S,
        events: &EventBus,
    ) -> SpawnResult<Option<EntityId>> {
        if self.has_spawned {
            return Ok(None);
        }

        if self.pending.is_none()
            && self.config.spawn_on_player_trigger
            && self.player_nearby(&*scene)
        {
            info!(
                "Player near spawner at {}, spawning in {}s",
                self.config.position, self.config.spawn_delay
            );
            self.pending = Some(self.config.spawn_delay.max(0.0));
        }

        let Some(remaining) = self.pending.as_mut() else {
            return Ok(None);
        };
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return Ok(None);
        }
        self.spawn(system, scene, events).map(Some)
    }

    /// Spawns a vehicle now.
    pub fn spawn<S: Scene + ?Sized>(
        &mut self,
        system: &mut OdysseySystem,
        scene: &mut S,
        events: &EventBus,
    ) -> SpawnResult<EntityId> {
        if self.has_spawned {
            return Err(SpawnError::AlreadySpawned(self.current));
        }

        let config = self.vehicle_config();
        let position = self.choose_spawn_position();
        let id = system.spawn(config, position, scene, events)?;

        self.has_spawned = true;
        self.pending = None;
        self.current = Some(id);
        info!("Spawner placed Odyssey {id} at {position}");
        Ok(id)
    }

    /// Spawns unless a vehicle is already out.
    pub fn force_spawn<S: Scene + ?Sized>(
        &mut self,
        system: &mut OdysseySystem,
        scene: &mut S,
        events: &EventBus,
    ) -> SpawnResult<Option<EntityId>> {
        if self.has_spawned {
            debug!("force_spawn ignored: already spawned");
            return Ok(None);
        }
        self.spawn(system, scene, events).map(Some)
    }

    /// Removes the current vehicle (if still alive) and re-arms the spawner.
    pub fn reset<S: Scene + ?Sized>(
        &mut self,
        system: &mut OdysseySystem,
        scene: &mut S,
        events: &EventBus,
    ) {
        self.has_spawned = false;
        self.pending = None;
        if let Some(id) = self.current.take() {
            if let Err(err) = system.despawn(id, scene, events) {
                debug!("Spawner reset: {err}");
            }
        }
        info!("Spawner at {} reset", self.config.position);
    }

    fn player_nearby<S: Scene + ?Sized>(&self, scene: &S) -> bool {
        scene
            .overlap_circle(self.config.position, self.config.trigger_radius.max(0.0))
            .iter()
            .any(|contact| contact.tag == self.config.player_tag)
    }

    fn vehicle_config(&self) -> OdysseyConfig {
        let mut config = match &self.template {
            Some(template) if template.validate().is_ok() => template.clone(),
            Some(_) => {
                error!("Odyssey template is invalid, spawning with defaults");
                OdysseyConfig::default()
            },
            None => {
                error!("No Odyssey template assigned, spawning with defaults");
                OdysseyConfig::default()
            },
        };
        if let Some(settings) = &self.settings {
            settings.apply_to(&mut config);
        }
        config
    }

    fn choose_spawn_position(&mut self) -> Vec2 {
        let points = &self.config.spawn_points;
        if points.is_empty() {
            return self.config.position;
        }
        points[self.rng.usize(..points.len())]
    }

    // === Accessors ===

    /// Returns whether a vehicle is out.
    #[must_use]
    pub const fn has_spawned(&self) -> bool {
        self.has_spawned
    }

    /// Returns the vehicle this spawner created last.
    #[must_use]
    pub const fn current_odyssey(&self) -> Option<EntityId> {
        self.current
    }

    /// Returns the seconds left on a triggered spawn.
    #[must_use]
    pub const fn pending_delay(&self) -> Option<f32> {
        self.pending
    }

    /// Returns the spawner configuration.
    #[must_use]
    pub const fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Returns the settings bundle applied to spawns.
    #[must_use]
    pub const fn settings(&self) -> Option<&OdysseySettings> {
        self.settings.as_ref()
    }
}
