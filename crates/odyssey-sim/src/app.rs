//! Scripted ride against an in-memory scene.
//!
//! The player walks toward the spawner until a vehicle appears, walks onto
//! it, then holds the configured input until the control timer throws them
//! off and the vehicle shrinks away.

use anyhow::{Context, Result};
use glam::Vec2;
use odyssey_common::EntityId;
use odyssey_gameplay::{
    Camera2D, EventBus, OdysseyEvent, OdysseyInput, OdysseySpawner, OdysseyStatus, OdysseySystem,
    PlayerProxy, SettingsLibrary, SimPlayer, SimScene,
};
use odyssey_tools::{summary, EventLog, LogEntry};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SimConfig;

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Ticks simulated
    pub ticks: u32,
    /// Simulated seconds
    pub elapsed: f32,
    /// Whether the ride ran to completion before `max_ticks`
    pub completed: bool,
    /// Every event captured
    pub events: Vec<LogEntry>,
    /// Vehicles still tracked at the end
    pub vehicles: Vec<OdysseyStatus>,
    /// Final player position
    pub player_position: Vec2,
}

/// The running simulation.
pub struct Simulation {
    config: SimConfig,
    scene: SimScene,
    system: OdysseySystem,
    spawner: OdysseySpawner,
    events: EventBus,
    log: EventLog,
    camera: Camera2D,
    player: EntityId,
    tick: u32,
    since_status: f32,
}

impl Simulation {
    /// Builds the scene and runs spawner setup.
    pub fn new(config: SimConfig) -> Result<Self> {
        let mut template = config.vehicle.clone();
        if let Some(name) = &config.settings {
            SettingsLibrary::builtin()
                .get(name)
                .with_context(|| format!("applying settings bundle '{name}'"))?
                .apply_to(&mut template);
        }

        let mut scene = SimScene::new();
        let player = scene.add_player(SimPlayer::new(config.player_start));
        let mut system = OdysseySystem::new();
        let events = EventBus::default();
        let mut spawner = OdysseySpawner::new(config.spawner.clone(), Some(template))
            .with_library(&SettingsLibrary::builtin());

        let report = spawner
            .start(&mut system, &mut scene, &events)
            .context("starting spawner")?;
        if !report.is_clean() {
            warn!("Spawner setup reported {} issue(s)", report.issues.len());
        }

        let camera = Camera2D::new(
            config.player_start,
            config.camera.orthographic_size,
            config.camera.aspect,
        );

        Ok(Self {
            config,
            scene,
            system,
            spawner,
            events,
            log: EventLog::default(),
            camera,
            player,
            tick: 0,
            since_status: 0.0,
        })
    }

    /// Runs until the vehicle is gone or the tick limit is hit.
    pub fn run(mut self) -> Result<SimReport> {
        info!("Simulation starting: dt={}s, max {} ticks", self.config.dt, self.config.max_ticks);

        let mut completed = false;
        while self.tick < self.config.max_ticks {
            self.step()?;
            if self.spawner.has_spawned() && self.system.is_empty() {
                completed = true;
                break;
            }
        }

        if !completed {
            warn!("Stopped after {} ticks without finishing the ride", self.tick);
        }
        info!("Simulation finished after {} ticks", self.tick);

        Ok(SimReport {
            ticks: self.tick,
            elapsed: self.tick as f32 * self.config.dt,
            completed,
            events: self.log.entries().copied().collect(),
            vehicles: self.system.statuses(),
            player_position: self.player_position(),
        })
    }

    /// Advances one fixed tick.
    pub fn step(&mut self) -> Result<()> {
        let dt = self.config.dt;
        self.tick += 1;

        self.walk_player(dt);

        self.spawner
            .tick(dt, &mut self.system, &mut self.scene, &self.events)
            .context("spawner tick")?;

        if self.config.camera.follow_player {
            self.camera.center_on(self.player_position());
        }

        let input = OdysseyInput::new(self.config.ride_input.x, self.config.ride_input.y);
        let destroyed = self
            .system
            .update(dt, &input, &mut self.scene, Some(&self.camera), &self.events);
        for id in destroyed {
            debug!("Vehicle {id} left the simulation");
        }

        self.log.set_frame(u64::from(self.tick));
        let log = &mut self.log;
        self.events.dispatch(&mut |event: &OdysseyEvent| {
            info!("event: {} vehicle={}", event.name(), event.vehicle());
            log.record(*event);
        });

        self.report_status(dt);
        Ok(())
    }

    fn walk_player(&mut self, dt: f32) {
        if self.system.vehicle_for_rider(self.player).is_some() {
            return;
        }
        let position = self.player_position();
        let target = self
            .system
            .get_nearest(position)
            .and_then(|id| self.system.get(id))
            .map_or(self.config.spawner.position, |vehicle| vehicle.position());

        let to_target = target - position;
        let step = self.config.walk_speed * dt;
        let next = if to_target.length() <= step {
            target
        } else {
            position + to_target.normalize_or_zero() * step
        };
        if let Some(player) = self.scene.sim_player_mut(self.player) {
            player.walk_to(next);
        }
    }

    fn report_status(&mut self, dt: f32) {
        if self.config.status_interval <= 0.0 {
            return;
        }
        self.since_status += dt;
        if self.since_status < self.config.status_interval {
            return;
        }
        self.since_status = 0.0;

        let player = self.player_position();
        info!("status: player at ({:.2}, {:.2})", player.x, player.y);
        for line in summary(&self.system) {
            info!("status: {line}");
        }
    }

    fn player_position(&self) -> Vec2 {
        self.scene
            .sim_player(self.player)
            .map_or(self.config.player_start, SimPlayer::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ride_completes() {
        let report = Simulation::new(SimConfig::default())
            .expect("setup")
            .run()
            .expect("run");

        assert!(report.completed);
        assert!(report.vehicles.is_empty());

        let names: Vec<&str> = report.events.iter().map(|e| e.event.name()).collect();
        assert_eq!(
            names,
            [
                "odyssey_spawned",
                "player_mounted",
                "timer_warning",
                "player_dismounted",
                "odyssey_disappeared",
            ]
        );
        // Ridden to the right
        assert!(report.player_position.x > 5.0);
    }

    #[test]
    fn test_tick_limit_stops_run() {
        let config = SimConfig {
            max_ticks: 10,
            ..SimConfig::default()
        };
        let report = Simulation::new(config).expect("setup").run().expect("run");
        assert_eq!(report.ticks, 10);
        assert!(!report.completed);
    }

    #[test]
    fn test_unknown_settings_bundle_fails_setup() {
        let config = SimConfig {
            settings: Some("turbo".to_string()),
            ..SimConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let config = SimConfig {
            max_ticks: 5,
            ..SimConfig::default()
        };
        let report = Simulation::new(config).expect("setup").run().expect("run");
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"ticks\":5"));
    }
}
