//! # Odyssey Gameplay
//!
//! Rideable vehicle mechanic for 2D scenes.
//!
//! This crate provides:
//! - Player detection and the mount/dismount lifecycle
//! - Kinematic motion with separate acceleration and deceleration
//! - Rider carrying, by parenting or by replaying movement
//! - Control timer with warning, expiry and fade
//! - Shrink-and-destroy despawn
//! - Autonomous ascension while unoccupied and on screen
//! - Spawners with proximity triggers and spawn points
//! - Named settings bundles loaded from RON
//! - Event bus for vehicle lifecycle notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ascension;
pub mod camera;
pub mod config;
pub mod detector;
pub mod events;
pub mod follow;
pub mod input;
pub mod motion;
pub mod player;
pub mod scene;
pub mod settings;
pub mod spawn;
pub mod timer;
pub mod vehicle;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ascension::*;
    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::detector::*;
    pub use crate::events::*;
    pub use crate::follow::*;
    pub use crate::input::*;
    pub use crate::motion::*;
    pub use crate::player::*;
    pub use crate::scene::*;
    pub use crate::settings::*;
    pub use crate::spawn::*;
    pub use crate::timer::*;
    pub use crate::vehicle::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_spawn_ride_and_dismount() {
        let mut scene = SimScene::new();
        let mut system = OdysseySystem::new();
        let events = EventBus::default();

        let vehicle = system
            .spawn(OdysseyConfig::default(), Vec2::ZERO, &mut scene, &events)
            .expect("valid config");
        let player = scene.add_player(SimPlayer::new(Vec2::new(1.0, 0.0)));

        system.update(0.1, &OdysseyInput::NONE, &mut scene, None, &events);
        assert_eq!(system.vehicle_for_rider(player), Some(vehicle));

        if let Some(rider) = scene.sim_player_mut(player) {
            rider.walk_to(Vec2::new(10.0, 0.0));
        }
        system.update(0.1, &OdysseyInput::NONE, &mut scene, None, &events);
        assert_eq!(system.vehicle_for_rider(player), None);

        let names: Vec<&str> = events.drain().iter().map(OdysseyEvent::name).collect();
        assert_eq!(names, ["odyssey_spawned", "player_mounted", "player_dismounted"]);
    }

    #[test]
    fn test_builtin_settings() {
        let library = SettingsLibrary::builtin();
        let mut config = OdysseyConfig::default();
        library
            .get("slow")
            .expect("builtin bundle")
            .apply_to(&mut config);
        assert_eq!(config.control_time_limit, 8.0);
        assert!(config.validate().is_ok());
    }
}
