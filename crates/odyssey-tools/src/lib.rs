//! # Odyssey Tools
//!
//! Development tools for Odyssey vehicles.
//!
//! This crate provides:
//! - Gizmo geometry for detection radius, ascension and spawners
//! - Vehicle inspector built on status snapshots
//! - Bounded event log

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod event_log;
pub mod gizmos;
pub mod inspector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event_log::*;
    pub use crate::gizmos::*;
    pub use crate::inspector::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use odyssey_gameplay::{EventBus, OdysseyConfig, OdysseyInput, OdysseySystem, SimScene};

    #[test]
    fn test_log_and_inspect_together() {
        let mut scene = SimScene::new();
        let events = EventBus::default();
        let mut system = OdysseySystem::new();
        let id = system
            .spawn(OdysseyConfig::default(), Vec2::ZERO, &mut scene, &events)
            .expect("valid config");
        system.update(0.1, &OdysseyInput::NONE, &mut scene, None, &events);

        let mut log = EventLog::default();
        events.dispatch(&mut log);
        assert_eq!(log.count("odyssey_spawned"), 1);

        let odyssey = system.get(id).expect("tracked");
        assert_eq!(detection_gizmos(odyssey, false).len(), 2);
        assert_eq!(summary(&system), vec![format!("{id} Idle")]);
    }
}
