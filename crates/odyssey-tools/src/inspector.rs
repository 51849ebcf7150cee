//! Vehicle inspection tools.

use std::fmt::Write as _;

use odyssey_common::EntityId;
use odyssey_gameplay::{LifecycleState, OdysseyStatus, OdysseySystem, TimerDiagnostics};

/// Inspector for examining vehicles.
#[derive(Debug, Default)]
pub struct OdysseyInspector {
    /// Currently selected vehicle (if any)
    selected: Option<EntityId>,
}

impl OdysseyInspector {
    /// Creates a new inspector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a vehicle for inspection.
    pub fn select(&mut self, vehicle: EntityId) {
        self.selected = Some(vehicle);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Returns the selected vehicle.
    #[must_use]
    pub const fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Snapshot of the selected vehicle, if it is still tracked.
    #[must_use]
    pub fn selected_status(&self, system: &OdysseySystem) -> Option<OdysseyStatus> {
        self.selected
            .and_then(|id| system.get(id))
            .map(odyssey_gameplay::Odyssey::status)
    }

    /// Report for the selected vehicle, or a placeholder line.
    #[must_use]
    pub fn report(&self, system: &OdysseySystem) -> String {
        match (self.selected, self.selected_status(system)) {
            (None, _) => "No vehicle selected".to_string(),
            (Some(id), None) => format!("Vehicle {id} is gone"),
            (Some(_), Some(status)) => format_status(&status),
        }
    }
}

/// One-line timer summary.
#[must_use]
pub fn format_timer(timer: &TimerDiagnostics) -> String {
    if timer.active {
        format!(
            "{:.2}s / {:.2}s ({:.2}s left)",
            timer.elapsed, timer.limit, timer.remaining
        )
    } else {
        format!("stopped ({:.2}s limit)", timer.limit)
    }
}

/// Multi-line report of one vehicle.
#[must_use]
pub fn format_status(status: &OdysseyStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Odyssey {} [{}]", status.id, status.state);
    let _ = writeln!(
        out,
        "  position: ({:.2}, {:.2})  velocity: ({:.2}, {:.2})",
        status.position.x, status.position.y, status.velocity.x, status.velocity.y
    );
    let rider = status
        .occupant
        .map_or_else(|| "none".to_string(), |p| p.to_string());
    let _ = writeln!(out, "  rider: {rider}  follow: {}", status.follow_mode);
    let _ = writeln!(out, "  timer: {}", format_timer(&status.timer));
    let _ = writeln!(
        out,
        "  alpha: {:.2}  scale: ({:.2}, {:.2})  collision: {}",
        status.alpha,
        status.scale.x,
        status.scale.y,
        if status.collision_enabled { "on" } else { "off" }
    );
    let _ = write!(
        out,
        "  ascension: {}{}",
        if status.visible { "visible" } else { "hidden" },
        if status.ascension_halted { ", halted" } else { "" }
    );
    out
}

/// One line per vehicle, ordered by ID.
#[must_use]
pub fn summary(system: &OdysseySystem) -> Vec<String> {
    system
        .statuses()
        .iter()
        .map(|status| {
            let extra = match status.state {
                LifecycleState::Mounted => status
                    .occupant
                    .map(|p| format!(" rider={p} {:.1}s left", status.timer.remaining))
                    .unwrap_or_default(),
                LifecycleState::Despawning => format!(" scale={:.2}", status.scale.x),
                LifecycleState::Idle | LifecycleState::Destroyed => String::new(),
            };
            format!("{} {}{extra}", status.id, status.state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use odyssey_gameplay::{EventBus, OdysseyConfig, OdysseyInput, SimPlayer, SimScene};

    #[test]
    fn test_selection() {
        let mut scene = SimScene::new();
        let events = EventBus::default();
        let mut system = OdysseySystem::new();
        let id = system
            .spawn(OdysseyConfig::default(), Vec2::ZERO, &mut scene, &events)
            .expect("valid config");

        let mut inspector = OdysseyInspector::new();
        assert_eq!(inspector.report(&system), "No vehicle selected");

        inspector.select(id);
        let report = inspector.report(&system);
        assert!(report.starts_with(&format!("Odyssey {id} [Idle]")));
        assert!(report.contains("rider: none"));
        assert!(report.contains("timer: stopped (5.00s limit)"));

        system.despawn(id, &mut scene, &events).expect("tracked");
        assert_eq!(inspector.report(&system), format!("Vehicle {id} is gone"));

        inspector.clear_selection();
        assert_eq!(inspector.selected(), None);
    }

    #[test]
    fn test_timer_format() {
        let timer = TimerDiagnostics {
            elapsed: 1.5,
            limit: 5.0,
            remaining: 3.5,
            active: true,
        };
        assert_eq!(format_timer(&timer), "1.50s / 5.00s (3.50s left)");
    }

    #[test]
    fn test_summary_shows_rider() {
        let mut scene = SimScene::new();
        let events = EventBus::default();
        let mut system = OdysseySystem::new();
        let id = system
            .spawn(OdysseyConfig::default(), Vec2::ZERO, &mut scene, &events)
            .expect("valid config");
        let player = scene.add_player(SimPlayer::new(Vec2::new(0.5, 0.0)));

        system.update(0.1, &OdysseyInput::NONE, &mut scene, None, &events);
        let lines = summary(&system);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(&format!("{id} Mounted rider={player}")));
    }
}
