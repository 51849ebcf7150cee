//! Event bus for Odyssey lifecycle notifications.
//!
//! Vehicles publish onto a bus passed to them by reference each tick. Audio,
//! UI and analytics listeners drain the bus on their own schedule.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use odyssey_common::EntityId;

/// Events produced by vehicles and spawners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OdysseyEvent {
    /// A vehicle entered the scene
    OdysseySpawned {
        /// Vehicle ID
        vehicle: EntityId,
    },
    /// A player took control of a vehicle
    PlayerMounted {
        /// Vehicle ID
        vehicle: EntityId,
        /// Player ID
        player: EntityId,
    },
    /// A player left a vehicle, by choice or because the timer ran out
    PlayerDismounted {
        /// Vehicle ID
        vehicle: EntityId,
        /// Player ID
        player: EntityId,
    },
    /// One second of control remains
    TimerWarning {
        /// Vehicle ID
        vehicle: EntityId,
    },
    /// A vehicle finished shrinking and was removed
    OdysseyDisappeared {
        /// Vehicle ID
        vehicle: EntityId,
    },
}

impl OdysseyEvent {
    /// Returns the vehicle this event concerns.
    #[must_use]
    pub const fn vehicle(&self) -> EntityId {
        match *self {
            Self::OdysseySpawned { vehicle }
            | Self::PlayerMounted { vehicle, .. }
            | Self::PlayerDismounted { vehicle, .. }
            | Self::TimerWarning { vehicle }
            | Self::OdysseyDisappeared { vehicle } => vehicle,
        }
    }

    /// Returns the player this event concerns, if any.
    #[must_use]
    pub const fn player(&self) -> Option<EntityId> {
        match *self {
            Self::PlayerMounted { player, .. } | Self::PlayerDismounted { player, .. } => {
                Some(player)
            },
            _ => None,
        }
    }

    /// Short name for logs and cue lookup.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OdysseySpawned { .. } => "odyssey_spawned",
            Self::PlayerMounted { .. } => "player_mounted",
            Self::PlayerDismounted { .. } => "player_dismounted",
            Self::TimerWarning { .. } => "timer_warning",
            Self::OdysseyDisappeared { .. } => "odyssey_disappeared",
        }
    }
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<OdysseyEvent>,
    /// Receiver for collecting events
    receiver: Receiver<OdysseyEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: OdysseyEvent) {
        // Non-blocking send - if full, event is dropped
        if self.sender.try_send(event).is_err() {
            tracing::warn!("Event bus full, dropped {}", event.name());
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<OdysseyEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Drains all pending events into a handler.
    pub fn dispatch<H: EventHandler + ?Sized>(&self, handler: &mut H) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            handler.handle(&event);
            count += 1;
        }
        count
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<OdysseyEvent> {
        self.sender.clone()
    }
}

/// Typed event handler trait.
pub trait EventHandler {
    /// Handles an event.
    fn handle(&mut self, event: &OdysseyEvent);
}

impl<F: FnMut(&OdysseyEvent)> EventHandler for F {
    fn handle(&mut self, event: &OdysseyEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        let vehicle = EntityId::new();
        let player = EntityId::new();

        bus.publish(OdysseyEvent::OdysseySpawned { vehicle });
        bus.publish(OdysseyEvent::PlayerMounted { vehicle, player });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].player(), Some(player));
        assert_eq!(events[0].vehicle(), vehicle);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        let vehicle = EntityId::new();
        bus.publish(OdysseyEvent::TimerWarning { vehicle });
        bus.publish(OdysseyEvent::OdysseyDisappeared { vehicle });
        assert_eq!(bus.drain(), vec![OdysseyEvent::TimerWarning { vehicle }]);
    }

    #[test]
    fn test_dispatch_to_closure() {
        let bus = EventBus::default();
        let vehicle = EntityId::new();
        bus.publish(OdysseyEvent::TimerWarning { vehicle });
        bus.publish(OdysseyEvent::OdysseyDisappeared { vehicle });

        let mut names = Vec::new();
        let count = bus.dispatch(&mut |event: &OdysseyEvent| names.push(event.name()));
        assert_eq!(count, 2);
        assert_eq!(names, vec!["timer_warning", "odyssey_disappeared"]);
    }

    #[test]
    fn test_sender_handle() {
        let bus = EventBus::default();
        let sender = bus.sender();
        let vehicle = EntityId::new();
        sender
            .try_send(OdysseyEvent::OdysseySpawned { vehicle })
            .expect("send should succeed");
        assert_eq!(bus.pending_count(), 1);
    }
}
