//! Captured log of vehicle events.
//!
//! The log is an [`EventHandler`], so it can be fed straight from
//! [`EventBus::dispatch`](odyssey_gameplay::EventBus::dispatch).

use std::collections::VecDeque;

use ahash::AHashSet;
use odyssey_common::EntityId;
use odyssey_gameplay::{EventHandler, OdysseyEvent};
use serde::Serialize;

/// Default number of entries kept.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// One captured event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Sequence number, increasing across the log's lifetime
    pub seq: u64,
    /// Simulation frame the event was captured on
    pub frame: u64,
    /// The event itself
    pub event: OdysseyEvent,
}

impl LogEntry {
    /// Returns a one-line description.
    #[must_use]
    pub fn describe(&self) -> String {
        let player = self
            .event
            .player()
            .map(|p| format!(" player={p}"))
            .unwrap_or_default();
        format!(
            "[{:>5}] {} vehicle={}{player}",
            self.frame,
            self.event.name(),
            self.event.vehicle()
        )
    }
}

/// Which events the log keeps.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event names to keep; empty keeps all
    pub names: AHashSet<&'static str>,
    /// Only keep events of this vehicle
    pub vehicle: Option<EntityId>,
}

impl EventFilter {
    /// Checks if an event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &OdysseyEvent) -> bool {
        (self.names.is_empty() || self.names.contains(event.name()))
            && self.vehicle.map_or(true, |v| v == event.vehicle())
    }
}

/// Bounded event log.
#[derive(Debug)]
pub struct EventLog {
    /// Capture filter
    pub filter: EventFilter,
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    paused: bool,
    frame: u64,
    next_seq: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl EventLog {
    /// Creates a log keeping at most `max_entries` (at least one).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            filter: EventFilter::default(),
            entries: VecDeque::with_capacity(max_entries.min(DEFAULT_MAX_ENTRIES)),
            max_entries,
            paused: false,
            frame: 0,
            next_seq: 0,
        }
    }

    /// Sets the frame stamped on subsequent entries.
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// Records an event, dropping the oldest when full.
    pub fn record(&mut self, event: OdysseyEvent) {
        if self.paused || !self.filter.matches(&event) {
            return;
        }
        if self.entries.len() == self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            frame: self.frame,
            event,
        });
        self.next_seq += 1;
    }

    /// Stops or resumes capture.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns whether capture is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Iterates over kept entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Returns the number of kept entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts kept entries with the given event name.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.event.name() == name)
            .count()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl EventHandler for EventLog {
    fn handle(&mut self, event: &OdysseyEvent) {
        self.record(*event);
    }
}
