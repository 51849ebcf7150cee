//! Directional input for ridden vehicles.
//!
//! Input is read after the tick's mount/dismount transition, so a vehicle
//! asks an [`InputSource`] for its rider's input rather than being handed a
//! value up front. A single [`OdysseyInput`] acts as global axes shared by
//! every rider; a map keyed by player gives each rider their own.

use ahash::AHashMap;
use glam::Vec2;
use odyssey_common::EntityId;
use serde::{Deserialize, Serialize};

/// Two-axis directional input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OdysseyInput {
    /// Left/right axis (-1 to 1)
    pub horizontal: f32,
    /// Down/up axis (-1 to 1)
    pub vertical: f32,
}

impl OdysseyInput {
    /// No input.
    pub const NONE: Self = Self::new(0.0, 0.0);

    /// Creates input from both axes.
    #[must_use]
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Sets the horizontal axis.
    #[must_use]
    pub const fn with_horizontal(mut self, horizontal: f32) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Sets the vertical axis.
    #[must_use]
    pub const fn with_vertical(mut self, vertical: f32) -> Self {
        self.vertical = vertical;
        self
    }

    /// Returns the raw (unnormalized) direction.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical)
    }

    /// Returns whether either axis is non-zero.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }
}

/// Supplies the input of a given rider.
pub trait InputSource {
    /// Returns the input `player` is giving this tick.
    fn input_for(&self, player: EntityId) -> OdysseyInput;
}

impl InputSource for OdysseyInput {
    fn input_for(&self, _player: EntityId) -> OdysseyInput {
        *self
    }
}

impl InputSource for AHashMap<EntityId, OdysseyInput> {
    fn input_for(&self, player: EntityId) -> OdysseyInput {
        self.get(&player).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let input = OdysseyInput::NONE.with_horizontal(-1.0).with_vertical(0.5);
        assert_eq!(input.direction(), Vec2::new(-1.0, 0.5));
        assert!(input.is_active());
        assert!(!OdysseyInput::NONE.is_active());
    }

    #[test]
    fn test_global_input_applies_to_everyone() {
        let input = OdysseyInput::new(1.0, 0.0);
        assert_eq!(input.input_for(EntityId::new()), input);
    }

    #[test]
    fn test_per_player_map() {
        let rider = EntityId::new();
        let mut inputs = AHashMap::new();
        inputs.insert(rider, OdysseyInput::new(0.0, 1.0));

        assert_eq!(inputs.input_for(rider), OdysseyInput::new(0.0, 1.0));
        assert_eq!(inputs.input_for(EntityId::new()), OdysseyInput::NONE);
    }
}
