//! Player collaborator interface and the mount hand-off record.
//!
//! The player's own locomotion controller lives outside this crate. A vehicle
//! only sees it through [`PlayerProxy`], and only touches the fields it
//! overrides during a ride through a [`PlayerHandoff`].

use glam::Vec2;
use odyssey_common::EntityId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::follow::FollowMode;

/// What a vehicle may read and write on the player it carries.
///
/// Capabilities the player may lack are modeled as `Option` on the read side:
/// a player without a physics body reports no gravity scale, and a player
/// without a locomotion controller reports no input flag.
pub trait PlayerProxy {
    /// Returns the player's entity ID.
    fn id(&self) -> EntityId;

    /// Returns the world position.
    fn position(&self) -> Vec2;

    /// Returns the current velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrites the current velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Places the player at `position` without collision resolution.
    fn teleport_to(&mut self, position: Vec2);

    /// Moves the player's body toward `position`, respecting collisions.
    ///
    /// Returns `false` when the player has no body to move, in which case
    /// nothing happened and the caller should fall back to a teleport.
    fn move_to(&mut self, position: Vec2) -> bool;

    /// Returns the gravity scale, or `None` when the player has no body.
    fn gravity_scale(&self) -> Option<f32>;

    /// Sets the gravity scale (ignored when the player has no body).
    fn set_gravity_scale(&mut self, scale: f32);

    /// Returns whether input drives the player, or `None` without a controller.
    fn input_enabled(&self) -> Option<bool>;

    /// Enables or disables input (ignored without a controller).
    fn set_input_enabled(&mut self, enabled: bool);

    /// Returns the transform parent; `None` means the world root.
    fn parent(&self) -> Option<EntityId>;

    /// Reparents the player's transform; `None` means the world root.
    fn set_parent(&mut self, parent: Option<EntityId>);
}

/// Snapshot of everything a vehicle overrides on its rider.
///
/// Created by [`PlayerHandoff::take_control`] and consumed by
/// [`PlayerHandoff::release`] or [`PlayerHandoff::abandon`]. Taking `self` by
/// value is what guarantees each captured field is restored at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "a hand-off must be released or abandoned"]
pub struct PlayerHandoff {
    /// Rider this record belongs to
    player: EntityId,
    /// Captured parent, present only under the parenting strategy
    original_parent: Option<Option<EntityId>>,
    /// Captured gravity scale
    original_gravity: Option<f32>,
    /// Captured input flag
    original_input_enabled: Option<bool>,
}

impl PlayerHandoff {
    /// Captures the rider's state and applies the ride overrides.
    ///
    /// Overrides: reparent under `vehicle` (parenting strategy only), zero
    /// gravity, disable input.
    pub fn take_control(player: &mut dyn PlayerProxy, vehicle: EntityId, mode: FollowMode) -> Self {
        let original_parent = match mode {
            FollowMode::Parenting => {
                let parent = player.parent();
                player.set_parent(Some(vehicle));
                Some(parent)
            },
            FollowMode::Manual => None,
        };

        let original_gravity = player.gravity_scale();
        if original_gravity.is_some() {
            player.set_gravity_scale(0.0);
        }

        let original_input_enabled = player.input_enabled();
        if original_input_enabled.is_some() {
            player.set_input_enabled(false);
        }

        debug!(
            "Captured hand-off for {}: parent={:?} gravity={:?} input={:?}",
            player.id(),
            original_parent,
            original_gravity,
            original_input_enabled
        );

        Self {
            player: player.id(),
            original_parent,
            original_gravity,
            original_input_enabled,
        }
    }

    /// Restores every captured field on the rider.
    pub fn release(self, player: &mut dyn PlayerProxy) {
        if let Some(parent) = self.original_parent {
            player.set_parent(parent);
        }
        if let Some(gravity) = self.original_gravity {
            player.set_gravity_scale(gravity);
        }
        if let Some(enabled) = self.original_input_enabled {
            player.set_input_enabled(enabled);
        }
        debug!("Released hand-off for {}", self.player);
    }

    /// Drops the record without touching the rider, for riders that no
    /// longer exist.
    pub fn abandon(self) {
        debug!("Abandoned hand-off for vanished player {}", self.player);
    }

    /// Returns the rider this record belongs to.
    #[must_use]
    pub const fn player(&self) -> EntityId {
        self.player
    }

    /// Returns the captured parent, if the parenting strategy captured one.
    #[must_use]
    pub const fn original_parent(&self) -> Option<Option<EntityId>> {
        self.original_parent
    }

    /// Returns the captured gravity scale.
    #[must_use]
    pub const fn original_gravity(&self) -> Option<f32> {
        self.original_gravity
    }

    /// Returns the captured input flag.
    #[must_use]
    pub const fn original_input_enabled(&self) -> Option<bool> {
        self.original_input_enabled
    }
}
