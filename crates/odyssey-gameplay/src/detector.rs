//! Player presence detection around a vehicle.

use std::cmp::Ordering;

use glam::Vec2;
use odyssey_common::EntityId;
use tracing::trace;

use crate::scene::OverlapQuery;

/// A player found within the detection radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Player entity
    pub player: EntityId,
    /// Distance from the vehicle center
    pub distance: f32,
}

/// Finds the player-tagged body a vehicle should pick up.
///
/// When several players are in range the nearest wins; equal distances fall
/// back to the lowest entity ID so the choice never depends on query order.
#[derive(Debug, Clone, PartialEq)]
pub struct MountDetector {
    radius: f32,
    player_tag: String,
}

impl MountDetector {
    /// Creates a detector.
    #[must_use]
    pub fn new(radius: f32, player_tag: impl Into<String>) -> Self {
        Self {
            radius: radius.max(0.0),
            player_tag: player_tag.into(),
        }
    }

    /// Returns the detection radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the tag players must carry.
    #[must_use]
    pub fn player_tag(&self) -> &str {
        &self.player_tag
    }

    /// Queries the scene around `center`. Pure: no state changes.
    pub fn detect<Q: OverlapQuery + ?Sized>(&self, query: &Q, center: Vec2) -> Option<Detection> {
        let contacts = query.overlap_circle(center, self.radius);
        let found = contacts
            .iter()
            .filter(|contact| contact.tag == self.player_tag)
            .map(|contact| Detection {
                player: contact.entity,
                distance: contact.position.distance(center),
            })
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(Ordering::Equal)
                    .then(a.player.cmp(&b.player))
            });

        trace!(
            "Detection at {center}: {} contacts, player={:?}",
            contacts.len(),
            found.map(|d| d.player)
        );
        found
    }
}
