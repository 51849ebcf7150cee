//! Strategies for keeping the rider on a moving vehicle.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::player::PlayerProxy;

/// Movement smaller than this per tick is not replayed onto the rider.
pub const FOLLOW_EPSILON: f32 = 0.001;

/// How the rider is carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FollowMode {
    /// Rider's transform is parented to the vehicle; the host carries it.
    #[default]
    Parenting,
    /// Vehicle movement is replayed onto the rider every tick.
    Manual,
}

impl fmt::Display for FollowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parenting => write!(f, "Parenting"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// Per-vehicle follow state: the strategy plus the position seen last tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerFollow {
    mode: FollowMode,
    anchor: Vec2,
}

impl PlayerFollow {
    /// Creates follow state anchored at the vehicle's current position.
    #[must_use]
    pub const fn new(mode: FollowMode, position: Vec2) -> Self {
        Self {
            mode,
            anchor: position,
        }
    }

    /// Returns the active strategy.
    #[must_use]
    pub const fn mode(&self) -> FollowMode {
        self.mode
    }

    /// Switches strategy. Callers must not switch mid-ride.
    pub fn set_mode(&mut self, mode: FollowMode) {
        self.mode = mode;
    }

    /// Returns the position recorded at the end of the previous tick.
    #[must_use]
    pub const fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Forgets any movement since the last tick.
    pub fn reset_anchor(&mut self, position: Vec2) {
        self.anchor = position;
    }

    /// Carries the rider by the vehicle's movement since the last tick and
    /// re-anchors at `position`. Returns the vehicle's movement.
    pub fn apply(&mut self, position: Vec2, rider: Option<&mut dyn PlayerProxy>) -> Vec2 {
        let delta = position - self.anchor;
        self.anchor = position;

        if let (FollowMode::Manual, Some(player)) = (self.mode, rider) {
            if delta.length() > FOLLOW_EPSILON {
                replay_delta(player, delta);
            }
        }
        delta
    }
}

/// Replays `delta` as two single-axis moves, horizontal first.
///
/// Horizontal goes through the rider's collision-aware move so walls still
/// stop it. Vertical is a teleport followed by clearing vertical velocity,
/// since repeated repositioning under the rider's own physics would otherwise
/// accumulate fall speed.
fn replay_delta(player: &mut dyn PlayerProxy, delta: Vec2) {
    if delta.x.abs() > FOLLOW_EPSILON {
        let target = player.position() + Vec2::new(delta.x, 0.0);
        if !player.move_to(target) {
            player.teleport_to(target);
        }
    }

    if delta.y.abs() > FOLLOW_EPSILON {
        let target = player.position() + Vec2::new(0.0, delta.y);
        player.teleport_to(target);
        let velocity = player.velocity();
        player.set_velocity(Vec2::new(velocity.x, 0.0));
    }

    trace!("Replayed {delta} onto {}", player.id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PlayerMove, SimPlayer};

    #[test]
    fn test_manual_splits_axes_horizontal_first() {
        let mut player = SimPlayer::new(Vec2::new(1.0, 1.0));
        player.set_velocity(Vec2::new(2.0, -9.0));
        let mut follow = PlayerFollow::new(FollowMode::Manual, Vec2::ZERO);

        let delta = follow.apply(Vec2::new(3.0, 4.0), Some(&mut player));
        assert_eq!(delta, Vec2::new(3.0, 4.0));

        let moves = player.moves();
        assert_eq!(moves.len(), 2);
        assert!(matches!(moves[0], PlayerMove::Move { .. }));
        assert_eq!(moves[0].delta(), Vec2::new(3.0, 0.0));
        assert!(matches!(moves[1], PlayerMove::Teleport { .. }));
        assert_eq!(moves[1].delta(), Vec2::new(0.0, 4.0));
        assert_eq!(player.position(), Vec2::new(4.0, 5.0));
        assert_eq!(player.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(follow.anchor(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_manual_falls_back_to_teleport_without_body() {
        let mut player = SimPlayer::new(Vec2::ZERO).without_body();
        let mut follow = PlayerFollow::new(FollowMode::Manual, Vec2::ZERO);

        follow.apply(Vec2::new(2.0, 0.0), Some(&mut player));
        assert_eq!(player.moves().len(), 1);
        assert!(matches!(player.moves()[0], PlayerMove::Teleport { .. }));
        assert_eq!(player.position(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_single_axis_move() {
        let mut player = SimPlayer::new(Vec2::ZERO);
        player.set_velocity(Vec2::new(0.0, 5.0));
        let mut follow = PlayerFollow::new(FollowMode::Manual, Vec2::ZERO);

        follow.apply(Vec2::new(0.0, -1.5), Some(&mut player));
        assert_eq!(player.moves().len(), 1);
        assert_eq!(player.moves()[0].delta(), Vec2::new(0.0, -1.5));
        assert_eq!(player.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_tiny_movement_ignored() {
        let mut player = SimPlayer::new(Vec2::ZERO);
        let mut follow = PlayerFollow::new(FollowMode::Manual, Vec2::ZERO);

        follow.apply(Vec2::new(0.0005, 0.0005), Some(&mut player));
        assert!(player.moves().is_empty());
        assert_eq!(follow.anchor(), Vec2::new(0.0005, 0.0005));
    }

    #[test]
    fn test_parenting_does_nothing_per_tick() {
        let mut player = SimPlayer::new(Vec2::ZERO);
        let mut follow = PlayerFollow::new(FollowMode::Parenting, Vec2::ZERO);

        let delta = follow.apply(Vec2::new(5.0, 5.0), Some(&mut player));
        assert_eq!(delta, Vec2::new(5.0, 5.0));
        assert!(player.moves().is_empty());
    }

    #[test]
    fn test_reset_anchor_discards_pending_delta() {
        let mut player = SimPlayer::new(Vec2::ZERO);
        let mut follow = PlayerFollow::new(FollowMode::Manual, Vec2::ZERO);
        follow.reset_anchor(Vec2::new(10.0, 0.0));

        let delta = follow.apply(Vec2::new(10.0, 0.0), Some(&mut player));
        assert_eq!(delta, Vec2::ZERO);
        assert!(player.moves().is_empty());
    }
}
