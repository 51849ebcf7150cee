//! Autonomous drift of an unoccupied vehicle while it is on screen.
//!
//! The vehicle drifts along a fixed direction whenever its render bounds
//! intersect the camera view and nobody rides it. Once it gets further from
//! the camera center than the view's larger half-extent plus a buffer, the
//! drift halts and stays halted until re-armed with
//! [`AscensionBehavior::set_ascension_enabled`].

use glam::Vec2;
use odyssey_common::Aabb;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::camera::Camera2D;
use crate::config::OdysseyConfig;

/// Drift state for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AscensionBehavior {
    speed: f32,
    direction: Vec2,
    camera_buffer: f32,
    visible: bool,
    halted: bool,
}

impl Default for AscensionBehavior {
    fn default() -> Self {
        Self::from_config(&OdysseyConfig::default())
    }
}

impl AscensionBehavior {
    /// Creates a drift behavior. The direction is normalized.
    #[must_use]
    pub fn new(speed: f32, direction: Vec2, camera_buffer: f32) -> Self {
        Self {
            speed: speed.max(0.0),
            direction: direction.normalize_or_zero(),
            camera_buffer,
            visible: false,
            halted: false,
        }
    }

    /// Reads the drift parameters from a vehicle configuration.
    #[must_use]
    pub fn from_config(config: &OdysseyConfig) -> Self {
        Self::new(
            config.ascension_speed,
            config.ascension_direction,
            config.camera_buffer,
        )
    }

    /// Runs one tick and returns the new position if the vehicle drifted.
    ///
    /// Without a camera or without render bounds the behavior is skipped for
    /// the tick and the visibility flag is left untouched.
    pub fn tick(
        &mut self,
        dt: f32,
        position: Vec2,
        bounds: Option<Aabb>,
        camera: Option<&Camera2D>,
        occupied: bool,
    ) -> Option<Vec2> {
        let (Some(bounds), Some(camera)) = (bounds, camera) else {
            debug!("Ascension skipped: no camera or no render bounds");
            return None;
        };

        let was_visible = self.visible;
        self.visible = camera.is_visible(&bounds);
        if self.visible != was_visible {
            debug!("Vehicle visibility changed: visible={}", self.visible);
        }

        if !self.visible || self.halted || occupied {
            return None;
        }

        let next = position + self.direction * self.speed * dt;
        if Self::too_far(next, camera, self.camera_buffer) {
            self.halted = true;
            info!("Ascension halted at {next}: beyond camera range");
        }
        Some(next)
    }

    /// Distance test against the camera's larger half-extent plus `buffer`.
    #[must_use]
    pub fn too_far(position: Vec2, camera: &Camera2D, buffer: f32) -> bool {
        let max_distance = camera.width().max(camera.height()) / 2.0 + buffer;
        position.distance(camera.position) > max_distance
    }

    /// Re-arms (`true`) or halts (`false`) the drift.
    pub fn set_ascension_enabled(&mut self, enabled: bool) {
        self.halted = !enabled;
    }

    /// Changes the drift direction. The value is normalized.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
    }

    /// Changes the drift speed, clamped at zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Returns the normalized drift direction.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Returns the drift speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns whether the last visibility test passed.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns whether the too-far latch has tripped.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds_at(position: Vec2) -> Option<Aabb> {
        Some(Aabb::from_center(position, Vec2::new(1.0, 0.5)))
    }

    #[test]
    fn test_drifts_while_visible() {
        let camera = Camera2D::new(Vec2::ZERO, 5.0, 1.0);
        let mut ascension = AscensionBehavior::new(2.0, Vec2::new(0.0, 3.0), 2.0);
        assert_eq!(ascension.direction(), Vec2::Y);

        let next = ascension
            .tick(0.1, Vec2::ZERO, bounds_at(Vec2::ZERO), Some(&camera), false)
            .expect("drifts");
        assert!((next - Vec2::new(0.0, 0.2)).length() < 1e-6);
        assert!(ascension.is_visible());
    }

    #[test]
    fn test_no_drift_when_occupied_or_offscreen() {
        let camera = Camera2D::new(Vec2::ZERO, 5.0, 1.0);
        let mut ascension = AscensionBehavior::default();
        assert_eq!(
            ascension.tick(0.1, Vec2::ZERO, bounds_at(Vec2::ZERO), Some(&camera), true),
            None
        );

        let far = Vec2::new(50.0, 0.0);
        assert_eq!(
            ascension.tick(0.1, far, bounds_at(far), Some(&camera), false),
            None
        );
        assert!(!ascension.is_visible());
    }

    #[test]
    fn test_missing_camera_or_bounds_skips() {
        let camera = Camera2D::default();
        let mut ascension = AscensionBehavior::default();
        assert_eq!(ascension.tick(0.1, Vec2::ZERO, bounds_at(Vec2::ZERO), None, false), None);
        assert_eq!(ascension.tick(0.1, Vec2::ZERO, None, Some(&camera), false), None);
    }

    #[test]
    fn test_too_far_latches_until_rearmed() {
        // Half-extent max = 5, buffer 1 => halts beyond 6 units
        let camera = Camera2D::new(Vec2::ZERO, 5.0, 1.0);
        let mut ascension = AscensionBehavior::new(1.0, Vec2::Y, 1.0);

        let tall = |p: Vec2| Some(Aabb::from_center(p, Vec2::new(1.0, 3.0)));

        let mut position = Vec2::new(0.0, 5.5);
        let mut steps = 0;
        while let Some(next) = ascension.tick(0.25, position, tall(position), Some(&camera), false) {
            position = next;
            steps += 1;
            assert!(steps < 100, "never halted");
        }
        assert!(ascension.is_halted());
        assert!(position.y > 6.0);

        // Still visible (bounds reach down into the view), but halted
        let stuck = position;
        assert_eq!(ascension.tick(0.25, stuck, tall(stuck), Some(&camera), false), None);
        assert!(ascension.is_visible());

        // Moving back into view does not resume either
        let back = Vec2::ZERO;
        assert_eq!(ascension.tick(0.25, back, bounds_at(back), Some(&camera), false), None);

        ascension.set_ascension_enabled(true);
        assert!(ascension
            .tick(0.25, back, bounds_at(back), Some(&camera), false)
            .is_some());
    }

    #[test]
    fn test_too_far_uses_larger_extent() {
        let wide = Camera2D::new(Vec2::ZERO, 2.0, 4.0); // 16 x 4
        assert!(!AscensionBehavior::too_far(Vec2::new(0.0, 8.0), &wide, 0.5));
        assert!(AscensionBehavior::too_far(Vec2::new(0.0, 8.6), &wide, 0.5));
    }

    #[test]
    fn test_setters() {
        let mut ascension = AscensionBehavior::default();
        ascension.set_speed(-3.0);
        assert_eq!(ascension.speed(), 0.0);
        ascension.set_direction(Vec2::new(-4.0, 0.0));
        assert_eq!(ascension.direction(), Vec2::NEG_X);
        ascension.set_ascension_enabled(false);
        assert!(ascension.is_halted());
    }
}
