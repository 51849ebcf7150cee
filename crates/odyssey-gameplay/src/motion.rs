//! Kinematic motion model for the vehicle.
//!
//! Velocity eases toward a target with separate rates for speeding up and
//! slowing down, and position is integrated directly. No forces, no gravity,
//! no mass: the curves depend only on the configured rates and the tick
//! length.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::OdysseyConfig;

/// Velocity blending and integration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionModel {
    /// Target speed under full input
    pub move_speed: f32,
    /// Blend rate toward the target while input is held
    pub acceleration: f32,
    /// Blend rate toward rest without input
    pub deceleration: f32,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self::from_config(&OdysseyConfig::default())
    }
}

impl MotionModel {
    /// Creates a motion model.
    #[must_use]
    pub const fn new(move_speed: f32, acceleration: f32, deceleration: f32) -> Self {
        Self {
            move_speed,
            acceleration,
            deceleration,
        }
    }

    /// Extracts the motion parameters from a vehicle configuration.
    #[must_use]
    pub fn from_config(config: &OdysseyConfig) -> Self {
        Self::new(config.move_speed, config.acceleration, config.deceleration)
    }

    /// Returns the velocity after one tick of steering.
    ///
    /// `input` is normalized here; a zero input decelerates.
    #[must_use]
    pub fn steer(&self, velocity: Vec2, input: Vec2, dt: f32) -> Vec2 {
        let direction = input.normalize_or_zero();
        if direction == Vec2::ZERO {
            return self.decelerate(velocity, dt);
        }
        let target = direction * self.move_speed;
        blend(velocity, target, self.acceleration * dt)
    }

    /// Returns the velocity after one tick of easing toward rest.
    #[must_use]
    pub fn decelerate(&self, velocity: Vec2, dt: f32) -> Vec2 {
        blend(velocity, Vec2::ZERO, self.deceleration * dt)
    }

    /// Integrates position over one tick.
    #[must_use]
    pub fn integrate(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
        position + velocity * dt
    }
}

/// Linear blend with the factor clamped to `[0, 1]`, so a long tick lands on
/// the target instead of overshooting it.
fn blend(from: Vec2, to: Vec2, factor: f32) -> Vec2 {
    from.lerp(to, factor.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_steer_blends_toward_target() {
        let model = MotionModel::new(10.0, 5.0, 8.0);
        // factor = 5 * 0.1 = 0.5, target = (10, 0)
        let v = model.steer(Vec2::ZERO, Vec2::X, 0.1);
        assert!((v - Vec2::new(5.0, 0.0)).length() < EPS);

        let v = model.steer(v, Vec2::X, 0.1);
        assert!((v - Vec2::new(7.5, 0.0)).length() < EPS);
    }

    #[test]
    fn test_steer_normalizes_input() {
        let model = MotionModel::new(10.0, 5.0, 8.0);
        let v = model.steer(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.2);
        // factor 1.0 lands exactly on the target (0.6, 0.8) * 10
        assert!((v - Vec2::new(6.0, 8.0)).length() < EPS);
    }

    #[test]
    fn test_zero_input_decelerates() {
        let model = MotionModel::new(10.0, 5.0, 8.0);
        let v = model.steer(Vec2::new(10.0, 0.0), Vec2::ZERO, 0.1);
        // factor = 8 * 0.1 = 0.8
        assert!((v - Vec2::new(2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_deceleration_is_asymmetric() {
        let model = MotionModel::new(10.0, 2.0, 8.0);
        let sped = model.steer(Vec2::ZERO, Vec2::Y, 0.05);
        let slowed = model.decelerate(Vec2::new(0.0, 10.0), 0.05);
        // Gained 10% of the gap, shed 40% of the speed
        assert!((sped.y - 1.0).abs() < EPS);
        assert!((slowed.y - 6.0).abs() < EPS);
    }

    #[test]
    fn test_large_factor_clamped() {
        let model = MotionModel::new(10.0, 5.0, 8.0);
        let v = model.decelerate(Vec2::new(4.0, -2.0), 1.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_integrate() {
        let p = MotionModel::integrate(Vec2::new(1.0, 1.0), Vec2::new(2.0, -4.0), 0.5);
        assert_eq!(p, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_from_config() {
        let model = MotionModel::default();
        assert_eq!(model, MotionModel::new(10.0, 5.0, 8.0));
    }
}
