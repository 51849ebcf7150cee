//! Orthographic 2D camera used for visibility tests.

use glam::Vec2;
use odyssey_common::Aabb;
use serde::{Deserialize, Serialize};

/// Default orthographic half-height in world units.
pub const DEFAULT_ORTHOGRAPHIC_SIZE: f32 = 5.0;

/// Default aspect ratio (width / height).
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Orthographic camera looking at the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    /// Center of the view in world coordinates.
    pub position: Vec2,
    /// Half of the visible height in world units.
    pub orthographic_size: f32,
    /// Width divided by height.
    pub aspect: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            orthographic_size: DEFAULT_ORTHOGRAPHIC_SIZE,
            aspect: DEFAULT_ASPECT,
        }
    }
}

impl Camera2D {
    /// Creates a camera centered on `position`.
    #[must_use]
    pub const fn new(position: Vec2, orthographic_size: f32, aspect: f32) -> Self {
        Self {
            position,
            orthographic_size,
            aspect,
        }
    }

    /// Visible height in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        2.0 * self.orthographic_size
    }

    /// Visible width in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.height() * self.aspect
    }

    /// Half of the visible width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width(), self.height()) * 0.5
    }

    /// World-space rectangle covered by the view.
    #[must_use]
    pub fn frustum_aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents())
    }

    /// Whether any part of `bounds` is inside the view.
    #[must_use]
    pub fn is_visible(&self, bounds: &Aabb) -> bool {
        self.frustum_aabb().overlaps(bounds)
    }

    /// Move the view center.
    pub fn center_on(&mut self, position: Vec2) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents() {
        let camera = Camera2D::new(Vec2::ZERO, 5.0, 2.0);
        assert_eq!(camera.height(), 10.0);
        assert_eq!(camera.width(), 20.0);
        assert_eq!(camera.half_extents(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_visibility() {
        let camera = Camera2D::new(Vec2::new(100.0, 0.0), 5.0, 1.0);
        let inside = Aabb::from_center(Vec2::new(100.0, 4.0), Vec2::splat(0.5));
        let straddling = Aabb::from_center(Vec2::new(100.0, 5.4), Vec2::splat(0.5));
        let outside = Aabb::from_center(Vec2::new(100.0, 7.0), Vec2::splat(0.5));

        assert!(camera.is_visible(&inside));
        assert!(camera.is_visible(&straddling));
        assert!(!camera.is_visible(&outside));
    }

    #[test]
    fn test_center_on() {
        let mut camera = Camera2D::default();
        camera.center_on(Vec2::new(3.0, -2.0));
        assert_eq!(camera.frustum_aabb().center(), Vec2::new(3.0, -2.0));
    }
}
