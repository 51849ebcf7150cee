//! Debug gizmo geometry for vehicles and spawners.
//!
//! Gizmos are plain shapes with a color; drawing them is up to the host.

use glam::Vec2;
use odyssey_gameplay::{Odyssey, OdysseySpawner};
use serde::{Deserialize, Serialize};

/// Number of segments in a detection circle outline.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Length of the ascension direction arrow.
pub const ASCENSION_ARROW_LENGTH: f32 = 3.0;

/// Radius of the sphere at the arrow tip.
pub const ARROW_TIP_RADIUS: f32 = 0.2;

/// Radius of the visibility marker around an ascending vehicle.
pub const VISIBILITY_MARKER_RADIUS: f32 = 0.5;

/// Radius of a spawn point marker.
pub const SPAWN_POINT_RADIUS: f32 = 0.3;

/// Radius of the spawner's own marker.
pub const SPAWNER_MARKER_RADIUS: f32 = 0.2;

/// Radius of the vehicle center marker.
pub const CENTER_MARKER_RADIUS: f32 = 0.1;

/// RGBA color, each channel 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GizmoColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl GizmoColor {
    /// Yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);
    /// Cyan.
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    /// Red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Opaque color.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// One debug shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gizmo {
    /// Closed outline through the given points
    Polyline {
        /// Outline vertices
        points: Vec<Vec2>,
        /// Stroke color
        color: GizmoColor,
    },
    /// Line segment
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
        /// Stroke color
        color: GizmoColor,
    },
    /// Filled disc
    Sphere {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: GizmoColor,
    },
}

impl Gizmo {
    /// Returns the shape's color.
    #[must_use]
    pub const fn color(&self) -> GizmoColor {
        match self {
            Self::Polyline { color, .. } | Self::Line { color, .. } | Self::Sphere { color, .. } => {
                *color
            },
        }
    }
}

/// Points of a circle outline, starting on the +X axis and going
/// counter-clockwise.
#[must_use]
pub fn circle_points(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Detection radius outline, plus center and crosshair when `selected`.
#[must_use]
pub fn detection_gizmos(odyssey: &Odyssey, selected: bool) -> Vec<Gizmo> {
    let center = odyssey.position();
    let radius = odyssey.config().detection_radius;
    let mut gizmos = vec![
        Gizmo::Polyline {
            points: circle_points(center, radius, CIRCLE_SEGMENTS),
            color: GizmoColor::YELLOW,
        },
        Gizmo::Sphere {
            center,
            radius,
            color: GizmoColor::YELLOW.with_alpha(0.1),
        },
    ];

    if selected {
        gizmos.push(Gizmo::Polyline {
            points: circle_points(center, radius, CIRCLE_SEGMENTS),
            color: GizmoColor::CYAN,
        });
        gizmos.push(Gizmo::Sphere {
            center,
            radius: CENTER_MARKER_RADIUS,
            color: GizmoColor::RED,
        });
        gizmos.push(Gizmo::Line {
            from: center - Vec2::X * radius,
            to: center + Vec2::X * radius,
            color: GizmoColor::RED,
        });
        gizmos.push(Gizmo::Line {
            from: center - Vec2::Y * radius,
            to: center + Vec2::Y * radius,
            color: GizmoColor::RED,
        });
    }
    gizmos
}

/// Ascension direction arrow and visibility marker.
#[must_use]
pub fn ascension_gizmos(odyssey: &Odyssey) -> Vec<Gizmo> {
    let start = odyssey.position();
    let ascension = odyssey.ascension();
    let end = start + ascension.direction() * ASCENSION_ARROW_LENGTH;
    let visibility = if ascension.is_visible() {
        GizmoColor::GREEN
    } else {
        GizmoColor::RED
    };

    vec![
        Gizmo::Line {
            from: start,
            to: end,
            color: GizmoColor::CYAN,
        },
        Gizmo::Sphere {
            center: end,
            radius: ARROW_TIP_RADIUS,
            color: GizmoColor::CYAN,
        },
        Gizmo::Polyline {
            points: circle_points(start, VISIBILITY_MARKER_RADIUS, CIRCLE_SEGMENTS),
            color: visibility,
        },
    ]
}

/// Trigger radius, spawn points and spawn state of a spawner.
#[must_use]
pub fn spawner_gizmos(spawner: &OdysseySpawner) -> Vec<Gizmo> {
    let config = spawner.config();
    let origin = config.position;
    let mut gizmos = vec![Gizmo::Polyline {
        points: circle_points(origin, config.trigger_radius, CIRCLE_SEGMENTS),
        color: GizmoColor::GREEN,
    }];

    for &point in &config.spawn_points {
        gizmos.push(Gizmo::Sphere {
            center: point,
            radius: SPAWN_POINT_RADIUS,
            color: GizmoColor::BLUE,
        });
        gizmos.push(Gizmo::Line {
            from: origin,
            to: point,
            color: GizmoColor::BLUE,
        });
    }

    gizmos.push(Gizmo::Sphere {
        center: origin,
        radius: SPAWNER_MARKER_RADIUS,
        color: if spawner.has_spawned() {
            GizmoColor::RED
        } else {
            GizmoColor::YELLOW
        },
    });
    gizmos
}
