//! Collision geometry for the magma blob
//!
//! The magma is a circle; pockets are circles; rocks and faults are
//! axis-aligned rectangles tested against the magma's bounding box with a
//! per-kind tolerance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle hanging down from `top_center`
    pub fn from_top_center(top_center: Vec2, width: f32, height: f32) -> Self {
        Self::new(top_center.x - width / 2.0, top_center.y, width, height)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Bounding-box overlap between a circle and this rect.
    ///
    /// `tolerance` grows the rect on every side; strict inequalities, so
    /// exact edge contact is not a hit.
    pub fn overlaps_circle_box(&self, center: Vec2, radius: f32, tolerance: f32) -> bool {
        let reach = radius + tolerance;
        let max = self.max();
        center.x + reach > self.min.x
            && center.x - reach < max.x
            && center.y + reach > self.min.y
            && center.y - reach < max.y
    }

    /// Distance from a point to the nearest point of the rect (0 inside)
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let closest = point.clamp(self.min, self.max());
        (point - closest).length()
    }
}

/// Strict circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Rescale `vel` so its magnitude does not exceed `max_speed`, keeping direction
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed && speed > f32::EPSILON {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_overlap_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 10.0, Vec2::new(29.9, 0.0), 20.0));
        assert!(!circles_overlap(a, 10.0, Vec2::new(30.0, 0.0), 20.0));
    }

    #[test]
    fn test_rect_box_overlap() {
        let rect = Rect::new(100.0, 100.0, 50.0, 30.0);
        // Inside
        assert!(rect.overlaps_circle_box(Vec2::new(120.0, 110.0), 10.0, 0.0));
        // Touching left edge exactly - no hit
        assert!(!rect.overlaps_circle_box(Vec2::new(90.0, 110.0), 10.0, 0.0));
        // Tolerance turns a touch into a hit
        assert!(rect.overlaps_circle_box(Vec2::new(90.0, 110.0), 10.0, 2.0));
        // Far below
        assert!(!rect.overlaps_circle_box(Vec2::new(120.0, 200.0), 10.0, 0.0));
    }

    #[test]
    fn test_rect_from_top_center() {
        let rect = Rect::from_top_center(Vec2::new(200.0, 50.0), 20.0, 100.0);
        assert_eq!(rect.min, Vec2::new(190.0, 50.0));
        assert_eq!(rect.max(), Vec2::new(210.0, 150.0));
        assert_eq!(rect.center(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_rect_distance() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.distance_to(Vec2::new(5.0, 5.0)), 0.0);
        assert!((rect.distance_to(Vec2::new(13.0, 14.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_speed_keeps_slow_velocity() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(clamp_speed(v, 10.0), v);
        assert_eq!(clamp_speed(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn clamp_speed_never_exceeds_max(
            x in -1.0e5f32..1.0e5,
            y in -1.0e5f32..1.0e5,
            max in 1.0f32..1000.0,
        ) {
            let v = Vec2::new(x, y);
            let clamped = clamp_speed(v, max);
            prop_assert!(clamped.length() <= max * (1.0 + 1e-5));
            // Direction preserved
            if v.length() > max {
                prop_assert!(clamped.normalize().dot(v.normalize()) > 0.9999);
            }
        }
    }
}
