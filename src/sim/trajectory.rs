//! Launch trajectory from a drag gesture
//!
//! The player drags away from the launch point; the bird flies back along
//! the pull. The angle is therefore measured from the release point toward
//! the press point, and the pull length is the impulse magnitude.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A screen-space point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for Vec2 {
    fn from(p: Point2D) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Launch request derived from a gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpulseVector {
    /// Launch direction (radians)
    pub angle: f32,
    /// Requested impulse before clamping and power scaling
    pub magnitude: f32,
}

impl ImpulseVector {
    /// Impulse actually applied at spawn: capped at `max_impulse`, then scaled
    #[inline]
    pub fn clamped_magnitude(&self, max_impulse: f32, power_multiplier: f32) -> f32 {
        self.magnitude.min(max_impulse) * power_multiplier
    }

    /// World-space impulse vector for the given cap and multiplier
    pub fn to_impulse(&self, max_impulse: f32, power_multiplier: f32) -> Vec2 {
        crate::direction(self.angle) * self.clamped_magnitude(max_impulse, power_multiplier)
    }
}

/// Angle of the vector pointing from `b` to `a`
#[inline]
pub fn angle_of(a: Point2D, b: Point2D) -> f32 {
    (a.y - b.y).atan2(a.x - b.x)
}

/// Euclidean distance
#[inline]
pub fn distance_of(a: Point2D, b: Point2D) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Impulse for a press at `start` released at `end`.
///
/// The angle points from `end` back toward `start`. Coincident points give a
/// zero magnitude and angle 0.
pub fn impulse_vector_of(start: Point2D, end: Point2D) -> ImpulseVector {
    ImpulseVector {
        angle: angle_of(start, end),
        magnitude: distance_of(start, end),
    }
}

/// Clamp `end` to lie within `max_distance` of `start`, keeping its direction
pub fn clamp_drag(start: Point2D, end: Point2D, max_distance: f32) -> Point2D {
    let distance = distance_of(start, end);
    if distance <= max_distance {
        return end;
    }
    let angle = angle_of(end, start);
    Point2D::new(
        start.x + max_distance * angle.cos(),
        start.y + max_distance * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_four_five() {
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(3.0, 4.0);
        let impulse = impulse_vector_of(start, end);
        assert!((impulse.magnitude - 5.0).abs() < 1e-6);
        assert!((impulse.angle - (-4.0f32).atan2(-3.0)).abs() < 1e-6);
        assert!((impulse.angle + 2.2143).abs() < 1e-3);
    }

    #[test]
    fn test_zero_drag() {
        let p = Point2D::new(120.0, 40.0);
        let impulse = impulse_vector_of(p, p);
        assert_eq!(impulse.magnitude, 0.0);
        assert_eq!(impulse.angle, 0.0);
        assert_eq!(impulse.to_impulse(100.0, 50.0), Vec2::ZERO);
    }

    #[test]
    fn test_pull_left_launches_right() {
        // Press at 200, drag left to 150: the bird must fly toward +x.
        let impulse = impulse_vector_of(Point2D::new(200.0, 100.0), Point2D::new(150.0, 100.0));
        let dir = crate::direction(impulse.angle);
        assert!(dir.x > 0.99);
        assert!(dir.y.abs() < 1e-5);
    }

    #[test]
    fn test_clamp_drag() {
        let start = Point2D::new(0.0, 0.0);
        let short = Point2D::new(30.0, 40.0);
        assert_eq!(clamp_drag(start, short, 100.0), short);

        let long = Point2D::new(300.0, 400.0);
        let clamped = clamp_drag(start, long, 100.0);
        assert!((distance_of(start, clamped) - 100.0).abs() < 1e-3);
        assert!((clamped.x - 60.0).abs() < 1e-3);
        assert!((clamped.y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_magnitude_caps() {
        let impulse = ImpulseVector { angle: 0.0, magnitude: 250.0 };
        assert_eq!(impulse.clamped_magnitude(100.0, 50.0), 5000.0);
        let impulse = ImpulseVector { angle: 0.0, magnitude: 40.0 };
        assert_eq!(impulse.clamped_magnitude(100.0, 50.0), 2000.0);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
            let p = Point2D::new(x, y);
            prop_assert_eq!(distance_of(p, p), 0.0);
            prop_assert_eq!(impulse_vector_of(p, p).magnitude, 0.0);
        }

        #[test]
        fn prop_clamp_is_monotonic_then_flat(
            m1 in 0.0f32..500.0,
            m2 in 0.0f32..500.0,
            cap in 1.0f32..200.0,
            power in 0.1f32..100.0,
        ) {
            let (lo, hi) = if m1 <= m2 { (m1, m2) } else { (m2, m1) };
            let a = ImpulseVector { angle: 0.0, magnitude: lo }.clamped_magnitude(cap, power);
            let b = ImpulseVector { angle: 0.0, magnitude: hi }.clamped_magnitude(cap, power);
            prop_assert!(a <= b);
            prop_assert!(b <= cap * power * (1.0 + 1e-6));
            if lo >= cap {
                prop_assert_eq!(a, b);
            }
        }
    }
}
