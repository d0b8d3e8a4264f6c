//! Slingshot - a 2D projectile-physics puzzle game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (trajectory, actors, collision outcomes, levels)
//! - `renderer`: Sprite instance lists for an external drawer
//! - `settings`: Data-driven tunables
//! - `logging`: Logger setup for the binary and tests

pub mod logging;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions (screen space, y up)
    pub const WIDTH: f32 = 1800.0;
    pub const HEIGHT: f32 = 800.0;
    /// Horizontal centre, the origin of the level layouts
    pub const CENTER_X: f32 = WIDTH / 2.0;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = -900.0;

    /// Ground line
    pub const FLOOR_Y: f32 = 15.0;
    pub const FLOOR_FRICTION: f32 = 10.0;

    /// Aim line length cap
    pub const MAX_DRAG_DISTANCE: f32 = 100.0;
}

/// Normalized angle to [-π, π). Non-finite input yields NaN.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative remainders
    if wrapped >= PI { -PI } else { wrapped }
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotated(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    rotated(Vec2::X, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!((normalize_angle(-2.5 * PI) + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_angle_huge_and_non_finite() {
        let wrapped = normalize_angle(2.0e8);
        assert!((-PI..PI).contains(&wrapped));
        assert!(normalize_angle(f32::INFINITY).is_nan());
        assert!(normalize_angle(f32::NAN).is_nan());
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let v = rotated(Vec2::new(2.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
        assert!((direction(PI).x + 1.0).abs() < 1e-6);
    }
}
