//! Game tunables
//!
//! Everything balance-related lives here so levels can be tuned without
//! touching simulation code. Stored as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GRAVITY, MAX_DRAG_DISTANCE, SIM_DT};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Physical parameters of a launched bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileParams {
    pub mass: f32,
    pub radius: f32,
    /// Hard cap on the gesture-derived impulse before the multiplier
    pub max_impulse: f32,
    pub power_multiplier: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub collision_layer: u32,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            mass: 5.0,
            radius: 12.0,
            max_impulse: 100.0,
            power_multiplier: 50.0,
            elasticity: 0.8,
            friction: 1.0,
            collision_layer: 0,
        }
    }
}

/// Physical parameters of a pig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    pub mass: f32,
    pub radius: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub collision_layer: u32,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            mass: 2.0,
            radius: 12.0,
            elasticity: 0.8,
            friction: 0.4,
            collision_layer: 0,
        }
    }
}

/// Physical parameters shared by columns and beams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleParams {
    pub mass: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub collision_layer: u32,
}

impl Default for ObstacleParams {
    fn default() -> Self {
        Self {
            mass: 2.0,
            elasticity: 0.8,
            friction: 1.0,
            collision_layer: 0,
        }
    }
}

/// Game tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Collision outcome ===
    /// Contacts weaker than this never do anything
    pub destroy_lower_bound: f32,
    /// Contacts stronger than this destroy every actor involved
    pub destroy_upper_bound: f32,
    /// Treat a contact exactly at the upper bound as destructive
    pub upper_bound_inclusive: bool,

    // === Aiming ===
    /// Aim line length cap
    pub max_drag_distance: f32,
    /// Launch from the clamped aim point instead of the raw release point
    pub clamp_launch_to_aim: bool,

    // === World ===
    pub sim_dt: f32,
    pub gravity: Vec2,

    // === Actors ===
    pub projectile: ProjectileParams,
    /// Yellow bird: boost impulse per unit of current speed
    pub boost_impulse_multiplier: f32,
    /// Blue bird: spread between split children (degrees)
    pub split_angle_offset_deg: f32,
    pub target: TargetParams,
    pub obstacle: ObstacleParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            destroy_lower_bound: 100.0,
            destroy_upper_bound: 1200.0,
            upper_bound_inclusive: false,

            max_drag_distance: MAX_DRAG_DISTANCE,
            clamp_launch_to_aim: true,

            sim_dt: SIM_DT,
            gravity: Vec2::new(0.0, GRAVITY),

            projectile: ProjectileParams::default(),
            boost_impulse_multiplier: 2.0,
            split_angle_offset_deg: 30.0,
            target: TargetParams::default(),
            obstacle: ObstacleParams::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Split spread in radians
    pub fn split_angle_offset(&self) -> f32 {
        self.split_angle_offset_deg.to_radians()
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
            SettingsError::Invalid { field, reason }
        }

        if !self.destroy_lower_bound.is_finite() || self.destroy_lower_bound < 0.0 {
            return Err(invalid("destroy_lower_bound", "must be finite and non-negative"));
        }
        if !self.destroy_upper_bound.is_finite() {
            return Err(invalid("destroy_upper_bound", "must be finite"));
        }
        if self.destroy_upper_bound < self.destroy_lower_bound {
            return Err(invalid("destroy_upper_bound", "must not be below the lower bound"));
        }
        if !(self.sim_dt > 0.0 && self.sim_dt.is_finite()) {
            return Err(invalid("sim_dt", "must be positive"));
        }
        if self.max_drag_distance <= 0.0 {
            return Err(invalid("max_drag_distance", "must be positive"));
        }
        if self.projectile.mass <= 0.0 || self.projectile.radius <= 0.0 {
            return Err(invalid("projectile", "mass and radius must be positive"));
        }
        if self.projectile.max_impulse < 0.0 {
            return Err(invalid("projectile.max_impulse", "must be non-negative"));
        }
        if self.target.mass <= 0.0 || self.target.radius <= 0.0 {
            return Err(invalid("target", "mass and radius must be positive"));
        }
        if self.obstacle.mass <= 0.0 {
            return Err(invalid("obstacle.mass", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.destroy_lower_bound, 100.0);
        assert_eq!(settings.destroy_upper_bound, 1200.0);
        assert!((settings.split_angle_offset() - 30f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "destroy_upper_bound": 900.0 }"#).unwrap();
        assert_eq!(settings.destroy_upper_bound, 900.0);
        assert_eq!(settings.destroy_lower_bound, 100.0);
        assert_eq!(settings.projectile, ProjectileParams::default());
    }

    #[test]
    fn test_nested_partial_json() {
        let settings = Settings::from_json(r#"{ "projectile": { "mass": 8.0 } }"#).unwrap();
        assert_eq!(settings.projectile.mass, 8.0);
        assert_eq!(settings.projectile.power_multiplier, 50.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_tunables() {
        let mut settings = Settings::default();
        settings.upper_bound_inclusive = true;
        settings.boost_impulse_multiplier = 3.5;
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert!(back.upper_bound_inclusive);
        assert_eq!(back.boost_impulse_multiplier, 3.5);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = Settings::from_json(r#"{ "destroy_lower_bound": 500.0, "destroy_upper_bound": 200.0 }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "destroy_upper_bound", .. }));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
