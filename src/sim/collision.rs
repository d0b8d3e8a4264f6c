//! Collision outcome policy
//!
//! The contact impulse is the only destruction signal: weak contacts are
//! ignored, mid-range contacts are absorbed, and hard contacts destroy every
//! actor touching. There is no damage accumulation.

use serde::{Deserialize, Serialize};

use super::physics::{Contact, PhysicsEngine};
use super::state::GameState;
use crate::settings::Settings;

/// Decision for one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// Below the lower bound (resting contacts, grazes)
    Ignore,
    /// Between the bounds
    Absorb,
    /// Above the upper bound: everything in the contact breaks
    Destroy,
}

/// Impulse thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPolicy {
    pub lower_bound: f32,
    pub upper_bound: f32,
    /// Whether a contact exactly at `upper_bound` destroys
    pub upper_inclusive: bool,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self {
            lower_bound: 100.0,
            upper_bound: 1200.0,
            upper_inclusive: false,
        }
    }
}

impl CollisionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lower_bound: settings.destroy_lower_bound,
            upper_bound: settings.destroy_upper_bound,
            upper_inclusive: settings.upper_bound_inclusive,
        }
    }

    pub fn classify(&self, impulse: f32) -> ContactOutcome {
        if !impulse.is_finite() || impulse < self.lower_bound {
            return ContactOutcome::Ignore;
        }
        let destroys = if self.upper_inclusive {
            impulse >= self.upper_bound
        } else {
            impulse > self.upper_bound
        };
        if destroys {
            ContactOutcome::Destroy
        } else {
            ContactOutcome::Absorb
        }
    }
}

/// Apply the policy to one contact. Returns the number of actors destroyed.
///
/// Shapes that no longer belong to a live actor are skipped, so contacts
/// referring to actors removed earlier in the same step are harmless.
pub fn apply_contact(state: &mut GameState, physics: &mut dyn PhysicsEngine, contact: &Contact) -> usize {
    if state.collision_policy().classify(contact.impulse) != ContactOutcome::Destroy {
        return 0;
    }

    let mut destroyed = 0;
    for shape in [contact.shape_a, contact.shape_b] {
        if let Some(id) = state.actor_id_for_shape(shape) {
            if state.destroy_actor(id, physics) {
                destroyed += 1;
            }
        }
    }
    destroyed
}

/// Apply the policy to a whole step's contacts, in order
pub fn apply_contacts(state: &mut GameState, physics: &mut dyn PhysicsEngine, contacts: &[Contact]) -> usize {
    let mut destroyed = 0;
    for contact in contacts {
        destroyed += apply_contact(state, physics, contact);
    }
    destroyed
}
