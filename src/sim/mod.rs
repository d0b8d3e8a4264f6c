//! Gameplay simulation
//!
//! All gameplay logic lives here. Rigid-body dynamics are not: the
//! simulation drives an injected [`PhysicsEngine`] and only decides what a
//! contact means. Single-threaded, fixed timestep, no rendering dependencies.

pub mod actor;
pub mod collision;
pub mod events;
pub mod level;
pub mod physics;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use actor::{
    Ability, Actor, ActorKind, ObstacleKind, PhysicsBinding, ProjectileKind, SplitChild, TextureId,
    Transform, TriggerOutcome,
};
pub use collision::{CollisionPolicy, ContactOutcome, apply_contact, apply_contacts};
pub use events::GameEvent;
pub use level::{LEVELS, LevelAdvance, LevelLayout, LevelManager, LevelPhase, Placement, PlacementKind};
pub use physics::{
    BodyHandle, Contact, HeadlessPhysics, Material, PhysicsCall, PhysicsEngine, PhysicsError, Pose,
    ShapeGeometry, ShapeHandle,
};
pub use state::{AimGesture, GameState};
pub use tick::{InputEvent, TickInput, tick};
pub use trajectory::{ImpulseVector, Point2D, angle_of, clamp_drag, distance_of, impulse_vector_of};
