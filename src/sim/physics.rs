//! Physics engine boundary
//!
//! The simulation never resolves contacts or integrates bodies itself. It
//! issues commands through [`PhysicsEngine`] and consumes the contacts each
//! step reports. [`HeadlessPhysics`] is a minimal implementation with no
//! contact solver: bodies fly ballistically and contacts are injected by the
//! caller, which is all tests and the demo runner need.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque body handle issued by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Opaque shape handle issued by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub u32);

/// Collision geometry, in body-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
    Segment { a: Vec2, b: Vec2, radius: f32 },
}

impl ShapeGeometry {
    /// Moment of inertia for a solid shape of `mass` about its centre
    pub fn moment_for(&self, mass: f32) -> f32 {
        match *self {
            ShapeGeometry::Circle { radius } => mass * radius * radius / 2.0,
            ShapeGeometry::Box { width, height } => mass * (width * width + height * height) / 12.0,
            ShapeGeometry::Segment { a, b, .. } => mass * a.distance_squared(b) / 12.0,
        }
    }
}

/// Surface material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub elasticity: f32,
    pub friction: f32,
}

/// Body position and rotation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

/// One resolved contact reported by a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub shape_a: ShapeHandle,
    pub shape_b: ShapeHandle,
    /// Magnitude of the total impulse exchanged
    pub impulse: f32,
}

impl Contact {
    pub fn involves(&self, shape: ShapeHandle) -> bool {
        self.shape_a == shape || self.shape_b == shape
    }
}

/// Errors reported for handles the engine doesn't know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
    #[error("unknown shape {0:?}")]
    UnknownShape(ShapeHandle),
}

/// Capabilities the simulation requires from a rigid-body engine
pub trait PhysicsEngine {
    /// Create a dynamic body
    fn create_body(&mut self, mass: f32, moment: f32, position: Vec2) -> BodyHandle;
    /// Create an immovable body (ground)
    fn create_static_body(&mut self) -> BodyHandle;
    fn create_shape(&mut self, body: BodyHandle, geometry: ShapeGeometry) -> ShapeHandle;
    fn set_material(&mut self, shape: ShapeHandle, material: Material);
    fn set_collision_layer(&mut self, shape: ShapeHandle, layer: u32);
    /// Add the pair to the simulated space
    fn register(&mut self, body: BodyHandle, shape: ShapeHandle);
    /// Apply an impulse at the body's origin. `impulse` is in the body's
    /// local frame: local +x points along the body's current angle.
    fn apply_impulse_local(&mut self, body: BodyHandle, impulse: Vec2);
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn pose(&self, body: BodyHandle) -> Option<Pose>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    /// Remove the pair from the simulated space
    fn remove(&mut self, body: BodyHandle, shape: ShapeHandle) -> Result<(), PhysicsError>;
    /// Advance by `dt` and report the contacts resolved during the step
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}

/// Record of a boundary call, kept by [`HeadlessPhysics`]
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsCall {
    CreateBody { body: BodyHandle, mass: f32, moment: f32, position: Vec2 },
    CreateStaticBody { body: BodyHandle },
    CreateShape { body: BodyHandle, shape: ShapeHandle, geometry: ShapeGeometry },
    SetMaterial { shape: ShapeHandle, material: Material },
    SetCollisionLayer { shape: ShapeHandle, layer: u32 },
    Register { body: BodyHandle, shape: ShapeHandle },
    ApplyImpulse { body: BodyHandle, impulse: Vec2 },
    SetVelocity { body: BodyHandle, velocity: Vec2 },
    Remove { body: BodyHandle, shape: ShapeHandle },
    Step { dt: f32 },
}

#[derive(Debug, Clone)]
struct BodyState {
    mass: f32,
    is_static: bool,
    registered: bool,
    pose: Pose,
    velocity: Vec2,
}

#[derive(Debug, Clone)]
struct ShapeState {
    body: BodyHandle,
    geometry: ShapeGeometry,
    material: Material,
    layer: u32,
    registered: bool,
}

/// Contact-free engine: ballistic integration, scripted contacts, call log
#[derive(Debug, Clone)]
pub struct HeadlessPhysics {
    pub gravity: Vec2,
    bodies: BTreeMap<BodyHandle, BodyState>,
    shapes: BTreeMap<ShapeHandle, ShapeState>,
    pending_contacts: Vec<Contact>,
    calls: Vec<PhysicsCall>,
    next_handle: u32,
}

impl HeadlessPhysics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: BTreeMap::new(),
            shapes: BTreeMap::new(),
            pending_contacts: Vec::new(),
            calls: Vec::new(),
            next_handle: 1,
        }
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Queue a contact for delivery by the next [`PhysicsEngine::step`]
    pub fn queue_contact(&mut self, shape_a: ShapeHandle, shape_b: ShapeHandle, impulse: f32) {
        self.pending_contacts.push(Contact {
            shape_a,
            shape_b,
            impulse,
        });
    }

    /// Every boundary call so far, oldest first
    pub fn calls(&self) -> &[PhysicsCall] {
        &self.calls
    }

    /// Shapes currently registered in the space
    pub fn registered_shapes(&self) -> Vec<ShapeHandle> {
        self.shapes
            .iter()
            .filter(|(_, s)| s.registered)
            .map(|(h, _)| *h)
            .collect()
    }

    pub fn is_registered(&self, shape: ShapeHandle) -> bool {
        self.shapes.get(&shape).is_some_and(|s| s.registered)
    }

    pub fn shape_geometry(&self, shape: ShapeHandle) -> Option<ShapeGeometry> {
        self.shapes.get(&shape).map(|s| s.geometry)
    }

    pub fn shape_material(&self, shape: ShapeHandle) -> Option<Material> {
        self.shapes.get(&shape).map(|s| s.material)
    }

    pub fn shape_layer(&self, shape: ShapeHandle) -> Option<u32> {
        self.shapes.get(&shape).map(|s| s.layer)
    }

    pub fn body_mass(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.mass)
    }

    /// Force a body's rotation (stands in for torque in tests)
    pub fn set_angle(&mut self, body: BodyHandle, angle: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pose.angle = angle;
        }
    }
}

impl Default for HeadlessPhysics {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, crate::consts::GRAVITY))
    }
}

impl PhysicsEngine for HeadlessPhysics {
    fn create_body(&mut self, mass: f32, moment: f32, position: Vec2) -> BodyHandle {
        let body = BodyHandle(self.next_handle());
        self.bodies.insert(
            body,
            BodyState {
                mass,
                is_static: false,
                registered: false,
                pose: Pose { position, angle: 0.0 },
                velocity: Vec2::ZERO,
            },
        );
        self.calls.push(PhysicsCall::CreateBody {
            body,
            mass,
            moment,
            position,
        });
        body
    }

    fn create_static_body(&mut self) -> BodyHandle {
        let body = BodyHandle(self.next_handle());
        self.bodies.insert(
            body,
            BodyState {
                mass: f32::INFINITY,
                is_static: true,
                registered: false,
                pose: Pose::default(),
                velocity: Vec2::ZERO,
            },
        );
        self.calls.push(PhysicsCall::CreateStaticBody { body });
        body
    }

    fn create_shape(&mut self, body: BodyHandle, geometry: ShapeGeometry) -> ShapeHandle {
        let shape = ShapeHandle(self.next_handle());
        self.shapes.insert(
            shape,
            ShapeState {
                body,
                geometry,
                material: Material {
                    elasticity: 0.0,
                    friction: 0.0,
                },
                layer: 0,
                registered: false,
            },
        );
        self.calls.push(PhysicsCall::CreateShape {
            body,
            shape,
            geometry,
        });
        shape
    }

    fn set_material(&mut self, shape: ShapeHandle, material: Material) {
        if let Some(s) = self.shapes.get_mut(&shape) {
            s.material = material;
        }
        self.calls.push(PhysicsCall::SetMaterial { shape, material });
    }

    fn set_collision_layer(&mut self, shape: ShapeHandle, layer: u32) {
        if let Some(s) = self.shapes.get_mut(&shape) {
            s.layer = layer;
        }
        self.calls.push(PhysicsCall::SetCollisionLayer { shape, layer });
    }

    fn register(&mut self, body: BodyHandle, shape: ShapeHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.registered = true;
        }
        if let Some(s) = self.shapes.get_mut(&shape) {
            s.registered = true;
        }
        self.calls.push(PhysicsCall::Register { body, shape });
    }

    fn apply_impulse_local(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if !b.is_static && b.mass > 0.0 {
                b.velocity += crate::rotated(impulse, b.pose.angle) / b.mass;
            }
        }
        self.calls.push(PhysicsCall::ApplyImpulse { body, impulse });
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if !b.is_static {
                b.velocity = velocity;
            }
        }
        self.calls.push(PhysicsCall::SetVelocity { body, velocity });
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.bodies.get(&body).map(|b| b.pose)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn remove(&mut self, body: BodyHandle, shape: ShapeHandle) -> Result<(), PhysicsError> {
        self.calls.push(PhysicsCall::Remove { body, shape });
        match self.shapes.get(&shape) {
            Some(s) if s.body == body => {}
            Some(_) | None => return Err(PhysicsError::UnknownShape(shape)),
        }
        if !self.bodies.contains_key(&body) {
            return Err(PhysicsError::UnknownBody(body));
        }
        self.shapes.remove(&shape);
        self.bodies.remove(&body);
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.calls.push(PhysicsCall::Step { dt });
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if body.is_static || !body.registered {
                continue;
            }
            body.velocity += gravity * dt;
            body.pose.position += body.velocity * dt;
        }
        // Contacts naming shapes removed since they were queued are still
        // delivered; stale handles are the consumer's problem.
        std::mem::take(&mut self.pending_contacts)
    }
}
