//! Actors: birds, pigs, scenery
//!
//! Every physical actor owns exactly one body/shape pair, created when the
//! actor is spawned and removed when it is detached. Visuals follow physics
//! one way: [`Actor::update`] copies the body pose into the transform.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, Material, PhysicsEngine, ShapeGeometry, ShapeHandle};
use super::trajectory::ImpulseVector;
use crate::settings::{ObstacleParams, ProjectileParams, Settings, TargetParams};

/// Sprite identity, resolved to an asset by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    RedBird,
    YellowBird,
    BlueBird,
    Pig,
    Column,
    Beam,
    Background,
}

/// Selectable bird types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Plain bird
    #[default]
    Red,
    /// Speed boost on trigger
    Yellow,
    /// Splits in three on trigger
    Blue,
}

impl ProjectileKind {
    /// Number-row bindings: 1 yellow, 2 red, 3 blue
    pub fn from_key_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(ProjectileKind::Yellow),
            2 => Some(ProjectileKind::Red),
            3 => Some(ProjectileKind::Blue),
            _ => None,
        }
    }

    pub fn texture(&self) -> TextureId {
        match self {
            ProjectileKind::Red => TextureId::RedBird,
            ProjectileKind::Yellow => TextureId::YellowBird,
            ProjectileKind::Blue => TextureId::BlueBird,
        }
    }

    pub fn ability(&self, settings: &Settings) -> Ability {
        match self {
            ProjectileKind::Red => Ability::Plain,
            ProjectileKind::Yellow => Ability::Boost {
                impulse_multiplier: settings.boost_impulse_multiplier,
                has_boosted: false,
            },
            ProjectileKind::Blue => Ability::Split {
                angle_offset: settings.split_angle_offset(),
                has_split: false,
            },
        }
    }
}

/// One-shot special ability carried by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ability {
    Plain,
    Boost { impulse_multiplier: f32, has_boosted: bool },
    /// `angle_offset` in radians
    Split { angle_offset: f32, has_split: bool },
}

/// Scenery block shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Column,
    Beam,
}

impl ObstacleKind {
    /// Box size (width, height)
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Column => Vec2::new(20.0, 80.0),
            ObstacleKind::Beam => Vec2::new(100.0, 20.0),
        }
    }

    pub fn texture(&self) -> TextureId {
        match self {
            ObstacleKind::Column => TextureId::Column,
            ObstacleKind::Beam => TextureId::Beam,
        }
    }
}

/// What an actor is
#[derive(Debug, Clone, PartialEq)]
pub enum ActorKind {
    Projectile {
        params: ProjectileParams,
        ability: Ability,
    },
    Target,
    Obstacle(ObstacleKind),
    /// Visual only, never bound to physics
    Decoration,
}

/// The body/shape pair owned by a physical actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBinding {
    pub body: BodyHandle,
    pub shape: ShapeHandle,
}

impl PhysicsBinding {
    /// Create, configure and register a dynamic body with one shape
    pub fn create(
        physics: &mut dyn PhysicsEngine,
        mass: f32,
        geometry: ShapeGeometry,
        position: Vec2,
        material: Material,
        layer: u32,
    ) -> Self {
        let body = physics.create_body(mass, geometry.moment_for(mass), position);
        let shape = physics.create_shape(body, geometry);
        physics.set_material(shape, material);
        physics.set_collision_layer(shape, layer);
        physics.register(body, shape);
        Self { body, shape }
    }

    /// Remove the pair, swallowing unknown-handle reports
    pub fn remove(self, physics: &mut dyn PhysicsEngine) {
        if let Err(err) = physics.remove(self.body, self.shape) {
            log::debug!("ignoring physics removal failure: {err}");
        }
    }
}

/// Sprite transform mirrored from the body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Radians
    pub rotation: f32,
}

/// A split child, spawned by the controller in place of its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitChild {
    pub position: Vec2,
    pub velocity: Vec2,
    pub params: ProjectileParams,
    pub texture: TextureId,
}

/// Result of [`Actor::trigger`]
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// The actor has no ability
    Unavailable,
    /// Already used
    Spent,
    /// Velocity changed in place; `impulse` is in world space
    Boosted { impulse: Vec2 },
    /// The parent must be replaced by these children in one operation
    Split { children: [SplitChild; 3] },
}

/// A game entity
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: u32,
    pub kind: ActorKind,
    pub texture: TextureId,
    pub transform: Transform,
    binding: Option<PhysicsBinding>,
}

impl Actor {
    /// Launch a bird at `position` with the gesture impulse.
    ///
    /// The impulse is capped at `max_impulse`, scaled by `power_multiplier`
    /// and applied once along `impulse.angle`. A fresh body has angle 0, so
    /// its local frame is the world frame.
    pub fn spawn_projectile(
        id: u32,
        kind: ProjectileKind,
        impulse: ImpulseVector,
        position: Vec2,
        settings: &Settings,
        physics: &mut dyn PhysicsEngine,
    ) -> Self {
        let params = settings.projectile;
        let binding = bind_projectile(&params, position, physics);
        let applied = impulse.to_impulse(params.max_impulse, params.power_multiplier);
        physics.apply_impulse_local(binding.body, applied);

        Self {
            id,
            kind: ActorKind::Projectile {
                params,
                ability: kind.ability(settings),
            },
            texture: kind.texture(),
            transform: Transform {
                position,
                rotation: 0.0,
            },
            binding: Some(binding),
        }
    }

    /// Spawn a plain bird moving at exactly `velocity` (split children).
    ///
    /// Velocity is assigned directly; an impulse would depend on mass.
    pub fn spawn_projectile_with_velocity(
        id: u32,
        child: &SplitChild,
        physics: &mut dyn PhysicsEngine,
    ) -> Self {
        let binding = bind_projectile(&child.params, child.position, physics);
        physics.set_velocity(binding.body, child.velocity);

        Self {
            id,
            kind: ActorKind::Projectile {
                params: child.params,
                ability: Ability::Plain,
            },
            texture: child.texture,
            transform: Transform {
                position: child.position,
                rotation: 0.0,
            },
            binding: Some(binding),
        }
    }

    pub fn spawn_target(
        id: u32,
        position: Vec2,
        params: &TargetParams,
        physics: &mut dyn PhysicsEngine,
    ) -> Self {
        let binding = PhysicsBinding::create(
            physics,
            params.mass,
            ShapeGeometry::Circle {
                radius: params.radius,
            },
            position,
            Material {
                elasticity: params.elasticity,
                friction: params.friction,
            },
            params.collision_layer,
        );

        Self {
            id,
            kind: ActorKind::Target,
            texture: TextureId::Pig,
            transform: Transform {
                position,
                rotation: 0.0,
            },
            binding: Some(binding),
        }
    }

    pub fn spawn_obstacle(
        id: u32,
        kind: ObstacleKind,
        position: Vec2,
        params: &ObstacleParams,
        physics: &mut dyn PhysicsEngine,
    ) -> Self {
        let size = kind.size();
        let binding = PhysicsBinding::create(
            physics,
            params.mass,
            ShapeGeometry::Box {
                width: size.x,
                height: size.y,
            },
            position,
            Material {
                elasticity: params.elasticity,
                friction: params.friction,
            },
            params.collision_layer,
        );

        Self {
            id,
            kind: ActorKind::Obstacle(kind),
            texture: kind.texture(),
            transform: Transform {
                position,
                rotation: 0.0,
            },
            binding: Some(binding),
        }
    }

    pub fn decoration(id: u32, texture: TextureId, position: Vec2) -> Self {
        Self {
            id,
            kind: ActorKind::Decoration,
            texture,
            transform: Transform {
                position,
                rotation: 0.0,
            },
            binding: None,
        }
    }

    pub fn binding(&self) -> Option<PhysicsBinding> {
        self.binding
    }

    pub fn shape(&self) -> Option<ShapeHandle> {
        self.binding.map(|b| b.shape)
    }

    pub fn is_target(&self) -> bool {
        matches!(self.kind, ActorKind::Target)
    }

    pub fn ability(&self) -> Option<&Ability> {
        match &self.kind {
            ActorKind::Projectile { ability, .. } => Some(ability),
            _ => None,
        }
    }

    /// Copy the body pose into the transform.
    ///
    /// A non-finite angle from the engine keeps the previous rotation.
    pub fn update(&mut self, physics: &dyn PhysicsEngine) {
        let Some(binding) = self.binding else {
            return;
        };
        let Some(pose) = physics.pose(binding.body) else {
            return;
        };
        self.transform.position = pose.position;
        if pose.angle.is_finite() {
            self.transform.rotation = crate::normalize_angle(pose.angle);
        } else {
            log::debug!("body {:?} reported angle {}", binding.body, pose.angle);
        }
    }

    /// Remove the physics binding. Safe to call twice.
    pub fn detach(&mut self, physics: &mut dyn PhysicsEngine) {
        if let Some(binding) = self.binding.take() {
            binding.remove(physics);
        }
    }

    /// Use the projectile's ability, at most once.
    ///
    /// A boost is applied here. A split only computes the children and marks
    /// the parent spent; swapping parent for children is the owner's job.
    pub fn trigger(&mut self, physics: &mut dyn PhysicsEngine) -> TriggerOutcome {
        let Some(binding) = self.binding else {
            return TriggerOutcome::Unavailable;
        };
        let texture = self.texture;
        let ActorKind::Projectile { params, ability } = &mut self.kind else {
            return TriggerOutcome::Unavailable;
        };

        match ability {
            Ability::Plain => TriggerOutcome::Unavailable,
            Ability::Boost { has_boosted: true, .. } | Ability::Split { has_split: true, .. } => {
                TriggerOutcome::Spent
            }
            Ability::Boost {
                impulse_multiplier,
                has_boosted,
            } => {
                let (Some(pose), Some(velocity)) =
                    (physics.pose(binding.body), physics.velocity(binding.body))
                else {
                    log::debug!("boost on body {:?} with no pose", binding.body);
                    return TriggerOutcome::Unavailable;
                };
                // Local +x is the body's forward direction
                let magnitude = *impulse_multiplier * velocity.length();
                physics.apply_impulse_local(binding.body, Vec2::X * magnitude);
                *has_boosted = true;
                TriggerOutcome::Boosted {
                    impulse: crate::direction(pose.angle) * magnitude,
                }
            }
            Ability::Split {
                angle_offset,
                has_split,
            } => {
                let (Some(pose), Some(velocity)) =
                    (physics.pose(binding.body), physics.velocity(binding.body))
                else {
                    log::debug!("split on body {:?} with no pose", binding.body);
                    return TriggerOutcome::Unavailable;
                };
                let offset = *angle_offset;
                let child = |delta: f32| SplitChild {
                    position: pose.position,
                    velocity: crate::rotated(velocity, delta),
                    params: *params,
                    texture,
                };
                *has_split = true;
                TriggerOutcome::Split {
                    children: [child(offset), child(0.0), child(-offset)],
                }
            }
        }
    }
}

fn bind_projectile(
    params: &ProjectileParams,
    position: Vec2,
    physics: &mut dyn PhysicsEngine,
) -> PhysicsBinding {
    PhysicsBinding::create(
        physics,
        params.mass,
        ShapeGeometry::Circle {
            radius: params.radius,
        },
        position,
        Material {
            elasticity: params.elasticity,
            friction: params.friction,
        },
        params.collision_layer,
    )
}
