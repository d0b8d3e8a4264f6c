//! Sprite instance records for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::{Actor, TextureId};

/// One textured quad: centre, rotation and texture slot
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    /// Radians
    pub rotation: f32,
    pub texture: u32,
}

impl SpriteInstance {
    pub const fn new(x: f32, y: f32, rotation: f32, texture: TextureId) -> Self {
        Self {
            position: [x, y],
            rotation,
            texture: texture_slot(texture),
        }
    }

    pub fn from_actor(actor: &Actor) -> Self {
        let t = actor.transform;
        Self::new(t.position.x, t.position.y, t.rotation, actor.texture)
    }
}

/// Simple 2D line vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Stable texture slot for the GPU side
pub const fn texture_slot(texture: TextureId) -> u32 {
    match texture {
        TextureId::Background => 0,
        TextureId::RedBird => 1,
        TextureId::YellowBird => 2,
        TextureId::BlueBird => 3,
        TextureId::Pig => 4,
        TextureId::Column => 5,
        TextureId::Beam => 6,
    }
}

/// Asset path and draw scale for each texture
pub fn texture_asset(texture: TextureId) -> (&'static str, f32) {
    match texture {
        TextureId::Background => ("assets/img/background3.png", 1.0),
        TextureId::RedBird => ("assets/img/red-bird3.png", 1.0),
        TextureId::YellowBird => ("assets/img/chuck.png", 1.0),
        TextureId::BlueBird => ("assets/img/blue.png", 1.0),
        TextureId::Pig => ("assets/img/pig_failed.png", 0.1),
        TextureId::Column => ("assets/img/column.png", 1.0),
        TextureId::Beam => ("assets/img/beam.png", 1.0),
    }
}

/// Colors for overlay elements
pub mod colors {
    pub const AIM_LINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
