//! Render boundary
//!
//! The game doesn't draw. Each frame it flattens the session into sprite
//! instances (background first, then scenery, then birds) plus the aim
//! line, and hands them to whatever drawer the shell provides.

pub mod sprite;

pub use sprite::{LineVertex, SpriteInstance, texture_asset, texture_slot};

use crate::sim::{GameState, Point2D};

/// External sprite drawer
pub trait SpriteDrawer {
    fn draw(&mut self, sprite: &SpriteInstance);
    fn draw_line(&mut self, _line: &[LineVertex; 2]) {}
}

/// All sprites for the current frame, back to front
pub fn sprite_instances(state: &GameState) -> Vec<SpriteInstance> {
    state
        .decorations
        .iter()
        .chain(state.world.iter())
        .chain(state.projectiles.iter())
        .map(SpriteInstance::from_actor)
        .collect()
}

/// Aim line from the press point to the clamped drag point, while aiming
pub fn aim_line(state: &GameState, max_distance: f32) -> Option<[LineVertex; 2]> {
    if !state.aim.active {
        return None;
    }
    let Point2D { x: sx, y: sy } = state.aim.start;
    let Point2D { x: ex, y: ey } = state.aim.display_end(max_distance);
    Some([
        LineVertex::new(sx, sy, sprite::colors::AIM_LINE),
        LineVertex::new(ex, ey, sprite::colors::AIM_LINE),
    ])
}

/// Feed one frame to a drawer
pub fn draw_frame(state: &GameState, drawer: &mut dyn SpriteDrawer) {
    for sprite in sprite_instances(state) {
        drawer.draw(&sprite);
    }
    if let Some(line) = aim_line(state, state.settings.max_drag_distance) {
        drawer.draw_line(&line);
    }
}
