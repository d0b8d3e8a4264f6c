//! Gameplay events emitted by the frame loop, drained by the shell.

use super::actor::ProjectileKind;
use super::trajectory::ImpulseVector;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ProjectileSelected {
        kind: ProjectileKind,
    },
    ProjectileLaunched {
        id: u32,
        kind: ProjectileKind,
        impulse: ImpulseVector,
    },
    /// A yellow bird boosted
    AbilityTriggered {
        id: u32,
    },
    /// A blue bird was replaced by three children
    ProjectileSplit {
        parent: u32,
        children: [u32; 3],
    },
    ActorDestroyed {
        id: u32,
        was_target: bool,
    },
    LevelLoaded {
        index: u32,
        name: &'static str,
        targets: u32,
    },
    GameFinished,
}
