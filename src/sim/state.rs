//! Session state
//!
//! One struct owns every actor. Actors are addressed by id; spawning and
//! removal happen only through methods here, so a split bird never touches
//! the collections itself.

use glam::Vec2;

use super::actor::{Actor, ObstacleKind, PhysicsBinding, ProjectileKind, SplitChild, TextureId, TriggerOutcome};
use super::collision::CollisionPolicy;
use super::events::GameEvent;
use super::level::{LEVELS, LevelAdvance, LevelLayout, LevelManager, PlacementKind};
use super::physics::{Material, PhysicsEngine, ShapeGeometry, ShapeHandle};
use super::trajectory::{ImpulseVector, Point2D, clamp_drag, impulse_vector_of};
use crate::consts::{CENTER_X, FLOOR_FRICTION, FLOOR_Y, HEIGHT, WIDTH};
use crate::settings::Settings;

/// Drag-to-aim gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimGesture {
    pub active: bool,
    pub start: Point2D,
    pub end: Point2D,
}

impl AimGesture {
    pub fn press(&mut self, at: Point2D) {
        self.active = true;
        self.start = at;
        self.end = at;
    }

    pub fn drag(&mut self, to: Point2D) {
        if self.active {
            self.end = to;
        }
    }

    /// Finish the gesture at `at`; returns (start, end) if one was active
    pub fn release(&mut self, at: Point2D) -> Option<(Point2D, Point2D)> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.end = at;
        Some((self.start, self.end))
    }

    /// End point clamped to `max_distance` from the start, for the aim line
    pub fn display_end(&self, max_distance: f32) -> Point2D {
        clamp_drag(self.start, self.end, max_distance)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    policy: CollisionPolicy,
    /// Level progression
    pub level: LevelManager,
    /// Pigs and blocks of the current level
    pub world: Vec<Actor>,
    /// Birds in flight
    pub projectiles: Vec<Actor>,
    /// Visual-only actors
    pub decorations: Vec<Actor>,
    pub selected: ProjectileKind,
    pub aim: AimGesture,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    floor: Option<PhysicsBinding>,
    next_id: u32,
}

impl GameState {
    /// Start a session on the built-in level table
    pub fn new(settings: Settings, physics: &mut dyn PhysicsEngine) -> Self {
        Self::with_levels(settings, LEVELS, physics)
    }

    /// Start a session: lay the floor and load level 1
    pub fn with_levels(
        settings: Settings,
        levels: &'static [LevelLayout],
        physics: &mut dyn PhysicsEngine,
    ) -> Self {
        let mut state = Self {
            policy: CollisionPolicy::from_settings(&settings),
            settings,
            level: LevelManager::new(levels),
            world: Vec::new(),
            projectiles: Vec::new(),
            decorations: Vec::new(),
            selected: ProjectileKind::default(),
            aim: AimGesture::default(),
            time_ticks: 0,
            events: Vec::new(),
            floor: None,
            next_id: 1,
        };

        state.floor = Some(create_floor(physics));
        let id = state.next_entity_id();
        state.decorations.push(Actor::decoration(
            id,
            TextureId::Background,
            Vec2::new(CENTER_X, HEIGHT / 2.0),
        ));
        state.load_level(physics);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn collision_policy(&self) -> &CollisionPolicy {
        &self.policy
    }

    pub fn floor_shape(&self) -> Option<ShapeHandle> {
        self.floor.map(|f| f.shape)
    }

    pub fn is_finished(&self) -> bool {
        self.level.is_finished()
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn actor(&self, id: u32) -> Option<&Actor> {
        self.world
            .iter()
            .chain(self.projectiles.iter())
            .find(|a| a.id == id)
    }

    /// Live actor bound to `shape`, if any
    pub fn actor_id_for_shape(&self, shape: ShapeHandle) -> Option<u32> {
        self.world
            .iter()
            .chain(self.projectiles.iter())
            .find(|a| a.shape() == Some(shape))
            .map(|a| a.id)
    }

    /// Copy body poses into every actor's transform
    pub fn sync_visuals(&mut self, physics: &dyn PhysicsEngine) {
        for actor in self.world.iter_mut().chain(self.projectiles.iter_mut()) {
            actor.update(physics);
        }
    }

    pub fn select_projectile(&mut self, kind: ProjectileKind) {
        if self.selected != kind {
            log::debug!("{kind:?} bird selected");
        }
        self.selected = kind;
        self.events.push(GameEvent::ProjectileSelected { kind });
    }

    /// Launch the selected bird from `start`/`end` of a finished gesture
    pub fn launch(&mut self, start: Point2D, end: Point2D, physics: &mut dyn PhysicsEngine) -> u32 {
        let end = if self.settings.clamp_launch_to_aim {
            clamp_drag(start, end, self.settings.max_drag_distance)
        } else {
            end
        };
        let impulse = impulse_vector_of(start, end);
        self.launch_impulse(impulse, end.into(), physics)
    }

    pub fn launch_impulse(
        &mut self,
        impulse: ImpulseVector,
        position: Vec2,
        physics: &mut dyn PhysicsEngine,
    ) -> u32 {
        let id = self.next_entity_id();
        let kind = self.selected;
        let bird = Actor::spawn_projectile(id, kind, impulse, position, &self.settings, physics);
        log::debug!(
            "launched {kind:?} bird {id} at {position} (angle {:.3}, pull {:.1})",
            impulse.angle,
            impulse.magnitude
        );
        self.projectiles.push(bird);
        self.events.push(GameEvent::ProjectileLaunched { id, kind, impulse });
        id
    }

    /// Fire every bird's ability once. Birds without one, or already spent,
    /// are left alone.
    pub fn trigger_abilities(&mut self, physics: &mut dyn PhysicsEngine) {
        let ids: Vec<u32> = self.projectiles.iter().map(|a| a.id).collect();
        for id in ids {
            let Some(index) = self.projectiles.iter().position(|a| a.id == id) else {
                continue;
            };
            match self.projectiles[index].trigger(physics) {
                TriggerOutcome::Boosted { impulse } => {
                    log::debug!("bird {id} boosted by {impulse}");
                    self.events.push(GameEvent::AbilityTriggered { id });
                }
                TriggerOutcome::Split { children } => {
                    self.replace_with_children(index, &children, physics);
                }
                TriggerOutcome::Unavailable | TriggerOutcome::Spent => {}
            }
        }
    }

    /// Swap the bird at `index` for its split children in one step
    fn replace_with_children(
        &mut self,
        index: usize,
        children: &[SplitChild; 3],
        physics: &mut dyn PhysicsEngine,
    ) {
        let mut parent = self.projectiles.remove(index);
        parent.detach(physics);

        let mut ids = [0; 3];
        for (slot, child) in ids.iter_mut().zip(children) {
            let id = self.next_entity_id();
            self.projectiles
                .push(Actor::spawn_projectile_with_velocity(id, child, physics));
            *slot = id;
        }
        log::debug!("bird {} split into {:?}", parent.id, ids);
        self.events.push(GameEvent::ProjectileSplit {
            parent: parent.id,
            children: ids,
        });
    }

    /// Remove an actor and its physics binding. Pigs report to the level.
    ///
    /// Returns `false` for ids that are already gone.
    pub fn destroy_actor(&mut self, id: u32, physics: &mut dyn PhysicsEngine) -> bool {
        let mut actor = if let Some(i) = self.world.iter().position(|a| a.id == id) {
            self.world.remove(i)
        } else if let Some(i) = self.projectiles.iter().position(|a| a.id == id) {
            self.projectiles.remove(i)
        } else {
            return false;
        };

        actor.detach(physics);
        let was_target = actor.is_target();
        log::debug!("destroyed {:?} {}", actor.kind, id);
        self.events.push(GameEvent::ActorDestroyed { id, was_target });
        if was_target {
            self.level.on_target_destroyed();
        }
        true
    }

    /// Remove every pig, block and bird from the world and from physics
    pub fn clear_level(&mut self, physics: &mut dyn PhysicsEngine) {
        for actor in self.world.iter_mut().chain(self.projectiles.iter_mut()) {
            actor.detach(physics);
        }
        self.world.clear();
        self.projectiles.clear();
    }

    /// Sweep the world and build the next level, or finish the game.
    /// Levels without pigs are skipped.
    pub fn load_level(&mut self, physics: &mut dyn PhysicsEngine) {
        self.clear_level(physics);
        let mut advance = self.level.begin_next();
        while let LevelAdvance::Load { index, layout } = advance {
            self.build_layout(layout, physics);
            if !self.level.clear_if_empty() {
                break;
            }
            log::warn!("level {index} ({}) has no pigs, skipping", layout.name);
            self.clear_level(physics);
            advance = self.level.begin_next();
        }

        match advance {
            LevelAdvance::Load { index, layout } => {
                let targets = self.level.target_count();
                log::info!("Level {index}: {} ({targets} pigs)", layout.name);
                self.events.push(GameEvent::LevelLoaded {
                    index,
                    name: layout.name,
                    targets,
                });
            }
            LevelAdvance::Finished => {
                log::info!("Game over, all levels cleared");
                self.events.push(GameEvent::GameFinished);
            }
            LevelAdvance::Idle => {}
        }
    }

    fn build_layout(&mut self, layout: &LevelLayout, physics: &mut dyn PhysicsEngine) {
        for placement in layout.placements {
            let position = Vec2::new(placement.x, placement.y);
            match placement.kind {
                PlacementKind::Target => self.add_target(position, physics),
                PlacementKind::Obstacle(kind) => self.add_obstacle(kind, position, physics),
            }
        }
    }

    /// Load the next level if the last pig just died
    pub fn advance_level_if_cleared(&mut self, physics: &mut dyn PhysicsEngine) -> bool {
        if !self.level.is_cleared() {
            return false;
        }
        self.load_level(physics);
        true
    }

    pub fn add_target(&mut self, position: Vec2, physics: &mut dyn PhysicsEngine) {
        let id = self.next_entity_id();
        let pig = Actor::spawn_target(id, position, &self.settings.target, physics);
        self.world.push(pig);
        self.level.record_target_added();
    }

    pub fn add_obstacle(&mut self, kind: ObstacleKind, position: Vec2, physics: &mut dyn PhysicsEngine) {
        let id = self.next_entity_id();
        let block = Actor::spawn_obstacle(id, kind, position, &self.settings.obstacle, physics);
        self.world.push(block);
    }
}

/// Static ground segment across the whole width
fn create_floor(physics: &mut dyn PhysicsEngine) -> PhysicsBinding {
    let body = physics.create_static_body();
    let shape = physics.create_shape(
        body,
        ShapeGeometry::Segment {
            a: Vec2::new(0.0, FLOOR_Y),
            b: Vec2::new(WIDTH, FLOOR_Y),
            radius: 0.0,
        },
    );
    physics.set_material(
        shape,
        Material {
            elasticity: 0.0,
            friction: FLOOR_FRICTION,
        },
    );
    physics.register(body, shape);
    PhysicsBinding { body, shape }
}
