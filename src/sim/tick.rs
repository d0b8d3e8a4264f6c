//! Fixed timestep frame
//!
//! One frame: step physics, sync visuals, handle input, apply collision
//! outcomes for the step's contacts, then run any level transition.

use super::actor::ProjectileKind;
use super::collision::apply_contacts;
use super::physics::PhysicsEngine;
use super::state::GameState;
use super::trajectory::Point2D;

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at a point: start aiming
    GestureDown(Point2D),
    GestureDrag(Point2D),
    /// Primary button released: launch
    GestureUp(Point2D),
    /// Keyboard fire: release the current gesture where it was last dragged
    PrimaryAction,
    /// Secondary button: trigger every bird's ability
    SecondaryAction,
    SelectProjectile(ProjectileKind),
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, physics: &mut dyn PhysicsEngine, input: &TickInput, dt: f32) {
    if state.is_finished() {
        return;
    }
    state.time_ticks += 1;

    let contacts = physics.step(dt);
    state.sync_visuals(physics);

    for event in &input.events {
        handle_input(state, physics, *event);
    }

    apply_contacts(state, physics, &contacts);
    state.advance_level_if_cleared(physics);
}

fn handle_input(state: &mut GameState, physics: &mut dyn PhysicsEngine, event: InputEvent) {
    match event {
        InputEvent::GestureDown(at) => state.aim.press(at),
        InputEvent::GestureDrag(to) => state.aim.drag(to),
        InputEvent::GestureUp(at) => {
            if let Some((start, end)) = state.aim.release(at) {
                state.launch(start, end, physics);
            }
        }
        InputEvent::PrimaryAction => {
            let at = state.aim.end;
            if let Some((start, end)) = state.aim.release(at) {
                state.launch(start, end, physics);
            }
        }
        InputEvent::SecondaryAction => state.trigger_abilities(physics),
        InputEvent::SelectProjectile(kind) => state.select_projectile(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::events::GameEvent;
    use crate::sim::level::LevelPhase;
    use crate::sim::physics::HeadlessPhysics;
    use glam::Vec2;

    fn new_game() -> (GameState, HeadlessPhysics) {
        let mut physics = HeadlessPhysics::default();
        let mut state = GameState::new(Settings::default(), &mut physics);
        state.take_events();
        (state, physics)
    }

    fn drag_and_release(from: Point2D, to: Point2D) -> TickInput {
        TickInput::new([
            InputEvent::GestureDown(from),
            InputEvent::GestureDrag(to),
            InputEvent::GestureUp(to),
        ])
    }

    #[test]
    fn test_gesture_launches_selected_bird() {
        let (mut state, mut physics) = new_game();
        let input = TickInput::new([InputEvent::SelectProjectile(ProjectileKind::Yellow)]);
        tick(&mut state, &mut physics, &input, SIM_DT);

        let input = drag_and_release(Point2D::new(300.0, 300.0), Point2D::new(250.0, 280.0));
        tick(&mut state, &mut physics, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].texture, crate::sim::actor::TextureId::YellowBird);
        assert!(!state.aim.active);

        // Next frame the bird moves up and to the right
        let spawn = state.projectiles[0].transform.position;
        tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);
        let moved = state.projectiles[0].transform.position - spawn;
        assert!(moved.x > 0.0);
        assert_eq!(state.time_ticks, 3);
    }

    #[test]
    fn test_primary_action_fires_from_last_drag() {
        let (mut state, mut physics) = new_game();
        let input = TickInput::new([
            InputEvent::GestureDown(Point2D::new(300.0, 300.0)),
            InputEvent::GestureDrag(Point2D::new(260.0, 300.0)),
            InputEvent::PrimaryAction,
            InputEvent::PrimaryAction,
        ]);
        tick(&mut state, &mut physics, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].transform.position, Vec2::new(260.0, 300.0));
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let (mut state, mut physics) = new_game();
        let input = TickInput::new([InputEvent::GestureUp(Point2D::new(10.0, 10.0))]);
        tick(&mut state, &mut physics, &input, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_contacts_then_progression_in_one_frame() {
        let (mut state, mut physics) = new_game();
        let pigs: Vec<_> = state.world.iter().filter(|a| a.is_target()).map(|a| a.shape().unwrap()).collect();
        let floor = state.floor_shape().unwrap();

        // Both pigs crushed in the same step, plus a late contact on one of them
        physics.queue_contact(pigs[0], floor, 1500.0);
        physics.queue_contact(floor, pigs[1], 1300.0);
        physics.queue_contact(pigs[1], pigs[0], 5000.0);
        tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);

        assert_eq!(state.level.phase(), LevelPhase::Loaded { index: 2, targets: 6 });
        let events = state.take_events();
        let destroyed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ActorDestroyed { was_target: true, .. }))
            .count();
        assert_eq!(destroyed, 2);
        assert!(events.contains(&GameEvent::LevelLoaded { index: 2, name: "Pyramid", targets: 6 }));
    }

    #[test]
    fn test_weak_contacts_leave_world_intact() {
        let (mut state, mut physics) = new_game();
        let shapes: Vec<_> = state.world.iter().map(|a| a.shape().unwrap()).collect();
        let floor = state.floor_shape().unwrap();
        for (i, shape) in shapes.iter().enumerate() {
            physics.queue_contact(*shape, floor, [0.0, 99.9, 100.0, 600.0][i % 4]);
        }
        tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);
        assert_eq!(state.world.len(), 4);
        assert_eq!(state.level.target_count(), 2);
    }

    #[test]
    fn test_bird_on_contact_is_destroyed_with_target() {
        let (mut state, mut physics) = new_game();
        let input = drag_and_release(Point2D::new(300.0, 300.0), Point2D::new(250.0, 300.0));
        tick(&mut state, &mut physics, &input, SIM_DT);
        let bird = state.projectiles[0].shape().unwrap();
        let pig = state.world[0].shape().unwrap();

        physics.queue_contact(bird, pig, 1200.1);
        tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.level.target_count(), 1);
    }

    #[test]
    fn test_split_parent_contact_is_stale() {
        let (mut state, mut physics) = new_game();
        let select = TickInput::new([InputEvent::SelectProjectile(ProjectileKind::Blue)]);
        tick(&mut state, &mut physics, &select, SIM_DT);
        let input = drag_and_release(Point2D::new(300.0, 300.0), Point2D::new(250.0, 300.0));
        tick(&mut state, &mut physics, &input, SIM_DT);
        let parent = state.projectiles[0].shape().unwrap();
        let pig = state.world[0].shape().unwrap();

        // The step reports a hit on the parent, but the split in this
        // frame's input replaces it first; only the pig breaks.
        physics.queue_contact(parent, pig, 2000.0);
        let trigger = TickInput::new([InputEvent::SecondaryAction]);
        tick(&mut state, &mut physics, &trigger, SIM_DT);
        assert_eq!(state.projectiles.len(), 3);
        assert_eq!(state.level.target_count(), 1);
    }

    #[test]
    fn test_finished_session_stops_ticking() {
        let (mut state, mut physics) = new_game();
        for _ in 0..3 {
            let pigs: Vec<_> = state.world.iter().filter(|a| a.is_target()).map(|a| a.id).collect();
            for pig in pigs {
                state.destroy_actor(pig, &mut physics);
            }
            tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);
        }
        assert!(state.is_finished());
        let ticks = state.time_ticks;
        tick(&mut state, &mut physics, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }
}
