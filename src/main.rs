//! Slingshot entry point
//!
//! Runs a headless, seeded session against the contact-free physics engine:
//! random aims, bird choices and ability triggers, with synthetic impacts
//! standing in for a real solver. Useful for watching progression logs.
//!
//! Usage: `slingshot [settings.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use slingshot::Settings;
use slingshot::consts::WIDTH;
use slingshot::sim::{
    GameEvent, GameState, HeadlessPhysics, InputEvent, Point2D, ProjectileKind, ShapeHandle, TickInput,
    tick,
};

/// Give up after this many frames (a minute and a half at 60 Hz)
const FRAME_LIMIT: u32 = 5400;
const SEED: u64 = 0x5113_6507;

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(err) => {
                log::warn!("{path}: {err}; using defaults");
                Settings::default()
            }
        },
        Err(err) => {
            log::warn!("cannot read {path}: {err}; using defaults");
            Settings::default()
        }
    }
}

/// Scripted player: one launch every second, ability half a second later
fn frame_input(rng: &mut Pcg32, frame: u32) -> TickInput {
    let mut events = Vec::new();
    match frame % 60 {
        0 => {
            let kind = ProjectileKind::from_key_digit(rng.random_range(1..=3u8)).unwrap_or_default();
            events.push(InputEvent::SelectProjectile(kind));
            let start = Point2D::new(250.0, 200.0);
            let end = Point2D::new(
                start.x - rng.random_range(20.0f32..140.0),
                start.y - rng.random_range(-60.0f32..80.0),
            );
            events.push(InputEvent::GestureDown(start));
            events.push(InputEvent::GestureDrag(end));
            events.push(InputEvent::GestureUp(end));
        }
        30 if rng.random_bool(0.7) => events.push(InputEvent::SecondaryAction),
        _ => {}
    }
    TickInput::new(events)
}

/// Pretend the solver reported an impact between a bird and something in
/// the world now and then
fn inject_impacts(rng: &mut Pcg32, state: &GameState, physics: &mut HeadlessPhysics) {
    let birds: Vec<ShapeHandle> = state.projectiles.iter().filter_map(|a| a.shape()).collect();
    let scenery: Vec<ShapeHandle> = state.world.iter().filter_map(|a| a.shape()).collect();
    if birds.is_empty() || scenery.is_empty() || !rng.random_bool(0.05) {
        return;
    }
    let bird = birds[rng.random_range(0..birds.len())];
    let other = scenery[rng.random_range(0..scenery.len())];
    let impulse = rng.random_range(0.0f32..2000.0);
    physics.queue_contact(bird, other, impulse);
}

fn main() {
    slingshot::logging::init(false);
    log::info!("Slingshot (headless) starting...");

    let settings = load_settings();
    let dt = settings.sim_dt;
    let mut physics = HeadlessPhysics::new(settings.gravity);
    let mut state = GameState::new(settings, &mut physics);
    let mut rng = Pcg32::seed_from_u64(SEED);

    let mut frame = 0;
    while frame < FRAME_LIMIT && !state.is_finished() {
        inject_impacts(&mut rng, &state, &mut physics);
        let input = frame_input(&mut rng, frame);
        tick(&mut state, &mut physics, &input, dt);
        frame += 1;

        for event in state.take_events() {
            if let GameEvent::ActorDestroyed { id, was_target: true } = event {
                log::debug!("pig {id} popped");
            }
        }

        // Birds that left the world are no longer interesting
        let lost: Vec<u32> = state
            .projectiles
            .iter()
            .filter(|a| {
                let p = a.transform.position;
                p.y < -200.0 || p.x < -200.0 || p.x > WIDTH + 200.0
            })
            .map(|a| a.id)
            .collect();
        for id in lost {
            state.destroy_actor(id, &mut physics);
        }
    }

    if state.is_finished() {
        log::info!("All levels cleared after {frame} frames");
    } else {
        log::info!(
            "Stopped after {frame} frames on level {} with {} pig(s) left",
            state.level.current_level(),
            state.level.target_count()
        );
    }
}
