//! # engine_app — scene host
//!
//! Loads a scene, builds every entry through the game entity factory, and
//! steps the result on a manual clock.
//!
//! ## Run sequence
//!
//! 1. Parse flags (`--steps`, `--scene`).
//! 2. Load the scene file, or the built-in demo scene.
//! 3. Spawn each entry into the [`World`](world::World).
//! 4. Push every physics body right and run the tick loop.
//! 5. Detach sounds from their sprites and print the world snapshot.

mod scene;
mod tick;
mod world;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use engine_component::ComponentName;
use engine_factory::FactoryConfig;
use engine_sprite::{ManualClock, SpritePhysicsComponent, SpriteSoundComponent};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tick::{TickConfig, TickLoop};
use world::World;

/// Horizontal acceleration given to every physics body, in px/s².
const PUSH_ACCELERATION: f32 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "engine_app", about = "Spawn a scene and step it")]
struct Args {
    /// Number of ticks to run.
    #[arg(long, default_value_t = 3)]
    steps: u64,

    /// Scene JSON file. Uses the built-in demo scene when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();
    info!(steps = args.steps, scene = ?args.scene, "engine_app starting");

    let entries = scene::load(args.scene.as_deref())?;

    let clock = Rc::new(ManualClock::new(0.0));
    let mut world = World::new(FactoryConfig::new().with_clock(clock.clone()));
    for entry in &entries {
        world.spawn(&entry.entity_type, &entry.data);
    }
    info!(
        entities = world.len(),
        changes = world.change_count(),
        "scene spawned"
    );
    let pruned = world.despawn_empty();
    if pruned > 0 {
        info!(pruned, "dropped entities with no components");
    }
    if world.is_empty() {
        warn!("scene has no entities");
    }
    for entity in world.entities() {
        debug!(entity = %entity.id(), components = ?entity.component_names(), "entity");
    }

    for id in world.with_component(ComponentName::PhysicsBody) {
        if let Some(physics) = world
            .get(id)
            .and_then(|entity| entity.live::<SpritePhysicsComponent>(ComponentName::PhysicsBody))
        {
            physics.set_acc_x(PUSH_ACCELERATION);
        }
    }

    let mut tick_loop = TickLoop::new(
        TickConfig {
            max_ticks: args.steps,
            ..TickConfig::default()
        },
        clock,
    );
    tick_loop.run(&world)?;

    for id in world.with_component(ComponentName::Sound) {
        if let Some(sound) = world
            .get(id)
            .and_then(|entity| entity.live::<SpriteSoundComponent>(ComponentName::Sound))
        {
            sound.set_follow_sprite(false)?;
            info!(entity = %id, x = sound.x()?, y = sound.y()?, "sound detached");
        }
    }

    println!("{}", serde_json::to_string_pretty(&world.snapshot()?)?);

    info!(ticks = tick_loop.tick_id(), "engine_app shut down");
    Ok(())
}
