//! Fixed-timestep simulation loop for the demo scene.
//!
//! Each tick advances the shared clock by one step, then for every entity
//! holding a `physicsBody`:
//!
//! 1. Integrate acceleration into speed.
//! 2. Move the sprite by speed through the physics view.
//! 3. Switch `state` between `running` and `idle` from the resulting speed.

use std::rc::Rc;

use engine_component::{ComponentError, ComponentName, Entity};
use engine_sprite::{Clock, ManualClock, SpritePhysicsComponent, StateComponent, Vec2};
use tracing::{debug, info, warn};

use crate::world::World;

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Step length in milliseconds.
    pub dt_ms: f64,
    /// Number of ticks [`TickLoop::run`] performs.
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            dt_ms: 1000.0 / 60.0,
            max_ticks: 3,
        }
    }
}

/// Drives a [`World`] on a manual clock.
#[derive(Debug)]
pub struct TickLoop {
    tick_id: u64,
    config: TickConfig,
    clock: Rc<ManualClock>,
}

impl TickLoop {
    /// `clock` must be the clock the world's state components were built with.
    #[must_use]
    pub fn new(config: TickConfig, clock: Rc<ManualClock>) -> Self {
        Self {
            tick_id: 0,
            config,
            clock,
        }
    }

    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Run one step.
    pub fn tick(&mut self, world: &World) -> Result<(), ComponentError> {
        self.tick_id += 1;
        self.clock.advance(self.config.dt_ms);
        let dt = (self.config.dt_ms / 1000.0) as f32;

        for id in world.with_component(ComponentName::PhysicsBody) {
            let Some(entity) = world.get(id) else {
                continue;
            };
            if let Err(err) = step_entity(entity, dt) {
                warn!(tick_id = self.tick_id, entity = %id, error = %err, "tick aborted");
                return Err(err);
            }
        }

        debug!(tick_id = self.tick_id, now = self.clock.now(), "tick");
        Ok(())
    }

    /// Run `max_ticks` steps back to back.
    pub fn run(&mut self, world: &World) -> Result<(), ComponentError> {
        info!(
            dt_ms = self.config.dt_ms,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );
        for _ in 0..self.config.max_ticks {
            self.tick(world)?;
        }
        info!(ticks = self.tick_id, "tick loop complete");
        Ok(())
    }
}

fn step_entity(entity: &Entity, dt: f32) -> Result<(), ComponentError> {
    let physics = entity.require_live::<SpritePhysicsComponent>(ComponentName::PhysicsBody)?;

    let speed = physics.speed() + physics.acceleration() * dt;
    physics.set_spd_x(speed.x);
    physics.set_spd_y(speed.y);

    let position = physics.position()? + speed * dt;
    physics.set_x(position.x)?;
    physics.set_y(position.y)?;

    if let Some(state) = entity.live::<StateComponent>(ComponentName::State) {
        let next = if speed == Vec2::ZERO { "idle" } else { "running" };
        if !state.is(next) {
            debug!(entity = %entity.id(), from = %state.state(), to = next, "state change");
            state.set_state(next);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine_factory::{EntityData, EntityType, FactoryConfig};

    use super::*;

    fn setup() -> (World, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(0.0));
        let world = World::new(FactoryConfig::new().with_clock(clock.clone()));
        (world, clock)
    }

    fn config(max_ticks: u64) -> TickConfig {
        TickConfig {
            dt_ms: 1000.0,
            max_ticks,
        }
    }

    #[test]
    fn test_tick_advances_counter_and_clock() {
        let (world, clock) = setup();
        let mut tick_loop = TickLoop::new(TickConfig::default(), clock.clone());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(&world).unwrap();
        tick_loop.tick(&world).unwrap();
        assert_eq!(tick_loop.tick_id(), 2);
        assert!((clock.now() - 2000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_integrates_motion() {
        let (mut world, clock) = setup();
        let player = world.spawn(&EntityType::Player, &EntityData::rect(0.0, 0.0, 16.0, 16.0));
        let physics = player
            .live::<SpritePhysicsComponent>(ComponentName::PhysicsBody)
            .unwrap();
        physics.set_acc_x(2.0);

        let mut tick_loop = TickLoop::new(config(2), clock);
        tick_loop.run(&world).unwrap();

        assert_eq!(physics.spd_x(), 4.0);
        assert_eq!(physics.x().unwrap(), 6.0);
        assert_eq!(physics.mid_point_x().unwrap(), 14.0);
    }

    #[test]
    fn test_state_follows_speed() {
        let (mut world, clock) = setup();
        let monster = world.spawn(&EntityType::Monster, &EntityData::rect(0.0, 0.0, 8.0, 8.0));
        let physics = monster
            .live::<SpritePhysicsComponent>(ComponentName::PhysicsBody)
            .unwrap();
        let state = monster.live::<StateComponent>(ComponentName::State).unwrap();

        let mut tick_loop = TickLoop::new(config(1), clock);
        tick_loop.run(&world).unwrap();
        assert_eq!(state.state(), "idle");
        assert_eq!(state.last_state(), None);

        physics.set_spd_y(1.0);
        tick_loop.tick(&world).unwrap();
        assert_eq!(state.state(), "running");
        assert_eq!(state.last_state().as_deref(), Some("idle"));
        assert_eq!(state.last_update(), 2000.0);
    }

    #[test]
    fn test_missing_sprite_stops_the_loop() {
        let (mut world, clock) = setup();
        let player = world.spawn(&EntityType::Player, &EntityData::rect(0.0, 0.0, 16.0, 16.0));
        player.remove_component(ComponentName::Sprite);

        let mut tick_loop = TickLoop::new(config(3), clock);
        let err = tick_loop.run(&world).unwrap_err();
        assert!(matches!(err, ComponentError::MissingDependency { .. }));
        assert_eq!(tick_loop.tick_id(), 1);
    }
}
