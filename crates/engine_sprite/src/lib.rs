//! # engine_sprite
//!
//! Live components built around an entity's `sprite` slot:
//!
//! - [`SpriteComponent`]: raw rectangle plus cached half extents and midpoints.
//! - [`SpritePhysicsComponent`]: motion state; geometry delegated to the sprite.
//! - [`SpriteSoundComponent`]: positional sound following the sprite's midpoint.
//! - [`StateComponent`]: current/previous state tags stamped by a [`Clock`].

pub mod clock;
pub mod physics;
pub mod sound;
pub mod sprite;
pub mod state;

// Re-export glam's vector type used by the geometry helpers.
pub use glam::Vec2;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use physics::SpritePhysicsComponent;
pub use sound::{GainNode, SpriteSoundComponent};
pub use sprite::SpriteComponent;
pub use state::StateComponent;
