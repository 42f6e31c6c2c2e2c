//! # engine_factory
//!
//! Turns declarative level data into entities. A factory receives an
//! [`EntityType`] tag, an [`EntityData`] record, and an optional change
//! observer, creates the entity, and attaches the component bundle for that
//! type: plain records for cameras, collision, and spawners; records plus
//! sprite-bound live components for players and monsters.
//!
//! Downstream systems look the results up by the names in
//! [`ComponentName`](engine_component::ComponentName) and decode records
//! with the views in [`records`].

pub mod config;
pub mod data;
pub mod entity_type;
pub mod error;
pub mod factory;
pub mod records;

pub use config::{FactoryConfig, SpriteStyle};
pub use data::EntityData;
pub use entity_type::EntityType;
pub use error::FactoryError;
pub use factory::{BaseEntityFactory, EntityFactory, GameEntityFactory};
pub use records::{Being, Camera, Spawned, Spawner, StaticBody};
