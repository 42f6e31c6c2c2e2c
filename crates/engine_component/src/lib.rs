//! # engine_component
//!
//! The "E" and "C" of the 2D engine: entities as name-keyed component
//! containers, and the values stored in their slots.
//!
//! This crate provides:
//!
//! - [`Entity`]: a shared handle to a component map with one change observer.
//! - [`WeakEntity`]: the non-owning back-reference live components hold.
//! - [`ComponentName`]: the enumerated component key set.
//! - [`ComponentValue`]: record, live component, or null marker.
//! - [`LiveComponent`]: the contract for behavioural components.
//! - [`Record`]: plain-data component payloads.
//! - [`ComponentError`]: failures of dependent lookups and typed views.

pub mod component;
pub mod entity;
pub mod error;
pub mod record;

pub use component::{ComponentName, ComponentValue, LiveComponent, SharedRecord};
pub use entity::{ChangeCallback, Entity, EntityAllocator, EntityId, WeakEntity};
pub use error::ComponentError;
pub use record::Record;
