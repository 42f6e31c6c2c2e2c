//! Entity factories.
//!
//! [`BaseEntityFactory`] produces bare entities. [`GameEntityFactory`] wraps
//! it and attaches the bundle for the entity type:
//!
//! | type                | components                                                   |
//! |---------------------|--------------------------------------------------------------|
//! | `Camera`            | `camera` record                                              |
//! | `Collision`         | `staticPhysicsBody` record                                   |
//! | `PlayerSpawner`     | `spawner` record for `Player`                                |
//! | `EntitySpawner`     | `spawner` record for `Monster`                               |
//! | `Player`, `Monster` | `spawned`, `being` records; live `state`, `sprite`, `physicsBody`, `sound` |
//! | anything else       | nothing                                                      |

use engine_component::{ChangeCallback, ComponentName, ComponentValue, Entity, EntityAllocator};
use engine_sprite::{SpriteComponent, SpritePhysicsComponent, SpriteSoundComponent, StateComponent};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{FactoryConfig, SpriteStyle};
use crate::data::EntityData;
use crate::entity_type::EntityType;
use crate::error::FactoryError;
use crate::records::{Being, Camera, Spawned, Spawner, StaticBody};

/// Builds an [`Entity`] from a type tag and a data record.
pub trait EntityFactory {
    /// Create an entity of `entity_type`, observed by `on_change`.
    fn create(
        &mut self,
        entity_type: &EntityType,
        data: &EntityData,
        on_change: Option<ChangeCallback>,
    ) -> Entity;

    /// Decode `data` from JSON, then [`create`](EntityFactory::create).
    fn create_from_json(
        &mut self,
        entity_type: &EntityType,
        data: Value,
        on_change: Option<ChangeCallback>,
    ) -> Result<Entity, FactoryError> {
        let data = EntityData::from_json(data)?;
        Ok(self.create(entity_type, &data, on_change))
    }
}

/// Produces empty entities with fresh ids.
#[derive(Debug, Default)]
pub struct BaseEntityFactory {
    allocator: EntityAllocator,
}

impl BaseEntityFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities created so far.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.allocator.count()
    }
}

impl EntityFactory for BaseEntityFactory {
    fn create(
        &mut self,
        _entity_type: &EntityType,
        _data: &EntityData,
        on_change: Option<ChangeCallback>,
    ) -> Entity {
        Entity::new(self.allocator.allocate(), on_change)
    }
}

/// The game's factory: a bare entity plus the bundle for its type.
#[derive(Debug, Default)]
pub struct GameEntityFactory {
    base: BaseEntityFactory,
    config: FactoryConfig,
}

impl GameEntityFactory {
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            base: BaseEntityFactory::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Number of entities created so far.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.base.created()
    }

    fn attach_being(&self, entity: &Entity, entity_type: &EntityType, style: &SpriteStyle, data: &EntityData) {
        attach_record(
            entity,
            ComponentName::Spawned,
            &Spawned {
                spawner_source: data.spawner_source.clone(),
            },
        );
        attach_record(
            entity,
            ComponentName::Being,
            &Being {
                kind: entity_type.as_str().to_string(),
            },
        );
        entity.add_component(
            ComponentName::State,
            StateComponent::new(self.config.initial_state.clone(), self.config.clock.clone()),
        );
        entity.add_component(
            ComponentName::Sprite,
            // Sprite geometry is single precision; the records keep the input's f64.
            SpriteComponent::new(
                data.x as f32,
                data.y as f32,
                data.width as f32,
                data.height as f32,
                style.frame,
                style.layer.clone(),
            ),
        );
        entity.add_component(ComponentName::PhysicsBody, SpritePhysicsComponent::new(entity));
        entity.add_component(ComponentName::Sound, SpriteSoundComponent::new(None, entity));
    }
}

impl EntityFactory for GameEntityFactory {
    fn create(
        &mut self,
        entity_type: &EntityType,
        data: &EntityData,
        on_change: Option<ChangeCallback>,
    ) -> Entity {
        let entity = self.base.create(entity_type, data, on_change);

        match entity_type {
            EntityType::Camera => {
                attach_record(&entity, ComponentName::Camera, &Camera::from_data(data));
            }
            EntityType::Collision => {
                attach_record(
                    &entity,
                    ComponentName::StaticPhysicsBody,
                    &StaticBody::from_data(data),
                );
            }
            EntityType::PlayerSpawner => {
                attach_record(&entity, ComponentName::Spawner, &spawner_for(EntityType::Player, data));
            }
            EntityType::EntitySpawner => {
                attach_record(&entity, ComponentName::Spawner, &spawner_for(EntityType::Monster, data));
            }
            EntityType::Player | EntityType::Monster => {
                if let Some(style) = self.config.sprite_style(entity_type) {
                    self.attach_being(&entity, entity_type, style, data);
                }
            }
            EntityType::Other(tag) => {
                debug!(entity = %entity.id(), tag = %tag, "unrecognised entity type, no components attached");
                return entity;
            }
        }

        debug!(
            entity = %entity.id(),
            entity_type = %entity_type,
            components = entity.component_count(),
            "assembled entity"
        );
        entity
    }
}

fn spawner_for(spawns: EntityType, data: &EntityData) -> Spawner {
    Spawner {
        entity_type: spawns.as_str().to_string(),
        x: data.x,
        y: data.y,
        name: data.name.clone(),
    }
}

/// Attach a typed record. A record that fails to encode lands as the null
/// marker, the same as any other non-record payload.
fn attach_record<T: Serialize>(entity: &Entity, name: ComponentName, record: &T) {
    let value = match serde_json::to_value(record) {
        Ok(value) => value,
        Err(err) => {
            warn!(entity = %entity.id(), component = %name, error = %err, "failed to encode record");
            Value::Null
        }
    };
    entity.add_component(name, ComponentValue::from(value));
}
