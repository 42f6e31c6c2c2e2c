//! Scene-level entity registry.
//!
//! The [`World`] owns every entity spawned for a scene and keeps an index
//! from component name to the entities currently holding that component.
//! Each entity is created with an observer that re-indexes it, so the index
//! follows every `add_component`/`remove_component` without the caller doing
//! anything.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use engine_component::{ComponentError, ComponentName, Entity, EntityId};
use engine_factory::{EntityData, EntityFactory, EntityType, FactoryConfig, GameEntityFactory};
use serde_json::{Map, Value};
use tracing::debug;

/// Component name -> ids of entities holding it.
#[derive(Debug, Default)]
struct ComponentIndex {
    by_name: HashMap<ComponentName, BTreeSet<EntityId>>,
    /// Observers outlive `despawn` on any handle still held elsewhere.
    despawned: BTreeSet<EntityId>,
    changes: u64,
}

impl ComponentIndex {
    fn reindex(&mut self, entity: &Entity) {
        if self.despawned.contains(&entity.id()) {
            return;
        }
        self.forget(entity.id());
        for name in entity.component_names() {
            self.by_name.entry(name).or_default().insert(entity.id());
        }
        self.changes += 1;
    }

    fn forget(&mut self, id: EntityId) {
        for ids in self.by_name.values_mut() {
            ids.remove(&id);
        }
    }
}

/// The entities of one scene.
#[derive(Debug)]
pub struct World {
    factory: GameEntityFactory,
    entities: BTreeMap<EntityId, Entity>,
    index: Rc<RefCell<ComponentIndex>>,
}

impl World {
    /// Create an empty world whose entities are built with `config`.
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            factory: GameEntityFactory::new(config),
            entities: BTreeMap::new(),
            index: Rc::new(RefCell::new(ComponentIndex::default())),
        }
    }

    /// Build an entity through the factory and register it.
    pub fn spawn(&mut self, entity_type: &EntityType, data: &EntityData) -> Entity {
        let index = Rc::clone(&self.index);
        let entity = self.factory.create(
            entity_type,
            data,
            Some(Box::new(move |entity: &Entity| index.borrow_mut().reindex(entity))),
        );
        debug!(entity = %entity.id(), entity_type = %entity_type, "spawned");
        self.entities.insert(entity.id(), entity.clone());
        entity
    }

    /// Drop the world's handle to an entity and remove it from the index.
    /// Later structural changes through other handles are not indexed.
    ///
    /// Returns `true` if the entity was registered.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let removed = self.entities.remove(&id).is_some();
        if removed {
            let mut index = self.index.borrow_mut();
            index.forget(id);
            index.despawned.insert(id);
            debug!(entity = %id, "despawned");
        }
        removed
    }

    /// Despawn every entity that ended up with no components. Returns how
    /// many were removed.
    pub fn despawn_empty(&mut self) -> usize {
        let empty: Vec<EntityId> = self
            .entities
            .values()
            .filter(|entity| entity.component_count() == 0)
            .map(Entity::id)
            .collect();
        for id in &empty {
            self.despawn(*id);
        }
        empty.len()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All registered entities, by id.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Ids of registered entities currently holding `name`, ascending.
    #[must_use]
    pub fn with_component(&self, name: impl Into<ComponentName>) -> Vec<EntityId> {
        self.index
            .borrow()
            .by_name
            .get(&name.into())
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of observer notifications received so far.
    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.index.borrow().changes
    }

    /// Every entity's snapshot, keyed by raw id.
    pub fn snapshot(&self) -> Result<Value, ComponentError> {
        let mut out = Map::new();
        for (id, entity) in &self.entities {
            out.insert(id.raw().to_string(), entity.snapshot()?);
        }
        Ok(Value::Object(out))
    }
}
