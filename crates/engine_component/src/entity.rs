//! The [`Entity`] container and identifier allocation.
//!
//! An [`Entity`] is a shared handle to a name-keyed map of components plus a
//! single change observer fixed at construction. Cloning the handle does not
//! copy the entity; identity is reference identity.
//!
//! Live components that need to reach their siblings hold a [`WeakEntity`]
//! and resolve the sibling by name on every access, so they always see the
//! component currently registered under that name.
//!
//! Entities are single-threaded (`Rc` + `RefCell`). A host that introduces
//! parallelism must serialise access to each entity itself.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::component::{ComponentName, ComponentValue, LiveComponent, SharedRecord};
use crate::error::ComponentError;

/// A numeric entity identifier, used for logging and indexing.
///
/// Identity of an [`Entity`] is its allocation; the id is a label handed out
/// by an [`EntityAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The unassigned id.
    pub const INVALID: EntityId = EntityId(0);

    /// Returns the raw `u64`.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is an allocated (non-zero) id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. Ids start at 1 (0 is [`EntityId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer invoked synchronously after every structural change.
pub type ChangeCallback = Box<dyn Fn(&Entity)>;

struct EntityInner {
    id: EntityId,
    components: RefCell<BTreeMap<ComponentName, ComponentValue>>,
    on_change: Option<ChangeCallback>,
}

/// A keyed container of named components.
#[derive(Clone)]
pub struct Entity {
    inner: Rc<EntityInner>,
}

impl Entity {
    /// Create an empty entity bound to an optional change observer.
    #[must_use]
    pub fn new(id: EntityId, on_change: Option<ChangeCallback>) -> Self {
        Self {
            inner: Rc::new(EntityInner {
                id,
                components: RefCell::new(BTreeMap::new()),
                on_change,
            }),
        }
    }

    /// Create an empty entity observed by `on_change`.
    #[must_use]
    pub fn with_observer(id: EntityId, on_change: impl Fn(&Entity) + 'static) -> Self {
        Self::new(id, Some(Box::new(on_change)))
    }

    /// The entity's id label.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.inner.id
    }

    /// A non-owning back-reference to this entity.
    #[must_use]
    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity {
            id: self.inner.id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns `true` if both handles refer to the same entity.
    #[must_use]
    pub fn ptr_eq(a: &Entity, b: &Entity) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns `true` if a slot exists under `name`, including a null slot.
    #[must_use]
    pub fn has_component(&self, name: impl Into<ComponentName>) -> bool {
        self.inner.components.borrow().contains_key(&name.into())
    }

    /// The value stored under `name`, or `None` if the slot is absent.
    #[must_use]
    pub fn get_component(&self, name: impl Into<ComponentName>) -> Option<ComponentValue> {
        self.inner.components.borrow().get(&name.into()).cloned()
    }

    /// Store `value` under `name`, then notify the observer.
    ///
    /// An empty name is ignored and does not notify. An existing slot is
    /// overwritten and the observer fires even if nothing changed.
    pub fn add_component(&self, name: impl Into<ComponentName>, value: impl Into<ComponentValue>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }

        let value = value.into();
        trace!(entity = %self.inner.id, component = %name, kind = value.kind(), "add component");
        self.inner.components.borrow_mut().insert(name, value);
        self.notify();
    }

    /// Delete the slot under `name` if present, then notify the observer.
    ///
    /// The observer fires even when there was nothing to remove.
    pub fn remove_component(&self, name: impl Into<ComponentName>) {
        let name = name.into();
        let removed = self.inner.components.borrow_mut().remove(&name);
        trace!(entity = %self.inner.id, component = %name, removed = removed.is_some(), "remove component");
        // The removed value is dropped after the map borrow is released.
        drop(removed);
        self.notify();
    }

    /// Names of all present slots, sorted.
    #[must_use]
    pub fn component_names(&self) -> Vec<ComponentName> {
        self.inner.components.borrow().keys().cloned().collect()
    }

    /// Number of present slots.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.inner.components.borrow().len()
    }

    /// The shared record under `name`, if that slot holds a record.
    #[must_use]
    pub fn record(&self, name: impl Into<ComponentName>) -> Option<SharedRecord> {
        self.get_component(name)?.as_record()
    }

    /// The live component under `name`, if that slot holds one of kind `T`.
    #[must_use]
    pub fn live<T: LiveComponent>(&self, name: impl Into<ComponentName>) -> Option<Rc<T>> {
        self.get_component(name)?.downcast::<T>()
    }

    /// Resolve a live component that must exist.
    pub fn require_live<T: LiveComponent>(
        &self,
        name: impl Into<ComponentName>,
    ) -> Result<Rc<T>, ComponentError> {
        let name = name.into();
        let value = self
            .get_component(&name)
            .ok_or_else(|| ComponentError::MissingDependency {
                entity: self.inner.id,
                component: name.clone(),
            })?;
        value.downcast::<T>().ok_or(ComponentError::WrongKind {
            entity: self.inner.id,
            component: name,
            expected: short_type_name::<T>(),
        })
    }

    /// Decode the record under `name` into a typed view.
    pub fn view<T: DeserializeOwned>(&self, name: impl Into<ComponentName>) -> Result<T, ComponentError> {
        let name = name.into();
        let value = self
            .get_component(&name)
            .ok_or_else(|| ComponentError::MissingDependency {
                entity: self.inner.id,
                component: name.clone(),
            })?;
        let Some(record) = value.as_record() else {
            return Err(ComponentError::WrongKind {
                entity: self.inner.id,
                component: name,
                expected: "record",
            });
        };
        let decoded = record.borrow().decode();
        decoded.map_err(|source| ComponentError::Decode {
            component: name,
            source,
        })
    }

    /// Render every slot as one JSON object keyed by component name.
    pub fn snapshot(&self) -> Result<Value, ComponentError> {
        let slots: Vec<(ComponentName, ComponentValue)> = self
            .inner
            .components
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let mut fields = Map::new();
        for (name, value) in slots {
            fields.insert(name.as_str().to_string(), value.snapshot()?);
        }
        Ok(Value::Object(fields))
    }

    fn notify(&self) {
        if let Some(on_change) = &self.inner.on_change {
            on_change(self);
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Entity::ptr_eq(self, other)
    }
}

impl Eq for Entity {}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Entity");
        out.field("id", &self.inner.id);
        match self.inner.components.try_borrow() {
            Ok(components) => out.field("components", &*components),
            Err(_) => out.field("components", &"<borrowed>"),
        };
        out.field("observed", &self.inner.on_change.is_some()).finish()
    }
}

/// A non-owning reference to an [`Entity`].
#[derive(Debug, Clone)]
pub struct WeakEntity {
    id: EntityId,
    inner: Weak<EntityInner>,
}

impl WeakEntity {
    /// The id of the referenced entity, available even after it is dropped.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity, if it still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Entity> {
        self.inner.upgrade().map(|inner| Entity { inner })
    }

    /// Resolve a sibling live component that must exist.
    ///
    /// `component` names the caller for the [`ComponentError::EntityDropped`]
    /// case.
    pub fn require_live<T: LiveComponent>(
        &self,
        component: &ComponentName,
        sibling: &ComponentName,
    ) -> Result<Rc<T>, ComponentError> {
        let entity = self.upgrade().ok_or_else(|| ComponentError::EntityDropped {
            component: component.clone(),
        })?;
        entity.require_live::<T>(sibling)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::record::Record;

    #[derive(Debug)]
    struct Marker;

    impl LiveComponent for Marker {
        fn kind(&self) -> &'static str {
            "Marker"
        }

        fn snapshot(&self) -> Result<Value, ComponentError> {
            Ok(json!({}))
        }

        fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
            self
        }
    }

    fn counted() -> (Entity, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let entity = Entity::with_observer(EntityId(7), move |_| seen.set(seen.get() + 1));
        (entity, calls)
    }

    fn sprite_record() -> Value {
        json!({ "x": 0, "y": 0, "width": 0, "height": 0, "frame": 0, "layer": "Player" })
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        assert_eq!(alloc.allocate(), EntityId(1));
        assert_eq!(alloc.allocate(), EntityId(2));
        assert_eq!(alloc.allocate(), EntityId(3));
        assert_eq!(alloc.count(), 3);
        assert!(!EntityId::INVALID.is_valid());
    }

    #[test]
    fn test_never_added_is_absent() {
        let (entity, calls) = counted();
        for name in ComponentName::CATALOG {
            assert!(!entity.has_component(&name));
            assert!(entity.get_component(&name).is_none());
        }
        assert!(entity.get_component("anything").is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_add_then_remove_notifies_twice() {
        let (entity, calls) = counted();
        entity.add_component("sprite", sprite_record());
        assert!(entity.has_component(ComponentName::Sprite));
        entity.remove_component("sprite");
        assert_eq!(calls.get(), 2);
        assert!(!entity.has_component("sprite"));
    }

    #[test]
    fn test_non_record_value_is_stored_as_null() {
        let (entity, calls) = counted();
        entity.add_component("x", json!(42));
        assert!(entity.has_component("x"));
        assert!(entity.get_component("x").unwrap().is_null());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_name_is_ignored() {
        let (entity, calls) = counted();
        entity.add_component("", json!({ "a": 1 }));
        assert_eq!(entity.component_count(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_remove_absent_still_notifies() {
        let (entity, calls) = counted();
        entity.remove_component("ghost");
        entity.remove_component(ComponentName::Sound);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_overwrite_notifies_even_when_equal() {
        let (entity, calls) = counted();
        entity.add_component("being", json!({ "type": "Player" }));
        entity.add_component("being", json!({ "type": "Player" }));
        assert_eq!(calls.get(), 2);
        assert_eq!(entity.component_count(), 1);
    }

    #[test]
    fn test_observer_receives_the_entity() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let entity = Entity::with_observer(EntityId(3), move |e| {
            log.borrow_mut().push((e.id(), e.component_count()));
        });
        entity.add_component("spawned", json!({ "spawnerSource": null }));
        entity.remove_component("spawned");
        assert_eq!(*seen.borrow(), vec![(EntityId(3), 1), (EntityId(3), 0)]);
    }

    #[test]
    fn test_observer_may_reenter() {
        let entity = Entity::with_observer(EntityId(1), |e| {
            if !e.has_component("echo") {
                e.add_component("echo", json!({}));
            }
        });
        entity.add_component("camera", json!({ "x": 0 }));
        assert!(entity.has_component("echo"));
        assert!(entity.has_component(ComponentName::Camera));
    }

    #[test]
    fn test_unobserved_entity() {
        let entity = Entity::new(EntityId(1), None);
        entity.add_component("being", json!({ "type": "Monster" }));
        entity.remove_component("being");
        assert_eq!(entity.component_count(), 0);
    }

    #[test]
    fn test_records_are_shared() {
        let (entity, _) = counted();
        entity.add_component("camera", json!({ "x": 1.0 }));
        entity.record("camera").unwrap().borrow_mut().set("x", 9.0);
        let again = entity.record(ComponentName::Camera).unwrap();
        assert_eq!(again.borrow().get_f64("x"), Some(9.0));
    }

    #[test]
    fn test_require_live_reports_missing_and_wrong_kind() {
        let (entity, _) = counted();
        let err = entity.require_live::<Marker>("sprite").unwrap_err();
        assert!(matches!(err, ComponentError::MissingDependency { .. }));

        entity.add_component("sprite", sprite_record());
        let err = entity.require_live::<Marker>("sprite").unwrap_err();
        assert!(matches!(
            err,
            ComponentError::WrongKind {
                expected: "Marker",
                ..
            }
        ));

        entity.add_component("sprite", ComponentValue::live(Marker));
        assert!(entity.require_live::<Marker>("sprite").is_ok());
        assert!(entity.live::<Marker>(ComponentName::Sprite).is_some());
    }

    #[test]
    fn test_weak_entity_outlived() {
        let entity = Entity::new(EntityId(5), None);
        let weak = entity.downgrade();
        assert_eq!(weak.upgrade(), Some(entity.clone()));
        drop(entity);
        assert!(weak.upgrade().is_none());
        assert_eq!(weak.id(), EntityId(5));
        let err = weak
            .require_live::<Marker>(&ComponentName::PhysicsBody, &ComponentName::Sprite)
            .unwrap_err();
        assert!(matches!(err, ComponentError::EntityDropped { .. }));
    }

    #[test]
    fn test_view_decodes_record() {
        #[derive(serde::Deserialize)]
        struct Being {
            #[serde(rename = "type")]
            kind: String,
        }

        let (entity, _) = counted();
        entity.add_component("being", Record::from(match json!({ "type": "Player" }) {
            Value::Object(fields) => fields,
            _ => unreachable!(),
        }));
        let being: Being = entity.view("being").unwrap();
        assert_eq!(being.kind, "Player");

        entity.add_component("state", json!(1));
        assert!(matches!(
            entity.view::<Being>("state"),
            Err(ComponentError::WrongKind { .. })
        ));
        assert!(matches!(
            entity.view::<Being>("missing"),
            Err(ComponentError::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_snapshot_renders_all_slots() {
        let (entity, _) = counted();
        entity.add_component("being", json!({ "type": "Monster" }));
        entity.add_component("x", json!(42));
        entity.add_component("state", ComponentValue::live(Marker));
        assert_eq!(
            entity.snapshot().unwrap(),
            json!({ "being": { "type": "Monster" }, "state": {}, "x": null })
        );
    }

    #[test]
    fn test_identity_equality() {
        let a = Entity::new(EntityId(1), None);
        let b = Entity::new(EntityId(1), None);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
