//! Component names, the [`LiveComponent`] trait, and the [`ComponentValue`]
//! union stored in each entity slot.
//!
//! ## Naming
//!
//! Components are addressed by [`ComponentName`], never by Rust type. The
//! engine's catalog of well-known names is enumerated; anything else is
//! carried as [`ComponentName::Custom`]. The same slot can therefore hold a
//! plain record on one entity and a live component on another, and systems
//! query by name without caring which kind sits behind it.
//!
//! ## Values
//!
//! A slot holds one of three shapes:
//!
//! - [`ComponentValue::Record`]: plain data, a shared JSON object.
//! - [`ComponentValue::Live`]: a behavioural component (derived fields,
//!   delegation, timestamps) behind the [`LiveComponent`] trait.
//! - [`ComponentValue::Null`]: the name is reserved but the payload was
//!   unusable.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::ComponentError;
use crate::record::Record;

/// The name of a component slot on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentName {
    /// `camera`: viewport and map bounds.
    Camera,
    /// `staticPhysicsBody`: immovable collision rectangle.
    StaticPhysicsBody,
    /// `spawner`: where and what to spawn.
    Spawner,
    /// `spawned`: back-link to the spawner that produced an entity.
    Spawned,
    /// `being`: the being type tag (`Player`, `Monster`).
    Being,
    /// `state`: timestamped state machine.
    State,
    /// `sprite`: render rectangle with derived fields.
    Sprite,
    /// `physicsBody`: physics view over the sprite.
    PhysicsBody,
    /// `sound`: positional sound bound to the sprite.
    Sound,
    /// Any name outside the engine catalog.
    Custom(String),
}

impl ComponentName {
    /// Every well-known name, in declaration order.
    pub const CATALOG: [ComponentName; 9] = [
        ComponentName::Camera,
        ComponentName::StaticPhysicsBody,
        ComponentName::Spawner,
        ComponentName::Spawned,
        ComponentName::Being,
        ComponentName::State,
        ComponentName::Sprite,
        ComponentName::PhysicsBody,
        ComponentName::Sound,
    ];

    /// The exact lookup string downstream systems use for this name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Camera => "camera",
            Self::StaticPhysicsBody => "staticPhysicsBody",
            Self::Spawner => "spawner",
            Self::Spawned => "spawned",
            Self::Being => "being",
            Self::State => "state",
            Self::Sprite => "sprite",
            Self::PhysicsBody => "physicsBody",
            Self::Sound => "sound",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for the empty custom name, which entities ignore.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Custom(name) if name.is_empty())
    }
}

impl From<&str> for ComponentName {
    fn from(name: &str) -> Self {
        match name {
            "camera" => Self::Camera,
            "staticPhysicsBody" => Self::StaticPhysicsBody,
            "spawner" => Self::Spawner,
            "spawned" => Self::Spawned,
            "being" => Self::Being,
            "state" => Self::State,
            "sprite" => Self::Sprite,
            "physicsBody" => Self::PhysicsBody,
            "sound" => Self::Sound,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ComponentName {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Custom(_) => Self::Custom(name),
            known => known,
        }
    }
}

impl From<&ComponentName> for ComponentName {
    fn from(name: &ComponentName) -> Self {
        name.clone()
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component with behaviour: computed fields, delegation, or timestamps.
///
/// Live components are shared (`Rc`) between the entity slot and every caller
/// that looked them up, so their accessors take `&self` and mutate through
/// interior cells.
pub trait LiveComponent: Any {
    /// Short kind name used in logs and errors (e.g. `"SpriteComponent"`).
    fn kind(&self) -> &'static str;

    /// Plain enumeration of the component's own stored fields.
    ///
    /// Proxied fields and private handles are not part of it.
    fn snapshot(&self) -> Result<Value, ComponentError>;

    /// Upcast for typed retrieval through [`ComponentValue::downcast`].
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Shared handle to a plain record stored in an entity slot.
pub type SharedRecord = Rc<RefCell<Record>>;

/// The value stored under a component name.
#[derive(Clone)]
pub enum ComponentValue {
    /// Plain data with no behaviour, stored verbatim.
    Record(SharedRecord),
    /// A behavioural component.
    Live(Rc<dyn LiveComponent>),
    /// Name reserved, no usable payload.
    Null,
}

impl ComponentValue {
    /// Wrap a live component.
    #[must_use]
    pub fn live<T: LiveComponent>(component: T) -> Self {
        Self::Live(Rc::new(component))
    }

    /// Returns `true` for the null marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for a plain record.
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns `true` for a live component.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// The shared record handle, if this is a record.
    #[must_use]
    pub fn as_record(&self) -> Option<SharedRecord> {
        match self {
            Self::Record(record) => Some(Rc::clone(record)),
            _ => None,
        }
    }

    /// The live component as its concrete type, if it is one of kind `T`.
    #[must_use]
    pub fn downcast<T: LiveComponent>(&self) -> Option<Rc<T>> {
        match self {
            Self::Live(component) => Rc::clone(component).into_any().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// `"record"`, `"null"`, or the live component's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Live(component) => component.kind(),
            Self::Null => "null",
        }
    }

    /// Render the value as JSON: record fields, live snapshot, or `null`.
    pub fn snapshot(&self) -> Result<Value, ComponentError> {
        match self {
            Self::Record(record) => Ok(Value::Object(record.borrow().fields().clone())),
            Self::Live(component) => component.snapshot(),
            Self::Null => Ok(Value::Null),
        }
    }
}

impl fmt::Debug for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => match record.try_borrow() {
                Ok(record) => f.debug_tuple("Record").field(&*record).finish(),
                Err(_) => f.write_str("Record(<borrowed>)"),
            },
            Self::Live(component) => write!(f, "Live({})", component.kind()),
            Self::Null => f.write_str("Null"),
        }
    }
}

/// JSON objects become records; every other JSON value becomes the null marker.
impl From<Value> for ComponentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::from(Record::from(fields)),
            _ => Self::Null,
        }
    }
}

impl From<Record> for ComponentValue {
    fn from(record: Record) -> Self {
        Self::Record(Rc::new(RefCell::new(record)))
    }
}

impl From<Rc<dyn LiveComponent>> for ComponentValue {
    fn from(component: Rc<dyn LiveComponent>) -> Self {
        Self::Live(component)
    }
}

/// An omitted payload.
impl From<()> for ComponentValue {
    fn from((): ()) -> Self {
        Self::Null
    }
}
