//! Entity-type tags and the component bundle each one receives.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use engine_component::ComponentName;
use serde::{Deserialize, Serialize};

/// The entity-type tag the factory dispatches on.
///
/// Parsing is exact string equality; anything unrecognised is carried as
/// [`EntityType::Other`] and receives no components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Camera,
    Collision,
    PlayerSpawner,
    EntitySpawner,
    Player,
    Monster,
    Other(String),
}

const CAMERA_BUNDLE: &[ComponentName] = &[ComponentName::Camera];
const COLLISION_BUNDLE: &[ComponentName] = &[ComponentName::StaticPhysicsBody];
const SPAWNER_BUNDLE: &[ComponentName] = &[ComponentName::Spawner];
const BEING_BUNDLE: &[ComponentName] = &[
    ComponentName::Spawned,
    ComponentName::Being,
    ComponentName::State,
    ComponentName::Sprite,
    ComponentName::PhysicsBody,
    ComponentName::Sound,
];

impl EntityType {
    /// The tag string this type is parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Camera => "Camera",
            Self::Collision => "Collision",
            Self::PlayerSpawner => "PlayerSpawner",
            Self::EntitySpawner => "EntitySpawner",
            Self::Player => "Player",
            Self::Monster => "Monster",
            Self::Other(tag) => tag,
        }
    }

    /// Components attached for this type, in attachment order.
    #[must_use]
    pub fn bundle(&self) -> &'static [ComponentName] {
        match self {
            Self::Camera => CAMERA_BUNDLE,
            Self::Collision => COLLISION_BUNDLE,
            Self::PlayerSpawner | Self::EntitySpawner => SPAWNER_BUNDLE,
            Self::Player | Self::Monster => BEING_BUNDLE,
            Self::Other(_) => &[],
        }
    }
}

impl From<&str> for EntityType {
    fn from(tag: &str) -> Self {
        match tag {
            "Camera" => Self::Camera,
            "Collision" => Self::Collision,
            "PlayerSpawner" => Self::PlayerSpawner,
            "EntitySpawner" => Self::EntitySpawner,
            "Player" => Self::Player,
            "Monster" => Self::Monster,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityType {
    fn from(tag: String) -> Self {
        match Self::from(tag.as_str()) {
            Self::Other(_) => Self::Other(tag),
            known => known,
        }
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for EntityType {
    type Err = Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(tag))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
