//! The plain input record the factory builds entities from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FactoryError;

/// Raw per-entity data, as produced by level loading.
///
/// Every field is optional in the source data: missing numbers read as `0`
/// and missing strings as `None`. Which fields matter depends on the entity
/// type (see [`EntityType::bundle`](crate::EntityType::bundle)).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Spawner name.
    pub name: Option<String>,
    /// Name of the spawner that produced a being.
    pub spawner_source: Option<String>,
    pub map_x: f64,
    pub map_y: f64,
    pub map_width: f64,
    pub map_height: f64,
    /// Entity the camera follows.
    pub following: Option<String>,
}

impl EntityData {
    /// Data for a rectangle at `(x, y)` with the given size.
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// Decode from a JSON object.
    pub fn from_json(value: Value) -> Result<Self, FactoryError> {
        Ok(serde_json::from_value(value)?)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_spawner_source(mut self, source: impl Into<String>) -> Self {
        self.spawner_source = Some(source.into());
        self
    }

    /// Set the map region a camera is bounded by.
    #[must_use]
    pub fn with_map(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.map_x = x;
        self.map_y = y;
        self.map_width = width;
        self.map_height = height;
        self
    }

    #[must_use]
    pub fn with_following(mut self, following: impl Into<String>) -> Self {
        self.following = Some(following.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_camel_case() {
        let data = EntityData::from_json(json!({
            "x": 1, "y": 2, "width": 3, "height": 4,
            "spawnerSource": "west", "mapWidth": 640
        }))
        .unwrap();
        assert_eq!(data.x, 1.0);
        assert_eq!(data.height, 4.0);
        assert_eq!(data.spawner_source.as_deref(), Some("west"));
        assert_eq!(data.map_width, 640.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let data = EntityData::from_json(json!({})).unwrap();
        assert_eq!(data, EntityData::default());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = EntityData::from_json(json!({ "x": "left" })).unwrap_err();
        assert!(matches!(err, FactoryError::InvalidData(_)));
    }

    #[test]
    fn test_builders() {
        let data = EntityData::rect(1.0, 2.0, 3.0, 4.0)
            .with_name("spawn-a")
            .with_map(0.0, 0.0, 100.0, 50.0)
            .with_following("hero");
        assert_eq!(data.name.as_deref(), Some("spawn-a"));
        assert_eq!(data.map_height, 50.0);
        assert_eq!(data.following.as_deref(), Some("hero"));
        assert_eq!(data.spawner_source, None);
    }
}
