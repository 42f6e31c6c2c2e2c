//! Typed views of the plain-data records the factory attaches.
//!
//! Each view serialises to exactly the record stored on the entity, so
//! downstream systems can decode a slot with
//! [`Entity::view`](engine_component::Entity::view).

use serde::{Deserialize, Serialize};

use crate::data::EntityData;

/// `camera`: viewport rectangle, map bounds, and the followed entity.
///
/// The map half extents and center are stored, not derived on read. Anyone
/// editing the map bounds of an attached `camera` record must write the
/// result of [`Camera::recompute_map`] back, or the stored center goes stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub map_x: f64,
    pub map_y: f64,
    pub map_width: f64,
    pub map_height: f64,
    pub map_half_width: f64,
    pub map_half_height: f64,
    pub map_center_x: f64,
    pub map_center_y: f64,
    pub following: Option<String>,
}

impl Camera {
    #[must_use]
    pub fn from_data(data: &EntityData) -> Self {
        let mut camera = Self {
            x: data.x,
            y: data.y,
            width: data.width,
            height: data.height,
            map_x: data.map_x,
            map_y: data.map_y,
            map_width: data.map_width,
            map_height: data.map_height,
            map_half_width: 0.0,
            map_half_height: 0.0,
            map_center_x: 0.0,
            map_center_y: 0.0,
            following: data.following.clone(),
        };
        camera.recompute_map();
        camera
    }

    /// Refresh the map half extents and center from the map bounds.
    pub fn recompute_map(&mut self) {
        self.map_half_width = self.map_width / 2.0;
        self.map_half_height = self.map_height / 2.0;
        self.map_center_x = self.map_x + self.map_half_width;
        self.map_center_y = self.map_y + self.map_half_height;
    }
}

/// `staticPhysicsBody`: an immovable rectangle with precomputed extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticBody {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub mid_point_x: f64,
    pub mid_point_y: f64,
}

impl StaticBody {
    #[must_use]
    pub fn from_data(data: &EntityData) -> Self {
        let half_width = data.width / 2.0;
        let half_height = data.height / 2.0;
        Self {
            x: data.x,
            y: data.y,
            width: data.width,
            height: data.height,
            half_width,
            half_height,
            mid_point_x: data.x + half_width,
            mid_point_y: data.y + half_height,
        }
    }
}

/// `spawner`: spawn an entity of `entity_type` at a named position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawner {
    pub entity_type: String,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
}

/// `spawned`: which spawner produced this entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawned {
    pub spawner_source: Option<String>,
}

/// `being`: the being type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Being {
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_map_center() {
        let data = EntityData::rect(0.0, 0.0, 320.0, 240.0).with_map(10.0, 20.0, 100.0, 60.0);
        let camera = Camera::from_data(&data);
        assert_eq!(camera.map_half_width, 50.0);
        assert_eq!(camera.map_half_height, 30.0);
        assert_eq!(camera.map_center_x, 60.0);
        assert_eq!(camera.map_center_y, 50.0);
    }

    #[test]
    fn test_camera_recompute_after_move() {
        let mut camera = Camera::from_data(&EntityData::default().with_map(0.0, 0.0, 10.0, 10.0));
        camera.map_x = 100.0;
        camera.recompute_map();
        assert_eq!(camera.map_center_x, 105.0);
    }

    #[test]
    fn test_static_body_extents() {
        let body = StaticBody::from_data(&EntityData::rect(10.0, 20.0, 8.0, 4.0));
        assert_eq!(body.half_width, 4.0);
        assert_eq!(body.half_height, 2.0);
        assert_eq!(body.mid_point_x, 14.0);
        assert_eq!(body.mid_point_y, 22.0);
    }

    #[test]
    fn test_being_uses_type_key() {
        let value = serde_json::to_value(Being {
            kind: "Monster".into(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "type": "Monster" }));
    }
}
