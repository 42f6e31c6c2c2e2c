//! Scene files: a JSON array of `{ "type": ..., "data": { ... } }` entries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use engine_factory::{EntityData, EntityType};
use serde::Deserialize;
use tracing::info;

/// One entity to spawn.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneEntry {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub data: EntityData,
}

/// Used when no scene file is given.
pub const DEMO_SCENE: &str = r#"[
    { "type": "Camera", "data": { "x": 0, "y": 0, "width": 320, "height": 240,
                                  "mapX": 0, "mapY": 0, "mapWidth": 640, "mapHeight": 480,
                                  "following": "hero" } },
    { "type": "Collision", "data": { "x": 0, "y": 224, "width": 640, "height": 16 } },
    { "type": "PlayerSpawner", "data": { "x": 32, "y": 192, "name": "start" } },
    { "type": "EntitySpawner", "data": { "x": 400, "y": 192, "name": "pit" } },
    { "type": "Player", "data": { "x": 32, "y": 192, "width": 16, "height": 32,
                                  "name": "hero", "spawnerSource": "start" } },
    { "type": "Monster", "data": { "x": 400, "y": 200, "width": 24, "height": 24,
                                   "spawnerSource": "pit" } },
    { "type": "Signpost", "data": { "x": 100, "y": 200 } }
]"#;

/// Parse scene JSON.
pub fn parse(json: &str) -> Result<Vec<SceneEntry>> {
    serde_json::from_str(json).context("invalid scene JSON")
}

/// Read the scene at `path`, or the built-in demo scene when `None`.
pub fn load(path: Option<&Path>) -> Result<Vec<SceneEntry>> {
    let entries = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read scene {}", path.display()))?;
            parse(&json).with_context(|| format!("failed to load scene {}", path.display()))?
        }
        None => parse(DEMO_SCENE)?,
    };
    info!(entries = entries.len(), "scene loaded");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_parses() {
        let entries = load(None).unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].entity_type, EntityType::Camera);
        assert_eq!(entries[4].data.name.as_deref(), Some("hero"));
        assert_eq!(entries[6].entity_type, EntityType::from("Signpost"));
    }

    #[test]
    fn test_missing_data_defaults() {
        let entries = parse(r#"[{ "type": "Player" }]"#).unwrap();
        assert_eq!(entries[0].data.width, 0.0);
    }

    #[test]
    fn test_bad_scene_is_an_error() {
        assert!(parse(r#"{ "type": "Player" }"#).is_err());
        assert!(load(Some(Path::new("/nonexistent/scene.json"))).is_err());
    }
}
