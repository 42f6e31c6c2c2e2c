//! Positional sound bound to an entity's sprite.
//!
//! While `followSprite` is set, [`SpriteSoundComponent::x`] and
//! [`SpriteSoundComponent::y`] report the sprite's current midpoint. Clearing
//! the flag snapshots that midpoint into the component's own position; from
//! then on reads and writes use the local position only and never touch the
//! sprite.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use engine_component::{ComponentError, ComponentName, ComponentValue, Entity, LiveComponent, WeakEntity};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::sprite::SpriteComponent;

/// Opaque handle to an audio gain stage, owned by the audio backend.
pub type GainNode = Rc<dyn Any>;

/// A sound source that follows the sibling sprite until detached.
pub struct SpriteSoundComponent {
    entity: WeakEntity,
    src: Option<String>,
    play: Cell<bool>,
    volume: Cell<f32>,
    follow_sprite: Cell<bool>,
    x: Cell<f32>,
    y: Cell<f32>,
    gain_node: RefCell<Option<GainNode>>,
}

impl SpriteSoundComponent {
    /// Bind a sound to `entity`, following its sprite, stopped, at full volume.
    #[must_use]
    pub fn new(src: Option<String>, entity: &Entity) -> Self {
        Self {
            entity: entity.downgrade(),
            src,
            play: Cell::new(false),
            volume: Cell::new(1.0),
            follow_sprite: Cell::new(true),
            x: Cell::new(0.0),
            y: Cell::new(0.0),
            gain_node: RefCell::new(None),
        }
    }

    fn sprite(&self) -> Result<Rc<SpriteComponent>, ComponentError> {
        self.entity
            .require_live(&ComponentName::Sound, &ComponentName::Sprite)
    }

    /// Sound source identifier.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    #[must_use]
    pub fn follow_sprite(&self) -> bool {
        self.follow_sprite.get()
    }

    /// Attach to or detach from the sprite.
    ///
    /// Detaching copies the sprite's midpoint into the local position and
    /// fails, leaving the flag set, if there is no sprite to copy from.
    pub fn set_follow_sprite(&self, follow: bool) -> Result<(), ComponentError> {
        if self.follow_sprite.get() && !follow {
            let sprite = self.sprite()?;
            self.x.set(sprite.mid_point_x());
            self.y.set(sprite.mid_point_y());
            trace!(entity = %self.entity.id(), x = self.x.get(), y = self.y.get(), "sound detached from sprite");
        }
        self.follow_sprite.set(follow);
        Ok(())
    }

    /// The sprite's `midPointX` while following, else the local `x`.
    pub fn x(&self) -> Result<f32, ComponentError> {
        if self.follow_sprite.get() {
            Ok(self.sprite()?.mid_point_x())
        } else {
            Ok(self.x.get())
        }
    }

    /// Write the local `x`. Has no visible effect until detached.
    pub fn set_x(&self, x: f32) {
        self.x.set(x);
    }

    /// The sprite's `midPointY` while following, else the local `y`.
    pub fn y(&self) -> Result<f32, ComponentError> {
        if self.follow_sprite.get() {
            Ok(self.sprite()?.mid_point_y())
        } else {
            Ok(self.y.get())
        }
    }

    /// Write the local `y`. Has no visible effect until detached.
    pub fn set_y(&self, y: f32) {
        self.y.set(y);
    }

    #[must_use]
    pub fn play(&self) -> bool {
        self.play.get()
    }

    pub fn set_play(&self, play: bool) {
        self.play.set(play);
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.set(volume);
    }

    /// The gain handle the audio backend attached, if any.
    #[must_use]
    pub fn gain_node(&self) -> Option<GainNode> {
        self.gain_node.borrow().clone()
    }

    pub fn set_gain_node(&self, gain_node: GainNode) {
        *self.gain_node.borrow_mut() = Some(gain_node);
    }
}

impl fmt::Debug for SpriteSoundComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteSoundComponent")
            .field("entity", &self.entity.id())
            .field("src", &self.src)
            .field("play", &self.play)
            .field("volume", &self.volume)
            .field("follow_sprite", &self.follow_sprite)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SoundFields<'a> {
    src: Option<&'a str>,
    play: bool,
    volume: f32,
}

impl LiveComponent for SpriteSoundComponent {
    fn kind(&self) -> &'static str {
        "SpriteSoundComponent"
    }

    fn snapshot(&self) -> Result<Value, ComponentError> {
        let fields = SoundFields {
            src: self.src(),
            play: self.play(),
            volume: self.volume(),
        };
        serde_json::to_value(fields).map_err(|source| ComponentError::Snapshot {
            kind: self.kind(),
            source,
        })
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl From<SpriteSoundComponent> for ComponentValue {
    fn from(sound: SpriteSoundComponent) -> Self {
        ComponentValue::live(sound)
    }
}

#[cfg(test)]
mod tests {
    use engine_component::EntityId;
    use serde_json::json;

    use super::*;

    fn setup() -> (Entity, Rc<SpriteComponent>, SpriteSoundComponent) {
        let entity = Entity::new(EntityId(1), None);
        entity.add_component(
            ComponentName::Sprite,
            SpriteComponent::new(0.0, 0.0, 10.0, 20.0, 1, "Player"),
        );
        let sprite = entity.live::<SpriteComponent>(ComponentName::Sprite).unwrap();
        let sound = SpriteSoundComponent::new(None, &entity);
        (entity, sprite, sound)
    }

    #[test]
    fn test_defaults() {
        let (_entity, _, sound) = setup();
        assert!(sound.follow_sprite());
        assert!(!sound.play());
        assert_eq!(sound.volume(), 1.0);
        assert_eq!(sound.src(), None);
        assert!(sound.gain_node().is_none());
    }

    #[test]
    fn test_following_tracks_live_midpoint() {
        let (_entity, sprite, sound) = setup();
        assert_eq!(sound.x().unwrap(), 5.0);
        assert_eq!(sound.y().unwrap(), 10.0);
        sprite.set_x(100.0);
        assert_eq!(sound.x().unwrap(), 105.0);
    }

    #[test]
    fn test_detach_freezes_position() {
        let (_entity, sprite, sound) = setup();
        sprite.set_x(30.0);
        sound.set_follow_sprite(false).unwrap();
        sprite.set_x(500.0);
        sprite.set_y(500.0);
        assert_eq!(sound.x().unwrap(), 35.0);
        assert_eq!(sound.y().unwrap(), 10.0);
    }

    #[test]
    fn test_local_writes_never_reach_sprite() {
        let (_entity, sprite, sound) = setup();
        sound.set_follow_sprite(false).unwrap();
        sound.set_x(-4.0);
        sound.set_y(-8.0);
        assert_eq!(sound.x().unwrap(), -4.0);
        assert_eq!(sound.y().unwrap(), -8.0);
        assert_eq!(sprite.mid_point_x(), 5.0);
    }

    #[test]
    fn test_writes_while_following_are_shadowed() {
        let (_entity, _, sound) = setup();
        sound.set_x(99.0);
        assert_eq!(sound.x().unwrap(), 5.0);
    }

    #[test]
    fn test_reattach_follows_again() {
        let (_entity, sprite, sound) = setup();
        sound.set_follow_sprite(false).unwrap();
        sprite.set_y(40.0);
        sound.set_follow_sprite(true).unwrap();
        assert_eq!(sound.y().unwrap(), 50.0);
    }

    #[test]
    fn test_detach_without_sprite_fails_and_keeps_following() {
        let (entity, _, sound) = setup();
        entity.remove_component(ComponentName::Sprite);
        assert!(sound.set_follow_sprite(false).is_err());
        assert!(sound.follow_sprite());
        assert!(sound.x().is_err());
    }

    #[test]
    fn test_gain_node_is_kept_out_of_snapshot() {
        let (_entity, _, sound) = setup();
        let gain: GainNode = Rc::new(0.5_f32);
        sound.set_gain_node(Rc::clone(&gain));
        sound.set_play(true);
        sound.set_volume(0.25);

        let stored = sound.gain_node().unwrap();
        assert!(Rc::ptr_eq(&stored, &gain));
        assert_eq!(stored.downcast_ref::<f32>(), Some(&0.5));
        assert_eq!(
            sound.snapshot().unwrap(),
            json!({ "src": null, "play": true, "volume": 0.25 })
        );
    }
}
