//! Physics view over an entity's sprite.
//!
//! [`SpritePhysicsComponent`] stores only its own motion state
//! (`accX`, `accY`, `spdX`, `spdY`). Every positional and sizing field is read
//! from and written to the component currently registered under `sprite` on
//! the owning entity. The sprite is looked up on each call, so replacing it
//! on the entity is picked up immediately.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use engine_component::{ComponentError, ComponentName, ComponentValue, Entity, LiveComponent, WeakEntity};
use glam::Vec2;
use serde::Serialize;
use serde_json::Value;

use crate::sprite::SpriteComponent;

/// Physics body whose geometry lives on the sibling sprite.
#[derive(Debug)]
pub struct SpritePhysicsComponent {
    entity: WeakEntity,
    acc_x: Cell<f32>,
    acc_y: Cell<f32>,
    spd_x: Cell<f32>,
    spd_y: Cell<f32>,
}

impl SpritePhysicsComponent {
    /// Bind a view to `entity`. Motion state starts at zero.
    #[must_use]
    pub fn new(entity: &Entity) -> Self {
        Self {
            entity: entity.downgrade(),
            acc_x: Cell::new(0.0),
            acc_y: Cell::new(0.0),
            spd_x: Cell::new(0.0),
            spd_y: Cell::new(0.0),
        }
    }

    /// The sprite currently registered on the owning entity.
    pub fn sprite(&self) -> Result<Rc<SpriteComponent>, ComponentError> {
        self.entity
            .require_live(&ComponentName::PhysicsBody, &ComponentName::Sprite)
    }

    pub fn x(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.x())
    }

    pub fn set_x(&self, x: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_x(x);
        Ok(())
    }

    pub fn y(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.y())
    }

    pub fn set_y(&self, y: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_y(y);
        Ok(())
    }

    pub fn width(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.width())
    }

    pub fn set_width(&self, width: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_width(width);
        Ok(())
    }

    pub fn height(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.height())
    }

    pub fn set_height(&self, height: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_height(height);
        Ok(())
    }

    pub fn mid_point_x(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.mid_point_x())
    }

    pub fn set_mid_point_x(&self, mid_point_x: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_mid_point_x(mid_point_x);
        Ok(())
    }

    pub fn mid_point_y(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.mid_point_y())
    }

    pub fn set_mid_point_y(&self, mid_point_y: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_mid_point_y(mid_point_y);
        Ok(())
    }

    pub fn half_width(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.half_width())
    }

    pub fn set_half_width(&self, half_width: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_half_width(half_width);
        Ok(())
    }

    pub fn half_height(&self) -> Result<f32, ComponentError> {
        Ok(self.sprite()?.half_height())
    }

    pub fn set_half_height(&self, half_height: f32) -> Result<(), ComponentError> {
        self.sprite()?.set_half_height(half_height);
        Ok(())
    }

    /// Top-left corner of the sprite.
    pub fn position(&self) -> Result<Vec2, ComponentError> {
        Ok(self.sprite()?.position())
    }

    /// Midpoint of the sprite.
    pub fn mid_point(&self) -> Result<Vec2, ComponentError> {
        Ok(self.sprite()?.mid_point())
    }

    #[must_use]
    pub fn acc_x(&self) -> f32 {
        self.acc_x.get()
    }

    pub fn set_acc_x(&self, acc_x: f32) {
        self.acc_x.set(acc_x);
    }

    #[must_use]
    pub fn acc_y(&self) -> f32 {
        self.acc_y.get()
    }

    pub fn set_acc_y(&self, acc_y: f32) {
        self.acc_y.set(acc_y);
    }

    #[must_use]
    pub fn spd_x(&self) -> f32 {
        self.spd_x.get()
    }

    pub fn set_spd_x(&self, spd_x: f32) {
        self.spd_x.set(spd_x);
    }

    #[must_use]
    pub fn spd_y(&self) -> f32 {
        self.spd_y.get()
    }

    pub fn set_spd_y(&self, spd_y: f32) {
        self.spd_y.set(spd_y);
    }

    /// `(accX, accY)`.
    #[must_use]
    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(self.acc_x(), self.acc_y())
    }

    /// `(spdX, spdY)`.
    #[must_use]
    pub fn speed(&self) -> Vec2 {
        Vec2::new(self.spd_x(), self.spd_y())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicsFields {
    acc_x: f32,
    acc_y: f32,
    spd_x: f32,
    spd_y: f32,
}

impl LiveComponent for SpritePhysicsComponent {
    fn kind(&self) -> &'static str {
        "SpritePhysicsComponent"
    }

    fn snapshot(&self) -> Result<Value, ComponentError> {
        let fields = PhysicsFields {
            acc_x: self.acc_x(),
            acc_y: self.acc_y(),
            spd_x: self.spd_x(),
            spd_y: self.spd_y(),
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

impl From<SpritePhysicsComponent> for ComponentValue {
    fn from(physics: SpritePhysicsComponent) -> Self {
        ComponentValue::live(physics)
    }
}
