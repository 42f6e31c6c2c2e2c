//! Sprite component with cached half extents and midpoints.
//!
//! [`SpriteComponent`] keeps `halfWidth`, `halfHeight`, `midPointX` and
//! `midPointY` in step with its raw rectangle. Each raw setter recomputes
//! exactly the cached fields that depend on it:
//!
//! | write    | recomputes                                  |
//! |----------|---------------------------------------------|
//! | `x`      | `midPointX = x + halfWidth`                 |
//! | `y`      | `midPointY = y + halfHeight`                |
//! | `width`  | `halfWidth = width / 2`, then `midPointX`   |
//! | `height` | `halfHeight = height / 2`, then `midPointY` |
//!
//! ## Write order
//!
//! The constructor runs the setters in the order `x, y, width, height`, so the
//! midpoints computed by the `x` and `y` writes use the half extents cached at
//! that moment (zero for a fresh sprite). The `width` and `height` writes then
//! recompute the midpoints, which makes the state consistent once construction
//! returns. The same holds for later updates: writing `x` alone uses whatever
//! `halfWidth` is cached, including one written directly through
//! [`SpriteComponent::set_half_width`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use engine_component::{ComponentError, ComponentValue, LiveComponent};
use glam::Vec2;
use serde::Serialize;
use serde_json::Value;

/// A render rectangle with derived fields.
#[derive(Debug)]
pub struct SpriteComponent {
    x: Cell<f32>,
    y: Cell<f32>,
    width: Cell<f32>,
    height: Cell<f32>,
    half_width: Cell<f32>,
    half_height: Cell<f32>,
    mid_point_x: Cell<f32>,
    mid_point_y: Cell<f32>,
    frame: Cell<u32>,
    layer: RefCell<String>,
    flipped: Cell<bool>,
}

impl SpriteComponent {
    /// Create a sprite, applying the raw setters in `x, y, width, height` order.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32, frame: u32, layer: impl Into<String>) -> Self {
        let sprite = Self {
            x: Cell::new(0.0),
            y: Cell::new(0.0),
            width: Cell::new(0.0),
            height: Cell::new(0.0),
            half_width: Cell::new(0.0),
            half_height: Cell::new(0.0),
            mid_point_x: Cell::new(0.0),
            mid_point_y: Cell::new(0.0),
            frame: Cell::new(frame),
            layer: RefCell::new(layer.into()),
            flipped: Cell::new(false),
        };
        sprite.set_x(x);
        sprite.set_y(y);
        sprite.set_width(width);
        sprite.set_height(height);
        sprite
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x.get()
    }

    /// Write `x` and recompute `midPointX` from the cached `halfWidth`.
    pub fn set_x(&self, x: f32) {
        self.x.set(x);
        self.mid_point_x.set(x + self.half_width.get());
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y.get()
    }

    /// Write `y` and recompute `midPointY` from the cached `halfHeight`.
    pub fn set_y(&self, y: f32) {
        self.y.set(y);
        self.mid_point_y.set(y + self.half_height.get());
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width.get()
    }

    /// Write `width`, then recompute `halfWidth` and `midPointX`.
    pub fn set_width(&self, width: f32) {
        self.width.set(width);
        self.half_width.set(width / 2.0);
        self.mid_point_x.set(self.x.get() + self.half_width.get());
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height.get()
    }

    /// Write `height`, then recompute `halfHeight` and `midPointY`.
    pub fn set_height(&self, height: f32) {
        self.height.set(height);
        self.half_height.set(height / 2.0);
        self.mid_point_y.set(self.y.get() + self.half_height.get());
    }

    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.half_width.get()
    }

    /// Overwrite the cached `halfWidth`. Nothing is recomputed.
    pub fn set_half_width(&self, half_width: f32) {
        self.half_width.set(half_width);
    }

    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.half_height.get()
    }

    /// Overwrite the cached `halfHeight`. Nothing is recomputed.
    pub fn set_half_height(&self, half_height: f32) {
        self.half_height.set(half_height);
    }

    #[must_use]
    pub fn mid_point_x(&self) -> f32 {
        self.mid_point_x.get()
    }

    /// Overwrite the cached `midPointX`. Nothing is recomputed.
    pub fn set_mid_point_x(&self, mid_point_x: f32) {
        self.mid_point_x.set(mid_point_x);
    }

    #[must_use]
    pub fn mid_point_y(&self) -> f32 {
        self.mid_point_y.get()
    }

    /// Overwrite the cached `midPointY`. Nothing is recomputed.
    pub fn set_mid_point_y(&self, mid_point_y: f32) {
        self.mid_point_y.set(mid_point_y);
    }

    /// Animation frame index.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame.get()
    }

    pub fn set_frame(&self, frame: u32) {
        self.frame.set(frame);
    }

    /// Render layer name.
    #[must_use]
    pub fn layer(&self) -> String {
        self.layer.borrow().clone()
    }

    pub fn set_layer(&self, layer: impl Into<String>) {
        *self.layer.borrow_mut() = layer.into();
    }

    #[must_use]
    pub fn flipped(&self) -> bool {
        self.flipped.get()
    }

    pub fn set_flipped(&self, flipped: bool) {
        self.flipped.set(flipped);
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Cached midpoint.
    #[must_use]
    pub fn mid_point(&self) -> Vec2 {
        Vec2::new(self.mid_point_x(), self.mid_point_y())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpriteFields {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    half_width: f32,
    half_height: f32,
    mid_point_x: f32,
    mid_point_y: f32,
    frame: u32,
    layer: String,
    flipped: bool,
}

impl LiveComponent for SpriteComponent {
    fn kind(&self) -> &'static str {
        "SpriteComponent"
    }

    fn snapshot(&self) -> Result<Value, ComponentError> {
        let fields = SpriteFields {
            x: self.x(),
            y: self.y(),
            width: self.width(),
            height: self.height(),
            half_width: self.half_width(),
            half_height: self.half_height(),
            mid_point_x: self.mid_point_x(),
            mid_point_y: self.mid_point_y(),
            frame: self.frame(),
            layer: self.layer(),
            flipped: self.flipped(),
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

impl From<SpriteComponent> for ComponentValue {
    fn from(sprite: SpriteComponent) -> Self {
        ComponentValue::live(sprite)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_construction_settles_derived_fields() {
        let sprite = SpriteComponent::new(10.0, 20.0, 8.0, 4.0, 1, "Player");
        assert_eq!(sprite.half_width(), 4.0);
        assert_eq!(sprite.half_height(), 2.0);
        assert_eq!(sprite.mid_point_x(), 14.0);
        assert_eq!(sprite.mid_point_y(), 22.0);
        assert!(!sprite.flipped());
    }

    #[test]
    fn test_width_recomputes_half_and_mid() {
        let sprite = SpriteComponent::new(0.0, 0.0, 2.0, 2.0, 0, "Platforms");
        sprite.set_width(10.0);
        assert_eq!(sprite.half_width(), 5.0);
        assert_eq!(sprite.mid_point_x(), 5.0);
        sprite.set_height(6.0);
        assert_eq!(sprite.half_height(), 3.0);
        assert_eq!(sprite.mid_point_y(), 3.0);
    }

    #[test]
    fn test_position_write_uses_cached_half_extents() {
        let sprite = SpriteComponent::new(0.0, 0.0, 16.0, 8.0, 0, "Player");
        sprite.set_x(100.0);
        sprite.set_y(50.0);
        assert_eq!(sprite.mid_point(), Vec2::new(108.0, 54.0));
    }

    #[test]
    fn test_x_write_reads_overwritten_cache() {
        let sprite = SpriteComponent::new(0.0, 0.0, 16.0, 16.0, 0, "Player");
        sprite.set_half_width(1.0);
        sprite.set_x(10.0);
        // Stale relative to width, by construction of the write rules.
        assert_eq!(sprite.mid_point_x(), 11.0);
        assert_eq!(sprite.width(), 16.0);
    }

    #[test]
    fn test_cached_fields_are_directly_writable() {
        let sprite = SpriteComponent::new(0.0, 0.0, 4.0, 4.0, 0, "Player");
        sprite.set_mid_point_x(-1.0);
        sprite.set_mid_point_y(-2.0);
        sprite.set_half_height(9.0);
        assert_eq!(sprite.mid_point(), Vec2::new(-1.0, -2.0));
        assert_eq!(sprite.half_height(), 9.0);
        assert_eq!(sprite.height(), 4.0);
    }

    #[test]
    fn test_engine_tags() {
        let sprite = SpriteComponent::new(0.0, 0.0, 1.0, 1.0, 1, "Player");
        sprite.set_frame(3);
        sprite.set_layer("Platforms");
        sprite.set_flipped(true);
        assert_eq!(sprite.frame(), 3);
        assert_eq!(sprite.layer(), "Platforms");
        assert!(sprite.flipped());
        assert_eq!(sprite.size(), Vec2::new(1.0, 1.0));
        assert_eq!(sprite.position(), Vec2::ZERO);
    }

    #[test]
    fn test_snapshot_lists_stored_fields() {
        let sprite = SpriteComponent::new(2.0, 4.0, 6.0, 8.0, 1, "Player");
        assert_eq!(
            sprite.snapshot().unwrap(),
            json!({
                "x": 2.0, "y": 4.0, "width": 6.0, "height": 8.0,
                "halfWidth": 3.0, "halfHeight": 4.0,
                "midPointX": 5.0, "midPointY": 8.0,
                "frame": 1, "layer": "Player", "flipped": false
            })
        );
    }
}
