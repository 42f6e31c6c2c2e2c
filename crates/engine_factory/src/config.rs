//! Factory configuration: the per-type construction rules of the bundle table.

use std::fmt;
use std::rc::Rc;

use engine_sprite::{Clock, MonotonicClock};

use crate::entity_type::EntityType;

/// Frame index and render layer for a being's sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteStyle {
    pub frame: u32,
    pub layer: String,
}

impl SpriteStyle {
    #[must_use]
    pub fn new(frame: u32, layer: impl Into<String>) -> Self {
        Self {
            frame,
            layer: layer.into(),
        }
    }
}

/// Configuration for a [`GameEntityFactory`](crate::GameEntityFactory).
#[derive(Clone)]
pub struct FactoryConfig {
    /// Sprite style for `Player` beings.
    pub player: SpriteStyle,
    /// Sprite style for `Monster` beings.
    pub monster: SpriteStyle,
    /// State every being starts in.
    pub initial_state: String,
    /// Time source handed to every state component.
    pub clock: Rc<dyn Clock>,
}

impl FactoryConfig {
    /// The default catalog: players on frame 1 of the `Player` layer,
    /// monsters on frame 0 of `Platforms`, everyone starting `idle`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: SpriteStyle::new(1, "Player"),
            monster: SpriteStyle::new(0, "Platforms"),
            initial_state: "idle".to_string(),
            clock: Rc::new(MonotonicClock::new()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = state.into();
        self
    }

    #[must_use]
    pub fn with_player_style(mut self, style: SpriteStyle) -> Self {
        self.player = style;
        self
    }

    #[must_use]
    pub fn with_monster_style(mut self, style: SpriteStyle) -> Self {
        self.monster = style;
        self
    }

    /// The sprite style for a being type, selected by exact tag.
    #[must_use]
    pub fn sprite_style(&self, entity_type: &EntityType) -> Option<&SpriteStyle> {
        match entity_type {
            EntityType::Player => Some(&self.player),
            EntityType::Monster => Some(&self.monster),
            _ => None,
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FactoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryConfig")
            .field("player", &self.player)
            .field("monster", &self.monster)
            .field("initial_state", &self.initial_state)
            .finish_non_exhaustive()
    }
}
