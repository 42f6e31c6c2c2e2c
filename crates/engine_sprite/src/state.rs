//! Timestamped state machine component.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use engine_component::{ComponentError, ComponentValue, LiveComponent};
use serde::Serialize;
use serde_json::Value;

use crate::clock::Clock;

/// Current and previous state tags plus the time of the last transition.
///
/// Every write to `state` shifts the old value into `last_state` and stamps
/// `last_update` with the injected clock, even when the new tag equals the
/// old one. `grounded` and `ground_hit` are independent flags.
pub struct StateComponent {
    state: RefCell<String>,
    last_state: RefCell<Option<String>>,
    last_update: Cell<f64>,
    grounded: Cell<bool>,
    ground_hit: Cell<bool>,
    clock: Rc<dyn Clock>,
}

impl StateComponent {
    /// Enter `initial` at the clock's current time. There is no previous state.
    #[must_use]
    pub fn new(initial: impl Into<String>, clock: Rc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            state: RefCell::new(initial.into()),
            last_state: RefCell::new(None),
            last_update: Cell::new(now),
            grounded: Cell::new(false),
            ground_hit: Cell::new(false),
            clock,
        }
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.state.borrow().clone()
    }

    /// Returns `true` if the current tag is `state`.
    #[must_use]
    pub fn is(&self, state: &str) -> bool {
        *self.state.borrow() == state
    }

    /// Transition to `state`.
    pub fn set_state(&self, state: impl Into<String>) {
        let previous = self.state.replace(state.into());
        *self.last_state.borrow_mut() = Some(previous);
        self.last_update.set(self.clock.now());
    }

    #[must_use]
    pub fn last_state(&self) -> Option<String> {
        self.last_state.borrow().clone()
    }

    /// Timestamp of the latest `state` write, in clock milliseconds.
    #[must_use]
    pub fn last_update(&self) -> f64 {
        self.last_update.get()
    }

    /// Milliseconds spent in the current state so far.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.clock.now() - self.last_update.get()
    }

    #[must_use]
    pub fn grounded(&self) -> bool {
        self.grounded.get()
    }

    pub fn set_grounded(&self, grounded: bool) {
        self.grounded.set(grounded);
    }

    #[must_use]
    pub fn ground_hit(&self) -> bool {
        self.ground_hit.get()
    }

    pub fn set_ground_hit(&self, ground_hit: bool) {
        self.ground_hit.set(ground_hit);
    }
}

impl std::fmt::Debug for StateComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateComponent")
            .field("state", &self.state)
            .field("last_state", &self.last_state)
            .field("last_update", &self.last_update)
            .field("grounded", &self.grounded)
            .field("ground_hit", &self.ground_hit)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateFields {
    state: String,
    last_state: Option<String>,
    last_update: f64,
    grounded: bool,
    ground_hit: bool,
}

impl LiveComponent for StateComponent {
    fn kind(&self) -> &'static str {
        "StateComponent"
    }

    fn snapshot(&self) -> Result<Value, ComponentError> {
        let fields = StateFields {
            state: self.state(),
            last_state: self.last_state(),
            last_update: self.last_update(),
            grounded: self.grounded(),
            ground_hit: self.ground_hit(),
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

impl From<StateComponent> for ComponentValue {
    fn from(state: StateComponent) -> Self {
        ComponentValue::live(state)
    }
}
