//! Component-layer error types.

use crate::component::ComponentName;
use crate::entity::EntityId;

/// Errors raised when a component cannot be resolved or decoded.
///
/// Structural operations on an [`Entity`](crate::Entity) never fail. These
/// errors come from accessors that depend on a sibling component, and from
/// typed views over plain records.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A delegating component looked up its sibling and found nothing.
    #[error("{entity} has no '{component}' component to delegate to")]
    MissingDependency {
        /// The entity that was searched.
        entity: EntityId,
        /// The sibling component name.
        component: ComponentName,
    },

    /// The sibling slot exists but holds a different kind of value.
    #[error("'{component}' on {entity} is not a {expected}")]
    WrongKind {
        /// The entity that was searched.
        entity: EntityId,
        /// The sibling component name.
        component: ComponentName,
        /// The live component kind that was expected.
        expected: &'static str,
    },

    /// The owning entity was dropped while the component was still in use.
    #[error("owning entity of '{component}' no longer exists")]
    EntityDropped {
        /// The component that outlived its entity.
        component: ComponentName,
    },

    /// A plain record could not be decoded into a typed view.
    #[error("failed to decode '{component}' record: {source}")]
    Decode {
        /// The record's component name.
        component: ComponentName,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// A live component could not render its field snapshot.
    #[error("failed to snapshot '{kind}': {source}")]
    Snapshot {
        /// The live component kind.
        kind: &'static str,
        /// The underlying encode failure.
        #[source]
        source: serde_json::Error,
    },
}
