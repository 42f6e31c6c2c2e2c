//! Factory error types.

/// Errors that can occur before an entity is assembled.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The raw data could not be decoded into [`EntityData`](crate::EntityData).
    #[error("invalid entity data: {0}")]
    InvalidData(#[from] serde_json::Error),
}
