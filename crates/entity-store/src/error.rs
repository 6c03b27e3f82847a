use thiserror::Error;

/// Errors that can occur when interacting with an entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("Entity store lock poisoned during {operation}")]
    Poisoned { operation: &'static str },
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
