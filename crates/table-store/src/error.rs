use thiserror::Error;

/// Errors that can occur when interacting with the table store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write was rejected because its condition did not
    /// hold against the current item.
    #[error("conditional write rejected")]
    ConditionFailed,

    /// A storage call did not complete within the configured deadline.
    #[error("storage deadline exceeded during {op}")]
    DeadlineExceeded { op: &'static str },

    /// A continuation token could not be decoded.
    #[error("invalid pagination cursor: {0}")]
    InvalidCursor(String),

    /// An attribute value could not be represented in the item model.
    #[error("unsupported attribute value for {attribute}")]
    UnsupportedAttribute { attribute: String },

    /// The storage backend reported an error.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
