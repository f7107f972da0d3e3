use domain::DomainError;
use table_store::StoreError;
use thiserror::Error;

/// Errors raised while translating records at the storage boundary.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A required attribute is absent from the item.
    #[error("missing attribute {0}")]
    MissingAttribute(&'static str),

    /// An attribute is present with the wrong scalar type or an
    /// unrepresentable value.
    #[error("attribute {0} has an unexpected type or value")]
    WrongType(&'static str),

    /// The `Type` discriminator names no known entity.
    #[error("unknown entity type discriminator: {0}")]
    UnknownEntityType(String),

    /// The `Type` discriminator names a different entity than expected.
    #[error("expected a {expected} record, found {found}")]
    EntityTypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A timestamp attribute failed to parse as RFC 3339.
    #[error("attribute {0} is not a valid RFC 3339 timestamp")]
    Timestamp(&'static str),

    /// The embedded order-items JSON payload failed to parse.
    #[error("order items payload failed to parse: {0}")]
    ItemsPayload(#[from] serde_json::Error),

    /// A reconstructed value type failed its own validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors surfaced by the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The email is already owned by a different customer.
    #[error("email already taken by another customer: {0}")]
    DuplicateEmail(String),

    /// A single-item lookup found a record that cannot be reconstructed.
    #[error("corrupt {entity} record at {key}: {source}")]
    CorruptRecord {
        entity: &'static str,
        key: String,
        source: MappingError,
    },

    /// An entity invariant was violated during a repository-mediated
    /// mutation (e.g. reserving more stock than is available).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// True if this is the not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
