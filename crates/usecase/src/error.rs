use domain::DomainError;
use repository::RepositoryError;
use table_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the use-case layer, with stable machine-readable
/// codes for the HTTP binding.
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: String,
        available: u32,
        requested: u32,
    },

    /// Another writer changed the product's stock between our read and
    /// our conditional write. The placement is aborted, not retried.
    #[error("stock for product {0} changed concurrently")]
    StockConflict(String),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Input or state failed a domain rule.
    #[error(transparent)]
    Validation(DomainError),

    /// A stored record could not be reconstructed.
    #[error("corrupt {entity} record: {key}")]
    CorruptRecord { entity: &'static str, key: String },

    #[error(transparent)]
    Storage(StoreError),
}

impl UseCaseError {
    /// Stable code identifying the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            UseCaseError::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            UseCaseError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            UseCaseError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            UseCaseError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            UseCaseError::StockConflict(_) => "STOCK_CONFLICT",
            UseCaseError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            UseCaseError::Validation(DomainError::InvalidTransition { .. }) => {
                "INVALID_TRANSITION"
            }
            UseCaseError::Validation(_) => "VALIDATION_FAILED",
            UseCaseError::CorruptRecord { .. } => "CORRUPT_RECORD",
            UseCaseError::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

impl From<DomainError> for UseCaseError {
    fn from(err: DomainError) -> Self {
        UseCaseError::Validation(err)
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => match entity {
                "customer" => UseCaseError::CustomerNotFound(id),
                "product" => UseCaseError::ProductNotFound(id),
                _ => UseCaseError::OrderNotFound(id),
            },
            RepositoryError::DuplicateEmail(email) => UseCaseError::DuplicateEmail(email),
            RepositoryError::CorruptRecord { entity, key, .. } => {
                UseCaseError::CorruptRecord { entity, key }
            }
            RepositoryError::Domain(err) => UseCaseError::Validation(err),
            RepositoryError::Store(err) => UseCaseError::Storage(err),
        }
    }
}

/// Result type for use-case operations.
pub type Result<T> = std::result::Result<T, UseCaseError>;
