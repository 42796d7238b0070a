/// Error types shared across the chatbot crates.
///
/// These errors represent failures in infrastructure components (the catalog database)
/// that the server and its tests both need to name. Application-specific errors are
/// defined in each binary crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
}
