use thiserror::Error;

/// Errors surfaced by checkout session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("sku '{0}' not found in pricing rules")]
    UnknownSku(String),
}

/// Errors surfaced by the pricing catalog when loading or reloading rules.
///
/// At initial load any of these is fatal to catalog construction. On a
/// background reload they are logged and the prior rule set stays active.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read pricing source: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse pricing source: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pricing source: {0}")]
    Validation(String),
}

/// Errors surfaced by the session store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("session with id '{0}' not found")]
    NotFound(uuid::Uuid),

    #[error("failed to persist session: {0}")]
    WriteFailed(String),
}
