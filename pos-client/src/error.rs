//! Client error types
//!
//! Every mutation failure is resolved into one of four kinds before rollback
//! and notification: validation (user-correctable), stale (entity vanished or
//! table taken; forces a re-fetch of the affected store), network/server
//! (rollback and toast), auth (login redirect). Nothing here is fatal; every
//! failure leaves the stores in a previously-valid state.

use shared::response::FieldErrors;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not match the envelope contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Field-scoped validation failure (HTTP 422)
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Entity vanished between fetch and mutation
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity changed under us (e.g., table no longer available)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication required (HTTP 401)
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (HTTP 403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Server-side failure (HTTP 5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Rejected by a local status-machine guard; no network call was made
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Resolved error taxonomy for notification routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-correctable, field-scoped
    Validation,
    /// Entity vanished or conflicted; affected store must be re-fetched
    Stale,
    /// Transport or server failure
    Network,
    /// Session invalid; redirect to login
    Auth,
}

impl ClientError {
    /// Build the matching error for a non-2xx response.
    pub fn from_status(status: u16, message: Option<String>, errors: Option<FieldErrors>) -> Self {
        let message = message.unwrap_or_else(|| "Request failed".to_string());
        match status {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            422 => ClientError::Validation(errors.unwrap_or_default()),
            _ => ClientError::Server(message),
        }
    }

    /// Resolve into the notification taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) | ClientError::InvalidOperation(_) => ErrorKind::Validation,
            ClientError::NotFound(_) | ClientError::Conflict(_) => ErrorKind::Stale,
            ClientError::Unauthorized | ClientError::Forbidden(_) => ErrorKind::Auth,
            ClientError::Http(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Server(_)
            | ClientError::Serialization(_) => ErrorKind::Network,
        }
    }

    /// Whether the affected store should be force-refreshed after rollback.
    pub fn triggers_refetch(&self) -> bool {
        self.kind() == ErrorKind::Stale
    }
}
