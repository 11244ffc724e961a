//! API response envelope
//!
//! Every backend endpoint wraps its payload in the same JSON envelope:
//!
//! ```json
//! {
//!     "success": true,
//!     "data": { ... },
//!     "message": "optional human-readable text"
//! }
//! ```
//!
//! Validation failures come back as HTTP 422 with a field → message-list map
//! in the body; see [`ErrorBody`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Validation error map: field name → list of messages for that field.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Unified response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Create an error envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Body shape of a non-2xx response.
///
/// `errors` is only present on 422 validation failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}
