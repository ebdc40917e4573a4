//! Typed error handling for the social backend
//!
//! Every failure a handler can produce is a [`SocialError`]. Each variant
//! carries a more specific error type for its category, knows its HTTP status
//! code and a stable machine-readable error code, and renders as a JSON
//! [`ErrorResponse`].
//!
//! # Error Categories
//!
//! - [`ValidationError`]: domain rule and field validation failures (400)
//! - [`RequestError`]: authentication, authorization and malformed requests
//! - [`StorageError`]: failures reported by a storage backend
//!
//! # Example
//!
//! ```rust,ignore
//! match follows.follow(alice, alice).await {
//!     Err(SocialError::Validation(ValidationError::SelfFollow)) => { /* 400 */ }
//!     Err(e) => eprintln!("other error: {}", e),
//!     Ok(edge) => println!("following since {}", edge.created_at),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The main error type returned by services and handlers
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// A domain rule or input field was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request itself was not acceptable (auth, ids, JSON)
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The addressed entity does not exist
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// Storage backend failure
    #[error(transparent)]
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SocialError {
    /// Shorthand for a not-found error on a typed id
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        SocialError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a 401
    pub fn unauthorized(message: impl Into<String>) -> Self {
        SocialError::Request(RequestError::Unauthorized {
            message: message.into(),
        })
    }

    /// Shorthand for a 403
    pub fn forbidden(message: impl Into<String>) -> Self {
        SocialError::Request(RequestError::Forbidden {
            message: message.into(),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SocialError::Validation(_) => StatusCode::BAD_REQUEST,
            SocialError::Request(e) => e.status_code(),
            SocialError::NotFound { .. } => StatusCode::NOT_FOUND,
            SocialError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SocialError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SocialError::Validation(e) => e.error_code(),
            SocialError::Request(e) => e.error_code(),
            SocialError::NotFound { .. } => "NOT_FOUND",
            SocialError::Storage(_) => "STORAGE_ERROR",
            SocialError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            // Backend messages can carry SQL; keep them in the logs only
            SocialError::Storage(_) => "storage backend failure".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            SocialError::NotFound { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id,
            })),
            SocialError::Validation(ValidationError::TagLimitExceeded { limit, attempted }) => {
                Some(serde_json::json!({ "limit": limit, "attempted": attempted }))
            }
            SocialError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            SocialError::Validation(ValidationError::Field { field, .. })
            | SocialError::Validation(ValidationError::Duplicate { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<StorageError> for SocialError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity_type, id } => SocialError::NotFound { entity_type, id },
            other => SocialError::Storage(other),
        }
    }
}

impl From<validator::ValidationErrors> for SocialError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SocialError::Validation(errors.into())
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Domain rule and field validation failures; all map to 400
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("cannot follow self")]
    SelfFollow,

    #[error("already following")]
    AlreadyFollowing,

    #[error("not following")]
    NotFollowing,

    #[error("already edited")]
    AlreadyEdited,

    #[error("edit window expired")]
    EditWindowExpired,

    #[error("tag limit exceeded")]
    TagLimitExceeded { limit: usize, attempted: usize },

    #[error("already liked")]
    AlreadyLiked,

    #[error("not liked")]
    NotLiked,

    /// A unique value (username, email) is already in use
    #[error("{message}")]
    Duplicate { field: String, message: String },

    #[error("{field}: {message}")]
    Field { field: String, message: String },

    #[error("Validation failed: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Shorthand for a single-field failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::SelfFollow => "SELF_FOLLOW",
            ValidationError::AlreadyFollowing => "ALREADY_FOLLOWING",
            ValidationError::NotFollowing => "NOT_FOLLOWING",
            ValidationError::AlreadyEdited => "ALREADY_EDITED",
            ValidationError::EditWindowExpired => "EDIT_WINDOW_EXPIRED",
            ValidationError::TagLimitExceeded { .. } => "TAG_LIMIT_EXCEEDED",
            ValidationError::AlreadyLiked => "ALREADY_LIKED",
            ValidationError::NotLiked => "NOT_LIKED",
            ValidationError::Duplicate { .. } => "DUPLICATE_VALUE",
            ValidationError::Field { .. } | ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by the shape or credentials of the request
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid id '{value}'")]
    InvalidId { value: String },

    #[error("Invalid JSON body: {message}")]
    InvalidJson { message: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::InvalidId { .. } => "INVALID_ID",
            RequestError::InvalidJson { .. } => "INVALID_JSON",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by a [`SocialStore`](crate::storage::SocialStore) backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The addressed row does not exist
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// A uniqueness or state constraint rejected the write
    #[error("constraint '{constraint}' violated")]
    Conflict { constraint: String },

    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn conflict(constraint: &str) -> Self {
        StorageError::Conflict {
            constraint: constraint.to_string(),
        }
    }

    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        StorageError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// True when this is a conflict on the named constraint
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, StorageError::Conflict { constraint } if constraint == name)
    }
}
