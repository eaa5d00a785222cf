//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses. Authentication failures deliberately share one
//! generic body so the API never reveals whether an email is registered.

use crate::config::ConfigError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use doclens_core::extraction::ExtractionError;
use doclens_core::ports::PortError;
use doclens_core::prefs::PrefsError;
use doclens_core::token::TokenError;
use serde_json::json;
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Login failed. Covers both unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No token was presented on a protected route.
    #[error("Authentication required")]
    Unauthenticated,

    /// A token was presented but failed verification (signature, expiry,
    /// malformed). The response clears the session cookie.
    #[error("Invalid token")]
    InvalidToken,

    /// A valid token referenced a user that no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Request body validation failed; one entry per failed field.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Registration attempted with an email that is already taken.
    #[error("Email already exists")]
    EmailExists,

    /// The request was syntactically unusable (missing file, bad id, ...).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Every extraction tier failed; nothing usable could be produced.
    #[error("Could not extract any content from the document")]
    ExtractionExhausted,

    /// A downstream dependency (database, LLM) is unreachable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<PortError> for ApiError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(_) => ApiError::UserNotFound,
            PortError::Conflict(_) => ApiError::EmailExists,
            PortError::Unavailable(msg) => ApiError::Unavailable(msg),
            PortError::Unexpected(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            // All verification failures look identical to the client.
            TokenError::Invalid | TokenError::Expired | TokenError::Malformed => {
                ApiError::InvalidToken
            }
            TokenError::Signing(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::Exhausted => ApiError::ExtractionExhausted,
            ExtractionError::TierFailure { tier, reason } => {
                // Tier failures are recovered inside the chain; one escaping
                // here is a bug, not a user-facing condition.
                ApiError::Internal(format!("tier '{tier}' failure escaped the chain: {reason}"))
            }
        }
    }
}

impl From<PrefsError> for ApiError {
    fn from(e: PrefsError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// The `Set-Cookie` value that removes the session cookie.
pub const CLEAR_SESSION_COOKIE: &str = "token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            )
                .into_response(),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                [(header::SET_COOKIE, CLEAR_SESSION_COOKIE)],
                Json(json!({ "error": "Invalid token" })),
            )
                .into_response(),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            )
                .into_response(),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::EmailExists => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email already exists" })),
            )
                .into_response(),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::ExtractionExhausted => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "Could not extract any content from the document" })),
            )
                .into_response(),
            ApiError::Unavailable(msg) => {
                error!("Downstream dependency unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "error": "Service temporarily unavailable",
                        "hint": "check database connectivity"
                    })),
                )
                    .into_response()
            }
            other => {
                // Internal detail stays in the logs, never in the body.
                error!("Internal error: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
