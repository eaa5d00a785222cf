//! crates/doclens_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{DocumentAnalysis, User, UserCredentials};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Downstream service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The credential store. Lookups key on email (unique) or on the user id
/// carried inside a session token.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str)
        -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    // --- Payment Status ---
    async fn mark_payment_complete(&self, user_id: Uuid) -> PortResult<User>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produces a prose summary of the analyzed document. The analysis passed
    /// in carries the full extracted text plus the page and word counts.
    async fn summarize_document(&self, analysis: &DocumentAnalysis) -> PortResult<String>;
}
