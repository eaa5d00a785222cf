//! crates/doclens_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or web framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Represents a registered user - used throughout the app.
// Never carries the password hash; see `UserCredentials` for that.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_payment: bool,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Metadata describing an uploaded document, independent of its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub filename: String,
    pub filesize: u64,
    pub filetype: String,
}

/// The input handed to the extraction tiers. The binary payload is optional
/// because the metadata-only path carries no file contents.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub meta: DocumentMeta,
    pub bytes: Option<Vec<u8>>,
}

impl DocumentSource {
    pub fn from_bytes(meta: DocumentMeta, bytes: Vec<u8>) -> Self {
        Self {
            meta,
            bytes: Some(bytes),
        }
    }

    pub fn metadata_only(meta: DocumentMeta) -> Self {
        Self { meta, bytes: None }
    }
}

/// The structured result of analyzing one document. Lives for a single
/// request/response cycle and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub title: String,
    pub total_pages: usize,
    pub total_words: usize,
    pub summary: String,
    pub text: String,
}

impl DocumentAnalysis {
    /// An analysis with neither summary nor text is useless to a caller and
    /// is treated as a failed extraction attempt.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.text.trim().is_empty()
    }
}

/// Whether an analysis came from genuine extraction or a placeholder path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    ActualExtractedData,
    SampleData,
}

/// One tier's successful output: the analysis plus its provenance.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub analysis: DocumentAnalysis,
    pub provenance: Provenance,
    pub warning: Option<String>,
}

/// UI choices a client persists between visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPreferences {
    pub selected_language: String,
    pub language_code: String,
    pub theme: String,
}

impl Default for ClientPreferences {
    fn default() -> Self {
        Self {
            selected_language: "English".to_string(),
            language_code: "en".to_string(),
            theme: "light".to_string(),
        }
    }
}

/// Text direction derived from the active language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}
