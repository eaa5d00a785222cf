//! services/api/src/web/documents.rs
//!
//! Document analysis endpoints: the multipart upload route and the
//! metadata-only fallback route. Both feed the same extraction chain; the
//! upload carries bytes, the fallback carries only {filename, filesize,
//! filetype}.

use axum::{
    extract::{Multipart, State},
    Json,
};
use doclens_core::domain::{DocumentAnalysis, DocumentMeta, DocumentSource, Provenance};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// The analysis payload as it crosses the wire.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBody {
    pub title: String,
    pub total_pages: usize,
    pub total_words: usize,
    pub summary: String,
    pub text: String,
}

impl From<DocumentAnalysis> for AnalysisBody {
    fn from(a: DocumentAnalysis) -> Self {
        Self {
            title: a.title,
            total_pages: a.total_pages,
            total_words: a.total_words,
            summary: a.summary,
            text: a.text,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: AnalysisBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sample_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeMetadataRequest {
    pub filename: String,
    pub filesize: u64,
    pub filetype: String,
}

async fn run_chain(state: &AppState, source: DocumentSource) -> Result<AnalyzeResponse, ApiError> {
    let outcome = state.extraction.run(&source).await?;
    let is_sample = outcome.provenance == Provenance::SampleData;
    Ok(AnalyzeResponse {
        analysis: AnalysisBody::from(outcome.analysis),
        is_sample_data: is_sample.then_some(true),
        warning: outcome.warning,
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/documents/analyze - Analyze an uploaded document
///
/// Accepts a multipart/form-data request with a `document` file part.
#[utoipa::path(
    post,
    path = "/api/documents/analyze",
    request_body(content_type = "multipart/form-data", description = "The document to analyze."),
    responses(
        (status = 200, description = "Analysis produced", body = AnalyzeResponse),
        (status = 400, description = "No document part in the form"),
        (status = 422, description = "No extraction tier produced a usable analysis"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn analyze_document_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut source = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart data: {e}")))?
    {
        if field.name() != Some("document") {
            continue;
        }
        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let filetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file bytes: {e}")))?;

        let meta = DocumentMeta {
            filename,
            filesize: bytes.len() as u64,
            filetype,
        };
        source = Some(DocumentSource::from_bytes(meta, bytes.to_vec()));
        break;
    }

    let source = source.ok_or_else(|| {
        ApiError::BadRequest("Multipart form must include a 'document' file".to_string())
    })?;

    Ok(Json(run_chain(&state, source).await?))
}

/// POST /api/documents/analyze-metadata - Analyze from metadata only
///
/// The client falls back to this route when it cannot deliver the file
/// itself; no binary ever arrives here.
#[utoipa::path(
    post,
    path = "/api/documents/analyze-metadata",
    request_body = AnalyzeMetadataRequest,
    responses(
        (status = 200, description = "Analysis produced", body = AnalyzeResponse),
        (status = 400, description = "Malformed metadata"),
        (status = 422, description = "No extraction tier produced a usable analysis"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn analyze_metadata_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeMetadataRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("filename must not be empty".to_string()));
    }

    let source = DocumentSource::metadata_only(DocumentMeta {
        filename: req.filename,
        filesize: req.filesize,
        filetype: if req.filetype.trim().is_empty() {
            "application/octet-stream".to_string()
        } else {
            req.filetype
        },
    });

    Ok(Json(run_chain(&state, source).await?))
}
