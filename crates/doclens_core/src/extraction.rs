//! crates/doclens_core/src/extraction.rs
//!
//! The content-extraction fallback chain. A chain owns an ordered list of
//! tiers; each tier is one strategy for turning an uploaded document into a
//! `DocumentAnalysis`. Tiers run strictly in order, each at most once per
//! request, and the first usable result wins. Tier failures are logged and
//! swallowed; only exhaustion of every tier surfaces an error.

use crate::domain::{DocumentSource, ExtractionOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// One tier failed. Recovered inside the chain, never shown to callers.
    #[error("extraction tier '{tier}' failed: {reason}")]
    TierFailure { tier: &'static str, reason: String },
    /// Every tier in the chain failed or produced nothing usable.
    #[error("no extraction tier produced a usable analysis")]
    Exhausted,
}

/// One strategy in the ordered fallback chain.
#[async_trait]
pub trait ExtractionTier: Send + Sync {
    /// A short name used in logs when the tier fails.
    fn name(&self) -> &'static str;

    async fn extract(&self, source: &DocumentSource)
        -> Result<ExtractionOutcome, ExtractionError>;
}

/// Runs tiers in order until one produces a non-empty analysis.
pub struct ExtractionChain {
    tiers: Vec<Arc<dyn ExtractionTier>>,
}

impl ExtractionChain {
    pub fn new(tiers: Vec<Arc<dyn ExtractionTier>>) -> Self {
        Self { tiers }
    }

    /// Attempts each tier at most once, in order, awaiting each to
    /// completion before falling back. A tier that returns an empty analysis
    /// counts as a tier failure. No retries, no timeouts, no fan-out.
    pub async fn run(&self, source: &DocumentSource)
        -> Result<ExtractionOutcome, ExtractionError> {
        for tier in &self.tiers {
            match tier.extract(source).await {
                Ok(outcome) if !outcome.analysis.is_empty() => return Ok(outcome),
                Ok(_) => {
                    warn!(tier = tier.name(), "tier returned an empty analysis, falling back");
                }
                Err(e) => {
                    warn!(tier = tier.name(), error = %e, "tier failed, falling back");
                }
            }
        }
        Err(ExtractionError::Exhausted)
    }
}
