pub mod db;
pub mod extract;
pub mod summary_llm;

pub use db::DbAdapter;
pub use extract::{MetadataSummaryTier, PdfExtractTier, SampleDataTier};
pub use summary_llm::OpenAiSummaryAdapter;
