pub mod domain;
pub mod extraction;
pub mod ports;
pub mod prefs;
pub mod token;

pub use domain::{
    ClientPreferences, DocumentAnalysis, DocumentMeta, DocumentSource, ExtractionOutcome,
    Provenance, TextDirection, User, UserCredentials,
};
pub use extraction::{ExtractionChain, ExtractionError, ExtractionTier};
pub use ports::{PortError, PortResult, Summarizer, UserStore};
pub use prefs::{Language, PreferenceStore, PrefsError};
pub use token::{Claims, Refresh, TokenError, TokenService};
