pub mod auth;
pub mod documents;
pub mod middleware;
pub mod prefs;
pub mod rest;
pub mod state;
pub mod users;

// Re-export the router builder and auth middleware so the binaries and
// integration tests have a single obvious entry point.
pub use middleware::require_session;
pub use rest::{api_router, ApiDoc};
