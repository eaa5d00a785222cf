//! services/api/src/web/rest.rs
//!
//! Assembles the Axum router from the individual handler modules and holds
//! the master definition for the OpenAPI specification.

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::web::auth::{
    check_token_handler, login_handler, logout_handler, me_handler, register_handler,
};
use crate::web::documents::{analyze_document_handler, analyze_metadata_handler};
use crate::web::middleware::require_session;
use crate::web::prefs::{get_preferences_handler, list_languages_handler, put_preferences_handler};
use crate::web::state::AppState;
use crate::web::users::{confirm_payment_handler, delete_user_handler, list_users_handler};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::check_token_handler,
        crate::web::auth::me_handler,
        crate::web::auth::logout_handler,
        crate::web::users::list_users_handler,
        crate::web::users::delete_user_handler,
        crate::web::users::confirm_payment_handler,
        crate::web::documents::analyze_document_handler,
        crate::web::documents::analyze_metadata_handler,
        crate::web::prefs::list_languages_handler,
        crate::web::prefs::get_preferences_handler,
        crate::web::prefs::put_preferences_handler,
    ),
    components(schemas(
        crate::web::auth::RegisterRequest,
        crate::web::auth::RegisterResponse,
        crate::web::auth::LoginRequest,
        crate::web::auth::LoginResponse,
        crate::web::auth::IdentityResponse,
        crate::web::users::UserSummary,
        crate::web::documents::AnalyzeMetadataRequest,
        crate::web::documents::AnalyzeResponse,
        crate::web::documents::AnalysisBody,
        crate::web::prefs::PreferencesBody,
        crate::web::prefs::PreferencesResponse,
    )),
    tags(
        (name = "doclens API", description = "Authentication, document analysis, and client preferences.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router Assembly
//=========================================================================================

/// Builds the full API router: public routes merged with session-protected
/// routes. The binaries and the integration tests both go through here.
pub fn api_router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.max_upload_bytes;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/check-token", get(check_token_handler))
        .route("/api/languages", get(list_languages_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route(
            "/api/users",
            get(list_users_handler).delete(delete_user_handler),
        )
        .route("/api/payments/confirm", post(confirm_payment_handler))
        .route("/api/documents/analyze", post(analyze_document_handler))
        .route(
            "/api/documents/analyze-metadata",
            post(analyze_metadata_handler),
        )
        .route(
            "/api/preferences/{client_id}",
            get(get_preferences_handler).put(put_preferences_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}
