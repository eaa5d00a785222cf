//! services/api/src/web/prefs.rs
//!
//! Client preference endpoints and the language catalog.

use axum::{
    extract::{Path, State},
    Json,
};
use doclens_core::domain::ClientPreferences;
use doclens_core::prefs::{is_known_language_code, language_catalog, resolve_direction};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesBody {
    pub selected_language: String,
    pub language_code: String,
    pub theme: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub selected_language: String,
    pub language_code: String,
    pub theme: String,
    /// "rtl" for the fixed right-to-left code set, otherwise "ltr".
    pub direction: &'static str,
}

impl From<ClientPreferences> for PreferencesResponse {
    fn from(p: ClientPreferences) -> Self {
        let direction = resolve_direction(&p.language_code).as_str();
        Self {
            selected_language: p.selected_language,
            language_code: p.language_code,
            theme: p.theme,
            direction,
        }
    }
}

/// GET /api/languages - The selectable language catalog
#[utoipa::path(
    get,
    path = "/api/languages",
    responses((status = 200, description = "All selectable languages"))
)]
pub async fn list_languages_handler() -> Json<Vec<Value>> {
    let languages = language_catalog()
        .into_iter()
        .map(|lang| {
            json!({
                "name": lang.name,
                "code": lang.code,
                "direction": resolve_direction(lang.code).as_str(),
            })
        })
        .collect();
    Json(languages)
}

/// GET /api/preferences/{client_id} - Read a client's stored preferences
///
/// A client that has never written anything gets the defaults back, matching
/// the original first-visit behavior.
#[utoipa::path(
    get,
    path = "/api/preferences/{client_id}",
    params(("client_id" = String, Path, description = "Opaque client identifier")),
    responses(
        (status = 200, description = "Stored or default preferences", body = PreferencesResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_preferences_handler(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Json<PreferencesResponse> {
    let prefs = state
        .prefs
        .get(&client_id)
        .await
        .unwrap_or_default();
    Json(PreferencesResponse::from(prefs))
}

/// PUT /api/preferences/{client_id} - Overwrite a client's preferences
#[utoipa::path(
    put,
    path = "/api/preferences/{client_id}",
    params(("client_id" = String, Path, description = "Opaque client identifier")),
    request_body = PreferencesBody,
    responses(
        (status = 200, description = "Preferences stored", body = PreferencesResponse),
        (status = 400, description = "Unknown language code"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn put_preferences_handler(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(body): Json<PreferencesBody>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    if !is_known_language_code(&body.language_code) {
        return Err(ApiError::Validation(vec![format!(
            "'{}' is not a known language code",
            body.language_code
        )]));
    }

    let prefs = ClientPreferences {
        selected_language: body.selected_language,
        language_code: body.language_code,
        theme: body.theme,
    };
    state.prefs.set(&client_id, prefs.clone()).await?;

    Ok(Json(PreferencesResponse::from(prefs)))
}
