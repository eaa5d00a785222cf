//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: registration, login, logout, token inspection,
//! and the identity lookup for the current session.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use doclens_core::domain::User;
use doclens_core::ports::PortError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, CLEAR_SESSION_COOKIE};
use crate::web::middleware::extract_token;
use crate::web::state::AppState;

//=========================================================================================
// Cookie Helpers
//=========================================================================================

/// Formats the server-issued session cookie.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("token={token}; HttpOnly;{secure_attr} SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_payment: bool,
}

impl From<&User> for IdentityResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_payment: user.is_payment,
        }
    }
}

//=========================================================================================
// Validation
//=========================================================================================

/// A loose syntactic check: one `@` with a dotted, non-empty domain.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    let name_len = req.name.trim().chars().count();
    if !(2..=50).contains(&name_len) {
        errors.push("Name must be between 2 and 50 characters".to_string());
    }
    if !is_valid_email(req.email.trim()) {
        errors.push("A valid email address is required".to_string());
    }
    if req.password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Validation failed or email already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the payload before any business logic runs
    validate_registration(&req)?;

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })?
        .to_string();

    // 3. Create the user; a unique-email conflict maps to EmailExists
    let user = state
        .users
        .create_user(req.name.trim(), req.email.trim(), &password_hash)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /api/auth/login - Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Look up the stored credentials. An unknown email produces the same
    //    response as a wrong password.
    let creds = state
        .users
        .get_user_by_email(req.email.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => ApiError::InvalidCredentials,
            other => ApiError::from(other),
        })?;

    // 2. Verify the password
    let parsed_hash = PasswordHash::new(&creds.password_hash).map_err(|e| {
        error!("Failed to parse stored password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;

    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::InvalidCredentials);
    }

    // 3. Issue the session token and set the cookie
    let token = state
        .tokens
        .issue(creds.user_id, &creds.email, state.token_ttl())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let cookie = session_cookie(
        &token,
        state.token_ttl().num_seconds(),
        state.config.cookie_secure,
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user_id: creds.user_id,
        }),
    ))
}

/// GET /api/auth/check-token - Inspect the presented token without loading the user
#[utoipa::path(
    get,
    path = "/api/auth/check-token",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Token is missing, invalid, or expired")
    )
)]
pub async fn check_token_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let verified = extract_token(&headers).and_then(|token| state.tokens.verify(&token).ok());

    match verified {
        Some(claims) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "claims": { "userId": claims.sub, "email": claims.email }
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": "Invalid or expired token" })),
        ),
    }
}

/// GET /api/auth/me - Identity of the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = IdentityResponse),
        (status = 401, description = "No or invalid token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn me_handler(Extension(user): Extension<User>) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&user))
}

/// POST /api/auth/logout - Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler() -> impl IntoResponse {
    // Tokens are stateless; logout is purely the cookie going away.
    (
        StatusCode::OK,
        [(header::SET_COOKIE, CLEAR_SESSION_COOKIE)],
        Json(json!({ "message": "Logged out" })),
    )
}
