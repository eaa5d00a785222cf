//! services/api/src/web/users.rs
//!
//! Administrative user endpoints (listing, deletion) and the payment
//! confirmation flag.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use doclens_core::domain::User;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

/// One user as exposed over the API. Password hashes never leave the store.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_payment: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            is_payment: user.is_payment,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteUserParams {
    pub id: Uuid,
}

/// GET /api/users - List all users (administrative)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = [UserSummary]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// DELETE /api/users?id=<uuid> - Delete a user (administrative)
#[utoipa::path(
    delete,
    path = "/api/users",
    params(("id" = Uuid, Query, description = "The id of the user to delete")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteUserParams>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.delete_user(params.id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}

/// POST /api/payments/confirm - Mark the current user's payment complete
#[utoipa::path(
    post,
    path = "/api/payments/confirm",
    responses(
        (status = 200, description = "Payment flag set"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn confirm_payment_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.users.mark_payment_complete(user.id).await?;
    Ok(Json(json!({
        "message": "Payment confirmed",
        "isPayment": updated.is_payment
    })))
}
