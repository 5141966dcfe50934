use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{UserCreate, UserResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

/// POST /api/users/ - register a new account
///
/// 201 with the stored user, 400 when the email is taken, 422 on
/// validation failure.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<UserCreate>, JsonRejection>,
) -> ApiResult<UserResponse> {
    let Json(input) = payload?;
    let user = UserService::new(&state).register(input).await?;
    Ok(ApiResponse::created(user.into()))
}
