use axum::extract::State;

use crate::api::UserResponse;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me_get(AuthUser(user): AuthUser) -> ApiResult<UserResponse> {
    Ok(ApiResponse::success(user.into()))
}

/// DELETE /api/users/me - removes the account and everything it owns
pub async fn me_delete(State(state): State<AppState>, AuthUser(user): AuthUser) -> ApiResult<()> {
    UserService::new(&state).delete(&user).await?;
    Ok(ApiResponse::no_content())
}
