use axum::{extract::rejection::FormRejection, extract::State, Form};

use crate::api::{TokenRequest, TokenResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

/// POST /api/token - OAuth2 password flow, form-encoded
///
/// Unknown email and wrong password produce the same 401 so the response
/// never reveals which accounts exist.
pub async fn token_post(
    State(state): State<AppState>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> ApiResult<TokenResponse> {
    let Form(request) = form?;
    let token = UserService::new(&state)
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(ApiResponse::success(TokenResponse::bearer(token)))
}
