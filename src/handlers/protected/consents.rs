use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Json,
};

use crate::api::{ConsentCreate, ConsentResponse};
use crate::middleware::{map_all, ApiResponse, ApiResult, AuthUser};
use crate::services::ConsentService;
use crate::state::AppState;

/// POST /api/consents/
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ConsentCreate>, JsonRejection>,
) -> ApiResult<ConsentResponse> {
    let Json(input) = payload?;
    let consent = ConsentService::new(&state).create(&user, input).await?;
    Ok(ApiResponse::created(consent.into()))
}

/// GET /api/properties/:id/consents/
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<ConsentResponse>> {
    let Path(property_id) = path?;
    let consents = ConsentService::new(&state).list(&user, property_id).await?;
    Ok(ApiResponse::success(map_all(consents)))
}

/// GET /api/consents/:id
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<ConsentResponse> {
    let Path(id) = path?;
    let consent = ConsentService::new(&state).get(&user, id).await?;
    Ok(ApiResponse::success(consent.into()))
}
