use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Json,
};

use crate::api::{AlertCreate, AlertResponse};
use crate::middleware::{map_all, ApiResponse, ApiResult, AuthUser};
use crate::services::AlertService;
use crate::state::AppState;

/// POST /api/alerts/ - the property is named in the body
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<AlertCreate>, JsonRejection>,
) -> ApiResult<AlertResponse> {
    let Json(input) = payload?;
    let alert = AlertService::new(&state).create(&user, input).await?;
    Ok(ApiResponse::created(alert.into()))
}

/// GET /api/properties/:id/alerts - newest first
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<AlertResponse>> {
    let Path(property_id) = path?;
    let alerts = AlertService::new(&state).list(&user, property_id).await?;
    Ok(ApiResponse::success(map_all(alerts)))
}

/// GET /api/alerts/:id
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<AlertResponse> {
    let Path(id) = path?;
    let alert = AlertService::new(&state).get(&user, id).await?;
    Ok(ApiResponse::success(alert.into()))
}
