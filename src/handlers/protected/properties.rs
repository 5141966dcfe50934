use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Json,
};

use crate::api::{PropertyCreate, PropertyResponse, PropertyUpdate};
use crate::middleware::{map_all, ApiResponse, ApiResult, AuthUser};
use crate::services::PropertyService;
use crate::state::AppState;

/// POST /api/properties/
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<PropertyCreate>, JsonRejection>,
) -> ApiResult<PropertyResponse> {
    let Json(input) = payload?;
    let property = PropertyService::new(&state).create(&user, input).await?;
    Ok(ApiResponse::created(property.into()))
}

/// GET /api/properties/ - the caller's properties, by id
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Vec<PropertyResponse>> {
    let properties = PropertyService::new(&state).list(&user).await?;
    Ok(ApiResponse::success(map_all(properties)))
}

/// GET /api/properties/:id
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<PropertyResponse> {
    let Path(id) = path?;
    let property = PropertyService::new(&state).get(&user, id).await?;
    Ok(ApiResponse::success(property.into()))
}

/// PUT /api/properties/:id - partial update, absent and null fields are kept
pub async fn put(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PropertyUpdate>, JsonRejection>,
) -> ApiResult<PropertyResponse> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let property = PropertyService::new(&state).update(&user, id, input).await?;
    Ok(ApiResponse::success(property.into()))
}

/// DELETE /api/properties/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    PropertyService::new(&state).delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}
