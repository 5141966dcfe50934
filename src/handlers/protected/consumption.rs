use axum::{
    body::Bytes,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::{ConsumptionCreate, ConsumptionQuery, ConsumptionResponse, ImportSummary};
use crate::error::ApiError;
use crate::middleware::{map_all, ApiResponse, ApiResult, AuthUser};
use crate::services::ConsumptionService;
use crate::state::AppState;

/// POST /api/properties/:id/consumption
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ConsumptionCreate>, JsonRejection>,
) -> ApiResult<ConsumptionResponse> {
    let Path(property_id) = path?;
    let Json(input) = payload?;
    let row = ConsumptionService::new(&state)
        .create(&user, property_id, input)
        .await?;
    Ok(ApiResponse::created(row.into()))
}

/// GET /api/properties/:id/consumption?days=N - newest first, 30 days by default
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ConsumptionQuery>, QueryRejection>,
) -> ApiResult<Vec<ConsumptionResponse>> {
    let Path(property_id) = path?;
    let Query(query) = query?;
    let rows = ConsumptionService::new(&state)
        .list(&user, property_id, query.days)
        .await?;
    Ok(ApiResponse::success(map_all(rows)))
}

/// POST /api/properties/:id/consumption/import - CSV body `date,kwh[,max_power][,source]`
pub async fn import(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> ApiResult<ImportSummary> {
    let Path(property_id) = path?;
    let imported = ConsumptionService::new(&state)
        .import(&user, property_id, &body)
        .await?;
    Ok(ApiResponse::created(ImportSummary { imported }))
}

/// GET /api/properties/:id/consumption/export?days=N - CSV download
pub async fn export(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ConsumptionQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(property_id) = path?;
    let Query(query) = query?;
    let (property, csv) = ConsumptionService::new(&state)
        .export(&user, property_id, query.days)
        .await?;

    let disposition = format!("attachment; filename=\"consumption-{}.csv\"", property.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
