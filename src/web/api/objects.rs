use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::orbit::{GeodeticPosition, SampleTable};
use crate::risk::{RiskAssessment, RiskLevel};
use crate::scene::{ObjectKind, TrackedObject};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::config::ObjectInfo;
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ObjectSummary {
    pub id: String,
    pub name: String,
    pub kind: ObjectKind,
    pub period_s: f64,
    pub sample_count: usize,
    pub risk_level: Option<RiskLevel>,
}

impl From<&TrackedObject> for ObjectSummary {
    fn from(object: &TrackedObject) -> Self {
        Self {
            id: object.id.clone(),
            name: object.name.clone(),
            kind: object.kind,
            period_s: object.table.period_s(),
            sample_count: object.table.len(),
            risk_level: object.risk.as_ref().map(|r| r.risk_level),
        }
    }
}

/// Everything the details panel shows.
#[derive(Debug, Serialize, ToSchema)]
pub struct ObjectDetail {
    pub id: String,
    pub name: String,
    pub kind: ObjectKind,
    pub orbit: String,
    pub period_s: f64,
    pub info: ObjectInfo,
    pub risk: Option<RiskAssessment>,
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub t: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionResponse {
    pub offset_s: f64,
    pub time: DateTime<Utc>,
    pub position: GeodeticPosition,
}

#[utoipa::path(
    get,
    path = "/api/objects",
    responses(
        (status = 200, description = "Tracked objects", body = Vec<ObjectSummary>)
    ),
    tag = "objects"
)]
pub async fn list_objects(State(state): State<AppState>) -> Json<Vec<ObjectSummary>> {
    let session = state.session.lock().await;
    let objects = session
        .catalog()
        .objects()
        .iter()
        .map(ObjectSummary::from)
        .collect();
    Json(objects)
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}",
    params(("id" = String, Path, description = "Object id")),
    responses(
        (status = 200, description = "Object details", body = ObjectDetail),
        (status = 404, description = "Unknown object", body = ErrorResponse)
    ),
    tag = "objects"
)]
pub async fn get_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ObjectDetail>> {
    let session = state.session.lock().await;
    let object = session
        .catalog()
        .get(&id)
        .ok_or(ApiError::NotFound("object_not_found"))?;

    Ok(Json(ObjectDetail {
        id: object.id.clone(),
        name: object.name.clone(),
        kind: object.kind,
        orbit: object.elements.kind().to_string(),
        period_s: object.table.period_s(),
        info: object.info.clone(),
        risk: object.risk.clone(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}/track",
    params(("id" = String, Path, description = "Object id")),
    responses(
        (status = 200, description = "Sampled orbit", body = SampleTable),
        (status = 404, description = "Unknown object", body = ErrorResponse)
    ),
    tag = "objects"
)]
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SampleTable>> {
    let session = state.session.lock().await;
    let object = session
        .catalog()
        .get(&id)
        .ok_or(ApiError::NotFound("object_not_found"))?;
    Ok(Json(object.table.clone()))
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}/position",
    params(
        ("id" = String, Path, description = "Object id"),
        ("t" = Option<f64>, Query, description = "Seconds after the scene epoch; defaults to the time control")
    ),
    responses(
        (status = 200, description = "Interpolated position", body = PositionResponse),
        (status = 400, description = "Offset not finite or out of range", body = ErrorResponse),
        (status = 404, description = "Unknown object or no samples", body = ErrorResponse)
    ),
    tag = "objects"
)]
pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PositionQuery>,
) -> ApiResult<Json<PositionResponse>> {
    let session = state.session.lock().await;
    let object = session
        .catalog()
        .get(&id)
        .ok_or(ApiError::NotFound("object_not_found"))?;

    let offset_s = query.t.unwrap_or_else(|| session.status().time.value_s);
    if !offset_s.is_finite() {
        return Err(ApiError::Validation(format!("t must be finite, got {}", offset_s)));
    }
    let time = object.table.time_of(offset_s).ok_or_else(|| {
        ApiError::Validation(format!("t = {} s is outside the representable time range", offset_s))
    })?;
    let position = object
        .table
        .position_at(offset_s)
        .ok_or(ApiError::NotFound("no_samples"))?;

    Ok(Json(PositionResponse {
        offset_s,
        time,
        position,
    }))
}
