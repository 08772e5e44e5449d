use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::risk::{constant_assessment, deterministic_assessment, RiskAssessment};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CollisionRiskBody {
    pub satellite_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ping",
    responses(
        (status = 200, description = "Service is up", body = PingResponse)
    ),
    tag = "risk"
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "Collision Risk API is running".to_string(),
    })
}

/// Serves the local estimate in the same shape the remote risk service uses,
/// so another instance can point its `risk.endpoint` here.
#[utoipa::path(
    post,
    path = "/api/collision-risk",
    request_body = CollisionRiskBody,
    responses(
        (status = 200, description = "Risk estimate", body = RiskAssessment),
        (status = 400, description = "Missing satellite_id", body = ErrorResponse)
    ),
    tag = "risk"
)]
pub async fn collision_risk(
    State(state): State<AppState>,
    body: Result<Json<CollisionRiskBody>, JsonRejection>,
) -> ApiResult<Json<RiskAssessment>> {
    let satellite_id = body
        .ok()
        .and_then(|Json(body)| body.satellite_id)
        .ok_or_else(|| ApiError::Validation("Missing satellite_id in request".into()))?;

    let assessment = deterministic_assessment(&state.config.risk.base_risk, &satellite_id)
        .unwrap_or_else(|e| {
            log::warn!("Local risk estimate failed for {:?}: {}", satellite_id, e);
            constant_assessment(&satellite_id)
        });
    Ok(Json(assessment))
}
