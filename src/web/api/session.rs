use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::session::{spawn_risk_query, AnimationState, Selection, SelectionTicket, SessionStatus};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    pub object_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PickRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TimeRequest {
    pub value_s: f64,
}

fn query_risk(state: &AppState, object_id: String, ticket: SelectionTicket) {
    spawn_risk_query(
        state.session.clone(),
        state.resolver.clone(),
        object_id,
        ticket,
    );
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Selection, time control and animation", body = SessionStatus)
    ),
    tag = "session"
)]
pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.lock().await.status())
}

/// Select an object. The risk estimate is attached to the session once it
/// arrives; poll `/api/session` for it.
#[utoipa::path(
    post,
    path = "/api/session/select",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Object selected", body = SessionStatus),
        (status = 404, description = "Unknown object", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<SessionStatus>> {
    let mut session = state.session.lock().await;
    let ticket = session.select(&request.object_id).await?;
    query_risk(&state, request.object_id, ticket);
    Ok(Json(session.status()))
}

#[utoipa::path(
    delete,
    path = "/api/session/select",
    responses(
        (status = 200, description = "Selection cleared", body = SessionStatus)
    ),
    tag = "session"
)]
pub async fn clear(State(state): State<AppState>) -> Json<SessionStatus> {
    let mut session = state.session.lock().await;
    session.show_all().await;
    Json(session.status())
}

#[utoipa::path(
    post,
    path = "/api/session/pick",
    request_body = PickRequest,
    responses(
        (status = 200, description = "Object under the cursor selected, or selection cleared", body = SessionStatus)
    ),
    tag = "session"
)]
pub async fn pick(
    State(state): State<AppState>,
    Json(request): Json<PickRequest>,
) -> Json<SessionStatus> {
    let mut session = state.session.lock().await;
    if session.pick(request.x, request.y).await.is_some() {
        if let Selection::Selected { object_id, ticket } = session.selection() {
            query_risk(&state, object_id.clone(), *ticket);
        }
    }
    Json(session.status())
}

#[utoipa::path(
    put,
    path = "/api/session/time",
    request_body = TimeRequest,
    responses(
        (status = 200, description = "Time control moved", body = SessionStatus),
        (status = 400, description = "Invalid time", body = ErrorResponse),
        (status = 409, description = "Nothing selected", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn set_time(
    State(state): State<AppState>,
    Json(request): Json<TimeRequest>,
) -> ApiResult<Json<SessionStatus>> {
    let mut session = state.session.lock().await;
    session.set_time(request.value_s)?;
    Ok(Json(session.status()))
}

#[utoipa::path(
    post,
    path = "/api/session/play",
    responses(
        (status = 200, description = "Animation playing", body = AnimationState),
        (status = 409, description = "Nothing selected or already playing", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn play(State(state): State<AppState>) -> ApiResult<Json<AnimationState>> {
    let mut session = state.session.lock().await;
    Ok(Json(session.play()?))
}

#[utoipa::path(
    post,
    path = "/api/session/pause",
    responses(
        (status = 200, description = "Animation stopped", body = AnimationState)
    ),
    tag = "session"
)]
pub async fn pause(State(state): State<AppState>) -> Json<AnimationState> {
    let mut session = state.session.lock().await;
    Json(session.pause().await)
}

#[utoipa::path(
    post,
    path = "/api/session/toggle",
    responses(
        (status = 200, description = "Animation toggled", body = AnimationState),
        (status = 409, description = "Nothing selected", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn toggle(State(state): State<AppState>) -> ApiResult<Json<AnimationState>> {
    let mut session = state.session.lock().await;
    Ok(Json(session.toggle().await?))
}
