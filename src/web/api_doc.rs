use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::objects::{ObjectDetail, ObjectSummary, PositionResponse};
use super::api::risk::{CollisionRiskBody, PingResponse};
use super::api::session::{PickRequest, SelectRequest, TimeRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::risk::ping,
        super::api::risk::collision_risk,
        super::api::objects::list_objects,
        super::api::objects::get_object,
        super::api::objects::get_track,
        super::api::objects::get_position,
        super::api::session::status,
        super::api::session::select,
        super::api::session::clear,
        super::api::session::pick,
        super::api::session::set_time,
        super::api::session::play,
        super::api::session::pause,
        super::api::session::toggle,
    ),
    components(
        schemas(
            ErrorResponse,
            PingResponse,
            CollisionRiskBody,
            ObjectSummary,
            ObjectDetail,
            PositionResponse,
            SelectRequest,
            PickRequest,
            TimeRequest,
            crate::risk::RiskAssessment,
            crate::risk::RiskLevel,
            crate::orbit::SampleTable,
            crate::orbit::Sample,
            crate::orbit::GeodeticPosition,
            crate::scene::ObjectKind,
            crate::web::config::ObjectInfo,
            crate::session::SessionStatus,
            crate::session::SelectedStatus,
            crate::session::SelectionTicket,
            crate::session::TimeControl,
            crate::session::AnimationState,
        )
    ),
    info(
        title = "Debris Watch API",
        description = "Orbit samples, selection state and collision-risk estimates",
        version = "0.1.0"
    ),
    tags(
        (name = "risk", description = "Collision-risk estimates"),
        (name = "objects", description = "Tracked satellites and debris"),
        (name = "session", description = "Selection and time control")
    )
)]
pub struct ApiDoc;
