use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::api::objects as object_handlers;
use super::api::risk as risk_handlers;
use super::api::session as session_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::{AppState, StartupError};

pub async fn run_server(config: Config) -> Result<(), StartupError> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::from_config(config)?;
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        // Risk
        .route("/api/ping", get(risk_handlers::ping))
        .route("/api/collision-risk", post(risk_handlers::collision_risk))
        // Objects
        .route("/api/objects", get(object_handlers::list_objects))
        .route("/api/objects/{id}", get(object_handlers::get_object))
        .route("/api/objects/{id}/track", get(object_handlers::get_track))
        .route(
            "/api/objects/{id}/position",
            get(object_handlers::get_position),
        )
        // Session
        .route("/api/session", get(session_handlers::status))
        .route(
            "/api/session/select",
            post(session_handlers::select).delete(session_handlers::clear),
        )
        .route("/api/session/pick", post(session_handlers::pick))
        .route("/api/session/time", put(session_handlers::set_time))
        .route("/api/session/play", post(session_handlers::play))
        .route("/api/session/pause", post(session_handlers::pause))
        .route("/api/session/toggle", post(session_handlers::toggle))
        // OpenAPI
        .route(
            "/api-doc/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    if let Some(static_dir) = &state.config.web.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::config::Config;
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn spawn_app() -> String {
        let mut config = Config::default();
        config.risk.endpoint = None;
        config.scene.debris_count = 2;
        config.scene.debris_sample_count = 20;

        let state = AppState::from_config(config).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn ping_reports_ok() {
        let base = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/api/ping"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn collision_risk_matches_local_estimate() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();
        let body: Value = client
            .post(format!("{base}/api/collision-risk"))
            .json(&json!({ "satellite_id": "ISS" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["satellite_id"], "ISS");
        assert!((body["risk_probability"].as_f64().unwrap() - 0.39).abs() < 1e-9);
        assert_eq!(body["risk_level"], "Low");
        assert_eq!(body["time_to_closest_approach"], "42h 29m");
        assert_eq!(body["potential_collisions"], 3);
    }

    #[tokio::test]
    async fn collision_risk_without_id_is_bad_request() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();
        for request in [
            client.post(format!("{base}/api/collision-risk")).json(&json!({})),
            client.post(format!("{base}/api/collision-risk")).body("not json"),
        ] {
            let response = request.send().await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["message"], "Missing satellite_id in request");
        }
    }

    #[tokio::test]
    async fn lists_objects_and_tracks() {
        let base = spawn_app().await;
        let objects: Value = reqwest::get(format!("{base}/api/objects"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ids: Vec<&str> = objects
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["ISS", "NOAA20", "OSTM", "Debris_0", "Debris_1"]);

        let track: Value = reqwest::get(format!("{base}/api/objects/OSTM/track"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(track["samples"].as_array().unwrap().len(), 181);

        let detail: Value = reqwest::get(format!("{base}/api/objects/Debris_1"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(detail["kind"], "Debris");
        assert_eq!(detail["info"]["purpose"], "Orbital debris");

        let missing = reqwest::get(format!("{base}/api/objects/HUBBLE")).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn position_is_interpolated_at_offset() {
        let base = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/api/objects/OSTM/position?t=0"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["offset_s"], 0.0);
        assert!((body["position"]["altitude_m"].as_f64().unwrap() - 1_330_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn position_beyond_the_table_holds_last_sample() {
        let base = spawn_app().await;
        let start: Value = reqwest::get(format!("{base}/api/objects/OSTM/position?t=6900"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let later: Value = reqwest::get(format!("{base}/api/objects/OSTM/position?t=100000"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(start["position"], later["position"]);
    }

    #[tokio::test]
    async fn unrepresentable_position_offset_is_bad_request() {
        let base = spawn_app().await;
        for t in ["1e13", "-1e13", "inf", "NaN"] {
            let response = reqwest::get(format!("{base}/api/objects/OSTM/position?t={t}"))
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST, "t={t}");
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["error"], "validation_failed");
        }

        // the server is still answering afterwards
        let ping = reqwest::get(format!("{base}/api/ping")).await.unwrap();
        assert!(ping.status().is_success());
    }

    #[tokio::test]
    async fn selecting_attaches_risk_and_enables_time() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let response = client
            .put(format!("{base}/api/session/time"))
            .json(&json!({ "value_s": 10.0 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

        let status: Value = client
            .post(format!("{base}/api/session/select"))
            .json(&json!({ "object_id": "Debris_1" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["selection"]["object_id"], "Debris_1");
        assert_eq!(status["time"]["enabled"], true);

        let mut risk = Value::Null;
        for _ in 0..50 {
            let status: Value = reqwest::get(format!("{base}/api/session"))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            risk = status["selection"]["risk"].clone();
            if !risk.is_null() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(risk["satellite_id"], "Debris_1");

        let cleared: Value = client
            .delete(format!("{base}/api/session/select"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(cleared["selection"].is_null());
        assert_eq!(cleared["animation"], "Stopped");
    }

    #[tokio::test]
    async fn unknown_selection_is_not_found() {
        let base = spawn_app().await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/session/select"))
            .json(&json!({ "object_id": "HUBBLE" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let base = spawn_app().await;
        let doc: Value = reqwest::get(format!("{base}/api-doc/openapi.json"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(doc["paths"]["/api/collision-risk"].is_object());
    }
}
