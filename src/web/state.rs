use chrono::Utc;
use std::sync::{Arc, Mutex as StdMutex};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::orbit::OrbitError;
use crate::risk::{RemoteRiskClient, RiskError, RiskResolver};
use crate::scene::{Catalog, HeadlessScene, SharedScene};
use crate::session::Session;
use crate::web::config::{Config, ConfigError, RiskConfig};

/// Viewport the headless scene hit-tests `pick` coordinates against.
pub const VIEWPORT_WIDTH: f64 = 1920.0;
pub const VIEWPORT_HEIGHT: f64 = 960.0;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scene error: {0}")]
    Orbit(#[from] OrbitError),
    #[error("risk client error: {0}")]
    Risk(#[from] RiskError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<Mutex<Session>>,
    pub resolver: Arc<RiskResolver>,
}

impl AppState {
    /// Populate the scene from `config` at the current time.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let catalog = Catalog::populate(&config.scene, Utc::now())?;
        let scene: SharedScene = Arc::new(StdMutex::new(HeadlessScene::new(
            VIEWPORT_WIDTH,
            VIEWPORT_HEIGHT,
        )));
        let session = Session::new(
            catalog,
            scene,
            config.animation.interval()?,
            config.animation.step_seconds,
        );
        let resolver = build_resolver(&config.risk, false)?;

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
            resolver: Arc::new(resolver),
        })
    }
}

/// Remote tier only when an endpoint is configured and `offline` is not set.
pub fn build_resolver(config: &RiskConfig, offline: bool) -> Result<RiskResolver, StartupError> {
    let table = config.base_risk.clone();
    let resolver = match &config.endpoint {
        Some(endpoint) if !offline => {
            let client = RemoteRiskClient::new(endpoint, config.timeout()?)?;
            log::info!("Risk queries go to {}", client.endpoint());
            RiskResolver::with_remote(client, table)
        }
        _ => RiskResolver::offline(table),
    };

    let names: Vec<&str> = resolver.sources().iter().map(|s| s.name()).collect();
    log::debug!("Risk sources: {}", names.join(" -> "));
    Ok(resolver)
}
