use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::orbit::{validate_period, OrbitError, ParametricOrbit};
use crate::risk::BaseRiskTable;
use crate::scene::DEBRIS_PREFIX;

pub(crate) const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   23060.51821759  .00007947  00000-0  15044-3 0  9993
2 25544  51.6435  21.3292 0005650  85.9957  34.0894 15.49916231414912";

const NOAA20_TLE: &str = "NOAA 20
1 41433U 16038A   23060.82382890  .00000023  00000-0  27580-4 0  9995
2 41433  98.7027 125.3296 0011204  78.3014 281.9531 14.12586102978923";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration {value:?}: {source}")]
    Duration {
        value: String,
        source: humantime::DurationError,
    },
    #[error("satellite {id}: {source}")]
    Orbit { id: String, source: OrbitError },
    #[error("satellite id {0:?} is reserved for generated debris")]
    ReservedId(String),
    #[error("duplicate satellite id {0:?}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub risk: RiskConfig,
    pub scene: SceneConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    /// Front-end assets served under `/`.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Collision-risk service; `None` skips straight to the local estimate.
    pub endpoint: Option<String>,
    pub timeout: String,
    pub base_risk: BaseRiskTable,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("http://localhost:5000/api/collision-risk".to_string()),
            timeout: "5s".to_string(),
            base_risk: BaseRiskTable::default(),
        }
    }
}

impl RiskConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.timeout)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub satellites: Vec<SatelliteConfig>,
    pub debris_count: usize,
    pub sample_count: usize,
    pub debris_sample_count: usize,
    pub tle_folder: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            satellites: vec![
                SatelliteConfig {
                    id: "ISS".to_string(),
                    name: "ISS (Real Orbit)".to_string(),
                    orbit: OrbitConfig::Tle {
                        lines: ISS_TLE.to_string(),
                        period_s: Some(90.0 * 60.0),
                    },
                    info: ObjectInfo {
                        launch: "20 November 1998".to_string(),
                        operator: "NASA / Roscosmos / ESA / JAXA / CSA".to_string(),
                        altitude: "~408 km".to_string(),
                        inclination: "51.6°".to_string(),
                        purpose: "Space station in low Earth orbit".to_string(),
                    },
                },
                SatelliteConfig {
                    id: "NOAA20".to_string(),
                    name: "NOAA-20 (Real Orbit)".to_string(),
                    orbit: OrbitConfig::Tle {
                        lines: NOAA20_TLE.to_string(),
                        period_s: Some(101.0 * 60.0),
                    },
                    info: ObjectInfo {
                        launch: "18 November 2017".to_string(),
                        operator: "NOAA / NASA".to_string(),
                        altitude: "~825 km".to_string(),
                        inclination: "98.7°".to_string(),
                        purpose: "Weather and climate observations".to_string(),
                    },
                },
                SatelliteConfig {
                    id: "OSTM".to_string(),
                    name: "OSTM (Simulated Orbit)".to_string(),
                    orbit: OrbitConfig::Parametric(ParametricOrbit {
                        altitude_m: 1_330_000.0,
                        inclination_deg: 66.0,
                        raan_deg: 0.0,
                        period_s: 6900.0,
                    }),
                    info: ObjectInfo {
                        launch: "20 June 2008".to_string(),
                        operator: "NASA / CNES / NOAA / EUMETSAT".to_string(),
                        altitude: "~1336 km".to_string(),
                        inclination: "66°".to_string(),
                        purpose: "Ocean surface topography".to_string(),
                    },
                },
            ],
            debris_count: 7,
            sample_count: 180,
            debris_sample_count: 100,
            tle_folder: None,
        }
    }
}

impl SceneConfig {
    /// Ids must be unique and stay clear of the debris prefix; orbits must
    /// describe a finite, positive sampling span.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for satellite in &self.satellites {
            if satellite.id.starts_with(DEBRIS_PREFIX) {
                return Err(ConfigError::ReservedId(satellite.id.clone()));
            }
            if !seen.insert(satellite.id.as_str()) {
                return Err(ConfigError::DuplicateId(satellite.id.clone()));
            }
            satellite
                .orbit
                .validate()
                .map_err(|source| ConfigError::Orbit {
                    id: satellite.id.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub id: String,
    pub name: String,
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub info: ObjectInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitConfig {
    Tle {
        lines: String,
        #[serde(default)]
        period_s: Option<f64>,
    },
    Parametric(ParametricOrbit),
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<(), OrbitError> {
        match self {
            OrbitConfig::Tle {
                period_s: Some(period_s),
                ..
            } => validate_period(*period_s),
            OrbitConfig::Tle { period_s: None, .. } => Ok(()),
            OrbitConfig::Parametric(orbit) => orbit.validate(),
        }
    }
}

/// Details-panel text for an object.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ObjectInfo {
    pub launch: String,
    pub operator: String,
    pub altitude: String,
    pub inclination: String,
    pub purpose: String,
}

impl Default for ObjectInfo {
    fn default() -> Self {
        Self {
            launch: "Unknown".to_string(),
            operator: "Unknown".to_string(),
            altitude: "Unknown".to_string(),
            inclination: "Unknown".to_string(),
            purpose: "Unknown".to_string(),
        }
    }
}

impl ObjectInfo {
    pub fn debris() -> Self {
        Self {
            launch: "N/A".to_string(),
            operator: "N/A".to_string(),
            altitude: "700-1100 km".to_string(),
            inclination: "Various".to_string(),
            purpose: "Orbital debris".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub interval: String,
    pub step_seconds: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval: "100ms".to_string(),
            step_seconds: 10.0,
        }
    }
}

impl AnimationConfig {
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.interval)
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.risk.timeout()?;
        config.animation.interval()?;
        config.scene.validate()?;
        Ok(config)
    }

    /// Read `path` when given, otherwise use the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::Duration {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.scene.satellites.len(), 3);
        assert_eq!(config.scene.debris_count, 7);
        assert_eq!(config.risk.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.animation.interval().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn parses_full_document() {
        let yaml = r#"
web:
  bind: "127.0.0.1:9000"
risk:
  endpoint: ~
  timeout: 750ms
  base_risk:
    default: 0.2
    known:
      HST: 0.5
scene:
  debris_count: 2
  satellites:
    - id: LEO1
      name: Test orbit
      orbit:
        kind: parametric
        altitude_m: 500000
        inclination_deg: 45
        raan_deg: 10
        period_s: 5700
    - id: ISS
      name: ISS
      orbit:
        kind: tle
        lines: |
          1 25544U 98067A   23060.51821759  .00007947  00000-0  15044-3 0  9993
          2 25544  51.6435  21.3292 0005650  85.9957  34.0894 15.49916231414912
animation:
  interval: 250ms
  step_seconds: 30
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert!(config.risk.endpoint.is_none());
        assert_eq!(config.risk.timeout().unwrap(), Duration::from_millis(750));
        assert_eq!(config.risk.base_risk.base_risk("HST"), 0.5);
        assert_eq!(config.risk.base_risk.base_risk("Debris_0"), 0.65);
        assert_eq!(config.scene.satellites.len(), 2);
        assert_eq!(config.scene.sample_count, 180);
        assert!(matches!(
            config.scene.satellites[0].orbit,
            OrbitConfig::Parametric(ParametricOrbit { period_s, .. }) if period_s == 5700.0
        ));
        assert!(matches!(
            config.scene.satellites[1].orbit,
            OrbitConfig::Tle { period_s: None, .. }
        ));
        assert_eq!(config.scene.satellites[1].info.purpose, "Unknown");
        assert_eq!(config.animation.step_seconds, 30.0);
    }

    fn satellite_yaml(id: &str, orbit: &str) -> String {
        format!("scene:\n  satellites:\n    - id: {id}\n      name: Test\n      orbit:\n{orbit}")
    }

    const PARAMETRIC_OK: &str = "        kind: parametric\n        altitude_m: 500000\n        inclination_deg: 45\n        raan_deg: 0\n        period_s: 5700\n";

    #[test]
    fn degenerate_parametric_orbits_are_rejected() {
        for orbit in [
            "        kind: parametric\n        altitude_m: -5000\n        inclination_deg: 45\n        raan_deg: 0\n        period_s: 5700\n",
            "        kind: parametric\n        altitude_m: 500000\n        inclination_deg: 45\n        raan_deg: 0\n        period_s: 0\n",
            "        kind: parametric\n        altitude_m: 500000\n        inclination_deg: 45\n        raan_deg: 0\n        period_s: -60\n",
            "        kind: parametric\n        altitude_m: 500000\n        inclination_deg: 45\n        raan_deg: 0\n        period_s: .nan\n",
        ] {
            let err = Config::from_yaml(&satellite_yaml("LEO1", orbit)).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Orbit { id, .. } if id == "LEO1"),
                "{orbit}: {err}"
            );
        }
        assert!(Config::from_yaml(&satellite_yaml("LEO1", PARAMETRIC_OK)).is_ok());
    }

    #[test]
    fn absurd_tle_period_override_is_rejected() {
        let orbit = "        kind: tle\n        period_s: 1.0e13\n        lines: |\n          1 25544U 98067A   23060.51821759  .00007947  00000-0  15044-3 0  9993\n          2 25544  51.6435  21.3292 0005650  85.9957  34.0894 15.49916231414912\n";
        let err = Config::from_yaml(&satellite_yaml("ISS", orbit)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Orbit {
                source: OrbitError::InvalidPeriod(_),
                ..
            }
        ));
    }

    #[test]
    fn debris_prefix_is_reserved() {
        let err = Config::from_yaml(&satellite_yaml("Debris_0", PARAMETRIC_OK)).unwrap_err();
        assert!(matches!(err, ConfigError::ReservedId(id) if id == "Debris_0"));
    }

    #[test]
    fn duplicate_satellite_ids_are_rejected() {
        let yaml = format!(
            "scene:\n  satellites:\n    - id: A\n      name: A\n      orbit:\n{PARAMETRIC_OK}    - id: A\n      name: B\n      orbit:\n{PARAMETRIC_OK}"
        );
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateId(id) if id == "A"));
    }

    #[test]
    fn bad_duration_is_rejected() {
        let err = Config::from_yaml("animation:\n  interval: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Duration { .. }));
    }
}
