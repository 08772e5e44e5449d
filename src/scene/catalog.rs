use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::orbit::{
    generate_debris, parse_tle_lines, sample, OrbitError, OrbitalElementSet, SampleTable,
    TleLoader, TleOrbit,
};
use crate::risk::RiskAssessment;
use crate::web::config::{ObjectInfo, OrbitConfig, SatelliteConfig, SceneConfig};

pub const DEBRIS_PREFIX: &str = "Debris_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
pub enum ObjectKind {
    Satellite,
    Debris,
}

#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    pub kind: ObjectKind,
    pub info: ObjectInfo,
    pub elements: OrbitalElementSet,
    pub table: SampleTable,
    pub risk: Option<RiskAssessment>,
}

/// Everything in the scene, sampled once from a common epoch.
#[derive(Debug, Clone)]
pub struct Catalog {
    epoch: DateTime<Utc>,
    objects: Vec<TrackedObject>,
}

impl Catalog {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            objects: Vec::new(),
        }
    }

    /// Configured satellites, TLE-folder satellites, then random debris.
    pub fn populate(config: &SceneConfig, epoch: DateTime<Utc>) -> Result<Self, OrbitError> {
        let mut catalog = Catalog::new(epoch);

        for satellite in &config.satellites {
            let elements = element_set(satellite)?;
            catalog.insert(
                satellite.id.clone(),
                satellite.name.clone(),
                ObjectKind::Satellite,
                satellite.info.clone(),
                elements,
                config.sample_count,
            );
        }

        if let Some(folder) = &config.tle_folder {
            match TleLoader::new(folder.clone()).load_all() {
                Ok(entries) => {
                    for entry in entries {
                        log::debug!("Loaded {} from {}", entry.name, entry.source);
                        catalog.insert(
                            format!("NORAD{}", entry.norad_id),
                            entry.name,
                            ObjectKind::Satellite,
                            ObjectInfo::default(),
                            OrbitalElementSet::Tle(entry.orbit),
                            config.sample_count,
                        );
                    }
                }
                Err(e) => log::warn!("Failed to load TLE folder: {}", e),
            }
        }

        let mut index = 0;
        for orbit in generate_debris(config.debris_count) {
            while catalog.get(&format!("{}{}", DEBRIS_PREFIX, index)).is_some() {
                index += 1;
            }
            catalog.insert(
                format!("{}{}", DEBRIS_PREFIX, index),
                format!("Debris {}", index),
                ObjectKind::Debris,
                ObjectInfo::debris(),
                OrbitalElementSet::Parametric(orbit),
                config.debris_sample_count,
            );
            index += 1;
        }

        log::info!(
            "Scene populated: {} satellites, {} debris",
            catalog.count(ObjectKind::Satellite),
            catalog.count(ObjectKind::Debris)
        );
        Ok(catalog)
    }

    /// Sample `elements` and add the object; ids already present are skipped.
    pub fn insert(
        &mut self,
        id: String,
        name: String,
        kind: ObjectKind,
        info: ObjectInfo,
        elements: OrbitalElementSet,
        sample_count: usize,
    ) -> bool {
        if self.get(&id).is_some() {
            log::warn!("Duplicate object id {}, skipping", id);
            return false;
        }
        let table = sample(&elements, self.epoch, sample_count);
        if table.is_empty() {
            log::warn!("Object {} has no valid samples", id);
        }
        self.objects.push(TrackedObject {
            id,
            name,
            kind,
            info,
            elements,
            table,
            risk: None,
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TrackedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn ids(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}

fn element_set(satellite: &SatelliteConfig) -> Result<OrbitalElementSet, OrbitError> {
    satellite.orbit.validate()?;
    match &satellite.orbit {
        OrbitConfig::Tle { lines, period_s } => {
            let (name, line1, line2) = parse_tle_lines(lines)?;
            let mut orbit = TleOrbit::from_lines(name, &line1, &line2)?;
            if let Some(period_s) = period_s {
                orbit = orbit.with_period(*period_s);
            }
            Ok(OrbitalElementSet::Tle(orbit))
        }
        OrbitConfig::Parametric(orbit) => Ok(OrbitalElementSet::Parametric(*orbit)),
    }
}
