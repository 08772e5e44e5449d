use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex};

use crate::orbit::SampleTable;
use crate::scene::TrackedObject;

/// What the core needs from the globe renderer.
pub trait SceneRenderer: Send {
    fn add_object(&mut self, object: &TrackedObject);
    fn fly_to(&mut self, ids: &[String]);
    /// Objects the camera was last sent to.
    fn camera_targets(&self) -> Vec<String>;
    /// Object under the screen coordinate, if any.
    fn pick(&self, x: f64, y: f64) -> Option<String>;
    /// Seconds since the scene epoch.
    fn display_time(&self) -> f64;
    fn set_display_time(&mut self, offset_s: f64);
}

pub type SharedScene = Arc<StdMutex<dyn SceneRenderer>>;

const PICK_RADIUS_PX: f64 = 12.0;

/// Renderer without a globe: objects are drawn on an equirectangular map of
/// `width` x `height` pixels, which is also what `pick` hit-tests against.
pub struct HeadlessScene {
    width: f64,
    height: f64,
    tracks: BTreeMap<String, SampleTable>,
    camera_targets: Vec<String>,
    display_time: f64,
}

impl HeadlessScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            tracks: BTreeMap::new(),
            camera_targets: Vec::new(),
            display_time: 0.0,
        }
    }

    /// Screen coordinate of an object at the current display time.
    pub fn project(&self, id: &str) -> Option<(f64, f64)> {
        let position = self.tracks.get(id)?.position_at(self.display_time)?;
        Some((
            (position.longitude_deg + 180.0) / 360.0 * self.width,
            (90.0 - position.latitude_deg) / 180.0 * self.height,
        ))
    }
}

impl SceneRenderer for HeadlessScene {
    fn add_object(&mut self, object: &TrackedObject) {
        self.tracks.insert(object.id.clone(), object.table.clone());
    }

    fn fly_to(&mut self, ids: &[String]) {
        self.camera_targets = ids.to_vec();
    }

    fn camera_targets(&self) -> Vec<String> {
        self.camera_targets.clone()
    }

    fn pick(&self, x: f64, y: f64) -> Option<String> {
        self.tracks
            .keys()
            .filter_map(|id| {
                let (px, py) = self.project(id)?;
                let distance = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
                (distance <= PICK_RADIUS_PX).then(|| (distance, id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id.clone())
    }

    fn display_time(&self) -> f64 {
        self.display_time
    }

    fn set_display_time(&mut self, offset_s: f64) {
        self.display_time = offset_s;
    }
}
