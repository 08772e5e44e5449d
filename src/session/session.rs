use serde::Serialize;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::risk::{RiskAssessment, RiskResolver};
use crate::scene::{Catalog, SharedScene};
use crate::session::animation::{AnimationState, Animator, TimeControl};
use crate::session::SessionError;

/// Issued on every selection. A risk result carries the ticket of the
/// selection it was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SelectionTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Selected {
        object_id: String,
        ticket: SelectionTicket,
    },
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SelectedStatus {
    pub object_id: String,
    pub name: String,
    pub ticket: SelectionTicket,
    pub risk: Option<RiskAssessment>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SessionStatus {
    pub selection: Option<SelectedStatus>,
    pub time: TimeControl,
    pub animation: AnimationState,
    pub camera_targets: Vec<String>,
}

/// Selection, time control and animation for one viewer.
pub struct Session {
    catalog: Catalog,
    scene: SharedScene,
    selection: Selection,
    next_ticket: u64,
    time: Arc<StdMutex<TimeControl>>,
    animator: Animator,
}

impl Session {
    /// Hands every catalog object to the scene and frames them all.
    pub fn new(catalog: Catalog, scene: SharedScene, interval: Duration, step_s: f64) -> Self {
        {
            let mut renderer = scene.lock().unwrap();
            for object in catalog.objects() {
                renderer.add_object(object);
            }
            renderer.fly_to(&catalog.ids());
        }

        let time = Arc::new(StdMutex::new(TimeControl::disabled()));
        let animator = Animator::new(time.clone(), scene.clone(), interval, step_s);
        Self {
            catalog,
            scene,
            selection: Selection::None,
            next_ticket: 0,
            time,
            animator,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select `id`, stopping any animation. An unknown id leaves nothing selected.
    pub async fn select(&mut self, id: &str) -> Result<SelectionTicket, SessionError> {
        self.change_selection(id, false).await
    }

    async fn change_selection(
        &mut self,
        id: &str,
        keep_playing: bool,
    ) -> Result<SelectionTicket, SessionError> {
        if !keep_playing || self.catalog.get(id).is_none() {
            self.animator.stop().await;
        }
        self.clear_current_risk();

        let Some(object) = self.catalog.get(id) else {
            self.reset_selection();
            return Err(SessionError::UnknownObject(id.to_string()));
        };

        self.next_ticket += 1;
        let ticket = SelectionTicket(self.next_ticket);
        let period_s = object.table.period_s();

        {
            let mut time = self.time.lock().unwrap();
            time.enabled = true;
            time.max_s = period_s;
            time.value_s = time.value_s.clamp(0.0, period_s.max(0.0));
        }
        self.scene.lock().unwrap().fly_to(&[id.to_string()]);
        self.selection = Selection::Selected {
            object_id: id.to_string(),
            ticket,
        };

        log::info!("Selected {} ({:?})", id, ticket);
        Ok(ticket)
    }

    /// Select whatever is under the cursor; empty space or an unknown object
    /// clears the selection. A running animation carries over to the picked
    /// object, its time clamped to the new period.
    pub async fn pick(&mut self, x: f64, y: f64) -> Option<SelectionTicket> {
        let picked = self.scene.lock().unwrap().pick(x, y);
        match picked {
            Some(id) if self.catalog.get(&id).is_some() => {
                self.change_selection(&id, true).await.ok()
            }
            _ => {
                self.clear_selection().await;
                None
            }
        }
    }

    pub async fn clear_selection(&mut self) {
        self.animator.stop().await;
        self.clear_current_risk();
        self.reset_selection();
    }

    /// Clear the selection and frame every object again.
    pub async fn show_all(&mut self) {
        self.clear_selection().await;
        self.scene.lock().unwrap().fly_to(&self.catalog.ids());
    }

    /// Attach a risk result if `ticket` still names the current selection.
    pub fn apply_risk(&mut self, ticket: SelectionTicket, assessment: RiskAssessment) -> bool {
        let current = match &self.selection {
            Selection::Selected {
                object_id,
                ticket: current,
            } if *current == ticket => object_id.clone(),
            _ => {
                log::info!(
                    "Discarding stale risk result for {} ({:?})",
                    assessment.satellite_id,
                    ticket
                );
                return false;
            }
        };

        match self.catalog.get_mut(&current) {
            Some(object) => {
                log::info!(
                    "Risk for {}: {}% ({})",
                    current,
                    assessment.percentage(),
                    assessment.risk_level
                );
                object.risk = Some(assessment);
                true
            }
            None => false,
        }
    }

    /// Scrub the time control; the value is clamped to the selected period.
    pub fn set_time(&mut self, value_s: f64) -> Result<f64, SessionError> {
        if !value_s.is_finite() {
            return Err(SessionError::InvalidTime(value_s));
        }
        if self.selection == Selection::None {
            return Err(SessionError::NoSelection);
        }

        let value_s = {
            let mut time = self.time.lock().unwrap();
            time.value_s = value_s.clamp(0.0, time.max_s.max(0.0));
            time.value_s
        };
        self.scene.lock().unwrap().set_display_time(value_s);
        Ok(value_s)
    }

    pub fn play(&mut self) -> Result<AnimationState, SessionError> {
        if self.selection == Selection::None {
            return Err(SessionError::NoSelection);
        }
        self.animator.start()?;
        Ok(self.animator.state())
    }

    pub async fn pause(&mut self) -> AnimationState {
        self.animator.stop().await;
        self.animator.state()
    }

    pub async fn toggle(&mut self) -> Result<AnimationState, SessionError> {
        if self.animator.is_playing() {
            Ok(self.pause().await)
        } else {
            self.play()
        }
    }

    pub fn status(&self) -> SessionStatus {
        let selection = match &self.selection {
            Selection::None => None,
            Selection::Selected { object_id, ticket } => {
                self.catalog.get(object_id).map(|object| SelectedStatus {
                    object_id: object_id.clone(),
                    name: object.name.clone(),
                    ticket: *ticket,
                    risk: object.risk.clone(),
                })
            }
        };
        SessionStatus {
            selection,
            time: self.time.lock().unwrap().clone(),
            animation: self.animator.state(),
            camera_targets: self.scene.lock().unwrap().camera_targets(),
        }
    }

    fn clear_current_risk(&mut self) {
        if let Selection::Selected { object_id, .. } = &self.selection {
            if let Some(object) = self.catalog.get_mut(object_id) {
                object.risk = None;
            }
        }
    }

    fn reset_selection(&mut self) {
        self.selection = Selection::None;
        *self.time.lock().unwrap() = TimeControl::disabled();
    }
}

/// Estimate risk for a selection in the background and attach the result
/// unless the selection has moved on. Resolves to whether it was applied.
pub fn spawn_risk_query(
    session: Arc<Mutex<Session>>,
    resolver: Arc<RiskResolver>,
    object_id: String,
    ticket: SelectionTicket,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let assessment = resolver.estimate_risk(&object_id).await;
        session.lock().await.apply_risk(ticket, assessment)
    })
}
