use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::scene::SharedScene;
use crate::session::SessionError;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// The time slider: seconds into the selected object's period.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TimeControl {
    pub value_s: f64,
    pub max_s: f64,
    pub enabled: bool,
}

impl TimeControl {
    pub fn disabled() -> Self {
        Self {
            value_s: 0.0,
            max_s: 0.0,
            enabled: false,
        }
    }

    /// Step forward, wrapping back to zero at the end of the period.
    pub fn advance(&mut self, step_s: f64) -> f64 {
        self.value_s = if self.max_s > 0.0 {
            (self.value_s + step_s).rem_euclid(self.max_s)
        } else {
            0.0
        };
        self.value_s
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub enum AnimationState {
    Stopped,
    Playing { since: DateTime<Utc> },
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Periodically advances the shared time control and pushes it to the scene.
pub struct Animator {
    time: Arc<StdMutex<TimeControl>>,
    scene: SharedScene,
    interval: Duration,
    step_s: f64,
    state: AnimationState,
    worker: Option<WorkerHandle>,
}

impl Animator {
    pub fn new(
        time: Arc<StdMutex<TimeControl>>,
        scene: SharedScene,
        interval: Duration,
        step_s: f64,
    ) -> Self {
        Self {
            time,
            scene,
            interval: interval.max(MIN_INTERVAL),
            step_s,
            state: AnimationState::Stopped,
            worker: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.worker.is_some()
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::AlreadyPlaying);
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_animation_loop(
            self.time.clone(),
            self.scene.clone(),
            self.interval,
            self.step_s,
            stop_rx,
        ));

        self.worker = Some(WorkerHandle { stop_tx, join });
        self.state = AnimationState::Playing { since: Utc::now() };
        log::debug!("Animation started");
        Ok(())
    }

    /// Safe to call when nothing is playing.
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            log::debug!("Animation stopped");
        }
        self.state = AnimationState::Stopped;
    }
}

async fn run_animation_loop(
    time: Arc<StdMutex<TimeControl>>,
    scene: SharedScene,
    interval: Duration,
    step_s: f64,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        let value = time.lock().unwrap().advance(step_s);
        scene.lock().unwrap().set_display_time(value);
    }
}
