//! services/tracker/src/app/runner.rs
//!
//! The `WorkoutRunner` wires a `WorkoutSession` to the outside world. It owns
//! the ticker task, starting it whenever the session enters a timed phase
//! (active or resting) and cancelling it as soon as the session leaves them.
//! Finished workouts are handed to the `Tracker`, and so persisted, before the
//! finishing call returns.

use std::sync::Arc;
use std::time::Duration;

use fitness_tracker_core::session::{
    FinishOutcome, SessionError, SessionPhase, SessionSnapshot, TargetField, WorkoutSession,
};
use fitness_tracker_core::{Exercise, SetTargets, Template};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::ticker::session_ticker;
use crate::app::tracker::Tracker;
use crate::error::TrackerError;

pub struct WorkoutRunner {
    tracker: Arc<Tracker>,
    session: Arc<Mutex<WorkoutSession>>,
    /// Present while a ticker task is running.
    ticker: Option<CancellationToken>,
    tick_interval: Duration,
}

impl WorkoutRunner {
    pub fn new(tracker: Arc<Tracker>) -> Self {
        let config = tracker.config();
        let session = WorkoutSession::new(config.default_rest_secs);
        let tick_interval = config.tick_interval;
        Self {
            tracker,
            session: Arc::new(Mutex::new(session)),
            ticker: None,
            tick_interval,
        }
    }

    pub fn tracker(&self) -> &Arc<Tracker> {
        &self.tracker
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// The shared session, as the ticker task sees it.
    pub fn session(&self) -> Arc<Mutex<WorkoutSession>> {
        self.session.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    //=====================================================================================
    // Session Operations
    //=====================================================================================

    pub async fn start_exercise(
        &mut self,
        exercise: Exercise,
        targets: Option<SetTargets>,
    ) -> Result<(), TrackerError> {
        let name = exercise.name.clone();
        self.apply(|s| s.start_exercise(exercise, targets)).await?;
        info!(exercise = %name, "Workout started.");
        Ok(())
    }

    pub async fn start_template(&mut self, template: Template) -> Result<(), TrackerError> {
        let name = template.name.clone();
        self.apply(|s| s.start_template(template)).await?;
        info!(template = %name, "Template workout started.");
        Ok(())
    }

    pub async fn configure(&mut self, sets: i64, reps: i64, weight: i64) -> Result<(), TrackerError> {
        self.apply(|s| s.configure(sets, reps, weight)).await
    }

    pub async fn adjust(&mut self, field: TargetField, steps: i64) -> Result<(), TrackerError> {
        self.apply(|s| s.adjust(field, steps)).await
    }

    pub async fn start_set(&mut self) -> Result<(), TrackerError> {
        let now = self.tracker.clock().now();
        self.apply(|s| s.start_set(now)).await
    }

    pub async fn complete_set(&mut self, notes: &str) -> Result<SessionPhase, TrackerError> {
        let now = self.tracker.clock().now();
        self.apply(|s| s.complete_set(now, notes)).await
    }

    pub async fn skip_set(&mut self) -> Result<u32, TrackerError> {
        self.apply(WorkoutSession::skip_set).await
    }

    pub async fn set_paused(&mut self, paused: bool) -> Result<(), TrackerError> {
        self.apply(|s| s.set_paused(paused)).await
    }

    pub async fn toggle_pause(&mut self) -> Result<bool, TrackerError> {
        self.apply(WorkoutSession::toggle_pause).await
    }

    pub async fn finish_exercise(&mut self, notes: &str) -> Result<FinishOutcome, TrackerError> {
        let now = self.tracker.clock().now();
        let outcome = self.apply(|s| s.finish_exercise(now, notes)).await?;
        Ok(self.record(outcome).await)
    }

    /// Ends the current exercise early, keeping the sets logged so far.
    pub async fn skip_exercise(&mut self, notes: &str) -> Result<FinishOutcome, TrackerError> {
        let now = self.tracker.clock().now();
        let outcome = self.apply(|s| s.skip_exercise(now, notes)).await?;
        Ok(self.record(outcome).await)
    }

    pub async fn previous_exercise(&mut self) -> Result<usize, TrackerError> {
        self.apply(WorkoutSession::previous_exercise).await
    }

    pub async fn next_exercise(&mut self) -> Result<usize, TrackerError> {
        self.apply(WorkoutSession::next_exercise).await
    }

    /// Abandons the workout. Nothing is persisted.
    pub async fn cancel(&mut self) -> Result<(), TrackerError> {
        self.apply(WorkoutSession::cancel).await?;
        info!("Workout cancelled.");
        Ok(())
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    /// Runs one operation under the session lock, then starts or stops the
    /// ticker to match the phase it left the session in.
    async fn apply<T>(
        &mut self,
        operation: impl FnOnce(&mut WorkoutSession) -> Result<T, SessionError>,
    ) -> Result<T, TrackerError> {
        let (result, phase) = {
            let mut session = self.session.lock().await;
            let result = operation(&mut *session);
            (result, session.phase())
        };
        self.sync_ticker(phase);
        Ok(result?)
    }

    fn sync_ticker(&mut self, phase: SessionPhase) {
        let timed = matches!(phase, SessionPhase::Active | SessionPhase::Resting);
        if timed && self.ticker.is_none() {
            let token = CancellationToken::new();
            tokio::spawn(session_ticker(
                self.session.clone(),
                token.clone(),
                self.tick_interval,
            ));
            self.ticker = Some(token);
        } else if !timed {
            if let Some(token) = self.ticker.take() {
                token.cancel();
            }
        }
    }

    async fn record(&self, outcome: FinishOutcome) -> FinishOutcome {
        if let FinishOutcome::Completed(record) = &outcome {
            self.tracker.append_record(record.clone()).await;
        }
        outcome
    }
}

impl Drop for WorkoutRunner {
    fn drop(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }
}
