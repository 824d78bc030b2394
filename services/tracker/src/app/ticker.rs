//! services/tracker/src/app/ticker.rs
//!
//! This module contains the asynchronous "worker" that drives the session's
//! clocks: once per period it advances the elapsed-time counter and the rest
//! countdown.

use std::sync::Arc;
use std::time::Duration;

use fitness_tracker_core::session::{RestTick, WorkoutSession};
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Ticks the shared session every `period` until `cancellation_token` fires.
///
/// The first tick lands one full period after the task starts, so a freshly
/// started rest shows its full duration for that long.
pub async fn session_ticker(
    session_lock: Arc<Mutex<WorkoutSession>>,
    cancellation_token: CancellationToken,
    period: Duration,
) {
    info!(period_ms = period.as_millis() as u64, "Session ticker started.");
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Session ticker stopped.");
                return;
            }
            _ = interval.tick() => {
                let mut session = session_lock.lock().await;
                session.elapsed_tick();
                match session.rest_tick() {
                    RestTick::Finished { next_set } => info!(next_set, "Rest finished."),
                    RestTick::Counting { remaining } => debug!(remaining, "Resting."),
                    RestTick::Paused { .. } | RestTick::NotResting => {}
                }
            }
        }
    }
}
