//! Timing behaviour of the session ticker, on tokio's paused clock.

mod common;

use std::time::Duration;

use anyhow::Result;
use fitness_tracker_core::session::SessionPhase;
use fitness_tracker_core::SetTargets;
use tokio::time::sleep;
use tracker_lib::app::WorkoutRunner;
use tracker_lib::config::Config;

use common::{harness, library_exercise};

fn timed_config(rest_secs: u32) -> Config {
    Config {
        default_rest_secs: rest_secs,
        tick_interval: Duration::from_secs(1),
        chat_reply_delay: Duration::ZERO,
        ..Config::default()
    }
}

async fn runner_with_rest(rest_secs: u32) -> Result<WorkoutRunner> {
    let h = harness(timed_config(rest_secs));
    let mut runner = WorkoutRunner::new(h.tracker);
    runner
        .start_exercise(library_exercise("bench-press"), Some(SetTargets::new(3, 10, 20)))
        .await?;
    Ok(runner)
}

#[tokio::test(start_paused = true)]
async fn rest_ends_after_its_duration_and_the_next_set_starts() -> Result<()> {
    let mut runner = runner_with_rest(3).await?;
    runner.complete_set("").await?;
    assert!(runner.ticker_running());

    sleep(Duration::from_millis(2500)).await;
    let resting = runner.snapshot().await;
    assert_eq!(resting.phase, SessionPhase::Resting);
    assert_eq!(resting.rest_remaining, 1);

    sleep(Duration::from_millis(1000)).await;
    let active = runner.snapshot().await;
    assert_eq!(active.phase, SessionPhase::Active);
    assert_eq!(active.current_set, 2);
    assert_eq!(active.rest_remaining, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn pausing_freezes_the_rest_countdown() -> Result<()> {
    let mut runner = runner_with_rest(10).await?;
    runner.complete_set("").await?;

    sleep(Duration::from_millis(2500)).await;
    runner.set_paused(true).await?;
    sleep(Duration::from_secs(5)).await;
    assert_eq!(runner.snapshot().await.rest_remaining, 8);

    runner.set_paused(false).await?;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(runner.snapshot().await.rest_remaining, 7);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn elapsed_time_counts_only_active_unpaused_seconds() -> Result<()> {
    let mut runner = runner_with_rest(60).await?;
    assert!(!runner.ticker_running());

    runner.start_set().await?;
    sleep(Duration::from_millis(4500)).await;
    runner.toggle_pause().await?;
    sleep(Duration::from_secs(3)).await;

    assert_eq!(runner.snapshot().await.elapsed_secs, 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn the_ticker_stops_when_the_session_leaves_timed_phases() -> Result<()> {
    let mut runner = runner_with_rest(60).await?;
    for _ in 0..3 {
        runner.complete_set("").await?;
    }
    assert_eq!(runner.snapshot().await.phase, SessionPhase::ExerciseComplete);
    assert!(!runner.ticker_running());

    // A stopped ticker no longer touches the session.
    let before = runner.snapshot().await;
    sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.snapshot().await, before);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_rest_stops_the_ticker() -> Result<()> {
    let mut runner = runner_with_rest(10).await?;
    runner.complete_set("").await?;
    sleep(Duration::from_millis(1500)).await;

    runner.cancel().await?;
    assert!(!runner.ticker_running());
    let before = runner.snapshot().await;
    assert_eq!(before.phase, SessionPhase::Idle);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.snapshot().await, before);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn skipping_the_exercise_mid_rest_stops_the_ticker() -> Result<()> {
    let mut runner = runner_with_rest(10).await?;
    runner.complete_set("").await?;
    sleep(Duration::from_millis(1500)).await;

    runner.skip_exercise("").await?;
    assert!(!runner.ticker_running());
    let before = runner.snapshot().await;

    sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.snapshot().await, before);
    assert_eq!(runner.tracker().history().await.len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropping_the_runner_stops_its_ticker() -> Result<()> {
    let mut runner = runner_with_rest(10).await?;
    runner.complete_set("").await?;
    sleep(Duration::from_millis(2500)).await;

    let session = runner.session();
    drop(runner);
    assert_eq!(session.lock().await.snapshot().rest_remaining, 8);

    sleep(Duration::from_secs(5)).await;
    let snapshot = session.lock().await.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Resting);
    assert_eq!(snapshot.rest_remaining, 8);
    Ok(())
}
