//! services/tracker/src/bin/export.rs
//!
//! Writes everything stored under `DATA_DIR` to a single JSON export file.

use std::sync::Arc;

use fitness_tracker_core::ports::SystemClock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::{
    adapters::{CannedNutritionResponder, JsonFileStore},
    app::{export::default_export_path, Tracker},
    config::Config,
    error::TrackerError,
};

#[tokio::main]
async fn main() -> Result<(), TrackerError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Preparing export...");

    // --- 2. Initialize Adapters ---
    let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    info!(data_dir = %store.root().display(), "Reading stored data.");
    let tracker = Tracker::new(
        config.clone(),
        store,
        Arc::new(CannedNutritionResponder::new()),
        Arc::new(SystemClock),
    );

    // --- 3. Build and Write the Export ---
    let json = tracker.export_json().await?;
    let path = config
        .export_path
        .clone()
        .unwrap_or_else(|| default_export_path(tracker.local_now().date_naive()));
    tokio::fs::write(&path, json).await?;

    info!(path = %path.display(), "Export written.");
    Ok(())
}
