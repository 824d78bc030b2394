//! services/tracker/src/app/export.rs
//!
//! The one-way data export: everything the user has entered, in one JSON
//! document.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use fitness_tracker_core::stats::ProgressSummary;
use fitness_tracker_core::user_data::{AppSettings, BodyMeasurement, ScheduledWorkout, UserProfile};
use fitness_tracker_core::{Exercise, WorkoutRecord};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    pub body_measurements: Vec<BodyMeasurement>,
    pub summary: ProgressSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub exported_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub workout_history: Vec<WorkoutRecord>,
    pub progress_data: ProgressData,
    pub custom_exercises: Vec<Exercise>,
    pub workout_schedule: Vec<ScheduledWorkout>,
    pub settings: AppSettings,
}

/// `fitness-pro-data-YYYY-MM-DD.json`, the file name used when no export
/// path is configured.
pub fn default_export_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("fitness-pro-data-{}.json", date.format("%Y-%m-%d")))
}
