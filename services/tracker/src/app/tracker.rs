//! services/tracker/src/app/tracker.rs
//!
//! The `Tracker` owns everything the user has saved: workout history, the
//! exercise and template lists, body measurements, the schedule, the nutrition
//! chat, settings and profile. Every mutation is written through the storage
//! gateway before the call returns.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use fitness_tracker_core::library::{default_exercises, default_templates, filter_exercises, ExerciseFilter};
use fitness_tracker_core::ports::{Clock, KeyValueStore, NutritionResponder};
use fitness_tracker_core::stats::{
    self, Achievement, DayBucket, ProgressSummary, Timeframe,
};
use fitness_tracker_core::user_data::{
    trend, AppSettings, BodyMeasurement, ChatMessage, MeasurementField, NewMeasurement,
    NewSchedule, ScheduledWorkout, Sender, Trend, UserProfile,
};
use fitness_tracker_core::{Exercise, Template, WorkoutRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::export::{ExportBundle, ProgressData};
use crate::app::storage::{StorageGateway, StorageKey};
use crate::config::Config;
use crate::error::TrackerError;

/// How many records the dashboard lists.
const RECENT_LIMIT: usize = 5;

//=========================================================================================
// Views
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_workouts: usize,
    pub weekly_count: usize,
    pub total_volume: u64,
    pub average_duration_minutes: f64,
    pub current_streak: u32,
    pub recent: Vec<WorkoutRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub timeframe: Timeframe,
    pub series: Vec<DayBucket>,
    pub summary: ProgressSummary,
    pub achievements: Vec<Achievement>,
}

//=========================================================================================
// Tracker
//=========================================================================================

pub struct Tracker {
    config: Arc<Config>,
    storage: StorageGateway,
    responder: Arc<dyn NutritionResponder>,
    clock: Arc<dyn Clock>,
    /// Serialises read-modify-write cycles against the store.
    write_lock: Mutex<()>,
}

impl Tracker {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn KeyValueStore>,
        responder: Arc<dyn NutritionResponder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let storage = StorageGateway::new(store, config.namespace.clone(), clock.clone());
        Self {
            config,
            storage,
            responder,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn storage(&self) -> &StorageGateway {
        &self.storage
    }

    /// "Now" in the configured local offset; calendar-day statistics use it.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.config.utc_offset)
    }

    //=====================================================================================
    // Workout History and Statistics
    //=====================================================================================

    pub async fn history(&self) -> Vec<WorkoutRecord> {
        self.storage.load(StorageKey::WorkoutHistory, Vec::new()).await
    }

    /// Appends a finished workout and persists the history.
    pub async fn append_record(&self, record: WorkoutRecord) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut history) = self
            .load_for_update::<Vec<WorkoutRecord>>(StorageKey::WorkoutHistory, Vec::new)
            .await
        else {
            warn!(id = %record.id(), "Workout not recorded; stored history is unreadable.");
            return false;
        };
        let (id, title) = (record.id(), record.title().to_string());
        history.push(record);
        let saved = self.storage.save(StorageKey::WorkoutHistory, &history).await;
        if saved {
            info!(%id, %title, total = history.len(), "Workout recorded.");
        } else {
            warn!(%id, %title, "Workout could not be persisted.");
        }
        saved
    }

    pub async fn dashboard(&self) -> Dashboard {
        let history = self.history().await;
        let now = self.local_now();
        Dashboard {
            total_workouts: history.len(),
            weekly_count: stats::weekly_count(&history, &now),
            total_volume: stats::total_volume(&history),
            average_duration_minutes: stats::average_duration(&history),
            current_streak: stats::current_streak(&history, &now),
            recent: stats::recent(&history, RECENT_LIMIT).into_iter().cloned().collect(),
        }
    }

    pub async fn progress(&self, timeframe: Timeframe) -> Progress {
        let history = self.history().await;
        let now = self.local_now();
        Progress {
            timeframe,
            series: stats::timeframe_series(&history, timeframe.days(), &now),
            summary: stats::summarize(&history),
            achievements: stats::achievements(&history, &now),
        }
    }

    //=====================================================================================
    // Exercises and Templates
    //=====================================================================================

    /// The exercise list: the built-in library plus anything the user added.
    pub async fn exercises(&self) -> Vec<Exercise> {
        self.storage.load(StorageKey::Exercises, default_exercises()).await
    }

    pub async fn custom_exercises(&self) -> Vec<Exercise> {
        let mut exercises = self.exercises().await;
        exercises.retain(|e| e.is_custom);
        exercises
    }

    pub async fn find_exercise(&self, id: &str) -> Option<Exercise> {
        self.exercises().await.into_iter().find(|e| e.id == id)
    }

    pub async fn search_exercises(&self, filter: &ExerciseFilter) -> Vec<Exercise> {
        let exercises = self.exercises().await;
        filter_exercises(&exercises, filter).into_iter().cloned().collect()
    }

    /// Adds a user-defined exercise. A blank name is rejected; a blank id is
    /// replaced by a generated one; an id already in the list is rejected.
    pub async fn add_custom_exercise(&self, mut exercise: Exercise) -> bool {
        if exercise.name.trim().is_empty() {
            return false;
        }
        if exercise.id.trim().is_empty() {
            exercise.id = format!("custom-{}", Uuid::new_v4());
        }
        exercise.is_custom = true;

        let _guard = self.write_lock.lock().await;
        let Some(mut exercises) = self.load_for_update(StorageKey::Exercises, default_exercises).await else {
            return false;
        };
        if exercises.iter().any(|e| e.id == exercise.id) {
            warn!(id = %exercise.id, "An exercise with this id already exists.");
            return false;
        }
        exercises.push(exercise);
        self.storage.save(StorageKey::Exercises, &exercises).await
    }

    /// Removes a user-defined exercise. Built-in entries are never removed.
    pub async fn remove_custom_exercise(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut exercises) = self.load_for_update(StorageKey::Exercises, default_exercises).await else {
            return false;
        };
        let before = exercises.len();
        exercises.retain(|e| !(e.is_custom && e.id == id));
        if exercises.len() == before {
            return false;
        }
        self.storage.save(StorageKey::Exercises, &exercises).await
    }

    pub async fn templates(&self) -> Vec<Template> {
        self.storage.load(StorageKey::WorkoutTemplates, default_templates()).await
    }

    pub async fn find_template(&self, id: &str) -> Option<Template> {
        self.templates().await.into_iter().find(|t| t.id == id)
    }

    /// Inserts a template, or replaces the one with the same id.
    pub async fn save_template(&self, template: Template) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut templates) = self
            .load_for_update(StorageKey::WorkoutTemplates, default_templates)
            .await
        else {
            return false;
        };
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => templates.push(template),
        }
        self.storage.save(StorageKey::WorkoutTemplates, &templates).await
    }

    //=====================================================================================
    // Body Measurements
    //=====================================================================================

    /// Stored measurements, newest date first; entries on the same date are
    /// ordered by when they were recorded.
    pub async fn measurements(&self) -> Vec<BodyMeasurement> {
        self.storage.load(StorageKey::BodyMeasurements, Vec::new()).await
    }

    /// Records a measurement. Entries without a weight are ignored.
    pub async fn add_measurement(&self, entry: NewMeasurement) -> bool {
        let Some(measurement) = entry.into_measurement(self.local_now()) else {
            return false;
        };
        let _guard = self.write_lock.lock().await;
        let Some(mut measurements) = self
            .load_for_update::<Vec<BodyMeasurement>>(StorageKey::BodyMeasurements, Vec::new)
            .await
        else {
            return false;
        };
        measurements.insert(0, measurement);
        measurements.sort_by_key(|m| Reverse((m.date, m.recorded_at)));
        self.storage.save(StorageKey::BodyMeasurements, &measurements).await
    }

    pub async fn measurement_trend(&self, field: MeasurementField) -> Trend {
        trend(&self.measurements().await, field)
    }

    /// Starts the deletion of one measurement. Nothing is removed until the
    /// returned request is confirmed.
    pub fn request_measurement_deletion(&self, id: Uuid) -> Pending<'_> {
        Pending {
            tracker: self,
            action: DestructiveAction::DeleteMeasurement(id),
        }
    }

    async fn delete_measurement(&self, id: Uuid) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut measurements) = self
            .load_for_update::<Vec<BodyMeasurement>>(StorageKey::BodyMeasurements, Vec::new)
            .await
        else {
            return false;
        };
        let before = measurements.len();
        measurements.retain(|m| m.id != id);
        if measurements.len() == before {
            return false;
        }
        self.storage.save(StorageKey::BodyMeasurements, &measurements).await
    }

    //=====================================================================================
    // Schedule
    //=====================================================================================

    pub async fn schedule(&self) -> Vec<ScheduledWorkout> {
        self.storage.load(StorageKey::ScheduledWorkouts, Vec::new()).await
    }

    /// Schedules a workout. A blank title or plan is ignored.
    pub async fn add_schedule(&self, entry: NewSchedule) -> bool {
        let Some(scheduled) = entry.into_scheduled(self.local_now()) else {
            return false;
        };
        let _guard = self.write_lock.lock().await;
        let Some(mut schedule) = self
            .load_for_update::<Vec<ScheduledWorkout>>(StorageKey::ScheduledWorkouts, Vec::new)
            .await
        else {
            return false;
        };
        schedule.push(scheduled);
        self.storage.save(StorageKey::ScheduledWorkouts, &schedule).await
    }

    pub async fn remove_schedule(&self, id: Uuid) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut schedule) = self
            .load_for_update::<Vec<ScheduledWorkout>>(StorageKey::ScheduledWorkouts, Vec::new)
            .await
        else {
            return false;
        };
        let before = schedule.len();
        schedule.retain(|s| s.id != id);
        if schedule.len() == before {
            return false;
        }
        self.storage.save(StorageKey::ScheduledWorkouts, &schedule).await
    }

    /// Entries on `date`, earliest time first.
    pub async fn scheduled_on(&self, date: NaiveDate) -> Vec<ScheduledWorkout> {
        let mut entries: Vec<ScheduledWorkout> = self
            .schedule()
            .await
            .into_iter()
            .filter(|s| s.date == date)
            .collect();
        entries.sort_by_key(|s| s.time);
        entries
    }

    /// Whether any workout was completed on the local calendar day `date`.
    pub async fn is_completed_on(&self, date: NaiveDate) -> bool {
        let offset = self.config.utc_offset;
        self.history()
            .await
            .iter()
            .any(|record| record.completed_at().with_timezone(&offset).date_naive() == date)
    }

    //=====================================================================================
    // Nutrition Chat
    //=====================================================================================

    pub async fn chat_messages(&self) -> Vec<ChatMessage> {
        self.storage.load(StorageKey::ChatMessages, Vec::new()).await
    }

    /// Posts a user message and waits for the assistant's reply, which is
    /// returned. Blank input is ignored and yields `None`, as does a responder
    /// failure (the user message stays in the transcript).
    pub async fn send_chat(&self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.append_chat(ChatMessage::new(text, Sender::User, self.clock.now()))
            .await;

        tokio::time::sleep(self.config.chat_reply_delay).await;
        let reply = match self.responder.respond(text).await {
            Ok(reply) => ChatMessage::new(reply, Sender::Bot, self.clock.now()),
            Err(e) => {
                warn!(error = %e, "Nutrition responder failed.");
                return None;
            }
        };
        self.append_chat(reply.clone()).await;
        Some(reply)
    }

    async fn append_chat(&self, message: ChatMessage) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut messages) = self
            .load_for_update::<Vec<ChatMessage>>(StorageKey::ChatMessages, Vec::new)
            .await
        else {
            return false;
        };
        messages.push(message);
        self.storage.save(StorageKey::ChatMessages, &messages).await
    }

    //=====================================================================================
    // Settings and Profile
    //=====================================================================================

    pub async fn settings(&self) -> AppSettings {
        self.storage.load(StorageKey::AppSettings, AppSettings::default()).await
    }

    /// Applies `change` to the stored settings and persists the result.
    pub async fn update_settings(&self, change: impl FnOnce(&mut AppSettings)) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut settings) = self
            .load_for_update(StorageKey::AppSettings, AppSettings::default)
            .await
        else {
            return false;
        };
        change(&mut settings);
        self.storage.save(StorageKey::AppSettings, &settings).await
    }

    pub async fn profile(&self) -> UserProfile {
        self.storage.load(StorageKey::UserProfile, UserProfile::default()).await
    }

    pub async fn update_profile(&self, change: impl FnOnce(&mut UserProfile)) -> bool {
        let _guard = self.write_lock.lock().await;
        let Some(mut profile) = self
            .load_for_update(StorageKey::UserProfile, UserProfile::default)
            .await
        else {
            return false;
        };
        change(&mut profile);
        profile.updated_at = Some(self.clock.now());
        self.storage.save(StorageKey::UserProfile, &profile).await
    }

    //=====================================================================================
    // Export and Reset
    //=====================================================================================

    pub async fn export(&self) -> ExportBundle {
        let history = self.history().await;
        let summary = stats::summarize(&history);
        ExportBundle {
            exported_at: self.clock.now(),
            profile: self.profile().await,
            workout_history: history,
            progress_data: ProgressData {
                body_measurements: self.measurements().await,
                summary,
            },
            custom_exercises: self.custom_exercises().await,
            workout_schedule: self.schedule().await,
            settings: self.settings().await,
        }
    }

    /// The export as indented JSON.
    pub async fn export_json(&self) -> Result<String, TrackerError> {
        Ok(serde_json::to_string_pretty(&self.export().await)?)
    }

    /// Starts a reset of all stored data. Nothing is cleared until the
    /// returned request is confirmed.
    pub fn request_reset(&self) -> Pending<'_> {
        Pending {
            tracker: self,
            action: DestructiveAction::ResetAll,
        }
    }

    async fn reset_all(&self) -> bool {
        let _guard = self.write_lock.lock().await;
        let cleared = self.storage.clear_all().await;
        if cleared {
            info!("All stored data was reset.");
        } else {
            warn!("Reset left some stored data behind.");
        }
        cleared
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    /// Reads the current value of `key` ahead of rewriting it, or `default()`
    /// when nothing is stored. Returns `None` when the stored value exists but
    /// cannot be read (corrupt, or written by a newer version); it must then be
    /// left untouched.
    async fn load_for_update<T: DeserializeOwned>(
        &self,
        key: StorageKey,
        default: impl FnOnce() -> T,
    ) -> Option<T> {
        match self.storage.try_load(key).await {
            Ok(value) => Some(value.unwrap_or_else(default)),
            Err(e) => {
                warn!(key = %self.storage.key(key), error = %e, "Stored value is unreadable, refusing to overwrite it.");
                None
            }
        }
    }
}

//=========================================================================================
// Confirmation of Destructive Actions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    ResetAll,
    DeleteMeasurement(Uuid),
}

/// A destructive action waiting for the user's explicit confirmation.
/// Dropping it cancels the action.
#[must_use = "nothing happens until the request is confirmed"]
pub struct Pending<'a> {
    tracker: &'a Tracker,
    action: DestructiveAction,
}

impl Pending<'_> {
    pub fn action(&self) -> DestructiveAction {
        self.action
    }

    /// The question to put to the user.
    pub fn prompt(&self) -> &'static str {
        match self.action {
            DestructiveAction::ResetAll => {
                "This will permanently delete all your workout data, progress, and settings. This action cannot be undone."
            }
            DestructiveAction::DeleteMeasurement(_) => "Delete this measurement?",
        }
    }

    /// Carries out the action. Returns whether anything was changed.
    pub async fn confirm(self) -> bool {
        match self.action {
            DestructiveAction::ResetAll => self.tracker.reset_all().await,
            DestructiveAction::DeleteMeasurement(id) => self.tracker.delete_measurement(id).await,
        }
    }
}
