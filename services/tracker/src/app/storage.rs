//! services/tracker/src/app/storage.rs
//!
//! The persistence gateway: typed load/save of named values on top of the
//! string-only `KeyValueStore` port.
//!
//! Every value is written inside a small versioned envelope so its layout can
//! evolve later. Reads accept both the envelope and a bare legacy value. Load
//! never fails: an absent, unreadable or unparsable value yields the caller's
//! default and a `warn!` line. Save reports success as a plain `bool`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fitness_tracker_core::ports::{Clock, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TrackerError;

/// Layout version written by this build.
pub const ENVELOPE_VERSION: u32 = 1;

//=========================================================================================
// Keys
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Exercises,
    WorkoutHistory,
    ScheduledWorkouts,
    ChatMessages,
    AppSettings,
    BodyMeasurements,
    Goals,
    WorkoutTemplates,
    UserProfile,
}

impl StorageKey {
    pub const ALL: [StorageKey; 9] = [
        Self::Exercises,
        Self::WorkoutHistory,
        Self::ScheduledWorkouts,
        Self::ChatMessages,
        Self::AppSettings,
        Self::BodyMeasurements,
        Self::Goals,
        Self::WorkoutTemplates,
        Self::UserProfile,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Exercises => "exercises",
            Self::WorkoutHistory => "workout_history",
            Self::ScheduledWorkouts => "scheduled_workouts",
            Self::ChatMessages => "chat_messages",
            Self::AppSettings => "app_settings",
            Self::BodyMeasurements => "body_measurements",
            Self::Goals => "goals",
            Self::WorkoutTemplates => "workout_templates",
            Self::UserProfile => "user_profile",
        }
    }
}

//=========================================================================================
// Envelope
//=========================================================================================

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    saved_at: DateTime<Utc>,
    data: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    data: Value,
}

/// Pulls the payload out of stored text, accepting a bare legacy value too.
fn unwrap_envelope(text: &str) -> Result<Value, TrackerError> {
    let value: Value = serde_json::from_str(text)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|map| map.len() <= 3 && map.contains_key("version") && map.contains_key("data"));
    if !is_envelope {
        return Ok(value);
    }
    let envelope: EnvelopeIn = serde_json::from_value(value)?;
    if envelope.version > ENVELOPE_VERSION {
        return Err(TrackerError::UnsupportedVersion(envelope.version));
    }
    Ok(envelope.data)
}

//=========================================================================================
// Gateway
//=========================================================================================

#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    clock: Arc<dyn Clock>,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            clock,
        }
    }

    /// The namespaced key a value is stored under, e.g. `fitnesspro_exercises`.
    pub fn key(&self, key: StorageKey) -> String {
        format!("{}_{}", self.namespace, key.suffix())
    }

    /// Reads a value. `Ok(None)` when nothing is stored under the key.
    pub async fn try_load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, TrackerError> {
        let Some(text) = self.store.get(&self.key(key)).await? else {
            return Ok(None);
        };
        let data = unwrap_envelope(&text)?;
        Ok(Some(serde_json::from_value(data)?))
    }

    /// Reads a value, falling back to `default` on any failure.
    pub async fn load<T: DeserializeOwned>(&self, key: StorageKey, default: T) -> T {
        match self.try_load(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key = %self.key(key), error = %e, "Failed to load stored value, using the default.");
                default
            }
        }
    }

    /// Writes a value. Returns `false`, after logging, when it could not be
    /// serialized or stored.
    pub async fn save<T: Serialize>(&self, key: StorageKey, value: &T) -> bool {
        let envelope = EnvelopeOut {
            version: ENVELOPE_VERSION,
            saved_at: self.clock.now(),
            data: value,
        };
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = %self.key(key), error = %e, "Failed to serialize value.");
                return false;
            }
        };
        match self.store.set(&self.key(key), text).await {
            Ok(()) => {
                debug!(key = %self.key(key), "Saved value.");
                true
            }
            Err(e) => {
                warn!(key = %self.key(key), error = %e, "Failed to save value.");
                false
            }
        }
    }

    pub async fn clear(&self, key: StorageKey) -> bool {
        match self.store.remove(&self.key(key)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key(key), error = %e, "Failed to clear value.");
                false
            }
        }
    }

    /// Clears every known key. Keeps going after a failure and reports whether
    /// all of them succeeded.
    pub async fn clear_all(&self) -> bool {
        let mut all_cleared = true;
        for key in StorageKey::ALL {
            all_cleared &= self.clear(key).await;
        }
        all_cleared
    }
}
