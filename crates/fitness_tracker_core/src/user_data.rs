//! crates/fitness_tracker_core/src/user_data.rs
//!
//! Everything the tracker persists besides workouts: body measurements, the
//! workout schedule, the nutrition chat transcript, app settings and the user
//! profile.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Difficulty;

//=========================================================================================
// Body Measurements
//=========================================================================================

/// Weight in pounds, circumferences in inches, body fat in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub chest: Option<f64>,
    #[serde(default)]
    pub waist: Option<f64>,
    #[serde(default)]
    pub hips: Option<f64>,
    #[serde(default)]
    pub biceps: Option<f64>,
    #[serde(default)]
    pub thighs: Option<f64>,
    #[serde(default)]
    pub calves: Option<f64>,
    #[serde(default)]
    pub body_fat: Option<f64>,
    #[serde(default)]
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

/// Form input for a new measurement. Every field is optional here; weight is
/// the one that must be present for the entry to be accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewMeasurement {
    pub date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub biceps: Option<f64>,
    pub thighs: Option<f64>,
    pub calves: Option<f64>,
    pub body_fat: Option<f64>,
    pub notes: String,
}

impl NewMeasurement {
    /// Builds the stored entry, or `None` when no weight was entered. A
    /// missing date is today's date in the time zone of `now`.
    pub fn into_measurement<Tz: TimeZone>(self, now: DateTime<Tz>) -> Option<BodyMeasurement> {
        let weight = self.weight?;
        Some(BodyMeasurement {
            id: Uuid::new_v4(),
            date: self.date.unwrap_or_else(|| now.date_naive()),
            weight,
            chest: self.chest,
            waist: self.waist,
            hips: self.hips,
            biceps: self.biceps,
            thighs: self.thighs,
            calves: self.calves,
            body_fat: self.body_fat,
            notes: self.notes,
            recorded_at: now.with_timezone(&Utc),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Weight,
    Chest,
    Waist,
    Hips,
    Biceps,
    Thighs,
    Calves,
    BodyFat,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 8] = [
        Self::Weight,
        Self::Chest,
        Self::Waist,
        Self::Hips,
        Self::Biceps,
        Self::Thighs,
        Self::Calves,
        Self::BodyFat,
    ];

    pub fn value(self, measurement: &BodyMeasurement) -> Option<f64> {
        match self {
            Self::Weight => Some(measurement.weight),
            Self::Chest => measurement.chest,
            Self::Waist => measurement.waist,
            Self::Hips => measurement.hips,
            Self::Biceps => measurement.biceps,
            Self::Thighs => measurement.thighs,
            Self::Calves => measurement.calves,
            Self::BodyFat => measurement.body_fat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Direction of `field` between the two most recent entries that carry it.
/// `measurements` is ordered newest first.
pub fn trend(measurements: &[BodyMeasurement], field: MeasurementField) -> Trend {
    let mut values = measurements.iter().filter_map(|m| field.value(m));
    match (values.next(), values.next()) {
        (Some(current), Some(previous)) if current > previous => Trend::Up,
        (Some(current), Some(previous)) if current < previous => Trend::Down,
        _ => Trend::Neutral,
    }
}

//=========================================================================================
// Schedule
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWorkout {
    pub id: Uuid,
    pub title: String,
    pub plan_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewSchedule {
    pub title: String,
    pub plan_id: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub notes: String,
}

impl NewSchedule {
    /// Builds the stored entry, or `None` when the title or plan is blank.
    /// Date defaults to today in the time zone of `now`, time to 09:00.
    pub fn into_scheduled<Tz: TimeZone>(self, now: DateTime<Tz>) -> Option<ScheduledWorkout> {
        if self.title.trim().is_empty() || self.plan_id.trim().is_empty() {
            return None;
        }
        Some(ScheduledWorkout {
            id: Uuid::new_v4(),
            title: self.title,
            plan_id: self.plan_id,
            date: self.date.unwrap_or_else(|| now.date_naive()),
            time: self.time.unwrap_or_else(default_schedule_time),
            notes: self.notes,
            created_at: now.with_timezone(&Utc),
        })
    }
}

fn default_schedule_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

//=========================================================================================
// Nutrition Chat
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            sent_at,
        }
    }
}

//=========================================================================================
// Settings and Profile
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    Imperial,
    Metric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_start_timer: bool,
    pub sound_enabled: bool,
    pub units: Units,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            notifications: true,
            auto_start_timer: true,
            sound_enabled: true,
            units: Units::Imperial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Height {
    pub feet: u32,
    pub inches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height: Height,
    pub fitness_level: Difficulty,
    pub goals: Vec<String>,
    pub preferred_workout_minutes: u32,
    pub rest_preference_secs: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Fitness Enthusiast".to_string(),
            age: 25,
            weight_kg: 70.0,
            height: Height { feet: 5, inches: 10 },
            fitness_level: Difficulty::Beginner,
            goals: vec![
                "build_muscle".to_string(),
                "lose_weight".to_string(),
                "improve_strength".to_string(),
            ],
            preferred_workout_minutes: 45,
            rest_preference_secs: 60,
            updated_at: None,
        }
    }
}

impl UserProfile {
    /// Body-mass index from the profile's weight and height, one decimal.
    /// `None` when the height is zero.
    pub fn bmi(&self) -> Option<f64> {
        let inches = f64::from(self.height.feet * 12 + self.height.inches);
        let meters = inches * 0.0254;
        if meters <= 0.0 {
            return None;
        }
        Some((self.weight_kg / (meters * meters) * 10.0).round() / 10.0)
    }
}
