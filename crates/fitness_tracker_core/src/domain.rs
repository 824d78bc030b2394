//! crates/fitness_tracker_core/src/domain.rs
//!
//! Defines the core workout data structures: reference exercises, templates,
//! logged sets and the history records built from them.
//! These structs carry serde derives so adapters can persist them, but they know
//! nothing about where or how they are stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Reference Data
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strength,
    Cardio,
    Flexibility,
    Bodyweight,
    Yoga,
    Sports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Sets, reps and weight for one exercise. Used both as an exercise's suggested
/// defaults and as the live targets of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetTargets {
    pub sets: u32,
    pub reps: u32,
    pub weight: u32,
}

impl SetTargets {
    pub fn new(sets: u32, reps: u32, weight: u32) -> Self {
        Self { sets, reps, weight }
    }
}

/// An entry of the exercise library. Never mutated by the session or the
/// statistics code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub muscle_groups: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub defaults: SetTargets,
    #[serde(default)]
    pub is_custom: bool,
}

/// One slot of a template: which exercise, and the targets to load for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub exercise: Exercise,
    pub sets: u32,
    pub reps: u32,
    pub rest_secs: u32,
}

/// A predefined, ordered list of exercises that drives a multi-exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub exercises: Vec<TemplateExercise>,
}

//=========================================================================================
// Logged Workout Data
//=========================================================================================

/// A single completed set. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    pub set_number: u32,
    pub reps: u32,
    pub weight: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl SetRecord {
    pub fn volume(&self) -> u64 {
        u64::from(self.weight) * u64::from(self.reps)
    }
}

/// Aggregate shape found on records saved before per-set logging existed.
/// Missing fields read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegacyStats {
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: u32,
}

impl LegacyStats {
    pub fn volume(&self) -> u64 {
        u64::from(self.weight) * u64::from(self.reps) * u64::from(self.sets)
    }
}

/// The outcome of one exercise inside a template session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAttempt {
    pub exercise: Exercise,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<LegacyStats>,
    #[serde(default)]
    pub total_duration_secs: Option<u64>,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleExerciseRecord {
    pub id: Uuid,
    pub exercise: Exercise,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<LegacyStats>,
    #[serde(default)]
    pub total_duration_secs: Option<u64>,
    #[serde(default)]
    pub notes: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub template: Template,
    pub attempts: Vec<ExerciseAttempt>,
    #[serde(default)]
    pub total_duration_secs: Option<u64>,
    pub completed_at: DateTime<Utc>,
}

/// One entry of the append-only workout history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutRecord {
    SingleExercise(SingleExerciseRecord),
    Template(TemplateRecord),
}

impl WorkoutRecord {
    pub fn id(&self) -> Uuid {
        match self {
            Self::SingleExercise(record) => record.id,
            Self::Template(record) => record.id,
        }
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        match self {
            Self::SingleExercise(record) => record.completed_at,
            Self::Template(record) => record.completed_at,
        }
    }

    pub fn total_duration_secs(&self) -> Option<u64> {
        match self {
            Self::SingleExercise(record) => record.total_duration_secs,
            Self::Template(record) => record.total_duration_secs,
        }
    }

    /// A display name: the exercise for single records, the template otherwise.
    pub fn title(&self) -> &str {
        match self {
            Self::SingleExercise(record) => &record.exercise.name,
            Self::Template(record) => &record.template.name,
        }
    }
}
