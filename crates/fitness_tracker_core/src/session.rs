//! crates/fitness_tracker_core/src/session.rs
//!
//! The workout session state machine.
//!
//! A `WorkoutSession` walks one exercise, or a template's ordered exercises,
//! through its sets: configure the targets, start a set, complete or skip it,
//! rest, and finish. The machine is pure. Timestamps are passed in by the caller
//! and both countdowns advance by one unit per tick call, so an external timer
//! (or a test) decides how fast time moves.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Exercise, ExerciseAttempt, SetRecord, SetTargets, SingleExerciseRecord, Template,
    TemplateRecord, WorkoutRecord,
};

/// Rest between sets of an ad-hoc, single-exercise session.
pub const DEFAULT_REST_SECS: u32 = 90;
/// Rest used for a template slot that does not specify one.
pub const TEMPLATE_FALLBACK_REST_SECS: u32 = 60;
/// Increment of the weight stepper.
pub const WEIGHT_STEP: u32 = 5;

//=========================================================================================
// Public Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Configuring,
    Active,
    Resting,
    ExerciseComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No workout is in progress")]
    NotStarted,
    #[error("A workout is already in progress")]
    AlreadyStarted,
    #[error("Cannot {operation} while the session is {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("Exercise navigation is only available in template workouts")]
    NotTemplate,
    #[error("Template '{0}' has no exercises")]
    EmptyTemplate(String),
}

/// Which target a stepper button adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Sets,
    Reps,
    Weight,
}

/// What `finish_exercise` / `skip_exercise` led to.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// The template moved on; the exercise at `index` is now loaded.
    NextExercise { index: usize },
    /// The session is over and back to idle. The record must be persisted.
    Completed(WorkoutRecord),
}

/// Result of one rest-countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestTick {
    NotResting,
    Paused { remaining: u32 },
    Counting { remaining: u32 },
    /// The countdown hit zero and the session is active on `next_set`.
    Finished { next_set: u32 },
}

/// A read-only view of the session for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub paused: bool,
    pub exercise_name: Option<String>,
    pub exercise_index: Option<usize>,
    pub exercise_count: usize,
    pub targets: SetTargets,
    pub current_set: u32,
    pub completed_sets: usize,
    pub rest_remaining: u32,
    pub rest_secs: u32,
    pub elapsed_secs: u64,
}

//=========================================================================================
// The State Machine
//=========================================================================================

#[derive(Debug, Clone)]
enum Plan {
    Single(Exercise),
    Template { template: Template, index: usize },
}

#[derive(Debug, Clone)]
pub struct WorkoutSession {
    phase: SessionPhase,
    plan: Option<Plan>,
    targets: SetTargets,
    default_rest_secs: u32,
    rest_secs: u32,
    current_set: u32,
    completed_sets: Vec<SetRecord>,
    rest_remaining: u32,
    paused: bool,
    elapsed_secs: u64,
    exercise_started_at: Option<DateTime<Utc>>,
    /// Committed attempts of a template session, keyed by exercise index.
    attempts: BTreeMap<usize, ExerciseAttempt>,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECS)
    }
}

impl WorkoutSession {
    /// Creates an idle session. `default_rest_secs` applies to single-exercise
    /// workouts; template slots carry their own rest.
    pub fn new(default_rest_secs: u32) -> Self {
        Self {
            phase: SessionPhase::Idle,
            plan: None,
            targets: SetTargets::default(),
            default_rest_secs,
            rest_secs: default_rest_secs,
            current_set: 1,
            completed_sets: Vec::new(),
            rest_remaining: 0,
            paused: false,
            elapsed_secs: 0,
            exercise_started_at: None,
            attempts: BTreeMap::new(),
        }
    }

    // --- Starting ---

    /// Begins a single-exercise workout. Without explicit targets the
    /// exercise's suggested defaults are used.
    pub fn start_exercise(
        &mut self,
        exercise: Exercise,
        targets: Option<SetTargets>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        self.targets = targets.unwrap_or(exercise.defaults);
        self.plan = Some(Plan::Single(exercise));
        self.rest_secs = self.default_rest_secs;
        self.clear_exercise_progress();
        self.phase = SessionPhase::Configuring;
        self.reconcile();
        Ok(())
    }

    /// Begins a template workout at its first exercise.
    pub fn start_template(&mut self, template: Template) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        if template.exercises.is_empty() {
            return Err(SessionError::EmptyTemplate(template.name));
        }
        self.plan = Some(Plan::Template { template, index: 0 });
        self.attempts.clear();
        self.load_template_slot(0);
        Ok(())
    }

    // --- Configuration ---

    /// Replaces the targets. Negative inputs are clamped to zero; there is no
    /// upper bound. Completion is re-evaluated immediately, so lowering the set
    /// count below the completed count finishes the exercise.
    pub fn configure(&mut self, sets: i64, reps: i64, weight: i64) -> Result<(), SessionError> {
        self.require_started()?;
        self.targets = SetTargets::new(clamp_count(sets), clamp_count(reps), clamp_count(weight));
        self.reconcile();
        Ok(())
    }

    /// Moves one target by `steps` increments (5 for weight, 1 otherwise),
    /// flooring at zero.
    pub fn adjust(&mut self, field: TargetField, steps: i64) -> Result<(), SessionError> {
        let SetTargets { sets, reps, weight } = self.targets;
        let (sets, reps, weight) = (i64::from(sets), i64::from(reps), i64::from(weight));
        match field {
            TargetField::Sets => self.configure(sets.saturating_add(steps), reps, weight),
            TargetField::Reps => self.configure(sets, reps.saturating_add(steps), weight),
            TargetField::Weight => self.configure(
                sets,
                reps,
                weight.saturating_add(steps.saturating_mul(i64::from(WEIGHT_STEP))),
            ),
        }
    }

    // --- Set Progression ---

    /// Starts (or resumes after rest) the current set. Calling it while already
    /// active does nothing.
    pub fn start_set(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => Err(SessionError::NotStarted),
            SessionPhase::Active => Ok(()),
            SessionPhase::ExerciseComplete => Err(SessionError::InvalidTransition {
                operation: "start a set",
                phase: self.phase,
            }),
            SessionPhase::Configuring => {
                self.exercise_started_at.get_or_insert(now);
                self.paused = false;
                self.phase = SessionPhase::Active;
                Ok(())
            }
            SessionPhase::Resting => {
                self.end_rest();
                Ok(())
            }
        }
    }

    /// Logs the current set with the configured reps and weight.
    ///
    /// Completing during rest cuts the rest short first. Returns the phase the
    /// session moved to: `Resting` while sets remain, `ExerciseComplete` once the
    /// completed count reaches the target.
    pub fn complete_set(
        &mut self,
        now: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> Result<SessionPhase, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::ExerciseComplete => {
                return Err(SessionError::InvalidTransition {
                    operation: "complete a set",
                    phase: self.phase,
                })
            }
            SessionPhase::Resting => self.end_rest(),
            SessionPhase::Configuring | SessionPhase::Active => {}
        }
        self.exercise_started_at.get_or_insert(now);

        self.completed_sets.push(SetRecord {
            set_number: self.current_set,
            reps: self.targets.reps,
            weight: self.targets.weight,
            completed_at: now,
            notes: notes.into(),
        });

        if self.completed_sets.len() < self.target_set_count() {
            self.phase = SessionPhase::Resting;
            self.rest_remaining = self.rest_secs;
        } else {
            self.phase = SessionPhase::ExerciseComplete;
            self.rest_remaining = 0;
        }
        self.paused = false;
        Ok(self.phase)
    }

    /// Moves the set counter forward without logging anything. Skipped sets are
    /// simply absent from the record, so the counter can run ahead of the
    /// completed count. Skipping never completes the exercise.
    pub fn skip_set(&mut self) -> Result<u32, SessionError> {
        match self.phase {
            SessionPhase::Idle => Err(SessionError::NotStarted),
            SessionPhase::ExerciseComplete => Err(SessionError::InvalidTransition {
                operation: "skip a set",
                phase: self.phase,
            }),
            _ => {
                self.advance_set_counter();
                Ok(self.current_set)
            }
        }
    }

    // --- Timing ---

    /// Halts (or releases) tick effects without resetting either countdown.
    pub fn set_paused(&mut self, paused: bool) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Active | SessionPhase::Resting => {
                self.paused = paused;
                Ok(())
            }
            SessionPhase::Idle => Err(SessionError::NotStarted),
            phase => Err(SessionError::InvalidTransition {
                operation: "pause",
                phase,
            }),
        }
    }

    pub fn toggle_pause(&mut self) -> Result<bool, SessionError> {
        self.set_paused(!self.paused)?;
        Ok(self.paused)
    }

    /// One second of rest. At zero the session returns to `Active` on the next
    /// set.
    pub fn rest_tick(&mut self) -> RestTick {
        if self.phase != SessionPhase::Resting {
            return RestTick::NotResting;
        }
        if self.paused {
            return RestTick::Paused {
                remaining: self.rest_remaining,
            };
        }
        self.rest_remaining = self.rest_remaining.saturating_sub(1);
        if self.rest_remaining > 0 {
            return RestTick::Counting {
                remaining: self.rest_remaining,
            };
        }
        self.end_rest();
        RestTick::Finished {
            next_set: self.current_set,
        }
    }

    /// One second of active exercise time. Only counts while a set is active
    /// and not paused. Returns the running total.
    pub fn elapsed_tick(&mut self) -> u64 {
        if self.phase == SessionPhase::Active && !self.paused {
            self.elapsed_secs += 1;
        }
        self.elapsed_secs
    }

    // --- Finishing ---

    /// Commits the finished exercise. In a template with exercises left, the
    /// next one is loaded; otherwise the workout record is emitted and the
    /// session returns to idle.
    pub fn finish_exercise(
        &mut self,
        now: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> Result<FinishOutcome, SessionError> {
        match self.phase {
            SessionPhase::ExerciseComplete => self.commit_exercise(now, notes.into()),
            SessionPhase::Idle => Err(SessionError::NotStarted),
            phase => Err(SessionError::InvalidTransition {
                operation: "finish the exercise",
                phase,
            }),
        }
    }

    /// Ends the current exercise early, committing whatever sets were logged.
    pub fn skip_exercise(
        &mut self,
        now: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> Result<FinishOutcome, SessionError> {
        self.require_started()?;
        self.commit_exercise(now, notes.into())
    }

    // --- Template Navigation ---

    /// Moves to the previous template exercise. Uncommitted sets of the
    /// exercise being left are discarded; committed attempts are kept.
    pub fn previous_exercise(&mut self) -> Result<usize, SessionError> {
        let index = self.template_index()?;
        self.navigate_to(index.saturating_sub(1))
    }

    pub fn next_exercise(&mut self) -> Result<usize, SessionError> {
        let index = self.template_index()?;
        let last = self.exercise_count().saturating_sub(1);
        self.navigate_to((index + 1).min(last))
    }

    /// Discards everything, committed attempts included, and returns to idle.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.require_started()?;
        self.reset();
        Ok(())
    }

    // --- Accessors ---

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn targets(&self) -> SetTargets {
        self.targets
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn completed_sets(&self) -> &[SetRecord] {
        &self.completed_sets
    }

    pub fn rest_remaining(&self) -> u32 {
        self.rest_remaining
    }

    pub fn rest_secs(&self) -> u32 {
        self.rest_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.plan.as_ref()? {
            Plan::Single(exercise) => Some(exercise),
            Plan::Template { template, index } => {
                template.exercises.get(*index).map(|slot| &slot.exercise)
            }
        }
    }

    /// The loaded template index, or `None` outside template mode.
    pub fn exercise_index(&self) -> Option<usize> {
        match self.plan.as_ref()? {
            Plan::Template { index, .. } => Some(*index),
            Plan::Single(_) => None,
        }
    }

    pub fn exercise_count(&self) -> usize {
        match &self.plan {
            Some(Plan::Template { template, .. }) => template.exercises.len(),
            Some(Plan::Single(_)) => 1,
            None => 0,
        }
    }

    /// Attempts committed so far in a template session, in template order.
    pub fn committed_attempts(&self) -> impl Iterator<Item = &ExerciseAttempt> {
        self.attempts.values()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            paused: self.paused,
            exercise_name: self.current_exercise().map(|e| e.name.clone()),
            exercise_index: self.exercise_index(),
            exercise_count: self.exercise_count(),
            targets: self.targets,
            current_set: self.current_set,
            completed_sets: self.completed_sets.len(),
            rest_remaining: self.rest_remaining,
            rest_secs: self.rest_secs,
            elapsed_secs: self.elapsed_secs,
        }
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    fn require_started(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Idle || self.plan.is_none() {
            return Err(SessionError::NotStarted);
        }
        Ok(())
    }

    fn target_set_count(&self) -> usize {
        self.targets.sets as usize
    }

    fn template_index(&self) -> Result<usize, SessionError> {
        if self.phase == SessionPhase::Idle {
            return Err(SessionError::NotStarted);
        }
        self.exercise_index().ok_or(SessionError::NotTemplate)
    }

    fn navigate_to(&mut self, target: usize) -> Result<usize, SessionError> {
        let current = self.template_index()?;
        if target != current {
            self.load_template_slot(target);
        }
        Ok(target)
    }

    /// Loads the targets and rest of template slot `index` and starts that
    /// exercise from scratch.
    fn load_template_slot(&mut self, index: usize) {
        let Some(Plan::Template {
            template,
            index: current,
        }) = self.plan.as_mut()
        else {
            return;
        };
        let Some(slot) = template.exercises.get(index) else {
            return;
        };
        *current = index;
        self.targets = SetTargets::new(slot.sets, slot.reps, slot.exercise.defaults.weight);
        self.rest_secs = if slot.rest_secs == 0 {
            TEMPLATE_FALLBACK_REST_SECS
        } else {
            slot.rest_secs
        };
        self.clear_exercise_progress();
        self.phase = SessionPhase::Configuring;
        self.reconcile();
    }

    fn clear_exercise_progress(&mut self) {
        self.current_set = 1;
        self.completed_sets.clear();
        self.rest_remaining = 0;
        self.paused = false;
        self.elapsed_secs = 0;
        self.exercise_started_at = None;
    }

    /// Restores the invariants after a target change: the set counter never
    /// exceeds the target, and the exercise is complete exactly when the
    /// completed count reaches it.
    fn reconcile(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        let target = self.targets.sets;
        if target > 0 {
            self.current_set = self.current_set.min(target);
        }
        if self.completed_sets.len() >= self.target_set_count() {
            self.phase = SessionPhase::ExerciseComplete;
            self.rest_remaining = 0;
            self.paused = false;
        } else if self.phase == SessionPhase::ExerciseComplete {
            // The target was raised past the completed count: the exercise is
            // open again and waits for the next set to be started.
            self.phase = SessionPhase::Configuring;
            self.advance_set_counter();
        }
    }

    fn advance_set_counter(&mut self) {
        if self.current_set < self.targets.sets {
            self.current_set += 1;
        }
    }

    fn end_rest(&mut self) {
        self.rest_remaining = 0;
        self.paused = false;
        self.advance_set_counter();
        self.phase = SessionPhase::Active;
    }

    fn take_attempt(&mut self, now: DateTime<Utc>, notes: String) -> Option<ExerciseAttempt> {
        let exercise = self.current_exercise()?.clone();
        let total_duration_secs = self
            .exercise_started_at
            .map(|started| (now - started).num_seconds().max(0) as u64);
        Some(ExerciseAttempt {
            exercise,
            sets: std::mem::take(&mut self.completed_sets),
            stats: None,
            total_duration_secs,
            completed_at: now,
            notes,
        })
    }

    fn commit_exercise(
        &mut self,
        now: DateTime<Utc>,
        notes: String,
    ) -> Result<FinishOutcome, SessionError> {
        let attempt = self
            .take_attempt(now, notes)
            .ok_or(SessionError::NotStarted)?;
        match self.plan.take() {
            Some(Plan::Template { template, index }) => {
                self.attempts.insert(index, attempt);
                if index + 1 < template.exercises.len() {
                    self.plan = Some(Plan::Template { template, index });
                    self.load_template_slot(index + 1);
                    return Ok(FinishOutcome::NextExercise { index: index + 1 });
                }
                let attempts: Vec<ExerciseAttempt> =
                    std::mem::take(&mut self.attempts).into_values().collect();
                let total_duration_secs = attempts
                    .iter()
                    .map(|a| a.total_duration_secs.unwrap_or(0))
                    .sum();
                let record = WorkoutRecord::Template(TemplateRecord {
                    id: Uuid::new_v4(),
                    template,
                    attempts,
                    total_duration_secs: Some(total_duration_secs),
                    completed_at: now,
                });
                self.reset();
                Ok(FinishOutcome::Completed(record))
            }
            _ => {
                let record = WorkoutRecord::SingleExercise(SingleExerciseRecord {
                    id: Uuid::new_v4(),
                    exercise: attempt.exercise,
                    sets: attempt.sets,
                    stats: None,
                    total_duration_secs: attempt.total_duration_secs,
                    notes: attempt.notes,
                    completed_at: now,
                });
                self.reset();
                Ok(FinishOutcome::Completed(record))
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.default_rest_secs);
    }
}

/// Clamps a stepper value into a non-negative `u32`.
fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_count_floors_at_zero_and_saturates() {
        assert_eq!(clamp_count(-3), 0);
        assert_eq!(clamp_count(12), 12);
        assert_eq!(clamp_count(i64::MAX), u32::MAX);
    }
}
