//! crates/fitness_tracker_core/src/stats.rs
//!
//! Derived statistics over the workout history.
//!
//! Everything here is a pure function of the history slice and a reference
//! "now". Calendar-day questions (streaks, daily buckets) are answered in the
//! time zone carried by `now`, so the caller decides what "today" means.
//!
//! Volume has one canonical formula: `weight * reps` summed over logged sets,
//! with a missing weight counting as zero. Legacy records without per-set data
//! fall back to `weight * reps * sets` from their aggregate stats.

use std::collections::HashSet;

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::{LegacyStats, SetRecord, WorkoutRecord};

/// Minutes assumed for a record with no (or a zero) duration.
pub const FALLBACK_DURATION_MINUTES: f64 = 45.0;
/// How far back a streak is scanned.
pub const STREAK_WINDOW_DAYS: u32 = 30;

//=========================================================================================
// Volume
//=========================================================================================

fn logged_volume(sets: &[SetRecord], stats: Option<&LegacyStats>) -> u64 {
    match stats {
        Some(stats) if sets.is_empty() => stats.volume(),
        _ => sets.iter().map(SetRecord::volume).sum(),
    }
}

/// Volume of one history record, whichever variant it is.
pub fn record_volume(record: &WorkoutRecord) -> u64 {
    match record {
        WorkoutRecord::SingleExercise(single) => {
            logged_volume(&single.sets, single.stats.as_ref())
        }
        WorkoutRecord::Template(template) => template
            .attempts
            .iter()
            .map(|attempt| logged_volume(&attempt.sets, attempt.stats.as_ref()))
            .sum(),
    }
}

pub fn total_volume(history: &[WorkoutRecord]) -> u64 {
    history.iter().map(record_volume).sum()
}

//=========================================================================================
// Counts, Durations and Streaks
//=========================================================================================

/// Records completed in the trailing seven days: after `now - 7 days`, up to
/// and including `now`.
pub fn weekly_count<Tz: TimeZone>(history: &[WorkoutRecord], now: &DateTime<Tz>) -> usize {
    let end = now.with_timezone(&Utc);
    let start = end - Duration::days(7);
    history
        .iter()
        .filter(|record| {
            let at = record.completed_at();
            at > start && at <= end
        })
        .count()
}

fn duration_minutes(record: &WorkoutRecord) -> f64 {
    match record.total_duration_secs() {
        Some(secs) if secs > 0 => secs as f64 / 60.0,
        _ => FALLBACK_DURATION_MINUTES,
    }
}

/// Mean duration in minutes, or zero for an empty history.
pub fn average_duration(history: &[WorkoutRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(duration_minutes).sum::<f64>() / history.len() as f64
}

fn local_date<Tz: TimeZone>(at: DateTime<Utc>, zone: &Tz) -> NaiveDate {
    at.with_timezone(zone).date_naive()
}

fn days_back(today: NaiveDate, back: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(back)))
}

/// Consecutive calendar days, ending today, with at least one record. Scans at
/// most `STREAK_WINDOW_DAYS` days, so the result is capped there.
pub fn current_streak<Tz: TimeZone>(history: &[WorkoutRecord], now: &DateTime<Tz>) -> u32 {
    let zone = now.timezone();
    let active_days: HashSet<NaiveDate> = history
        .iter()
        .map(|record| local_date(record.completed_at(), &zone))
        .collect();
    let today = now.date_naive();

    (0..STREAK_WINDOW_DAYS)
        .take_while(|&back| days_back(today, back).is_some_and(|day| active_days.contains(&day)))
        .count() as u32
}

//=========================================================================================
// Timeframe Series
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

/// One calendar day of the chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: usize,
    pub volume: u64,
}

/// One bucket per calendar day over the trailing `days` days (today included),
/// oldest first.
pub fn timeframe_series<Tz: TimeZone>(
    history: &[WorkoutRecord],
    days: u32,
    now: &DateTime<Tz>,
) -> Vec<DayBucket> {
    let zone = now.timezone();
    let today = now.date_naive();

    (0..days)
        .rev()
        .filter_map(|back| days_back(today, back))
        .map(|date| {
            let (count, volume) = history
                .iter()
                .filter(|record| local_date(record.completed_at(), &zone) == date)
                .fold((0_usize, 0_u64), |(count, volume), record| {
                    (count + 1, volume + record_volume(record))
                });
            DayBucket {
                date,
                count,
                volume,
            }
        })
        .collect()
}

//=========================================================================================
// Summaries
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_workouts: usize,
    pub total_volume: u64,
    pub total_duration_minutes: f64,
    pub average_duration_minutes: f64,
}

pub fn summarize(history: &[WorkoutRecord]) -> ProgressSummary {
    ProgressSummary {
        total_workouts: history.len(),
        total_volume: total_volume(history),
        total_duration_minutes: history.iter().map(duration_minutes).sum(),
        average_duration_minutes: average_duration(history),
    }
}

/// The `limit` most recent records, newest first.
pub fn recent(history: &[WorkoutRecord], limit: usize) -> Vec<&WorkoutRecord> {
    let mut records: Vec<&WorkoutRecord> = history.iter().collect();
    records.sort_by_key(|record| std::cmp::Reverse(record.completed_at()));
    records.truncate(limit);
    records
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstWorkout,
    WeekWarrior,
    VolumeMaster,
    ConsistencyKing,
}

impl AchievementKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::FirstWorkout => "First Workout",
            Self::WeekWarrior => "Week Warrior",
            Self::VolumeMaster => "Volume Master",
            Self::ConsistencyKing => "Consistency King",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FirstWorkout => "Complete your first workout",
            Self::WeekWarrior => "Complete 3 workouts in a week",
            Self::VolumeMaster => "Lift 10,000 lbs total",
            Self::ConsistencyKing => "Workout 5 days in a row",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub achieved: bool,
}

pub fn achievements<Tz: TimeZone>(history: &[WorkoutRecord], now: &DateTime<Tz>) -> Vec<Achievement> {
    let earned = |kind: AchievementKind| match kind {
        AchievementKind::FirstWorkout => !history.is_empty(),
        AchievementKind::WeekWarrior => weekly_count(history, now) >= 3,
        AchievementKind::VolumeMaster => total_volume(history) >= 10_000,
        AchievementKind::ConsistencyKing => current_streak(history, now) >= 5,
    };
    [
        AchievementKind::FirstWorkout,
        AchievementKind::WeekWarrior,
        AchievementKind::VolumeMaster,
        AchievementKind::ConsistencyKing,
    ]
    .into_iter()
    .map(|kind| Achievement {
        kind,
        achieved: earned(kind),
    })
    .collect()
}
