use chrono::{DateTime, Duration, TimeZone, Utc};
use fitness_tracker_core::library::{default_exercises, find_exercise};
use fitness_tracker_core::session::{DEFAULT_REST_SECS, TEMPLATE_FALLBACK_REST_SECS};
use fitness_tracker_core::stats::total_volume;
use fitness_tracker_core::{
    Difficulty, Exercise, FinishOutcome, RestTick, SessionError, SessionPhase, SetTargets,
    TargetField, Template, TemplateExercise, WorkoutRecord, WorkoutSession,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
}

fn bench_press() -> Exercise {
    find_exercise(&default_exercises(), "bench-press").unwrap().clone()
}

fn two_exercise_template() -> Template {
    let library = default_exercises();
    let slot = |id: &str, rest_secs| TemplateExercise {
        exercise: find_exercise(&library, id).unwrap().clone(),
        sets: 2,
        reps: 10,
        rest_secs,
    };
    Template {
        id: "push-pull".to_string(),
        name: "Push Pull".to_string(),
        description: String::new(),
        difficulty: Difficulty::Beginner,
        exercises: vec![slot("push-ups", 45), slot("pull-ups", 0)],
    }
}

fn expect_record(outcome: FinishOutcome) -> WorkoutRecord {
    match outcome {
        FinishOutcome::Completed(record) => record,
        other => panic!("expected a completed record, got {other:?}"),
    }
}

#[test]
fn completing_sets_reaches_exercise_complete_exactly_at_target() {
    for target in 1..=5u32 {
        let mut session = WorkoutSession::default();
        session
            .start_exercise(bench_press(), Some(SetTargets::new(target, 8, 100)))
            .unwrap();

        for call in 1..=target {
            let phase = session.complete_set(t0(), "").unwrap();
            assert_eq!(session.completed_sets().len(), call as usize);
            if call < target {
                assert_eq!(phase, SessionPhase::Resting);
            } else {
                assert_eq!(phase, SessionPhase::ExerciseComplete);
            }
        }
    }
}

#[test]
fn three_sets_of_ten_at_twenty_produce_six_hundred_volume() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(3, 10, 20)))
        .unwrap();
    session.start_set(t0()).unwrap();
    for i in 0..3 {
        session
            .complete_set(t0() + Duration::minutes(i * 2), format!("set {}", i + 1))
            .unwrap();
    }

    let record = expect_record(
        session
            .finish_exercise(t0() + Duration::minutes(10), "felt strong")
            .unwrap(),
    );
    let WorkoutRecord::SingleExercise(single) = &record else {
        panic!("expected a single-exercise record");
    };
    assert_eq!(single.sets.len(), 3);
    let numbers: Vec<u32> = single.sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(single.total_duration_secs, Some(600));
    assert_eq!(single.notes, "felt strong");
    assert_eq!(total_volume(&[record]), 600);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn skipping_never_logs_a_set_or_completes_the_exercise() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(3, 8, 100)))
        .unwrap();

    for _ in 0..10 {
        session.skip_set().unwrap();
    }
    assert!(session.completed_sets().is_empty());
    assert_eq!(session.current_set(), 3);
    assert_eq!(session.phase(), SessionPhase::Configuring);
}

#[test]
fn skipped_sets_leave_a_gap_in_set_numbers() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(3, 8, 100)))
        .unwrap();
    session.complete_set(t0(), "").unwrap();
    session.skip_set().unwrap();
    session.complete_set(t0(), "").unwrap();

    let numbers: Vec<u32> = session.completed_sets().iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(session.phase(), SessionPhase::Resting);
}

#[test]
fn rest_counts_down_then_activates_the_next_set() {
    let mut session = WorkoutSession::new(3);
    session
        .start_exercise(bench_press(), Some(SetTargets::new(2, 8, 100)))
        .unwrap();
    session.start_set(t0()).unwrap();
    session.complete_set(t0(), "").unwrap();
    assert_eq!(session.rest_remaining(), 3);

    assert_eq!(session.rest_tick(), RestTick::Counting { remaining: 2 });
    assert_eq!(session.rest_tick(), RestTick::Counting { remaining: 1 });
    assert_eq!(session.rest_tick(), RestTick::Finished { next_set: 2 });
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.rest_tick(), RestTick::NotResting);
}

#[test]
fn pausing_halts_rest_without_resetting_it() {
    let mut session = WorkoutSession::new(10);
    session
        .start_exercise(bench_press(), Some(SetTargets::new(2, 8, 100)))
        .unwrap();
    session.complete_set(t0(), "").unwrap();
    session.rest_tick();
    session.set_paused(true).unwrap();

    for _ in 0..5 {
        assert_eq!(session.rest_tick(), RestTick::Paused { remaining: 9 });
    }
    assert!(!session.toggle_pause().unwrap());
    assert_eq!(session.rest_tick(), RestTick::Counting { remaining: 8 });
}

#[test]
fn elapsed_time_only_accumulates_while_active_and_unpaused() {
    let mut session = WorkoutSession::default();
    session.start_exercise(bench_press(), None).unwrap();
    assert_eq!(session.elapsed_tick(), 0);

    session.start_set(t0()).unwrap();
    session.elapsed_tick();
    session.elapsed_tick();
    session.set_paused(true).unwrap();
    session.elapsed_tick();
    assert_eq!(session.elapsed_secs(), 2);
}

#[test]
fn starting_an_active_set_again_is_a_no_op() {
    let mut session = WorkoutSession::default();
    session.start_exercise(bench_press(), None).unwrap();
    session.start_set(t0()).unwrap();
    session.start_set(t0() + Duration::minutes(5)).unwrap();
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.current_set(), 1);
}

#[test]
fn lowering_the_set_target_below_completed_count_finishes_the_exercise() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(4, 8, 100)))
        .unwrap();
    session.complete_set(t0(), "").unwrap();
    session.complete_set(t0(), "").unwrap();
    assert_eq!(session.phase(), SessionPhase::Resting);

    session.adjust(TargetField::Sets, -3).unwrap();
    assert_eq!(session.phase(), SessionPhase::ExerciseComplete);
    assert_eq!(session.current_set(), 1);

    session.adjust(TargetField::Sets, 2).unwrap();
    assert_eq!(session.phase(), SessionPhase::Configuring);
    assert!(session.current_set() <= session.targets().sets);
}

#[test]
fn configuration_clamps_negatives_and_steps_weight_by_five() {
    let mut session = WorkoutSession::default();
    session.start_exercise(bench_press(), None).unwrap();
    session.configure(3, -4, -20).unwrap();
    assert_eq!(session.targets(), SetTargets::new(3, 0, 0));

    session.adjust(TargetField::Weight, 3).unwrap();
    session.adjust(TargetField::Reps, 12).unwrap();
    assert_eq!(session.targets(), SetTargets::new(3, 12, 15));

    session.adjust(TargetField::Weight, -10).unwrap();
    assert_eq!(session.targets().weight, 0);
}

#[test]
fn finishing_before_the_last_set_is_rejected() {
    let mut session = WorkoutSession::default();
    session.start_exercise(bench_press(), None).unwrap();
    session.complete_set(t0(), "").unwrap();

    let err = session.finish_exercise(t0(), "").unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
}

#[test]
fn template_session_emits_one_record_with_every_attempt() {
    let mut session = WorkoutSession::default();
    session.start_template(two_exercise_template()).unwrap();
    assert_eq!(session.rest_secs(), 45);

    session.complete_set(t0(), "").unwrap();
    session.complete_set(t0(), "").unwrap();
    let outcome = session.finish_exercise(t0(), "").unwrap();
    assert_eq!(outcome, FinishOutcome::NextExercise { index: 1 });
    assert_eq!(session.current_exercise().unwrap().id, "pull-ups");
    assert_eq!(session.rest_secs(), TEMPLATE_FALLBACK_REST_SECS);
    assert!(session.completed_sets().is_empty());

    session.complete_set(t0(), "").unwrap();
    session.complete_set(t0(), "").unwrap();
    let record = expect_record(session.finish_exercise(t0(), "").unwrap());

    let WorkoutRecord::Template(template) = record else {
        panic!("expected a template record");
    };
    assert_eq!(template.attempts.len(), 2);
    assert_eq!(template.attempts[0].exercise.id, "push-ups");
    assert_eq!(template.attempts[1].exercise.id, "pull-ups");
    assert!(template.attempts.iter().all(|a| a.sets.len() == 2));
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn navigation_discards_uncommitted_sets_but_keeps_committed_attempts() {
    let mut session = WorkoutSession::default();
    session.start_template(two_exercise_template()).unwrap();

    session.complete_set(t0(), "").unwrap();
    session.complete_set(t0(), "").unwrap();
    session.finish_exercise(t0(), "").unwrap();

    session.complete_set(t0(), "").unwrap();
    assert_eq!(session.previous_exercise().unwrap(), 0);
    assert!(session.completed_sets().is_empty());
    assert_eq!(session.committed_attempts().count(), 1);

    assert_eq!(session.next_exercise().unwrap(), 1);
    assert_eq!(session.next_exercise().unwrap(), 1);
    assert!(session.completed_sets().is_empty());
    assert_eq!(session.current_set(), 1);
}

#[test]
fn navigation_outside_a_template_is_rejected() {
    let mut session = WorkoutSession::default();
    assert_eq!(session.next_exercise(), Err(SessionError::NotStarted));
    session.start_exercise(bench_press(), None).unwrap();
    assert_eq!(session.previous_exercise(), Err(SessionError::NotTemplate));
}

#[test]
fn skipping_an_exercise_commits_partial_sets() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(3, 10, 20)))
        .unwrap();
    session.complete_set(t0(), "").unwrap();

    let record = expect_record(session.skip_exercise(t0(), "tweaked shoulder").unwrap());
    let WorkoutRecord::SingleExercise(single) = record else {
        panic!("expected a single-exercise record");
    };
    assert_eq!(single.sets.len(), 1);
}

#[test]
fn cancel_discards_everything_and_returns_to_idle() {
    let mut session = WorkoutSession::default();
    session
        .start_exercise(bench_press(), Some(SetTargets::new(3, 10, 20)))
        .unwrap();
    session.complete_set(t0(), "").unwrap();
    session.complete_set(t0(), "").unwrap();

    session.cancel().unwrap();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.completed_sets().is_empty());
    assert!(session.current_exercise().is_none());
    assert_eq!(session.rest_secs(), DEFAULT_REST_SECS);
    assert_eq!(session.cancel(), Err(SessionError::NotStarted));
}

#[test]
fn a_running_session_cannot_be_started_twice() {
    let mut session = WorkoutSession::default();
    session.start_exercise(bench_press(), None).unwrap();
    assert_eq!(
        session.start_template(two_exercise_template()),
        Err(SessionError::AlreadyStarted)
    );
}
