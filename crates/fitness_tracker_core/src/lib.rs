pub mod domain;
pub mod library;
pub mod ports;
pub mod session;
pub mod stats;
pub mod user_data;

pub use domain::{
    Category, Difficulty, Exercise, ExerciseAttempt, LegacyStats, SetRecord, SetTargets,
    SingleExerciseRecord, Template, TemplateExercise, TemplateRecord, WorkoutRecord,
};
pub use ports::{Clock, KeyValueStore, NutritionResponder, PortError, PortResult, SystemClock};
pub use session::{
    FinishOutcome, RestTick, SessionError, SessionPhase, SessionSnapshot, TargetField,
    WorkoutSession,
};
