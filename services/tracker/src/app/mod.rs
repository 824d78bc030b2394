pub mod export;
pub mod runner;
pub mod storage;
pub mod ticker;
pub mod tracker;

pub use runner::WorkoutRunner;
pub use storage::{StorageGateway, StorageKey};
pub use tracker::{Dashboard, DestructiveAction, Pending, Progress, Tracker};
