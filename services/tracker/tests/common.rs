#![allow(dead_code)]
//! Shared test utilities for the tracker service.

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use fitness_tracker_core::library::{default_exercises, find_exercise};
use fitness_tracker_core::ports::Clock;
use fitness_tracker_core::Exercise;
use tracker_lib::adapters::{CannedNutritionResponder, InMemoryStore};
use tracker_lib::app::Tracker;
use tracker_lib::config::Config;

static INIT_LOGGER: Once = Once::new();

/// Quiet logging for tests; `TEST_LOG=DEBUG` turns it up.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// A clock that only moves when told to.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn march_10() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
}

/// Defaults with no chat delay and a ticker slow enough to never fire during
/// a non-timing test.
pub fn test_config() -> Config {
    Config {
        chat_reply_delay: Duration::ZERO,
        tick_interval: Duration::from_secs(3600),
        ..Config::default()
    }
}

pub struct Harness {
    pub tracker: Arc<Tracker>,
    pub store: InMemoryStore,
    pub clock: Arc<TestClock>,
}

pub fn harness(config: Config) -> Harness {
    init_test_logging();
    let store = InMemoryStore::new();
    let clock = TestClock::at(march_10());
    let tracker = Tracker::new(
        Arc::new(config),
        Arc::new(store.clone()),
        Arc::new(CannedNutritionResponder::new()),
        clock.clone(),
    );
    Harness {
        tracker: Arc::new(tracker),
        store,
        clock,
    }
}

pub fn library_exercise(id: &str) -> Exercise {
    find_exercise(&default_exercises(), id).unwrap().clone()
}
