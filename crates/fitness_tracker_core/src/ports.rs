//! crates/fitness_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the tracker depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the concrete storage backend, the chat responder and the clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A flat key-value store of text blobs, the persistence collaborator.
///
/// Implementations only move strings around; serialization, envelopes and
/// fallback-to-default handling live one layer up.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the text stored under `key`, or `None` when the key is absent.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> PortResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

#[async_trait]
pub trait NutritionResponder: Send + Sync {
    /// Produces the bot's reply to one user chat message.
    async fn respond(&self, message: &str) -> PortResult<String>;
}

/// Source of "now" for everything that stamps records or buckets by date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
