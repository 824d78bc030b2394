//! services/tracker/src/error.rs
//!
//! Defines the primary error type for the tracker service.

use crate::config::ConfigError;
use fitness_tracker_core::ports::PortError;
use fitness_tracker_core::session::SessionError;

/// The primary error type for the `tracker` service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An operation the workout session does not allow in its current phase.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., writing the export file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored envelope written by a newer version of the tracker.
    #[error("Stored data has version {0}, newer than this build understands")]
    UnsupportedVersion(u32),
}
