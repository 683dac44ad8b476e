//! Error types for the prerender pipeline

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using the prerender Error
pub type Result<T> = std::result::Result<T, Error>;

/// Prerender error types
///
/// Every variant is fatal to the run: nothing in the pipeline retries or
/// recovers locally.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error in {path}: {reason}")]
    ConfigDiscovery { path: PathBuf, reason: String },

    #[error("Build produced no output artifacts to locate the output directory")]
    NoOutputArtifacts,

    #[error("Render session error: {0}")]
    RenderSession(String),

    #[error("Failed to materialize route {route}: {reason}")]
    Materialization { route: String, reason: String },

    #[error("Rendering timed out after {}", timeout_label(.limit))]
    Timeout { limit: Duration },

    #[error("Invalid build event: {0}")]
    InvalidEvent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn timeout_label(limit: &Duration) -> String {
    crate::report::format_duration(*limit)
}

impl Error {
    pub(crate) fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ConfigDiscovery {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn materialization(route: impl ToString, reason: impl ToString) -> Self {
        Error::Materialization {
            route: route.to_string(),
            reason: reason.to_string(),
        }
    }
}
