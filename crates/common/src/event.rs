//! Build events that trigger a prerender run
//!
//! A run is only started for a successful production build. The event
//! carries the artifacts the bundler produced; their location, not any
//! configured path, decides where rendered pages are written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::OutputRoot;

/// Event emitted by the build tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BuildEvent {
    BuildSuccess(BuildResult),
    BuildFailure,
    BuildStart,
    BuildProgress,
    WatchStart,
    WatchEnd,
    #[serde(other)]
    Other,
}

impl BuildEvent {
    /// Parse an event from its JSON form
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::InvalidEvent(e.to_string()))
    }

    /// A successful build made of the given artifact paths
    pub fn success_from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        BuildEvent::BuildSuccess(BuildResult {
            bundles: paths
                .into_iter()
                .map(|p| BuildArtifact { file_path: p.into() })
                .collect(),
        })
    }

    /// The build result, if this event should trigger a run
    pub fn into_success(self) -> Option<BuildResult> {
        match self {
            BuildEvent::BuildSuccess(result) => Some(result),
            other => {
                debug!("Ignoring build event: {:?}", other);
                None
            }
        }
    }
}

/// Artifacts produced by one build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildResult {
    #[serde(default)]
    pub bundles: Vec<BuildArtifact>,
}

/// A single file written by the build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildArtifact {
    pub file_path: PathBuf,
}

impl BuildResult {
    /// Directory holding the first artifact.
    ///
    /// All artifacts of one build land under a single root, so the first
    /// one is enough to find it.
    pub fn output_root(&self) -> Result<OutputRoot> {
        let first = self.bundles.first().ok_or(Error::NoOutputArtifacts)?;
        let dir = first
            .file_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        OutputRoot::new(dir)
    }
}

/// Execution mode of the surrounding build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    Production,
    Other(String),
}

impl ExecutionMode {
    pub fn is_production(&self) -> bool {
        matches!(self, ExecutionMode::Production)
    }
}

impl From<&str> for ExecutionMode {
    fn from(value: &str) -> Self {
        if value == "production" {
            ExecutionMode::Production
        } else {
            ExecutionMode::Other(value.to_string())
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Production => f.write_str("production"),
            ExecutionMode::Other(mode) => f.write_str(mode),
        }
    }
}
