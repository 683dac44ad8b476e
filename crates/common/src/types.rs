//! Core types for the prerender pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A page path to render, e.g. `/` or `/about/team`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The default route used when no config is found
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the route, relative to the output root.
    ///
    /// Empty and `.` segments are dropped so `/`, `` and `/./` all map to
    /// the root. Segments that would leave the output tree, and routes
    /// carrying a query or fragment, are rejected.
    pub fn segments(&self) -> Result<Vec<&str>> {
        if self.0.contains(['?', '#']) {
            return Err(Error::materialization(
                &self.0,
                "route contains a query or fragment",
            ));
        }

        let mut segments = Vec::new();
        for segment in self.0.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(Error::materialization(
                        &self.0,
                        "route escapes the output directory",
                    ))
                }
                s if s.contains('\\') => {
                    return Err(Error::materialization(
                        &self.0,
                        "route contains a backslash",
                    ))
                }
                s => segments.push(s),
            }
        }
        Ok(segments)
    }

    /// Directory under `root` that receives this route's `index.html`
    pub fn target_dir(&self, root: &OutputRoot) -> Result<PathBuf> {
        let mut dir = root.as_path().to_path_buf();
        for segment in self.segments()? {
            dir.push(segment);
        }
        Ok(dir)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Route {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Renderer options, handed to the rendering engine untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererConfig(serde_json::Value);

impl RendererConfig {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Absolute directory holding the built bundle, and where rendered pages go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoot(PathBuf);

impl OutputRoot {
    /// Build an output root, resolving relative paths against the current
    /// directory. `..` components are folded lexically.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = if path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            path
        };
        let absolute = std::path::absolute(path)?;
        Ok(Self(normalize(&absolute)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Document served for paths that have no file of their own
    pub fn index_file(&self) -> PathBuf {
        self.0.join("index.html")
    }
}

impl fmt::Display for OutputRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Markup captured for one route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRoute {
    pub route: Route,
    pub html: String,
}

impl RenderedRoute {
    pub fn new(route: Route, html: impl Into<String>) -> Self {
        Self {
            route,
            html: html.into(),
        }
    }
}
