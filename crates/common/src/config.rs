//! Prerender configuration discovery
//!
//! The configuration is looked up under the conventional name `prerender`,
//! starting from a directory and walking up to the filesystem root (or a
//! configured stop directory). In each
//! directory the search places are tried in order:
//!
//! - `package.json` (the `prerender` property)
//! - `.prerenderrc` (JSON or YAML)
//! - `.prerenderrc.json`
//! - `.prerenderrc.yaml` / `.prerenderrc.yml`
//! - `.prerenderrc.toml`
//! - `prerender.config.json`
//!
//! The value is either a bare list of routes, or an object with optional
//! `routes` and `rendererConfig` fields.

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{RendererConfig, Route};

/// Conventional name the configuration is discovered by
pub const CONFIG_NAME: &str = "prerender";

/// Resolved prerender configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderConfig {
    pub routes: Vec<Route>,
    pub renderer_config: RendererConfig,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            routes: vec![Route::root()],
            renderer_config: RendererConfig::default(),
        }
    }
}

impl PrerenderConfig {
    /// Interpret a configuration value loaded from `origin`
    pub fn from_value(value: Value, origin: &Path) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self {
                routes: parse_routes(items, origin)?,
                ..Self::default()
            }),
            Value::Object(mut fields) => {
                let routes = match fields.remove("routes") {
                    None | Some(Value::Null) => vec![Route::root()],
                    Some(Value::Array(items)) => parse_routes(items, origin)?,
                    Some(other) => {
                        return Err(Error::config(
                            origin,
                            format!("`routes` must be a list, got {}", kind(&other)),
                        ))
                    }
                };
                let renderer_config = match fields.remove("rendererConfig") {
                    None | Some(Value::Null) => RendererConfig::default(),
                    Some(v) => RendererConfig::new(v),
                };
                Ok(Self {
                    routes,
                    renderer_config,
                })
            }
            other => Err(Error::config(
                origin,
                format!("expected a list of routes or an object, got {}", kind(&other)),
            )),
        }
    }
}

fn parse_routes(items: Vec<Value>, origin: &Path) -> Result<Vec<Route>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(Route::from(s)),
            other => Err(Error::config(
                origin,
                format!("route #{} must be a string, got {}", i, kind(&other)),
            )),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Outcome of config resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: PrerenderConfig,
    /// File the configuration came from; `None` means defaults were used
    pub source: Option<PathBuf>,
}

/// File format of a search place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    PackageJson,
    Json,
    Yaml,
    Toml,
    JsonOrYaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        if path.file_name().is_some_and(|n| n == "package.json") {
            return Format::PackageJson;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("toml") => Format::Toml,
            _ => Format::JsonOrYaml,
        }
    }
}

const SEARCH_PLACES: &[(&str, Format)] = &[
    ("package.json", Format::PackageJson),
    (".prerenderrc", Format::JsonOrYaml),
    (".prerenderrc.json", Format::Json),
    (".prerenderrc.yaml", Format::Yaml),
    (".prerenderrc.yml", Format::Yaml),
    (".prerenderrc.toml", Format::Toml),
    ("prerender.config.json", Format::Json),
];

/// Finds and loads the prerender configuration
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    start_dir: PathBuf,
    stop_dir: Option<PathBuf>,
    explicit: Option<PathBuf>,
}

impl ConfigResolver {
    /// Search upwards from `start_dir`
    pub fn new(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
            stop_dir: None,
            explicit: None,
        }
    }

    /// Do not search above this directory
    pub fn with_stop_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.stop_dir = dir;
        self
    }

    /// Load this file instead of searching
    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Resolve routes and renderer config, falling back to defaults
    pub async fn resolve(&self) -> Result<ResolvedConfig> {
        if let Some(path) = &self.explicit {
            let value = load_place(path, Format::for_path(path))
                .await?
                .ok_or_else(|| Error::config(path, "file is missing or empty"))?;
            info!("Using prerender config from {}", path.display());
            return Ok(ResolvedConfig {
                config: PrerenderConfig::from_value(value, path)?,
                source: Some(path.clone()),
            });
        }

        match self.search().await? {
            Some((path, value)) => {
                info!("Using prerender config from {}", path.display());
                let config = PrerenderConfig::from_value(value, &path)?;
                Ok(ResolvedConfig {
                    config,
                    source: Some(path),
                })
            }
            None => {
                debug!("No {} config found, using defaults", CONFIG_NAME);
                Ok(ResolvedConfig {
                    config: PrerenderConfig::default(),
                    source: None,
                })
            }
        }
    }

    async fn search(&self) -> Result<Option<(PathBuf, Value)>> {
        let start = std::path::absolute(&self.start_dir)?;
        let stop = match &self.stop_dir {
            Some(dir) => Some(std::path::absolute(dir)?),
            None => None,
        };
        for dir in start.ancestors() {
            for (name, format) in SEARCH_PLACES {
                let path = dir.join(name);
                if let Some(value) = load_place(&path, *format).await? {
                    return Ok(Some((path, value)));
                }
            }
            if stop.as_deref() == Some(dir) {
                break;
            }
        }
        Ok(None)
    }
}

/// Load one search place. `None` if the file is absent, empty, or (for
/// `package.json`) has no `prerender` property.
async fn load_place(path: &Path, format: Format) -> Result<Option<Value>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::config(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }

    let value = match format {
        Format::PackageJson => {
            let mut manifest: Value =
                serde_json::from_str(&content).map_err(|e| Error::config(path, e))?;
            manifest
                .get_mut(CONFIG_NAME)
                .map(Value::take)
                .unwrap_or(Value::Null)
        }
        Format::Json => serde_json::from_str(&content).map_err(|e| Error::config(path, e))?,
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| Error::config(path, e))?,
        Format::Toml => toml::from_str(&content).map_err(|e| Error::config(path, e))?,
        Format::JsonOrYaml => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(_) => serde_yaml::from_str(&content).map_err(|e| Error::config(path, e))?,
        },
    };

    if value.is_null() {
        return Ok(None);
    }
    debug!("Loaded {} config candidate {}", CONFIG_NAME, path.display());
    Ok(Some(value))
}
