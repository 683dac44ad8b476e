//! Prerender Common Library
//!
//! Data model, configuration discovery and the pipeline that turns a list
//! of routes into static `index.html` files. The rendering engine and the
//! HTML minifier are pluggable through the [`Renderer`] and [`Minifier`]
//! traits.

pub mod config;
pub mod error;
pub mod event;
pub mod materialize;
pub mod minify;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigResolver, PrerenderConfig, ResolvedConfig, CONFIG_NAME};
pub use error::{Error, Result};
pub use event::{BuildArtifact, BuildEvent, BuildResult, ExecutionMode};
pub use materialize::Materializer;
pub use minify::{HtmlMinifier, Minifier, Passthrough};
pub use pipeline::Prerenderer;
pub use render::Renderer;
pub use report::{format_duration, RunReporter, RunSummary, TracingReporter};
pub use types::{OutputRoot, RenderedRoute, RendererConfig, Route};
