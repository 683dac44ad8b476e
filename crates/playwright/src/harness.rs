//! Node harness that drives Playwright

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use prerender_common::{RenderedRoute, RendererConfig, Route};

use crate::error::{PlaywrightError, PlaywrightResult};

/// Harness source, written to a temp dir and run with `node`
pub const HARNESS_JS: &str = include_str!("../harness/render.js");

/// Job handed to the harness on stdin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessJob<'a> {
    pub base_url: &'a str,
    pub routes: &'a [Route],
    pub renderer_config: &'a RendererConfig,
}

/// One rendered page as printed by the harness
#[derive(Debug, Deserialize)]
struct HarnessPage {
    route: String,
    html: String,
}

#[derive(Debug, Deserialize)]
struct HarnessFailure {
    error: String,
}

/// Runs the harness script
#[derive(Debug, Clone)]
pub struct Harness {
    /// Node binary
    pub node_binary: PathBuf,

    /// `NODE_PATH` for resolving the `playwright` package
    pub node_path: Option<PathBuf>,
}

impl Harness {
    /// Render `routes` against `base_url` in a single browser
    pub async fn run(
        &self,
        base_url: &str,
        routes: &[Route],
        renderer_config: &RendererConfig,
    ) -> PlaywrightResult<Vec<RenderedRoute>> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("render.js");
        tokio::fs::write(&script_path, HARNESS_JS).await?;

        let job = serde_json::to_vec(&HarnessJob {
            base_url,
            routes,
            renderer_config,
        })?;

        debug!("Running render harness: {}", script_path.display());

        let mut cmd = Command::new(&self.node_binary);
        cmd.arg(&script_path)
            .current_dir(temp_dir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(node_path) = &self.node_path {
            cmd.env("NODE_PATH", node_path);
        }

        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&job).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(PlaywrightError::Harness {
                status: output.status.to_string(),
                message: failure_message(&output.stderr),
            });
        }

        parse_output(&output.stdout, routes)
    }
}

/// Default `NODE_PATH`: `<dir>/node_modules` when it exists
pub fn default_node_path(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join("node_modules");
    candidate.is_dir().then_some(candidate)
}

fn failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    match serde_json::from_str::<HarnessFailure>(text.trim()) {
        Ok(failure) => failure.error,
        Err(_) => text.trim().to_string(),
    }
}

/// Parse harness output and tie every page back to its route.
///
/// The harness reports pages in input order; anything else is treated as
/// a failed render rather than guessed at.
pub fn parse_output(stdout: &[u8], routes: &[Route]) -> PlaywrightResult<Vec<RenderedRoute>> {
    let pages: Vec<HarnessPage> = serde_json::from_slice(stdout)
        .map_err(|e| PlaywrightError::MalformedOutput(e.to_string()))?;

    if pages.len() != routes.len() {
        return Err(PlaywrightError::RouteCountMismatch {
            expected: routes.len(),
            actual: pages.len(),
        });
    }

    routes
        .iter()
        .zip(pages)
        .map(|(route, page)| {
            if page.route != route.as_str() {
                return Err(PlaywrightError::RouteMismatch {
                    expected: route.to_string(),
                    actual: page.route,
                });
            }
            Ok(RenderedRoute::new(route.clone(), page.html))
        })
        .collect()
}
