//! Playwright render session

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use prerender_common::{OutputRoot, RenderedRoute, Renderer, RendererConfig, Result, Route};

use crate::error::PlaywrightError;
use crate::harness::Harness;
use crate::server::{ServerConfig, ServerHandle};

/// Configuration for the Playwright renderer
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    /// Node binary used to run the harness
    pub node_binary: PathBuf,

    /// `NODE_PATH` for resolving the `playwright` package
    pub node_path: Option<PathBuf>,

    /// Static server port (0 = pick a free one)
    pub port: u16,

    /// Document served for unknown paths (default: `<root>/index.html`)
    pub index_path: Option<PathBuf>,

    /// Check that Playwright is installed before starting
    pub verify_install: bool,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            node_binary: PathBuf::from("node"),
            node_path: None,
            port: 0,
            index_path: None,
            verify_install: true,
        }
    }
}

/// Renders routes by serving the bundle locally and loading each route in
/// a headless browser
pub struct PlaywrightRenderer {
    config: PlaywrightConfig,
    server: Option<ServerHandle>,
    renderer_config: RendererConfig,
}

impl PlaywrightRenderer {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self {
            config,
            server: None,
            renderer_config: RendererConfig::default(),
        }
    }

    /// Check if Playwright is installed
    async fn check_playwright_installed(&self) -> std::result::Result<(), PlaywrightError> {
        let mut cmd = Command::new("npx");
        cmd.args(["--no-install", "playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(node_path) = &self.config.node_path {
            if let Some(project) = node_path.parent() {
                cmd.current_dir(project);
            }
        }

        match cmd.status().await {
            Ok(status) if status.success() => Ok(()),
            _ => Err(PlaywrightError::PlaywrightNotFound),
        }
    }
}

#[async_trait]
impl Renderer for PlaywrightRenderer {
    async fn initialize(&mut self, output_root: &OutputRoot, config: &RendererConfig) -> Result<()> {
        if self.config.verify_install {
            self.check_playwright_installed().await?;
        }

        let server = ServerHandle::spawn(ServerConfig {
            static_dir: output_root.as_path().to_path_buf(),
            index_path: Some(
                self.config
                    .index_path
                    .clone()
                    .unwrap_or_else(|| output_root.index_file()),
            ),
            port: self.config.port,
        })
        .await?;

        self.server = Some(server);
        self.renderer_config = config.clone();
        Ok(())
    }

    async fn render_routes(&mut self, routes: &[Route]) -> Result<Vec<RenderedRoute>> {
        let server = self.server.as_ref().ok_or(PlaywrightError::NotInitialized)?;
        if routes.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Rendering {} route(s) via {}", routes.len(), server.base_url());
        let harness = Harness {
            node_binary: self.config.node_binary.clone(),
            node_path: self.config.node_path.clone(),
        };
        let rendered = harness
            .run(server.base_url(), routes, &self.renderer_config)
            .await?;
        Ok(rendered)
    }

    async fn teardown(&mut self) {
        if let Some(mut server) = self.server.take() {
            server.stop().await;
        } else {
            debug!("Render session was never started");
        }
    }
}
