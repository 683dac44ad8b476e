//! Rendering engine capability

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{OutputRoot, RenderedRoute, RendererConfig, Route};

/// A headless rendering engine.
///
/// The pipeline drives one session per run: `initialize` once, then
/// `render_routes`, then `teardown`. `teardown` is called exactly once
/// whether or not the earlier steps failed, and must release every
/// resource the session holds.
#[async_trait]
pub trait Renderer: Send {
    /// Start a session serving the files under `output_root`
    async fn initialize(&mut self, output_root: &OutputRoot, config: &RendererConfig)
        -> Result<()>;

    /// Render every route. The result has one entry per route, in the same
    /// order, each carrying the route it was rendered from. Any failure
    /// fails the whole batch.
    async fn render_routes(&mut self, routes: &[Route]) -> Result<Vec<RenderedRoute>>;

    /// Release the session
    async fn teardown(&mut self);
}
