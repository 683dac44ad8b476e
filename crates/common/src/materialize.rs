//! Writing rendered routes to disk

use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::minify::Minifier;
use crate::types::{OutputRoot, RenderedRoute};

/// Writes each rendered route to `<root>/<route>/index.html`
pub struct Materializer<M> {
    minifier: Arc<M>,
}

impl<M: Minifier> Materializer<M> {
    pub fn new(minifier: Arc<M>) -> Self {
        Self { minifier }
    }

    /// Materialize all routes concurrently.
    ///
    /// Routes are independent and touch disjoint directories. The first
    /// failure fails the batch; files already written stay on disk.
    pub async fn materialize(
        &self,
        root: &OutputRoot,
        routes: Vec<RenderedRoute>,
    ) -> Result<Vec<PathBuf>> {
        try_join_all(routes.into_iter().map(|r| self.materialize_route(root, r))).await
    }

    async fn materialize_route(&self, root: &OutputRoot, rendered: RenderedRoute) -> Result<PathBuf> {
        let route = rendered.route;
        let dir = route.target_dir(root)?;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::materialization(&route, format!("create {}: {}", dir.display(), e)))?;

        let html = self.minifier.minify(rendered.html.trim()).map_err(|e| match e {
            Error::Materialization { reason, .. } => Error::materialization(&route, reason),
            other => Error::materialization(&route, other),
        })?;

        let file = dir.join("index.html");
        tokio::fs::write(&file, html)
            .await
            .map_err(|e| Error::materialization(&route, format!("write {}: {}", file.display(), e)))?;

        debug!(route = %route, path = %file.display(), "Wrote rendered route");
        Ok(file)
    }
}
