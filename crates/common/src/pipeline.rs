//! The prerender pipeline
//!
//! ```text
//! resolve config ─┐
//!                 ├─> initialize session ─> render routes ─> teardown ─> materialize
//! output root ────┘
//! ```
//!
//! Rendering is all-or-nothing: if the session fails to start or any
//! route fails to render, nothing is written. The session is torn down
//! exactly once on every path.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::PrerenderConfig;
use crate::error::{Error, Result};
use crate::materialize::Materializer;
use crate::minify::Minifier;
use crate::render::Renderer;
use crate::report::{RunReporter, RunSummary};
use crate::types::{OutputRoot, RenderedRoute, RendererConfig, Route};

/// Drives one prerender run
pub struct Prerenderer<R, M> {
    renderer: R,
    materializer: Materializer<M>,
    timeout: Option<Duration>,
}

impl<R: Renderer, M: Minifier> Prerenderer<R, M> {
    pub fn new(renderer: R, minifier: M) -> Self {
        Self {
            renderer,
            materializer: Materializer::new(Arc::new(minifier)),
            timeout: None,
        }
    }

    /// Bound session start-up plus rendering
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render every configured route and write it under `root`
    pub async fn run(
        &mut self,
        root: &OutputRoot,
        config: &PrerenderConfig,
        reporter: &dyn RunReporter,
    ) -> Result<RunSummary> {
        reporter.started(config.routes.len());
        let start = Instant::now();

        let result = match self.render(root, &config.routes, &config.renderer_config).await {
            Ok(rendered) => self.materializer.materialize(root, rendered).await,
            Err(e) => Err(e),
        };

        let summary = RunSummary {
            routes: result.as_ref().map(Vec::len).unwrap_or(0),
            duration: start.elapsed(),
            success: result.is_ok(),
        };
        reporter.finished(&summary);

        result.map(|files| {
            debug!("Wrote {} page(s) under {}", files.len(), root);
            summary
        })
    }

    /// Run a full session and release it whatever the outcome
    async fn render(
        &mut self,
        root: &OutputRoot,
        routes: &[Route],
        renderer_config: &RendererConfig,
    ) -> Result<Vec<RenderedRoute>> {
        let timeout = self.timeout;
        let session = render_in_session(&mut self.renderer, root, routes, renderer_config);

        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, session).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout { limit }),
            },
            None => session.await,
        };

        debug!("Tearing down render session");
        self.renderer.teardown().await;
        outcome
    }
}

async fn render_in_session<R: Renderer>(
    renderer: &mut R,
    root: &OutputRoot,
    routes: &[Route],
    renderer_config: &RendererConfig,
) -> Result<Vec<RenderedRoute>> {
    renderer.initialize(root, renderer_config).await?;
    debug!("Render session serving {}", root);
    renderer.render_routes(routes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minify::Passthrough;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Calls {
        initialize: AtomicUsize,
        render: AtomicUsize,
        teardown: AtomicUsize,
    }

    /// Renders `<p>{route}</p>`, failing on request
    struct FakeRenderer {
        calls: Arc<Calls>,
        fail_init: bool,
        fail_route: Option<&'static str>,
        hang: bool,
    }

    impl FakeRenderer {
        fn new(calls: Arc<Calls>) -> Self {
            Self {
                calls,
                fail_init: false,
                fail_route: None,
                hang: false,
            }
        }
    }

    #[async_trait]
    impl Renderer for FakeRenderer {
        async fn initialize(&mut self, _root: &OutputRoot, _config: &RendererConfig) -> Result<()> {
            self.calls.initialize.fetch_add(1, Ordering::SeqCst);
            if self.fail_init {
                return Err(Error::RenderSession("browser did not start".into()));
            }
            Ok(())
        }

        async fn render_routes(&mut self, routes: &[Route]) -> Result<Vec<RenderedRoute>> {
            self.calls.render.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            routes
                .iter()
                .map(|r| {
                    if Some(r.as_str()) == self.fail_route {
                        Err(Error::RenderSession(format!("navigation to {} failed", r)))
                    } else {
                        Ok(RenderedRoute::new(r.clone(), format!("  <p>{}</p>\n", r)))
                    }
                })
                .collect()
        }

        async fn teardown(&mut self) {
            self.calls.teardown.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        started: Mutex<Option<usize>>,
        finished: Mutex<Option<RunSummary>>,
    }

    impl RunReporter for RecordingReporter {
        fn started(&self, routes: usize) {
            *self.started.lock().unwrap() = Some(routes);
        }

        fn finished(&self, summary: &RunSummary) {
            *self.finished.lock().unwrap() = Some(summary.clone());
        }
    }

    fn config(routes: &[&str]) -> PrerenderConfig {
        PrerenderConfig {
            routes: routes.iter().map(|r| Route::new(*r)).collect(),
            renderer_config: RendererConfig::default(),
        }
    }

    fn count_pages(dir: &std::path::Path) -> usize {
        let mut count = 0;
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            for entry in std::fs::read_dir(d).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.file_name().is_some_and(|n| n == "index.html") {
                    count += 1;
                }
            }
        }
        count
    }

    #[tokio::test]
    async fn test_run_writes_every_route() {
        let dir = TempDir::new().unwrap();
        let root = OutputRoot::new(dir.path()).unwrap();
        let calls = Arc::new(Calls::default());
        let reporter = RecordingReporter::default();

        let mut prerenderer = Prerenderer::new(FakeRenderer::new(calls.clone()), Passthrough);
        let summary = prerenderer
            .run(&root, &config(&["/", "/about", "/about/team"]), &reporter)
            .await
            .unwrap();

        assert!(summary.success);
        assert_eq!(summary.routes, 3);
        assert_eq!(count_pages(dir.path()), 3);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("about/team/index.html")).unwrap(),
            "<p>/about/team</p>"
        );
        assert_eq!(calls.initialize.load(Ordering::SeqCst), 1);
        assert_eq!(calls.teardown.load(Ordering::SeqCst), 1);
        assert_eq!(*reporter.started.lock().unwrap(), Some(3));
        assert!(reporter.finished.lock().unwrap().as_ref().unwrap().success);
    }

    #[tokio::test]
    async fn test_render_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = OutputRoot::new(dir.path()).unwrap();
        let calls = Arc::new(Calls::default());
        let reporter = RecordingReporter::default();

        let mut renderer = FakeRenderer::new(calls.clone());
        renderer.fail_route = Some("/about");
        let mut prerenderer = Prerenderer::new(renderer, Passthrough);

        let err = prerenderer
            .run(&root, &config(&["/", "/about", "/contact"]), &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RenderSession(_)));
        assert_eq!(count_pages(dir.path()), 0);
        assert_eq!(calls.teardown.load(Ordering::SeqCst), 1);
        let summary = reporter.finished.lock().unwrap().clone().unwrap();
        assert!(!summary.success);
    }

    #[tokio::test]
    async fn test_init_failure_still_tears_down() {
        let dir = TempDir::new().unwrap();
        let root = OutputRoot::new(dir.path()).unwrap();
        let calls = Arc::new(Calls::default());

        let mut renderer = FakeRenderer::new(calls.clone());
        renderer.fail_init = true;
        let mut prerenderer = Prerenderer::new(renderer, Passthrough);

        let err = prerenderer
            .run(&root, &config(&["/"]), &RecordingReporter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RenderSession(_)));
        assert_eq!(calls.render.load(Ordering::SeqCst), 0);
        assert_eq!(calls.teardown.load(Ordering::SeqCst), 1);
        assert_eq!(count_pages(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_timeout_tears_down() {
        let dir = TempDir::new().unwrap();
        let root = OutputRoot::new(dir.path()).unwrap();
        let calls = Arc::new(Calls::default());

        let mut renderer = FakeRenderer::new(calls.clone());
        renderer.hang = true;
        let mut prerenderer = Prerenderer::new(renderer, Passthrough)
            .with_timeout(Some(Duration::from_millis(50)));

        let err = prerenderer
            .run(&root, &config(&["/"]), &RecordingReporter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { limit } if limit == Duration::from_millis(50)));
        assert_eq!(err.to_string(), "Rendering timed out after 50ms");
        assert_eq!(calls.teardown.load(Ordering::SeqCst), 1);
        assert_eq!(count_pages(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_run_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = OutputRoot::new(dir.path()).unwrap();
        let cfg = config(&["/", "/docs"]);

        let mut prerenderer =
            Prerenderer::new(FakeRenderer::new(Arc::new(Calls::default())), Passthrough);
        prerenderer.run(&root, &cfg, &RecordingReporter::default()).await.unwrap();
        let first = std::fs::read(dir.path().join("docs/index.html")).unwrap();
        prerenderer.run(&root, &cfg, &RecordingReporter::default()).await.unwrap();
        let second = std::fs::read(dir.path().join("docs/index.html")).unwrap();

        assert_eq!(first, second);
        assert_eq!(count_pages(dir.path()), 2);
    }
}
