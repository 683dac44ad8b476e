//! `prerender run`: the post-build prerender pipeline

use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use prerender_common::{
    BuildEvent, ExecutionMode, HtmlMinifier, Prerenderer, RunReporter, RunSummary,
    TracingReporter,
};
use prerender_playwright::{default_node_path, PlaywrightConfig, PlaywrightRenderer};

use super::Context;
use crate::reporter::SpinnerReporter;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Execution mode; pages are only prerendered in `production`
    #[arg(long, env = "NODE_ENV", default_value = "development")]
    pub mode: String,

    /// Build event JSON (`-` reads stdin)
    #[arg(long, conflicts_with = "artifacts", required_unless_present = "artifacts")]
    pub event: Option<PathBuf>,

    /// Built artifact path, treated as a successful build (repeatable)
    #[arg(long = "artifact", value_name = "PATH")]
    pub artifacts: Vec<PathBuf>,

    /// Give up on rendering after this many seconds
    #[arg(long, env = "PRERENDER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Static server port (0 = pick a free one)
    #[arg(long, env = "PRERENDER_PORT", default_value = "0")]
    pub port: u16,

    /// Document served for unknown paths (default: <output>/index.html)
    #[arg(long)]
    pub index_path: Option<PathBuf>,

    /// node_modules directory holding `playwright` (default: <cwd>/node_modules)
    #[arg(long)]
    pub node_modules: Option<PathBuf>,

    /// Node binary
    #[arg(long, default_value = "node")]
    pub node: PathBuf,

    /// Log progress instead of drawing a spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// What a run ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Not a production build, or not a successful one
    Skipped,
    Completed(RunSummary),
}

pub async fn execute(args: RunArgs, ctx: &Context) -> anyhow::Result<RunOutcome> {
    let mode = ExecutionMode::from(args.mode.as_str());
    if !mode.is_production() {
        info!("Not prerendering: execution mode is {}", mode);
        return Ok(RunOutcome::Skipped);
    }

    let event = load_event(&args).await?;
    let Some(build) = event.into_success() else {
        return Ok(RunOutcome::Skipped);
    };

    let resolver = ctx.resolver();
    let (resolved, root) = tokio::join!(resolver.resolve(), async { build.output_root() });
    let resolved = resolved?;
    let root = root?;
    debug!(routes = resolved.config.routes.len(), output = %root, "Resolved prerender inputs");

    let spinner = draws_spinner(&args, ctx);
    let renderer = PlaywrightRenderer::new(PlaywrightConfig {
        node_binary: args.node,
        node_path: args.node_modules.or_else(|| default_node_path(&ctx.cwd)),
        port: args.port,
        index_path: args.index_path,
        verify_install: true,
    });
    let mut prerenderer = Prerenderer::new(renderer, HtmlMinifier::new())
        .with_timeout(args.timeout_secs.map(Duration::from_secs));

    let reporter: Box<dyn RunReporter> = if spinner {
        Box::new(SpinnerReporter::new())
    } else {
        Box::new(TracingReporter)
    };

    let summary = prerenderer
        .run(&root, &resolved.config, reporter.as_ref())
        .await?;
    Ok(RunOutcome::Completed(summary))
}

/// The spinner shares stderr with the log stream, so it is only drawn when
/// nothing below `info` or in JSON form will be logged alongside it
fn draws_spinner(args: &RunArgs, ctx: &Context) -> bool {
    !args.no_progress && !ctx.plain_logs
}

async fn load_event(args: &RunArgs) -> anyhow::Result<BuildEvent> {
    match &args.event {
        Some(path) => {
            let content = read_event(path).await?;
            Ok(BuildEvent::from_json(&content)?)
        }
        None => Ok(BuildEvent::success_from_paths(args.artifacts.iter().cloned())),
    }
}

async fn read_event(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        return Ok(content);
    }
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("reading build event {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(args: &[&str]) -> RunArgs {
        let mut argv = vec!["prerender"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().run
    }

    fn context(dir: &TempDir) -> Context {
        Context {
            cwd: dir.path().to_path_buf(),
            config: None,
            stop_dir: Some(dir.path().to_path_buf()),
            plain_logs: false,
        }
    }

    #[test]
    fn test_spinner_only_with_plain_info_logs() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let args = parse(&["--artifact", "dist/index.js"]);
        assert!(draws_spinner(&args, &ctx));

        let quiet = parse(&["--artifact", "dist/index.js", "--no-progress"]);
        assert!(!draws_spinner(&quiet, &ctx));

        ctx.plain_logs = true;
        assert!(!draws_spinner(&args, &ctx));
    }

    #[test]
    fn test_event_or_artifact_required() {
        assert!(TestCli::try_parse_from(["prerender"]).is_err());
        assert!(TestCli::try_parse_from(["prerender", "--event", "e.json", "--artifact", "a.js"]).is_err());
        let args = parse(&["--artifact", "dist/a.js", "--artifact", "dist/b.css"]);
        assert_eq!(args.artifacts.len(), 2);
    }

    #[tokio::test]
    async fn test_skips_outside_production() {
        let dir = TempDir::new().unwrap();
        let args = parse(&["--mode", "development", "--event", "/does/not/exist.json"]);
        let outcome = execute(args, &context(&dir)).await.unwrap();
        assert_eq!(outcome, RunOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_skips_unsuccessful_build() {
        let dir = TempDir::new().unwrap();
        let event = dir.path().join("event.json");
        std::fs::write(&event, r#"{"type":"buildFailure"}"#).unwrap();

        let args = parse(&["--mode", "production", "--event", event.to_str().unwrap()]);
        let outcome = execute(args, &context(&dir)).await.unwrap();
        assert_eq!(outcome, RunOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_build_without_artifacts_fails() {
        let dir = TempDir::new().unwrap();
        let event = dir.path().join("event.json");
        std::fs::write(&event, r#"{"type":"buildSuccess","bundles":[]}"#).unwrap();
        std::fs::write(dir.path().join(".prerenderrc.json"), r#"["/"]"#).unwrap();

        let args = parse(&["--mode", "production", "--event", event.to_str().unwrap()]);
        let err = execute(args, &context(&dir)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<prerender_common::Error>(),
            Some(prerender_common::Error::NoOutputArtifacts)
        ));
    }

    #[tokio::test]
    async fn test_malformed_config_fails_before_rendering() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".prerenderrc.json"), "{ nope").unwrap();

        let args = parse(&[
            "--mode",
            "production",
            "--artifact",
            dir.path().join("index.js").to_str().unwrap(),
        ]);
        let err = execute(args, &context(&dir)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<prerender_common::Error>(),
            Some(prerender_common::Error::ConfigDiscovery { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_event_from_artifacts() {
        let args = parse(&["--artifact", "/dist/sub/index.js"]);
        let build = load_event(&args).await.unwrap().into_success().unwrap();
        assert_eq!(
            build.output_root().unwrap().as_path(),
            Path::new("/dist/sub")
        );
    }
}
