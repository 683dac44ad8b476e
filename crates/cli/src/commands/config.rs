//! `prerender config`: show the resolved configuration

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use prerender_common::{PrerenderConfig, Route};

use super::Context;
use crate::output::{print_info, print_list, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct RouteRow {
    route: Route,
}

impl TableDisplay for RouteRow {
    fn headers() -> Vec<&'static str> {
        vec!["Route"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.route.to_string()]
    }
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    source: Option<&'a PathBuf>,
    #[serde(flatten)]
    config: &'a PrerenderConfig,
}

pub async fn execute(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    let resolved = ctx.resolver().resolve().await?;

    if let OutputFormat::Json = args.format {
        let report = ConfigReport {
            source: resolved.source.as_ref(),
            config: &resolved.config,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &resolved.source {
        Some(path) => print_info(&format!("Config loaded from {}", path.display())),
        None => print_info("No prerender config found, using defaults"),
    }

    let rows: Vec<RouteRow> = resolved
        .config
        .routes
        .iter()
        .cloned()
        .map(|route| RouteRow { route })
        .collect();
    print_list(&rows, args.format);

    println!(
        "Renderer config: {}",
        serde_json::to_string_pretty(resolved.config.renderer_config.as_value())?
    );
    Ok(())
}
