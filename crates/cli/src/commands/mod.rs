//! CLI Commands

use std::path::PathBuf;

use prerender_common::ConfigResolver;

pub mod config;
pub mod run;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory the config search starts from
    pub cwd: PathBuf,

    /// Config file that bypasses the search
    pub config: Option<PathBuf>,

    /// Highest directory the config search visits
    pub stop_dir: Option<PathBuf>,

    /// Logs are verbose or structured; a spinner would interleave with them
    pub plain_logs: bool,
}

impl Context {
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(&self.cwd)
            .with_stop_dir(self.stop_dir.clone())
            .with_explicit_path(self.config.clone())
    }
}
