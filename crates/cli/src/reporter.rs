//! Terminal progress for a prerender run

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use prerender_common::{format_duration, RunReporter, RunSummary};

/// Spinner shown while routes are rendered
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter for SpinnerReporter {
    fn started(&self, routes: usize) {
        self.bar
            .set_message(format!("Prerendering {} route(s)", routes).dimmed().to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn finished(&self, summary: &RunSummary) {
        if summary.success {
            self.bar.finish_with_message(
                format!(
                    "✨ Prerendered {} route(s) in {}.",
                    summary.routes,
                    format_duration(summary.duration)
                )
                .green()
                .to_string(),
            );
        } else {
            self.bar.abandon_with_message(
                format!("✖ Prerendering failed after {}.", format_duration(summary.duration))
                    .red()
                    .to_string(),
            );
        }
    }
}
