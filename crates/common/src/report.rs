//! Run reporting

use std::time::Duration;
use tracing::{error, info};

/// Summary of one prerender run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub routes: usize,
    pub duration: Duration,
    pub success: bool,
}

/// Observes a run. Has no influence on control flow.
pub trait RunReporter: Send + Sync {
    fn started(&self, routes: usize);
    fn finished(&self, summary: &RunSummary);
}

/// Reports through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn started(&self, routes: usize) {
        info!("Prerendering {} route(s)", routes);
    }

    fn finished(&self, summary: &RunSummary) {
        if summary.success {
            info!(
                "Prerendered {} route(s) in {}",
                summary.routes,
                format_duration(summary.duration)
            );
        } else {
            error!("Prerendering failed after {}", format_duration(summary.duration));
        }
    }
}

/// Human readable duration: `850ms`, `1.2s`, `2m 5s`
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1_000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "0ms")]
    #[test_case(850, "850ms")]
    #[test_case(1_200, "1.2s")]
    #[test_case(59_940, "59.9s")]
    #[test_case(125_000, "2m 5s")]
    fn test_format_duration(ms: u64, expected: &str) {
        assert_eq!(format_duration(Duration::from_millis(ms)), expected);
    }
}
