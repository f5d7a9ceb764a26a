//! Display formatting for CLI output
//!
//! Progress and summaries go to stderr so stdout carries nothing but the
//! report, in text or JSON.

use chrono::{DateTime, Utc};
use console::style;
use kubestale_core::DriftReport;
use serde::Serialize;

/// Announce a step of the run
pub fn step(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// One-line outcome after the report
pub fn summary(report: &DriftReport) {
    if report.has_drift() {
        eprintln!(
            "{} {} stale resource(s) ({} dynamic configmap(s), {} other)",
            style("✗").red(),
            report.stale_count(),
            report.dynamic_configmaps.len(),
            report.other.len()
        );
    } else {
        eprintln!(
            "{} No stale resources ({} live, {} blacklisted, {} in target)",
            style("✓").green(),
            report.live_count,
            report.blacklisted_count,
            report.target_count
        );
    }
}

/// Machine readable report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    /// When the live state was read
    pub snapshot_at: DateTime<Utc>,
    /// API server the live state came from
    pub url: &'a str,
    pub stale_count: usize,
    #[serde(flatten)]
    pub report: &'a DriftReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(url: &'a str, snapshot_at: DateTime<Utc>, report: &'a DriftReport) -> Self {
        Self {
            snapshot_at,
            url,
            stale_count: report.stale_count(),
            report,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
