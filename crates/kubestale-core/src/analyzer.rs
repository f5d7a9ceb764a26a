//! Drift analysis between target and live state
//!
//! Stale resources are those present live (after blacklist filtering) but
//! absent from the target manifests. They are split into two classes:
//! content-hash named ConfigMaps, which templating tools regenerate on every
//! change and which pile up silently, and everything else.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::blacklist::Blacklist;
use crate::identifier::{ResourceId, canonical_set};

/// Highest exit code used to report a drift count
///
/// Counts above the cap are reported as the cap; codes above it are reserved
/// for fatal errors.
pub const DRIFT_EXIT_CAP: i32 = 100;

const DYNAMIC_CONFIGMAPS_HEADER: &str = "Live dynamic configmaps that are not in target (stale):";
const OTHER_STALE_HEADER: &str =
    "Live resources w/o dynamic configmaps that are not in target (stale):";

/// ConfigMap whose name carries a 10 character content hash suffix
static DYNAMIC_CONFIGMAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*:v1:ConfigMap:.*-[a-z0-9]{10}").expect("valid regex"));

/// Class of a stale entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaleClass {
    DynamicConfigMap,
    Other,
}

impl StaleClass {
    /// Classify a canonical identifier
    pub fn of(candidate: &str) -> Self {
        if DYNAMIC_CONFIGMAP.is_match(candidate) {
            StaleClass::DynamicConfigMap
        } else {
            StaleClass::Other
        }
    }
}

/// How the drift count maps to a process exit code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitCodeMode {
    /// Exit code is the number of stale resources, capped at [`DRIFT_EXIT_CAP`]
    #[default]
    Count,
    /// Exit code is 1 when anything is stale
    Binary,
}

impl std::str::FromStr for ExitCodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(ExitCodeMode::Count),
            "binary" => Ok(ExitCodeMode::Binary),
            _ => Err(format!("unknown exit code mode: {} (expected count or binary)", s)),
        }
    }
}

/// Computes stale resources against a fixed blacklist
pub struct DriftAnalyzer<'a> {
    blacklist: &'a Blacklist,
}

impl<'a> DriftAnalyzer<'a> {
    pub fn new(blacklist: &'a Blacklist) -> Self {
        Self { blacklist }
    }

    /// Analyze identifier lists; order and duplicates do not matter
    pub fn analyze(&self, target: &[ResourceId], live: &[ResourceId]) -> DriftReport {
        self.analyze_sets(&canonical_set(target), &canonical_set(live))
    }

    /// Analyze sets of canonical identifiers
    pub fn analyze_sets(&self, target: &BTreeSet<String>, live: &BTreeSet<String>) -> DriftReport {
        let filtered: BTreeSet<&str> = self
            .blacklist
            .filter(live.iter().map(String::as_str))
            .into_iter()
            .collect();

        let mut dynamic_configmaps = Vec::new();
        let mut other = Vec::new();

        // BTreeSet iteration is already ascending
        for entry in filtered.iter().filter(|e| !target.contains(**e)) {
            match StaleClass::of(entry) {
                StaleClass::DynamicConfigMap => dynamic_configmaps.push(entry.to_string()),
                StaleClass::Other => other.push(entry.to_string()),
            }
        }

        DriftReport {
            target_count: target.len(),
            live_count: live.len(),
            blacklisted_count: live.len() - filtered.len(),
            filtered_count: filtered.len(),
            dynamic_configmaps,
            other,
        }
    }
}

/// Classified stale resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    /// Distinct target identifiers
    pub target_count: usize,
    /// Distinct live identifiers before filtering
    pub live_count: usize,
    /// Live identifiers removed by the blacklist
    pub blacklisted_count: usize,
    /// Live identifiers left after filtering
    pub filtered_count: usize,
    /// Stale content-hash ConfigMaps, sorted
    pub dynamic_configmaps: Vec<String>,
    /// Every other stale resource, sorted
    pub other: Vec<String>,
}

impl DriftReport {
    /// Total number of stale resources
    pub fn stale_count(&self) -> usize {
        self.dynamic_configmaps.len() + self.other.len()
    }

    pub fn has_drift(&self) -> bool {
        self.stale_count() > 0
    }

    /// All stale entries with their class, sorted
    pub fn stale(&self) -> Vec<(&str, StaleClass)> {
        let mut all: Vec<(&str, StaleClass)> = self
            .dynamic_configmaps
            .iter()
            .map(|e| (e.as_str(), StaleClass::DynamicConfigMap))
            .chain(self.other.iter().map(|e| (e.as_str(), StaleClass::Other)))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    /// Process exit code for this report
    pub fn exit_code(&self, mode: ExitCodeMode) -> i32 {
        let count = self.stale_count();
        match mode {
            ExitCodeMode::Binary => i32::from(count > 0),
            ExitCodeMode::Count => {
                let cap = DRIFT_EXIT_CAP as usize;
                if count > cap {
                    tracing::warn!(
                        "{} stale resources exceed the exit code range, exiting with {}",
                        count,
                        DRIFT_EXIT_CAP
                    );
                    DRIFT_EXIT_CAP
                } else {
                    count as i32
                }
            }
        }
    }

    /// Plain text report with both sections
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, DYNAMIC_CONFIGMAPS_HEADER, &self.dynamic_configmaps)?;
        writeln!(f)?;
        write_section(f, OTHER_STALE_HEADER, &self.other)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, header: &str, entries: &[String]) -> fmt::Result {
    writeln!(f, "{}", header)?;
    for entry in entries {
        writeln!(f, "  {}", entry)?;
    }
    writeln!(f, ".. {} entries", entries.len())
}
