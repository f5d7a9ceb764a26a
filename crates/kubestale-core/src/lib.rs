//! kubestale Core - drift detection between target manifests and live cluster state
//!
//! This crate provides the cluster-independent half of kubestale:
//! - `ResourceId`: canonical identity of a namespaced resource
//! - `Blacklist`: prefix-anchored regular expression rules excluding live entries
//! - `target`: extraction of resource identities from manifest streams
//! - `DriftAnalyzer`: set difference, classification and report rendering
//! - `Config`: optional configuration file

pub mod analyzer;
pub mod blacklist;
pub mod config;
pub mod error;
pub mod identifier;
pub mod target;

pub use analyzer::{DRIFT_EXIT_CAP, DriftAnalyzer, DriftReport, ExitCodeMode, StaleClass};
pub use blacklist::{BUILTIN_RULES, Blacklist, Rule, RuleSource};
pub use config::Config;
pub use error::{CoreError, Result};
pub use identifier::{ResourceId, canonical_set};
pub use target::{extract_target, read_target, read_target_path};
