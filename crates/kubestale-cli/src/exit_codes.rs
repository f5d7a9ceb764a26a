//! Process exit codes
//!
//! A successful run exits with the number of stale resources, saturating at
//! [`kubestale_core::DRIFT_EXIT_CAP`]. Fatal errors use the codes above that
//! range so they can never be mistaken for a drift count.

#![allow(dead_code)]

/// No stale resources
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 101;

/// Usage error - invalid arguments or options
pub const USAGE_ERROR: i32 = 102;

/// IO error - manifest, rule or config file unreadable
pub const IO_ERROR: i32 = 103;

/// Cluster error - API server unreachable, error status or unexpected response
pub const CLUSTER_ERROR: i32 = 104;

/// Manifest error - YAML syntax error or malformed document
pub const MANIFEST_ERROR: i32 = 105;

/// Blacklist error - invalid pattern
pub const BLACKLIST_ERROR: i32 = 106;

/// Config error - malformed config file
pub const CONFIG_ERROR: i32 = 107;
