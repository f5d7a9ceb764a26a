//! CLI error types with exit code handling
//!
//! Library errors are folded into a single `CliError` carrying a diagnostic
//! code, an optional hint and the exit code of its category.

use kubestale_core::CoreError;
use kubestale_kube::KubeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid argument value
    #[error("Invalid usage: {message}")]
    #[diagnostic(code(kubestale::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubestale::cli::io))]
    Io { message: String },

    /// Live state could not be read
    #[error("Cluster error: {message}")]
    #[diagnostic(code(kubestale::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Target manifests could not be parsed
    #[error("Manifest error: {message}")]
    #[diagnostic(code(kubestale::cli::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A blacklist rule is not a valid regular expression
    #[error("Blacklist error: {message}")]
    #[diagnostic(code(kubestale::cli::blacklist))]
    Blacklist {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Config file is malformed
    #[error("Config error: {message}")]
    #[diagnostic(code(kubestale::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(kubestale::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Manifest { .. } => exit_codes::MANIFEST_ERROR,
            CliError::Blacklist { .. } => exit_codes::BLACKLIST_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidPattern { .. } => CliError::Blacklist {
                message,
                help: Some(
                    "Rules are regular expressions matched against \
                     'namespace:apiVersion:kind:name' from the start"
                        .to_string(),
                ),
            },
            CoreError::YamlParse(_) => CliError::Manifest {
                message,
                help: Some("Check the YAML syntax of the target manifests".to_string()),
            },
            CoreError::MalformedDocument { .. } => CliError::Manifest {
                message,
                help: Some(
                    "Namespaced documents need non-empty apiVersion, kind and metadata.name"
                        .to_string(),
                ),
            },
            CoreError::InvalidConfig { .. } => CliError::Config {
                message,
                help: Some(
                    "Known keys are url, blacklistFiles, blacklist and exitCode".to_string(),
                ),
            },
            CoreError::Io { .. } => CliError::Io { message },
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        let message = err.to_string();
        match err {
            KubeError::InvalidUrl { .. } => CliError::Usage {
                message,
                help: Some("Pass an http(s) URL, e.g. --url http://localhost:8001".to_string()),
            },
            KubeError::HttpStatus {
                status: 401 | 403, ..
            } => CliError::Cluster {
                message,
                help: Some(
                    "Listing every namespaced resource needs cluster-wide read access".to_string(),
                ),
            },
            _ => CliError::Cluster {
                message,
                help: None,
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::other(format!("failed to serialize report: {}", err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
