//! Core error types

use std::path::PathBuf;

use thiserror::Error;

use crate::blacklist::RuleSource;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid blacklist pattern '{pattern}' ({source_info}): {message}")]
    InvalidPattern {
        pattern: String,
        source_info: RuleSource,
        message: String,
    },

    #[error("Failed to parse manifest stream: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Malformed manifest document #{index}: {message}")]
    MalformedDocument { index: usize, message: String },

    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(index: usize, message: impl Into<String>) -> Self {
        CoreError::MalformedDocument {
            index,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
