//! Violation records and engine error types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type GuardResult<T> = Result<T, GuardError>;

/// A single option violation.
///
/// `key` names the offending option (e.g. `"url"`); `message` is shown to the
/// user as-is. A key may appear more than once in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Engine errors.
///
/// These are systemic failures, kept apart from user-data violations, which
/// are always returned as [`ValidationError`] values.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Options must be a JSON object, found {found}")]
    OptionsNotObject { found: &'static str },

    #[error("Rule {rule} failed unexpectedly: {message}")]
    RuleFault { rule: String, message: String },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
