//! Engine configuration

use crate::diagnostics::{GuardError, GuardResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod schema;


pub use schema::{ConfigWarning, generate_schema};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".opencti-guard.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Configuration for enabling/disabling option rules")]
pub struct RuleConfig {
    /// Rule IDs to skip (e.g., ["OPT-007"])
    #[serde(default)]
    #[schemars(description = "Option rule IDs to skip (e.g., [\"OPT-007\"])")]
    pub disabled_rules: Vec<String>,
}

/// Configuration for the validation engine
///
/// Every rule is enabled by default; an empty or missing config file
/// validates with the full rule set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GuardConfig {
    /// Rules to enable/disable
    #[schemars(description = "Configuration for enabling/disabling option rules")]
    pub rules: RuleConfig,
}

impl GuardConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GuardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            GuardError::ConfigParse { source, .. } => GuardError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> GuardResult<Self> {
        toml::from_str(content).map_err(|source| GuardError::ConfigParse {
            path: PathBuf::new(),
            source,
        })
    }

    /// Load config or use default, returning any load warning
    ///
    /// If a config path is provided but the file cannot be loaded or parsed,
    /// returns the default config with a warning describing the error, so a
    /// typo in the config never silently disables checks.
    pub fn load_or_default(path: Option<&PathBuf>) -> (Self, Option<String>) {
        match path {
            Some(p) => match Self::load(p) {
                Ok(config) => (config, None),
                Err(e) => {
                    let detail = std::error::Error::source(&e)
                        .map(|s| format!("{e}: {s}"))
                        .unwrap_or_else(|| e.to_string());
                    (
                        Self::default(),
                        Some(format!("{detail}; using default configuration")),
                    )
                }
            },
            None => (Self::default(), None),
        }
    }

    /// Check if a specific rule is enabled.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.rules.disabled_rules.iter().any(|r| r == rule_id)
    }

    /// Get mutable access to the rules configuration.
    pub fn rules_mut(&mut self) -> &mut RuleConfig {
        &mut self.rules
    }
}
