//! URL format rule (OPT-002)
//!
//! Validates:
//! - OPT-002: the `url` option must not end with `//`
//!
//! Non-string URLs are left to OPT-001.

use crate::{
    diagnostics::ValidationError,
    options::{get_str, keys},
    rules::{OptionRule, RuleMetadata},
};
use serde_json::{Map, Value};

const RULE_ID: &str = "OPT-002";

pub const TRAILING_DOUBLE_SLASH_MESSAGE: &str = "Your Url must not end with a //";

pub struct UrlRule;

impl OptionRule for UrlRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: RULE_ID,
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        match get_str(options, keys::URL) {
            Some(url) if url.ends_with("//") => {
                vec![ValidationError::new(keys::URL, TRAILING_DOUBLE_SLASH_MESSAGE)]
            }
            _ => Vec::new(),
        }
    }
}
