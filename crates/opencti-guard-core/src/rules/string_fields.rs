//! Required string option rule (OPT-001)
//!
//! Validates:
//! - OPT-001: every option in [`REQUIRED_STRING_OPTIONS`] resolves to a
//!   non-empty string

use crate::{
    diagnostics::ValidationError,
    options::{get_resolved, keys},
    rules::{OptionRule, RuleMetadata},
};
use serde_json::{Map, Value};

const RULE_ID: &str = "OPT-001";

/// Option key to the message reported when it is missing or not a string.
pub const REQUIRED_STRING_OPTIONS: &[(&str, &str)] = &[
    (keys::URL, "You must provide a valid OpenCTI URL"),
    (keys::API_KEY, "You must provide a valid OpenCTI API key"),
];

pub struct StringFieldsRule;

impl OptionRule for StringFieldsRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: RULE_ID,
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        REQUIRED_STRING_OPTIONS
            .iter()
            .filter(|(key, _)| !is_non_empty_string(get_resolved(options, key)))
            .map(|(key, message)| ValidationError::new(*key, *message))
            .collect()
    }
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}
