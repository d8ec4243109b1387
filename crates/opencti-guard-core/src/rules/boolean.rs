//! Boolean option rule (OPT-007)
//!
//! Validates:
//! - OPT-007: boolean options, when present, resolve to `true` or `false`
//!
//! Absence means "use the default" and is never reported.

use crate::{
    diagnostics::ValidationError,
    options::{get_resolved, keys},
    rules::{OptionRule, RuleMetadata},
};
use serde_json::{Map, Value};

const RULE_ID: &str = "OPT-007";

/// Option key to its display label.
pub const BOOLEAN_OPTIONS: &[(&str, &str)] = &[(keys::ENABLE_LINKING, "Enable Linking")];

pub struct BooleanOptionsRule;

impl OptionRule for BooleanOptionsRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: RULE_ID,
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (key, label) in BOOLEAN_OPTIONS {
            let Some(value) = get_resolved(options, key) else {
                continue;
            };
            if !value.is_boolean() {
                errors.push(ValidationError::new(
                    *key,
                    format!("{} must be true or false", label),
                ));
            }
        }
        errors
    }
}
