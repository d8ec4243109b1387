use super::*;

impl GuardConfig {
    /// Validate the configuration and return any warnings.
    ///
    /// Checks that every entry of `rules.disabled_rules` names a rule from the
    /// catalog. Unknown IDs are ignored by the engine, so they are reported
    /// here rather than failing the load.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for rule_id in &self.rules.disabled_rules {
            if opencti_guard_rules::get_rule_name(rule_id).is_none() {
                let known: Vec<&str> = opencti_guard_rules::RULES_DATA
                    .iter()
                    .map(|(id, _)| *id)
                    .collect();
                warnings.push(ConfigWarning {
                    field: "rules.disabled_rules".to_string(),
                    message: format!("Unknown rule ID '{}'", rule_id),
                    suggestion: Some(format!("Known rule IDs: {}", known.join(", "))),
                });
            }
        }

        warnings
    }
}

/// Warning from configuration validation.
///
/// These warnings indicate potential issues with the configuration that
/// don't prevent validation from running but may indicate user mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The field path that has the issue (e.g., "rules.disabled_rules")
    pub field: String,
    /// Description of the issue
    pub message: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

/// Generate a JSON Schema for the GuardConfig type.
///
/// This can be used to provide editor autocompletion and validation
/// for `.opencti-guard.toml` configuration files.
///
/// # Example
///
/// ```rust
/// use opencti_guard_core::config::generate_schema;
///
/// let schema = generate_schema();
/// let json = serde_json::to_string_pretty(&schema).unwrap();
/// println!("{}", json);
/// ```
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(GuardConfig)
}
