//! Validation pipeline: run the rule set over an option bag.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GuardConfig;
use crate::diagnostics::{GuardError, GuardResult, ValidationError};
use crate::options::json_kind;
use crate::registry::OptionRuleSet;

/// Validate options with the built-in rules and default configuration.
pub fn validate_options(options: &Value) -> GuardResult<Vec<ValidationError>> {
    validate_options_with_config(options, &GuardConfig::default())
}

/// Validate options with the built-in rules, honoring `config`.
pub fn validate_options_with_config(
    options: &Value,
    config: &GuardConfig,
) -> GuardResult<Vec<ValidationError>> {
    let mut rule_set = OptionRuleSet::with_defaults();
    for rule_id in &config.rules.disabled_rules {
        if opencti_guard_rules::get_rule_name(rule_id).is_none() {
            warn!(rule = %rule_id, "ignoring unknown rule id in disabled_rules");
        }
        rule_set.disable_rule(rule_id.clone());
    }
    validate_options_with_rule_set(options, &rule_set)
}

/// Validate options against an explicit rule set.
///
/// Every enabled rule runs, in order, and all violations are returned
/// together. A payload that is not a JSON object, or a rule that panics, is
/// a systemic fault and is returned as `Err` instead of a violation.
pub fn validate_options_with_rule_set(
    options: &Value,
    rule_set: &OptionRuleSet,
) -> GuardResult<Vec<ValidationError>> {
    let Some(map) = options.as_object() else {
        let found = json_kind(options);
        warn!(found, "options payload is not an object");
        return Err(GuardError::OptionsNotObject { found });
    };

    let mut errors = Vec::new();
    for rule in rule_set.rules() {
        let meta = rule.metadata();
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.validate(map)));
        match outcome {
            Ok(found) => {
                debug!(
                    rule = meta.rule_id,
                    violations = found.len(),
                    "option rule finished"
                );
                errors.extend(found);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(rule = meta.rule_id, %message, "option rule panicked");
                return Err(GuardError::RuleFault {
                    rule: meta.rule_id.to_string(),
                    message,
                });
            }
        }
    }

    Ok(errors)
}

/// Completion-callback form of [`validate_options_with_config`].
///
/// `done` is invoked exactly once, before this function returns: with
/// `(None, violations)` on success (the list may be empty) or
/// `(Some(fault), [])` on a systemic fault.
pub fn validate_options_with<F>(options: &Value, config: &GuardConfig, done: F)
where
    F: FnOnce(Option<GuardError>, Vec<ValidationError>),
{
    match validate_options_with_config(options, config) {
        Ok(errors) => done(None, errors),
        Err(fault) => done(Some(fault), Vec::new()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{OptionRule, RuleMetadata};
    use proptest::prelude::*;
    use serde_json::{Map, json};

    fn valid_options() -> Value {
        json!({
            "url": {"value": "https://opencti.example"},
            "apiKey": {"value": "0f1e2d3c"},
            "deletionPermissions": {"value": [{"value": "indicators"}]},
            "fieldRestrictions": {"value": ["score_required", "markings_enabled"]},
            "defaultSubmissionValues": {"value": ["score_50", "confidence_high"]},
            "searchBehavior": {"value": ["include_related", "sort_by_score"]},
            "enableLinking": {"value": true}
        })
    }

    #[test]
    fn test_valid_options_produce_no_errors() {
        assert_eq!(validate_options(&valid_options()).unwrap(), vec![]);
    }

    #[test]
    fn test_trailing_double_slash_scenario() {
        let errors = validate_options(&json!({
            "url": {"value": "https://x//"},
            "apiKey": {"value": "k"}
        }))
        .unwrap();
        assert_eq!(
            errors,
            vec![ValidationError::new("url", "Your Url must not end with a //")]
        );
    }

    #[test]
    fn test_errors_follow_rule_order() {
        let errors = validate_options(&json!({
            "url": "https://x//",
            "deletionPermissions": ["reports"],
            "fieldRestrictions": ["score_required", "score_disabled"],
            "defaultSubmissionValues": ["score_25", "score_50"],
            "searchBehavior": "sort_by_date",
            "enableLinking": "yes"
        }))
        .unwrap();

        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "apiKey",
                "url",
                "deletionPermissions",
                "fieldRestrictions",
                "defaultSubmissionValues",
                "searchBehavior",
                "enableLinking",
            ]
        );
    }

    #[test]
    fn test_missing_url_reported_once() {
        let errors = validate_options(&json!({"apiKey": "k"})).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "url");
        assert_eq!(errors[0].message, "You must provide a valid OpenCTI URL");
    }

    #[test]
    fn test_non_object_is_systemic() {
        for payload in [json!(null), json!([]), json!("url")] {
            let result = validate_options(&payload);
            assert!(
                matches!(result, Err(GuardError::OptionsNotObject { .. })),
                "{payload}"
            );
        }
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let mut config = GuardConfig::default();
        config.rules_mut().disabled_rules = vec!["OPT-001".to_string()];
        let errors = validate_options_with_config(&json!({}), &config).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unknown_disabled_rule_is_ignored() {
        let mut config = GuardConfig::default();
        config.rules_mut().disabled_rules = vec!["OPT-999".to_string()];
        let errors = validate_options_with_config(&valid_options(), &config).unwrap();
        assert!(errors.is_empty());
    }

    struct PanickingRule;

    impl OptionRule for PanickingRule {
        fn metadata(&self) -> RuleMetadata {
            RuleMetadata {
                name: self.name(),
                rule_id: "OPT-900",
            }
        }

        fn validate(&self, _options: &Map<String, Value>) -> Vec<ValidationError> {
            panic!("rule exploded")
        }
    }

    fn panicking_rule() -> Box<dyn OptionRule> {
        Box::new(PanickingRule)
    }

    #[test]
    fn test_rule_panic_becomes_rule_fault() {
        let set = OptionRuleSet::builder()
            .with_defaults()
            .register(panicking_rule)
            .build();
        match validate_options_with_rule_set(&valid_options(), &set) {
            Err(GuardError::RuleFault { rule, message }) => {
                assert_eq!(rule, "OPT-900");
                assert_eq!(message, "rule exploded");
            }
            other => panic!("expected RuleFault, got {other:?}"),
        }
    }

    #[test]
    fn test_callback_invoked_once_with_violations() {
        let mut calls = 0;
        let mut seen = Vec::new();
        validate_options_with(&json!({"url": "u//"}), &GuardConfig::default(), |err, errors| {
            calls += 1;
            assert!(err.is_none());
            seen = errors;
        });
        assert_eq!(calls, 1);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_callback_receives_systemic_fault() {
        let mut fault = None;
        let mut count = usize::MAX;
        validate_options_with(&json!(42), &GuardConfig::default(), |err, errors| {
            fault = err;
            count = errors.len();
        });
        assert!(matches!(fault, Some(GuardError::OptionsNotObject { found: "number" })));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_panic_message_payloads() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic payload");
    }

    fn arb_option_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z_/:.]{0,16}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                inner.prop_map(|v| json!({"value": v})),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn validator_always_resolves_for_objects(
            url in arb_option_value(),
            api_key in arb_option_value(),
            deletion in arb_option_value(),
            restrictions in arb_option_value(),
            defaults in arb_option_value(),
            search in arb_option_value(),
            linking in arb_option_value(),
        ) {
            let options = json!({
                "url": url,
                "apiKey": api_key,
                "deletionPermissions": deletion,
                "fieldRestrictions": restrictions,
                "defaultSubmissionValues": defaults,
                "searchBehavior": search,
                "enableLinking": linking,
            });
            prop_assert!(validate_options(&options).is_ok());
        }

        #[test]
        fn clean_strings_contribute_no_string_or_url_errors(
            url in "https://[a-z]{1,10}\\.example(/[a-z]{1,5})?",
            api_key in "[a-zA-Z0-9]{1,32}",
            wrap in any::<bool>(),
        ) {
            let (url, api_key) = if wrap {
                (json!({"value": url}), json!({"value": api_key}))
            } else {
                (json!(url), json!(api_key))
            };
            let errors = validate_options(&json!({"url": url, "apiKey": api_key})).unwrap();
            prop_assert!(errors.is_empty());
        }
    }
}
