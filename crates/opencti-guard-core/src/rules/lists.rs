//! Multi-select option rules (OPT-003, OPT-004, OPT-005, OPT-006)
//!
//! Validates:
//! - OPT-003: `deletionPermissions` tags are known entity families
//! - OPT-004: `fieldRestrictions` tags are known and not contradictory
//! - OPT-005: `defaultSubmissionValues` has at most one score and one confidence
//! - OPT-006: `searchBehavior` tags are known and pick one sort order
//!
//! Each list option, when present, must resolve to an array. An empty array
//! means "no restriction" and is always valid. Elements may be bare tags or
//! `{"value": tag}` wrappers.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::{
    diagnostics::ValidationError,
    options::{display_tag, get_resolved, keys, tag_of},
    rules::{OptionRule, RuleMetadata},
};
use opencti_guard_rules::{
    DefaultValue, DefaultValueCategory, FieldRestriction, ReturnType, SearchBehavior,
};
use serde_json::{Map, Value};

/// Static shape of one multi-select option.
struct ListField<T> {
    key: &'static str,
    /// Title-case label used at the start of messages
    label: &'static str,
    /// Plural noun used in the invalid-tag message
    noun: &'static str,
    parse: fn(&str) -> Option<T>,
    valid_tags: fn() -> String,
}

const DELETION_PERMISSIONS: ListField<ReturnType> = ListField {
    key: keys::DELETION_PERMISSIONS,
    label: "Deletion Permissions",
    noun: "deletion permissions",
    parse: ReturnType::parse,
    valid_tags: ReturnType::valid_tags,
};

const FIELD_RESTRICTIONS: ListField<FieldRestriction> = ListField {
    key: keys::FIELD_RESTRICTIONS,
    label: "Field Restrictions",
    noun: "field restrictions",
    parse: FieldRestriction::parse,
    valid_tags: FieldRestriction::valid_tags,
};

const DEFAULT_SUBMISSION_VALUES: ListField<DefaultValue> = ListField {
    key: keys::DEFAULT_SUBMISSION_VALUES,
    label: "Default Submission Values",
    noun: "default submission values",
    parse: DefaultValue::parse,
    valid_tags: DefaultValue::valid_tags,
};

const SEARCH_BEHAVIOR: ListField<SearchBehavior> = ListField {
    key: keys::SEARCH_BEHAVIOR,
    label: "Search Behavior",
    noun: "search behavior options",
    parse: SearchBehavior::parse,
    valid_tags: SearchBehavior::valid_tags,
};

/// Resolve a list option and check its tags against the vocabulary.
///
/// Returns the recognized values, deduplicated in first-seen order, or `None`
/// when the option is absent or is not an array. A non-array pushes a type
/// error and stops further checks for the field.
fn collect_tags<T: Copy + Eq + Hash>(
    options: &Map<String, Value>,
    field: &ListField<T>,
    errors: &mut Vec<ValidationError>,
) -> Option<Vec<T>> {
    let value = get_resolved(options, field.key)?;

    let Some(items) = value.as_array() else {
        errors.push(ValidationError::new(
            field.key,
            format!("{} must be a list of values", field.label),
        ));
        return None;
    };

    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    let mut invalid = Vec::new();

    for item in items {
        match tag_of(item).and_then(field.parse) {
            Some(parsed) => {
                if seen.insert(parsed) {
                    selected.push(parsed);
                }
            }
            None => invalid.push(display_tag(item)),
        }
    }

    if !invalid.is_empty() {
        errors.push(ValidationError::new(
            field.key,
            format!(
                "Invalid {}: {}. Valid values are: {}",
                field.noun,
                invalid.join(", "),
                (field.valid_tags)()
            ),
        ));
    }

    Some(selected)
}

/// Push one error per conflicting pair present in `selected`.
fn check_conflicting_pairs<T: Copy + Eq + Display>(
    selected: &[T],
    pairs: &[(T, T)],
    field: &ListField<T>,
    errors: &mut Vec<ValidationError>,
) {
    for (a, b) in pairs {
        if selected.contains(a) && selected.contains(b) {
            errors.push(ValidationError::new(
                field.key,
                format!("{} cannot include both '{}' and '{}'", field.label, a, b),
            ));
        }
    }
}

pub struct DeletionPermissionsRule;

impl OptionRule for DeletionPermissionsRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: "OPT-003",
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        collect_tags(options, &DELETION_PERMISSIONS, &mut errors);
        errors
    }
}

pub struct FieldRestrictionsRule;

impl OptionRule for FieldRestrictionsRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: "OPT-004",
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(selected) = collect_tags(options, &FIELD_RESTRICTIONS, &mut errors) {
            check_conflicting_pairs(
                &selected,
                FieldRestriction::CONFLICTING_PAIRS,
                &FIELD_RESTRICTIONS,
                &mut errors,
            );
        }
        errors
    }
}

pub struct DefaultSubmissionValuesRule;

impl OptionRule for DefaultSubmissionValuesRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: "OPT-005",
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(selected) = collect_tags(options, &DEFAULT_SUBMISSION_VALUES, &mut errors) {
            for &category in DefaultValueCategory::ALL {
                let count = selected.iter().filter(|v| v.category() == category).count();
                if count > 1 {
                    errors.push(ValidationError::new(
                        DEFAULT_SUBMISSION_VALUES.key,
                        format!(
                            "Only one default {} value can be selected",
                            category.noun()
                        ),
                    ));
                }
            }
        }
        errors
    }
}

pub struct SearchBehaviorRule;

impl OptionRule for SearchBehaviorRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            name: self.name(),
            rule_id: "OPT-006",
        }
    }

    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(selected) = collect_tags(options, &SEARCH_BEHAVIOR, &mut errors) {
            check_conflicting_pairs(
                &selected,
                SearchBehavior::CONFLICTING_PAIRS,
                &SEARCH_BEHAVIOR,
                &mut errors,
            );
        }
        errors
    }
}
