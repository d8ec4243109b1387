//! Option rule set and factory functions.

use std::collections::HashSet;

use crate::rules::OptionRule;
use crate::rules::boolean::BooleanOptionsRule;
use crate::rules::lists::{
    DefaultSubmissionValuesRule, DeletionPermissionsRule, FieldRestrictionsRule,
    SearchBehaviorRule,
};
use crate::rules::string_fields::StringFieldsRule;
use crate::rules::url::UrlRule;

/// Factory function type that creates rule instances.
pub type RuleFactory = fn() -> Box<dyn OptionRule>;

/// Ordered set of option rules.
///
/// Rules run in registration order and their violations are concatenated in
/// the same order, so the order of the built-in defaults is part of the output
/// contract. Most callers should use [`OptionRuleSet::with_defaults`].
pub struct OptionRuleSet {
    factories: Vec<RuleFactory>,
    rule_ids: Vec<&'static str>,
    disabled_rules: HashSet<String>,
}

impl OptionRuleSet {
    /// Create an empty set with no registered rules.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            rule_ids: Vec::new(),
            disabled_rules: HashSet::new(),
        }
    }

    /// Create a set pre-populated with the built-in rules.
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        for &factory in DEFAULTS {
            set.register(factory);
        }
        set
    }

    /// Create an [`OptionRuleSetBuilder`] for ergonomic construction.
    ///
    /// # Example
    ///
    /// ```
    /// use opencti_guard_core::OptionRuleSet;
    ///
    /// let set = OptionRuleSet::builder()
    ///     .with_defaults()
    ///     .without_rule("OPT-007")
    ///     .build();
    /// assert_eq!(set.rules().len(), 6);
    /// ```
    pub fn builder() -> OptionRuleSetBuilder {
        OptionRuleSetBuilder::new()
    }

    /// Append a rule factory.
    pub fn register(&mut self, factory: RuleFactory) {
        // Cache the rule ID once so disabled rules are filtered before
        // factory instantiation.
        let rule_id = factory().metadata().rule_id;
        self.factories.push(factory);
        self.rule_ids.push(rule_id);
    }

    /// Disable a rule by catalog ID (e.g. `"OPT-002"`).
    pub fn disable_rule(&mut self, rule_id: impl Into<String>) {
        self.disabled_rules.insert(rule_id.into());
    }

    /// Return the number of registered factories, enabled or not.
    pub fn total_factory_count(&self) -> usize {
        self.factories.len()
    }

    /// Build fresh instances of every enabled rule, in registration order.
    pub fn rules(&self) -> Vec<Box<dyn OptionRule>> {
        self.factories
            .iter()
            .zip(self.rule_ids.iter())
            .filter(|(_, id)| !self.disabled_rules.contains(**id))
            .map(|(factory, _)| factory())
            .collect()
    }
}

impl Default for OptionRuleSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builder for constructing an [`OptionRuleSet`].
pub struct OptionRuleSetBuilder {
    entries: Vec<RuleFactory>,
    disabled_rules: HashSet<String>,
}

impl OptionRuleSetBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            disabled_rules: HashSet::new(),
        }
    }

    /// Add all built-in rules.
    ///
    /// This method is additive: calling it twice registers every rule twice.
    pub fn with_defaults(&mut self) -> &mut Self {
        self.entries.extend_from_slice(DEFAULTS);
        self
    }

    /// Append a single rule factory.
    pub fn register(&mut self, factory: RuleFactory) -> &mut Self {
        self.entries.push(factory);
        self
    }

    /// Mark a rule ID as disabled in the built set.
    pub fn without_rule(&mut self, rule_id: &str) -> &mut Self {
        self.disabled_rules.insert(rule_id.to_string());
        self
    }

    /// Produce an [`OptionRuleSet`] from this builder.
    ///
    /// Drains the builder's disabled set, so a second `build()` produces a
    /// set with no disabled rules.
    pub fn build(&mut self) -> OptionRuleSet {
        let mut set = OptionRuleSet {
            factories: Vec::new(),
            rule_ids: Vec::new(),
            disabled_rules: std::mem::take(&mut self.disabled_rules),
        };
        for &factory in &self.entries {
            set.register(factory);
        }
        set
    }
}

// ============================================================================
// Built-in defaults
// ============================================================================

const DEFAULTS: &[RuleFactory] = &[
    string_fields_rule,
    url_rule,
    deletion_permissions_rule,
    field_restrictions_rule,
    default_submission_values_rule,
    search_behavior_rule,
    boolean_options_rule,
];

fn string_fields_rule() -> Box<dyn OptionRule> {
    Box::new(StringFieldsRule)
}

fn url_rule() -> Box<dyn OptionRule> {
    Box::new(UrlRule)
}

fn deletion_permissions_rule() -> Box<dyn OptionRule> {
    Box::new(DeletionPermissionsRule)
}

fn field_restrictions_rule() -> Box<dyn OptionRule> {
    Box::new(FieldRestrictionsRule)
}

fn default_submission_values_rule() -> Box<dyn OptionRule> {
    Box::new(DefaultSubmissionValuesRule)
}

fn search_behavior_rule() -> Box<dyn OptionRule> {
    Box::new(SearchBehaviorRule)
}

fn boolean_options_rule() -> Box<dyn OptionRule> {
    Box::new(BooleanOptionsRule)
}
