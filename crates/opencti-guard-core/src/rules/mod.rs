//! Option validation rules

pub mod boolean;
pub mod lists;
pub mod string_fields;
pub mod url;

use crate::diagnostics::ValidationError;
use serde_json::{Map, Value};

/// Extract the short (unqualified) type name from `std::any::type_name`.
///
/// Given a fully-qualified path like `"opencti_guard_core::rules::url::UrlRule"`,
/// returns `"UrlRule"`. For generic types like `"Wrapper<foo::Bar>"`,
/// strips the generic suffix first, yielding `"Wrapper"`.
/// Falls back to the full name when no `::` separator is found.
pub(crate) fn short_type_name<T: ?Sized + 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMetadata {
    /// Rule name, as returned by [`OptionRule::name`].
    pub name: &'static str,
    /// Catalog ID from `opencti_guard_rules::RULES_DATA` (e.g. `"OPT-002"`).
    pub rule_id: &'static str,
}

/// Trait for option rules.
///
/// A rule inspects the option bag and returns every violation it finds. Rules
/// are total: malformed input never panics and never stops other rules from
/// running. Each rule is created by a factory registered in the
/// [`OptionRuleSet`](crate::OptionRuleSet).
pub trait OptionRule: Send + Sync + 'static {
    fn metadata(&self) -> RuleMetadata;

    /// Validate the option bag and return any violations, in report order.
    fn validate(&self, options: &Map<String, Value>) -> Vec<ValidationError>;

    /// Return a short, human-readable name for this rule.
    ///
    /// The default implementation extracts the unqualified struct name
    /// (e.g., `"UrlRule"`).
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}
