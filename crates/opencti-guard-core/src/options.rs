//! Option payload normalization.
//!
//! The host configuration system hands every option over wrapped as
//! `{"value": V}`, while tests and direct callers pass the bare `V`. Rules
//! call [`resolve`] before any typed check so they only ever see `V`.

use serde_json::{Map, Value};

/// Option keys, as supplied by the host.
pub mod keys {
    pub const URL: &str = "url";
    pub const API_KEY: &str = "apiKey";
    pub const DELETION_PERMISSIONS: &str = "deletionPermissions";
    pub const FIELD_RESTRICTIONS: &str = "fieldRestrictions";
    pub const DEFAULT_SUBMISSION_VALUES: &str = "defaultSubmissionValues";
    pub const SEARCH_BEHAVIOR: &str = "searchBehavior";
    pub const ENABLE_LINKING: &str = "enableLinking";
}

/// Unwrap a `{"value": V}` wrapper to `V`; any other value passes through.
///
/// A wrapper object whose `value` member is missing is not a wrapper and is
/// returned unchanged.
pub fn resolve(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("value").unwrap_or(value),
        _ => value,
    }
}

/// Look up and resolve an option. `None` means the key is absent.
pub fn get_resolved<'a>(options: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    options.get(key).map(resolve)
}

/// Resolve an option as a string, if it is one.
pub fn get_str<'a>(options: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    get_resolved(options, key).and_then(Value::as_str)
}

/// The string tag of a list element, after unwrapping.
pub fn tag_of(element: &Value) -> Option<&str> {
    resolve(element).as_str()
}

/// Render a list element for an "invalid value" message.
///
/// String tags are shown bare; anything else is shown as compact JSON.
pub fn display_tag(element: &Value) -> String {
    let resolved = resolve(element);
    match resolved.as_str() {
        Some(tag) => tag.to_string(),
        None => resolved.to_string(),
    }
}

/// Short name of a JSON value's kind, for error messages and logs.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
