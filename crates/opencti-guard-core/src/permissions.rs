//! Permission queries over the deletion permissions option.
//!
//! These read already-configured options and never fail: missing or
//! malformed permissions simply grant nothing.

use opencti_guard_rules::ReturnType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::{get_resolved, keys, tag_of};

/// What the current configuration allows for one item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPermissions {
    pub can_delete: bool,
    /// Always `true`; editing is not configurable yet.
    pub can_edit: bool,
    /// Always `true`; viewing is not configurable yet.
    pub can_view: bool,
}

/// Resolve the granted deletion targets.
///
/// Unknown tags and non-string elements are skipped.
fn granted_deletions(options: &Value) -> Vec<ReturnType> {
    let Some(map) = options.as_object() else {
        return Vec::new();
    };
    get_resolved(map, keys::DELETION_PERMISSIONS)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(tag_of)
                .filter_map(ReturnType::parse)
                .collect()
        })
        .unwrap_or_default()
}

/// Is deleting an item of `item_type` (singular, e.g. `"indicator"`) allowed?
///
/// `"indicator"` is allowed iff `"indicators"` (bare or `{"value": ...}`
/// wrapped) is listed in `deletionPermissions`. Returns `false` when the
/// option is absent, `null`, not an array, or the item type is unknown.
pub fn is_deletion_allowed(options: &Value, item_type: &str) -> bool {
    let Some(target) = ReturnType::from_item_type(item_type) else {
        return false;
    };
    granted_deletions(options).contains(&target)
}

/// Bundle the permissions for one item type.
pub fn permissions_for_item_type(options: &Value, item_type: &str) -> ItemPermissions {
    ItemPermissions {
        can_delete: is_deletion_allowed(options, item_type),
        can_edit: true,
        can_view: true,
    }
}

/// True if indicators or observables may be deleted.
pub fn has_any_deletion_permissions(options: &Value) -> bool {
    ReturnType::ALL
        .iter()
        .any(|target| is_deletion_allowed(options, target.item_type()))
}
