//! # opencti-guard-core
//!
//! Option validation and error classification for the OpenCTI threat-intel
//! integration.
//!
//! Provides:
//! - Validation of the user-supplied option bag (URL, API key, deletion
//!   permissions, field restrictions, default submission values, search
//!   behavior, linking toggle)
//! - Permission queries over the validated options
//! - Classification of runtime errors into user-configurable categories,
//!   with remediation guidance and a structured error response
//!
//! ```
//! use opencti_guard_core::validate_options;
//! use serde_json::json;
//!
//! let errors = validate_options(&json!({
//!     "url": {"value": "https://opencti.example//"},
//!     "apiKey": {"value": "secret"}
//! }))
//! .unwrap();
//! assert_eq!(errors[0].message, "Your Url must not end with a //");
//! ```

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod options;
pub mod permissions;
pub mod pipeline;
pub mod registry;
pub mod rules;

pub use classifier::{
    ClassifiedError, ErrorCategory, ErrorLike, ErrorResponse, OriginalError, categorize, classify,
    create_error_response, is_user_configurable_error, should_suppress_results,
};
pub use config::{ConfigWarning, GuardConfig, generate_schema};
pub use diagnostics::{GuardError, GuardResult, ValidationError};
pub use permissions::{
    ItemPermissions, has_any_deletion_permissions, is_deletion_allowed, permissions_for_item_type,
};
pub use pipeline::{
    validate_options, validate_options_with, validate_options_with_config,
    validate_options_with_rule_set,
};
pub use registry::{OptionRuleSet, OptionRuleSetBuilder};
pub use rules::{OptionRule, RuleMetadata};
