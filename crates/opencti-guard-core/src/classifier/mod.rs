//! Runtime error classification.
//!
//! Turns a caught error into user-facing guidance. Classification is a
//! two-stage match on the error message:
//!
//! 1. [`is_user_configurable_error`]: does the message match any phrase the
//!    user can fix through configuration (credentials, URL, network, TLS)?
//! 2. [`classify`]: pick the first matching category and attach its message,
//!    required action, remediation steps, and implicated option keys.
//!
//! Errors that fail stage 1 get an opaque "contact support" response; the raw
//! message is always kept in `technical_detail`.

pub mod phrases;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::keys;
use crate::rules::short_type_name;
use phrases::{CATEGORY_PHRASES, USER_CONFIGURABLE_PHRASES, matches_any};

/// An error as handed over by the integration runtime.
///
/// Mirrors a JavaScript `Error`: `message` is required, `type` and `stack`
/// are optional diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLike {
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorLike {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            stack: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture a Rust error.
    ///
    /// `message` is the error's `Display`, `type` the unqualified type name,
    /// and `stack` the `source()` chain, one cause per line.
    pub fn from_error<E: std::error::Error + 'static>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            kind: Some(short_type_name::<E>().to_string()),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

/// Classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Authentication,
    BadUrl,
    ConnectionRefused,
    Tls,
    Timeout,
    #[serde(rename = "generic-user-configurable")]
    GenericConfigurable,
    #[serde(rename = "non-user-configurable")]
    NonConfigurable,
}

impl ErrorCategory {
    pub fn is_user_configurable(self) -> bool {
        !matches!(self, ErrorCategory::NonConfigurable)
    }
}

/// Fixed guidance attached to a category.
struct Guidance {
    user_message: &'static str,
    action_required: &'static str,
    steps: &'static [&'static str],
    config_fields: &'static [&'static str],
}

const UPDATE_CONFIGURATION: &str = "Update your OpenCTI configuration";

fn guidance_for(category: ErrorCategory) -> Guidance {
    match category {
        ErrorCategory::Authentication => Guidance {
            user_message: "Authentication with OpenCTI failed. The API key is missing, \
                           invalid, or expired.",
            action_required: UPDATE_CONFIGURATION,
            steps: &[
                "Log in to OpenCTI and open your profile settings",
                "Copy your API access token, or generate a new one",
                "Paste the token into the API Key option and save",
                "Confirm the account is allowed to read and create indicators and observables",
            ],
            config_fields: &[keys::API_KEY],
        },
        ErrorCategory::BadUrl => Guidance {
            user_message: "The OpenCTI server could not be found at the configured URL.",
            action_required: "Verify your OpenCTI URL",
            steps: &[
                "Check the URL option for typos",
                "Include the protocol, for example https://opencti.example.com",
                "Remove any trailing path such as /graphql",
                "Confirm the hostname resolves from the integration server",
            ],
            config_fields: &[keys::URL],
        },
        ErrorCategory::ConnectionRefused => Guidance {
            user_message: "The OpenCTI server refused the connection.",
            action_required: "Check that OpenCTI is running and reachable",
            steps: &[
                "Confirm the OpenCTI platform is running",
                "Check the port in the URL option",
                "Make sure firewalls and proxies allow traffic from the integration server",
            ],
            config_fields: &[keys::URL],
        },
        ErrorCategory::Tls => Guidance {
            user_message: "A secure connection to OpenCTI could not be established because \
                           of a certificate problem.",
            action_required: "Review your OpenCTI TLS settings",
            steps: &[
                "Check that the OpenCTI certificate is valid and not expired",
                "If OpenCTI uses a self-signed or internal CA certificate, add that CA to \
                 the integration server's trust store",
                "Make sure the URL hostname matches the certificate",
            ],
            config_fields: &[keys::URL],
        },
        ErrorCategory::Timeout => Guidance {
            user_message: "The request to OpenCTI timed out.",
            action_required: "Check network connectivity to OpenCTI",
            steps: &[
                "Confirm the OpenCTI server is responsive",
                "Check network latency between the integration server and OpenCTI",
                "Retry the search, and contact your OpenCTI administrator if it keeps failing",
            ],
            config_fields: &[keys::URL],
        },
        ErrorCategory::GenericConfigurable => Guidance {
            user_message: "OpenCTI rejected the request because of a configuration problem.",
            action_required: "Review your OpenCTI configuration",
            steps: &[
                "Verify the URL option points at your OpenCTI platform",
                "Verify the API Key option holds a valid token",
            ],
            config_fields: &[keys::URL, keys::API_KEY],
        },
        ErrorCategory::NonConfigurable => Guidance {
            user_message: "An unexpected error occurred while communicating with OpenCTI.",
            action_required: "Contact support",
            steps: &[],
            config_fields: &[],
        },
    }
}

/// User-facing classification of a runtime error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub is_user_configurable: bool,
    pub user_message: String,
    pub technical_detail: String,
    pub action_required: String,
    pub specific_guidance: Vec<String>,
    pub config_fields: Vec<String>,
}

/// Stage 1: can the user fix this through configuration?
pub fn is_user_configurable_error(error: &ErrorLike) -> bool {
    matches_any(&error.message.to_lowercase(), USER_CONFIGURABLE_PHRASES)
}

/// Partial or cached results must not be shown next to this error.
///
/// A configuration fault makes any data fetched alongside it unreliable.
pub fn should_suppress_results(error: &ErrorLike) -> bool {
    is_user_configurable_error(error)
}

/// Pick the category for an error message.
pub fn categorize(error: &ErrorLike) -> ErrorCategory {
    if !is_user_configurable_error(error) {
        return ErrorCategory::NonConfigurable;
    }

    let lowered = error.message.to_lowercase();
    CATEGORY_PHRASES
        .iter()
        .find(|(_, phrases)| matches_any(&lowered, phrases))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::GenericConfigurable)
}

/// Stage 2: build the user-facing classification for an error.
pub fn classify(error: &ErrorLike) -> ClassifiedError {
    let category = categorize(error);
    debug!(?category, "classified runtime error");

    let guidance = guidance_for(category);
    ClassifiedError {
        category,
        is_user_configurable: category.is_user_configurable(),
        user_message: guidance.user_message.to_string(),
        technical_detail: error.message.clone(),
        action_required: guidance.action_required.to_string(),
        specific_guidance: guidance.steps.iter().map(|s| s.to_string()).collect(),
        config_fields: guidance.config_fields.iter().map(|s| s.to_string()).collect(),
    }
}

/// Diagnostics of the original error, kept for support escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub stack: Option<String>,
}

/// UI-ready error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: bool,
    pub user_configurable: bool,
    pub message: String,
    pub action_required: String,
    pub guidance: Vec<String>,
    pub config_fields: Vec<String>,
    pub technical_detail: String,
    pub original_error: OriginalError,
}

/// Classify an error and wrap it for display.
pub fn create_error_response(error: &ErrorLike) -> ErrorResponse {
    let classified = classify(error);
    ErrorResponse {
        error: true,
        user_configurable: classified.is_user_configurable,
        message: classified.user_message,
        action_required: classified.action_required,
        guidance: classified.specific_guidance,
        config_fields: classified.config_fields,
        technical_detail: classified.technical_detail,
        original_error: OriginalError {
            message: error.message.clone(),
            kind: error.kind.clone(),
            stack: error.stack.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_logged_in_message_is_authentication() {
        let classified = classify(&ErrorLike::new("You must be logged in"));
        assert!(classified.is_user_configurable);
        assert_eq!(classified.category, ErrorCategory::Authentication);
        assert_eq!(classified.action_required, "Update your OpenCTI configuration");
        assert!(classified.config_fields.contains(&"apiKey".to_string()));
        assert!(!classified.specific_guidance.is_empty());
    }

    #[test]
    fn test_unexpected_token_is_not_configurable() {
        let classified = classify(&ErrorLike::new("Unexpected token < in JSON at position 0"));
        assert!(!classified.is_user_configurable);
        assert_eq!(classified.category, ErrorCategory::NonConfigurable);
        assert!(classified.specific_guidance.is_empty());
        assert!(classified.config_fields.is_empty());
        assert_eq!(classified.action_required, "Contact support");
        assert_eq!(
            classified.technical_detail,
            "Unexpected token < in JSON at position 0"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_user_configurable_error(&ErrorLike::new("UNAUTHORIZED")));
        assert_eq!(
            categorize(&ErrorLike::new("connect ECONNREFUSED 10.0.0.1:443")),
            ErrorCategory::ConnectionRefused
        );
    }

    #[test]
    fn test_category_per_family() {
        let cases = [
            ("getaddrinfo ENOTFOUND opencti.local", ErrorCategory::BadUrl),
            ("socket hang up", ErrorCategory::ConnectionRefused),
            ("self signed certificate in certificate chain", ErrorCategory::Tls),
            ("unable to verify the first certificate", ErrorCategory::Tls),
            ("connect ETIMEDOUT 10.0.0.1:443", ErrorCategory::Timeout),
            ("Request timed out after 30000ms", ErrorCategory::Timeout),
            ("403 Forbidden", ErrorCategory::Authentication),
        ];
        for (message, expected) in cases {
            assert_eq!(categorize(&ErrorLike::new(message)), expected, "{message}");
        }
    }

    #[test]
    fn test_first_category_wins() {
        // Authentication is checked before timeout
        let error = ErrorLike::new("Unauthorized: session timed out");
        assert_eq!(categorize(&error), ErrorCategory::Authentication);
    }

    #[test]
    fn test_url_categories_point_at_url_field() {
        for message in [
            "ENOTFOUND",
            "ECONNREFUSED",
            "certificate has expired",
            "timeout of 30000ms exceeded",
        ] {
            let classified = classify(&ErrorLike::new(message));
            assert_eq!(classified.config_fields, vec!["url".to_string()], "{message}");
        }
    }

    #[test]
    fn test_generic_configurable_guidance() {
        let guidance = guidance_for(ErrorCategory::GenericConfigurable);
        assert_eq!(guidance.config_fields, &["url", "apiKey"]);
        assert!(ErrorCategory::GenericConfigurable.is_user_configurable());
    }

    #[test]
    fn test_should_suppress_results_tracks_stage_one() {
        assert!(should_suppress_results(&ErrorLike::new("Invalid token")));
        assert!(!should_suppress_results(&ErrorLike::new(
            "Cannot read property 'x' of undefined"
        )));
    }

    #[test]
    fn test_internal_errors_mentioning_tls_or_timeout_words_need_support() {
        let messages = [
            "Cannot create observable of type X509-Certificate: missing hashes",
            "Unknown argument \"classless\" on field \"stixCyberObservableAdd\"",
            "Variable \"$input\" got invalid value; field \"ssl_hassle\" not defined",
            "Cannot read properties of undefined (reading 'setTimeout')",
        ];
        for message in messages {
            let error = ErrorLike::new(message);
            let classified = classify(&error);
            assert_eq!(
                classified.category,
                ErrorCategory::NonConfigurable,
                "{message}"
            );
            assert_eq!(classified.action_required, "Contact support");
            assert!(!should_suppress_results(&error), "{message}");
        }
    }

    #[test]
    fn test_narrow_tls_and_timeout_phrases() {
        let cases = [
            ("write EPROTO SSL routines:ssl3_get_record", ErrorCategory::Tls),
            ("Client network socket disconnected before TLS handshake", ErrorCategory::Tls),
            ("timeout of 5000ms exceeded", ErrorCategory::Timeout),
            ("408 Request Timeout", ErrorCategory::Timeout),
        ];
        for (message, expected) in cases {
            assert_eq!(categorize(&ErrorLike::new(message)), expected, "{message}");
        }
    }

    #[test]
    fn test_empty_message_is_not_configurable() {
        assert_eq!(categorize(&ErrorLike::new("")), ErrorCategory::NonConfigurable);
    }

    #[test]
    fn test_error_response_envelope() {
        let error = ErrorLike::new("You must be logged in")
            .with_kind("GraphQLError")
            .with_stack("at query (client.js:10)");
        let response = create_error_response(&error);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"], json!(true));
        assert_eq!(json["userConfigurable"], json!(true));
        assert_eq!(json["actionRequired"], json!("Update your OpenCTI configuration"));
        assert_eq!(json["configFields"], json!(["apiKey"]));
        assert_eq!(json["technicalDetail"], json!("You must be logged in"));
        assert_eq!(
            json["originalError"],
            json!({
                "message": "You must be logged in",
                "type": "GraphQLError",
                "stack": "at query (client.js:10)"
            })
        );
        assert!(json["guidance"].as_array().is_some_and(|g| !g.is_empty()));
    }

    #[test]
    fn test_error_response_non_configurable_keeps_diagnostics() {
        let error = ErrorLike::new("Unexpected token").with_kind("SyntaxError");
        let response = create_error_response(&error);
        assert!(response.error);
        assert!(!response.user_configurable);
        assert_eq!(response.action_required, "Contact support");
        assert!(response.guidance.is_empty());
        assert_eq!(response.original_error.kind.as_deref(), Some("SyntaxError"));
        assert_eq!(response.original_error.stack, None);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["originalError"]["stack"], json!(null));
    }

    #[test]
    fn test_error_like_deserializes_js_shape() {
        let error: ErrorLike = serde_json::from_value(json!({
            "message": "Forbidden",
            "type": "HttpError"
        }))
        .unwrap();
        assert_eq!(error.kind.as_deref(), Some("HttpError"));
        assert_eq!(error.stack, None);
    }

    #[test]
    fn test_error_like_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let error = ErrorLike::from_error(&io);
        assert_eq!(error.message, "connection refused");
        assert_eq!(error.kind.as_deref(), Some("Error"));
        assert_eq!(error.stack, None);
        assert_eq!(categorize(&error), ErrorCategory::ConnectionRefused);
    }

    #[test]
    fn test_error_like_from_error_records_source_chain() {
        let inner = std::io::Error::other("certificate has expired");
        let outer = crate::GuardError::ConfigRead {
            path: std::path::PathBuf::from("a.toml"),
            source: inner,
        };
        let error = ErrorLike::from_error(&outer);
        assert_eq!(error.kind.as_deref(), Some("GuardError"));
        assert_eq!(error.stack.as_deref(), Some("caused by: certificate has expired"));
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        assert_eq!(serde_json::to_value(ErrorCategory::BadUrl).unwrap(), json!("bad-url"));
        assert_eq!(
            serde_json::to_value(ErrorCategory::NonConfigurable).unwrap(),
            json!("non-user-configurable")
        );
        assert_eq!(
            serde_json::to_value(ErrorCategory::GenericConfigurable).unwrap(),
            json!("generic-user-configurable")
        );
    }

    #[test]
    fn test_classified_error_camel_case_keys() {
        let json = serde_json::to_value(classify(&ErrorLike::new(
            "SSL routines:ssl3_get_record:wrong version number",
        ))).unwrap();
        for key in [
            "isUserConfigurable",
            "userMessage",
            "technicalDetail",
            "actionRequired",
            "specificGuidance",
            "configFields",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn classify_never_panics(message in ".*") {
            let _ = create_error_response(&ErrorLike::new(message));
        }

        #[test]
        fn configurable_iff_not_contact_support(message in ".*") {
            let classified = classify(&ErrorLike::new(message));
            prop_assert_eq!(
                classified.is_user_configurable,
                classified.action_required != "Contact support"
            );
        }

        #[test]
        fn stage_one_phrase_anywhere_is_configurable(
            prefix in "[a-zA-Z0-9 ]{0,12}",
            idx in 0..USER_CONFIGURABLE_PHRASES.len(),
            suffix in "[a-zA-Z0-9 ]{0,12}",
        ) {
            let phrase = USER_CONFIGURABLE_PHRASES[idx].to_uppercase();
            let message = format!("{prefix}{phrase}{suffix}");
            let classified = classify(&ErrorLike::new(message));
            prop_assert!(classified.is_user_configurable);
            prop_assert_ne!(classified.category, ErrorCategory::GenericConfigurable);
        }
    }
}
