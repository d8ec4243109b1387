//! Rule catalog and closed vocabularies for opencti-guard.
//!
//! This crate holds the static data the validation engine works from: the
//! ordered list of option rules and the tag vocabularies accepted by the
//! multi-select options of the OpenCTI integration.
//!
//! # Usage
//!
//! ```
//! use opencti_guard_rules::{FieldRestriction, RULES_DATA};
//!
//! // RULES_DATA is a static array of (rule_id, rule_name) tuples
//! for (id, name) in RULES_DATA {
//!     println!("{}: {}", id, name);
//! }
//!
//! assert_eq!(
//!     FieldRestriction::parse("score_required"),
//!     Some(FieldRestriction::ScoreRequired)
//! );
//! ```
//!
//! # Rule IDs
//!
//! All option rules use the `OPT-xxx` prefix. The order of [`RULES_DATA`] is
//! the order in which rules run and in which their violations are reported.

use std::fmt;

/// Every option rule as `(rule_id, rule_name)`, in execution order.
pub const RULES_DATA: &[(&str, &str)] = &[
    ("OPT-001", "Required string options"),
    ("OPT-002", "URL format"),
    ("OPT-003", "Deletion permissions"),
    ("OPT-004", "Field restrictions"),
    ("OPT-005", "Default submission values"),
    ("OPT-006", "Search behavior"),
    ("OPT-007", "Boolean options"),
];

/// Returns the total number of rules.
pub fn rule_count() -> usize {
    RULES_DATA.len()
}

/// Looks up a rule by ID, returning the name if found.
pub fn get_rule_name(id: &str) -> Option<&'static str> {
    RULES_DATA
        .iter()
        .find(|(rule_id, _)| *rule_id == id)
        .map(|(_, name)| *name)
}

/// Declares a closed vocabulary: a fieldless enum whose variants map 1:1 to
/// wire tags, with `ALL`, `as_str`, `parse` and `Display`.
macro_rules! closed_vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire tag for this value.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            /// Parse a wire tag. Matching is exact and case-sensitive.
            pub fn parse(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// All wire tags joined with `", "`, for messages.
            pub fn valid_tags() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_vocabulary! {
    /// Entity families that can be searched, returned, or deleted.
    ///
    /// Used by both the deletion permissions and the search return type
    /// options.
    pub enum ReturnType {
        Indicators => "indicators",
        Observables => "observables",
    }
}

impl ReturnType {
    /// Map a singular item type (`"indicator"`) to its plural tag.
    ///
    /// Only the exact singular forms are recognized.
    pub fn from_item_type(item_type: &str) -> Option<Self> {
        match item_type {
            "indicator" => Some(ReturnType::Indicators),
            "observable" => Some(ReturnType::Observables),
            _ => None,
        }
    }

    /// The singular item type for this tag (`Indicators` -> `"indicator"`).
    pub const fn item_type(self) -> &'static str {
        match self {
            ReturnType::Indicators => "indicator",
            ReturnType::Observables => "observable",
        }
    }
}

closed_vocabulary! {
    /// Per-field requirements applied to entity submissions.
    pub enum FieldRestriction {
        ScoreRequired => "score_required",
        ScoreDisabled => "score_disabled",
        DescriptionRequired => "description_required",
        DescriptionDisabled => "description_disabled",
        LabelsRequired => "labels_required",
        LabelsDisabled => "labels_disabled",
        MarkingsEnabled => "markings_enabled",
    }
}

impl FieldRestriction {
    /// Restriction pairs that cannot be selected together.
    pub const CONFLICTING_PAIRS: &'static [(FieldRestriction, FieldRestriction)] = &[
        (FieldRestriction::ScoreRequired, FieldRestriction::ScoreDisabled),
        (
            FieldRestriction::DescriptionRequired,
            FieldRestriction::DescriptionDisabled,
        ),
        (FieldRestriction::LabelsRequired, FieldRestriction::LabelsDisabled),
    ];
}

/// Grouping for [`DefaultValue`]; at most one value per category is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultValueCategory {
    Score,
    Confidence,
}

impl DefaultValueCategory {
    pub const ALL: &'static [DefaultValueCategory] =
        &[DefaultValueCategory::Score, DefaultValueCategory::Confidence];

    /// Lowercase noun used in messages.
    pub const fn noun(self) -> &'static str {
        match self {
            DefaultValueCategory::Score => "score",
            DefaultValueCategory::Confidence => "confidence",
        }
    }
}

closed_vocabulary! {
    /// Default score/confidence applied to newly submitted entities.
    pub enum DefaultValue {
        Score25 => "score_25",
        Score50 => "score_50",
        Score75 => "score_75",
        Score100 => "score_100",
        ConfidenceLow => "confidence_low",
        ConfidenceMedium => "confidence_medium",
        ConfidenceHigh => "confidence_high",
        ConfidenceCertain => "confidence_certain",
    }
}

impl DefaultValue {
    pub const fn category(self) -> DefaultValueCategory {
        match self {
            DefaultValue::Score25
            | DefaultValue::Score50
            | DefaultValue::Score75
            | DefaultValue::Score100 => DefaultValueCategory::Score,
            DefaultValue::ConfidenceLow
            | DefaultValue::ConfidenceMedium
            | DefaultValue::ConfidenceHigh
            | DefaultValue::ConfidenceCertain => DefaultValueCategory::Confidence,
        }
    }
}

closed_vocabulary! {
    /// Search tuning flags.
    pub enum SearchBehavior {
        CaseSensitive => "case_sensitive",
        ExactMatchOnly => "exact_match_only",
        IncludeRelated => "include_related",
        SortByDate => "sort_by_date",
        SortByScore => "sort_by_score",
    }
}

impl SearchBehavior {
    /// Only one sort order can be active.
    pub const CONFLICTING_PAIRS: &'static [(SearchBehavior, SearchBehavior)] =
        &[(SearchBehavior::SortByDate, SearchBehavior::SortByScore)];
}
