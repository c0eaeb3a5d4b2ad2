//! Validated protocol messages and the validation outcome.

use crate::error::Rejection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;

/// Which grammar a message was read from. Provenance only, not protocol data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Compact,
    Json,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

/// Rating category (the JSON `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Deal,
    Service,
    Product,
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Deal, Self::Service, Self::Product, Self::General];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deal => "deal",
            Self::Service => "service",
            Self::Product => "product",
            Self::General => "general",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Comma-separated wire names, for rejection messages.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingMessage {
    pub protocol: String,
    pub rating: u8,
    /// Stored as sent: absent stays absent, it is not coerced to `general`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(
        default,
        rename = "ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<String>,
    pub source_format: SourceFormat,
}

impl RatingMessage {
    /// Category used for matching and statistics.
    pub fn effective_category(&self) -> Category {
        self.category.unwrap_or(Category::General)
    }
}

/// A validated identity (profile) assertion. Only the JSON form exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityMessage {
    pub nickname: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i64>,
    /// Platform name -> link. Values are checked at display time, not here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, Value>>,
    pub source_format: SourceFormat,
}

/// Either kind of accepted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolMessage {
    Rating(RatingMessage),
    Identity(IdentityMessage),
}

impl ProtocolMessage {
    pub fn source_format(&self) -> SourceFormat {
        match self {
            Self::Rating(m) => m.source_format,
            Self::Identity(m) => m.source_format,
        }
    }

    pub fn as_rating(&self) -> Option<&RatingMessage> {
        match self {
            Self::Rating(m) => Some(m),
            Self::Identity(_) => None,
        }
    }

    pub fn as_identity(&self) -> Option<&IdentityMessage> {
        match self {
            Self::Identity(m) => Some(m),
            Self::Rating(_) => None,
        }
    }
}

/// Result of validating one memo. Never both accepted and rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(ProtocolMessage),
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn message(&self) -> Option<&ProtocolMessage> {
        match self {
            Self::Accepted(m) => Some(m),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Accepted(_) => None,
        }
    }

    /// Human-readable rejection reason, if rejected.
    pub fn reason(&self) -> Option<String> {
        self.rejection().map(ToString::to_string)
    }

    pub fn into_result(self) -> Result<ProtocolMessage, Rejection> {
        match self {
            Self::Accepted(m) => Ok(m),
            Self::Rejected(r) => Err(r),
        }
    }

    /// Stable JSON rendering used by the CLI and fixture vectors.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Accepted(message) => json!({
                "outcome": "accepted",
                "message": message,
            }),
            Self::Rejected(rejection) => json!({
                "outcome": "rejected",
                "kind": rejection.kind(),
                "reason": rejection.to_string(),
            }),
        }
    }
}

impl From<Result<ProtocolMessage, Rejection>> for ValidationOutcome {
    fn from(result: Result<ProtocolMessage, Rejection>) -> Self {
        match result {
            Ok(m) => Self::Accepted(m),
            Err(r) => Self::Rejected(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_are_case_sensitive() {
        assert_eq!(Category::from_wire("deal"), Some(Category::Deal));
        assert_eq!(Category::from_wire("Deal"), None);
        assert_eq!(Category::from_wire("identity"), None);
        assert_eq!(Category::allowed_list(), "deal, service, product, general");
    }

    #[test]
    fn rating_serializes_reference_under_wire_key() {
        let message = RatingMessage {
            protocol: "repOWR".into(),
            rating: 4,
            category: None,
            comment: None,
            link: None,
            reference: Some("r1".into()),
            source_format: SourceFormat::Json,
        };
        let value = serde_json::to_value(ProtocolMessage::Rating(message)).expect("serialize");
        assert_eq!(
            value,
            json!({
                "kind": "rating",
                "protocol": "repOWR",
                "rating": 4,
                "ref": "r1",
                "source_format": "json"
            })
        );
    }

    #[test]
    fn absent_category_counts_as_general_without_being_stored() {
        let message = RatingMessage {
            protocol: "repOWR".into(),
            rating: 3,
            category: None,
            comment: None,
            link: None,
            reference: None,
            source_format: SourceFormat::Compact,
        };
        assert_eq!(message.effective_category(), Category::General);
        let value = serde_json::to_value(&message).expect("serialize");
        assert!(value.get("category").is_none());
    }

    #[test]
    fn rejected_outcome_renders_kind_and_reason() {
        let outcome = ValidationOutcome::Rejected(Rejection::FieldMissing { field: "bio" });
        assert!(!outcome.is_accepted());
        assert_eq!(
            outcome.to_json(),
            json!({
                "outcome": "rejected",
                "kind": "field_missing",
                "reason": "missing required field 'bio'"
            })
        );
    }
}
