//! Rejection reasons for memos that do not carry usable protocol data.

/// Why a memo was rejected.
///
/// Every variant is local and recoverable: a rejected memo only means the
/// transfer carried no protocol data. The `Display` text is the
/// human-readable reason surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The memo does not have the shape of either grammar.
    #[error("{0}")]
    MalformedGrammar(String),

    /// The memo looked like JSON but did not parse.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// The JSON `protocol` field names something else.
    #[error("unsupported protocol: {found}")]
    UnsupportedProtocol { found: String },

    #[error("missing required field '{field}'")]
    FieldMissing { field: &'static str },

    #[error("field '{field}' must be {expected}, got {found}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Numeric bounds or string length bounds.
    #[error("field '{field}' out of range: {detail}")]
    FieldOutOfRange { field: &'static str, detail: String },

    #[error("unsupported value for '{field}': {value} (allowed: {allowed})")]
    UnsupportedEnumValue {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("field '{field}' is not a well-formed http(s) URL: {value}")]
    MalformedUrl { field: &'static str, value: String },
}

impl Rejection {
    /// Stable snake_case class name for machine consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedGrammar(_) => "malformed_grammar",
            Self::MalformedJson(_) => "malformed_json",
            Self::UnsupportedProtocol { .. } => "unsupported_protocol",
            Self::FieldMissing { .. } => "field_missing",
            Self::FieldTypeMismatch { .. } => "field_type_mismatch",
            Self::FieldOutOfRange { .. } => "field_out_of_range",
            Self::UnsupportedEnumValue { .. } => "unsupported_enum_value",
            Self::MalformedUrl { .. } => "malformed_url",
        }
    }

    /// The field the rejection is about, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::FieldMissing { field }
            | Self::FieldTypeMismatch { field, .. }
            | Self::FieldOutOfRange { field, .. }
            | Self::UnsupportedEnumValue { field, .. }
            | Self::MalformedUrl { field, .. } => Some(field),
            Self::UnsupportedProtocol { .. } => Some("protocol"),
            Self::MalformedGrammar(_) | Self::MalformedJson(_) => None,
        }
    }
}
