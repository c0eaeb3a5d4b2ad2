//! JSON grammar: `{"protocol":"repOWR","rating":5,...}`.
//!
//! A `type` of `identity` hands the whole object to the identity parser.
//! Anything else is a rating. Unknown fields are ignored.

use crate::config::ProtocolConfig;
use crate::error::Rejection;
use crate::identity::parse_identity;
use crate::message::{Category, ProtocolMessage, RatingMessage, SourceFormat};
use crate::url::is_well_formed_url;
use serde_json::{Map, Value};

/// `type` value that routes to the identity sub-schema.
pub const IDENTITY_TYPE: &str = "identity";

/// Parse a JSON memo into a rating or identity message.
pub fn parse_json(memo: &str, config: &ProtocolConfig) -> Result<ProtocolMessage, Rejection> {
    let value: Value =
        serde_json::from_str(memo).map_err(|e| Rejection::MalformedJson(e.to_string()))?;
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(Rejection::MalformedGrammar(format!(
                "JSON message must be an object, got {}",
                describe(&other)
            )));
        }
    };

    match obj.get("protocol") {
        None => return Err(Rejection::FieldMissing { field: "protocol" }),
        Some(Value::String(name)) if *name == config.protocol_name => {}
        Some(Value::String(name)) => {
            return Err(Rejection::UnsupportedProtocol {
                found: name.clone(),
            });
        }
        Some(other) => {
            return Err(Rejection::UnsupportedProtocol {
                found: other.to_string(),
            });
        }
    }

    let message_type = obj.get("type").filter(|v| !v.is_null());
    if message_type.and_then(Value::as_str) == Some(IDENTITY_TYPE) {
        return parse_identity(&obj, config).map(ProtocolMessage::Identity);
    }

    parse_rating(&obj, message_type, config).map(ProtocolMessage::Rating)
}

fn parse_rating(
    obj: &Map<String, Value>,
    message_type: Option<&Value>,
    config: &ProtocolConfig,
) -> Result<RatingMessage, Rejection> {
    let rating = obj
        .get("rating")
        .ok_or(Rejection::FieldMissing { field: "rating" })?;
    let rating = config.check_rating(integer_value("rating", rating)?)?;

    let category = message_type.map(parse_category).transpose()?;

    let comment = optional_str(obj, "comment")?;
    if let Some(comment) = comment {
        config.check_text_len("comment", comment, config.max_comment_chars)?;
    }

    let link = optional_str(obj, "link")?;
    if let Some(link) = link
        && !is_well_formed_url(link)
    {
        return Err(Rejection::MalformedUrl {
            field: "link",
            value: link.to_string(),
        });
    }

    let reference = optional_str(obj, "ref")?;

    Ok(RatingMessage {
        protocol: config.protocol_name.clone(),
        rating,
        category,
        comment: comment.map(str::to_string),
        link: link.map(str::to_string),
        reference: reference.map(str::to_string),
        source_format: SourceFormat::Json,
    })
}

fn parse_category(value: &Value) -> Result<Category, Rejection> {
    value
        .as_str()
        .and_then(Category::from_wire)
        .ok_or_else(|| Rejection::UnsupportedEnumValue {
            field: "type",
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            allowed: Category::allowed_list(),
        })
}

/// Read a JSON integer. Numeric strings, floats and booleans are rejected.
pub(crate) fn integer_value(field: &'static str, value: &Value) -> Result<i64, Rejection> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(Rejection::FieldOutOfRange {
                    field,
                    detail: format!("{n} does not fit a 64-bit integer"),
                })
            } else {
                Err(Rejection::FieldTypeMismatch {
                    field,
                    expected: "an integer",
                    found: describe(value).to_string(),
                })
            }
        }
        other => Err(Rejection::FieldTypeMismatch {
            field,
            expected: "an integer",
            found: describe(other).to_string(),
        }),
    }
}

/// Read an optional string field. Present-but-not-a-string is a mismatch.
pub(crate) fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, Rejection> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Rejection::FieldTypeMismatch {
            field,
            expected: "a string",
            found: describe(other).to_string(),
        }),
    }
}

/// Short type description for rejection messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
