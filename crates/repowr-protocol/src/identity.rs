//! Identity (profile) sub-schema of the JSON grammar.

use crate::config::ProtocolConfig;
use crate::error::Rejection;
use crate::json::{describe, integer_value};
use crate::message::{IdentityMessage, SourceFormat};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Validate an identity object whose `type` is `identity`.
///
/// `nickname` may be empty. `links` is only checked to be an object; its
/// entries are left for display code to interpret.
pub fn parse_identity(
    obj: &Map<String, Value>,
    config: &ProtocolConfig,
) -> Result<IdentityMessage, Rejection> {
    let nickname = obj
        .get("nickname")
        .ok_or(Rejection::FieldMissing { field: "nickname" })?;
    let bio = obj
        .get("bio")
        .ok_or(Rejection::FieldMissing { field: "bio" })?;

    let nickname = required_str("nickname", nickname)?;
    let bio = required_str("bio", bio)?;
    config.check_text_len("bio", bio, config.max_bio_chars)?;

    let skills = string_list(obj, "skills")?;
    let languages = string_list(obj, "languages")?;

    let birth_year = match obj.get("birth_year").or_else(|| obj.get("birthYear")) {
        None => None,
        Some(value) => {
            let year = integer_value("birth_year", value)?;
            if year < config.min_birth_year || year > config.max_birth_year {
                return Err(Rejection::FieldOutOfRange {
                    field: "birth_year",
                    detail: format!(
                        "expected {}..={}, got {year}",
                        config.min_birth_year, config.max_birth_year
                    ),
                });
            }
            Some(year)
        }
    };

    let links = match obj.get("links") {
        None => None,
        Some(Value::Object(map)) => Some(
            map.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        ),
        Some(other) => {
            return Err(Rejection::FieldTypeMismatch {
                field: "links",
                expected: "an object",
                found: describe(other).to_string(),
            });
        }
    };

    Ok(IdentityMessage {
        nickname: nickname.to_string(),
        bio: bio.to_string(),
        skills,
        languages,
        birth_year,
        links,
        source_format: SourceFormat::Json,
    })
}

fn required_str<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, Rejection> {
    value.as_str().ok_or_else(|| Rejection::FieldTypeMismatch {
        field,
        expected: "a string",
        found: describe(value).to_string(),
    })
}

/// One non-string element rejects the whole list.
fn string_list(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, Rejection> {
    let Some(value) = obj.get(field) else {
        return Ok(None);
    };
    let items = value.as_array().ok_or_else(|| Rejection::FieldTypeMismatch {
        field,
        expected: "an array of strings",
        found: describe(value).to_string(),
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| Rejection::FieldTypeMismatch {
                    field,
                    expected: "an array of strings",
                    found: format!("an element that is {}", describe(item)),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
