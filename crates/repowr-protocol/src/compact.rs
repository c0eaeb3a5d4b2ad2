//! Compact colon grammar: `<PROTOCOL>:<rating>:<comment>:`.
//!
//! The comment may itself contain colons. Only the first colon after the
//! protocol prefix separates rating from comment, and the memo's final
//! character must be a colon.

use crate::config::ProtocolConfig;
use crate::error::Rejection;
use crate::message::{RatingMessage, SourceFormat};
use std::num::IntErrorKind;

/// Parse a compact memo. Rules are checked in order; the first failure wins.
pub fn parse_compact(memo: &str, config: &ProtocolConfig) -> Result<RatingMessage, Rejection> {
    let rest = memo
        .strip_prefix(config.protocol_name.as_str())
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| {
            Rejection::MalformedGrammar(format!(
                "compact message must start with '{}:'",
                config.protocol_name
            ))
        })?;

    if !memo.ends_with(':') {
        return Err(Rejection::MalformedGrammar(
            "compact message must end with ':'".to_string(),
        ));
    }

    // For a bare `<PROTOCOL>:` the prefix colon is also the terminator.
    let interior = rest.strip_suffix(':').unwrap_or(rest);

    let (rating_text, comment) = interior.split_once(':').unwrap_or((interior, ""));
    if rating_text.is_empty() {
        return Err(Rejection::FieldMissing { field: "rating" });
    }

    let rating = config.check_rating(parse_rating_text(rating_text)?)?;
    config.check_text_len("comment", comment, config.max_comment_chars)?;

    Ok(RatingMessage {
        protocol: config.protocol_name.clone(),
        rating,
        category: None,
        comment: (!comment.is_empty()).then(|| comment.to_string()),
        link: None,
        reference: None,
        source_format: SourceFormat::Compact,
    })
}

fn parse_rating_text(text: &str) -> Result<i64, Rejection> {
    text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Rejection::FieldOutOfRange {
            field: "rating",
            detail: format!("{text} does not fit a 64-bit integer"),
        },
        _ => Rejection::FieldTypeMismatch {
            field: "rating",
            expected: "an integer",
            found: format!("'{text}'"),
        },
    })
}
