//! Protocol constants.
//!
//! Every parser reads its bounds from one immutable [`ProtocolConfig`]
//! handed to it at construction. Nothing in this crate reads ambient state.

use crate::error::Rejection;
use serde::{Deserialize, Serialize};

/// Literal protocol name carried by every message.
pub const PROTOCOL_NAME: &str = "repOWR";

/// Bounds and literals for the repOWR wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Literal that opens compact memos and fills the JSON `protocol` field.
    pub protocol_name: String,
    pub min_rating: u8,
    pub max_rating: u8,
    /// Maximum comment length, in characters (not bytes).
    pub max_comment_chars: usize,
    /// Maximum identity bio length, in characters.
    pub max_bio_chars: usize,
    pub min_birth_year: i64,
    pub max_birth_year: i64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            protocol_name: PROTOCOL_NAME.to_string(),
            min_rating: 1,
            max_rating: 5,
            max_comment_chars: 500,
            max_bio_chars: 200,
            min_birth_year: 1900,
            max_birth_year: 2020,
        }
    }
}

impl ProtocolConfig {
    /// Check a parsed rating against the configured bounds.
    pub fn check_rating(&self, value: i64) -> Result<u8, Rejection> {
        let out_of_range = || Rejection::FieldOutOfRange {
            field: "rating",
            detail: format!(
                "expected {}..={}, got {value}",
                self.min_rating, self.max_rating
            ),
        };
        if value < i64::from(self.min_rating) || value > i64::from(self.max_rating) {
            return Err(out_of_range());
        }
        u8::try_from(value).map_err(|_| out_of_range())
    }

    /// Check a free-text field against a character budget.
    pub fn check_text_len(
        &self,
        field: &'static str,
        text: &str,
        max_chars: usize,
    ) -> Result<(), Rejection> {
        let len = text.chars().count();
        if len > max_chars {
            return Err(Rejection::FieldOutOfRange {
                field,
                detail: format!("{len} characters (max {max_chars})"),
            });
        }
        Ok(())
    }
}
