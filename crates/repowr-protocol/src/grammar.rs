//! Grammar dispatch: decide which parser, if any, a memo belongs to.

use crate::config::ProtocolConfig;
use std::fmt;

/// The two competing memo grammars, plus everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `<PROTOCOL>:<rating>:<comment>:`
    Compact,
    /// A JSON object.
    Json,
    Unrecognized,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
            Self::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// Classify a memo by literal prefix/shape.
///
/// The compact test runs on the untrimmed memo; the JSON test trims first.
pub fn classify(memo: &str, config: &ProtocolConfig) -> Grammar {
    let compact = memo
        .strip_prefix(config.protocol_name.as_str())
        .is_some_and(|rest| rest.starts_with(':'));
    if compact {
        Grammar::Compact
    } else if memo.trim().starts_with('{') {
        Grammar::Json
    } else {
        Grammar::Unrecognized
    }
}
