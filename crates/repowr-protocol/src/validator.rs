//! Memo validator: dispatch plus the two grammar parsers.

use crate::compact::parse_compact;
use crate::config::ProtocolConfig;
use crate::error::Rejection;
use crate::grammar::{Grammar, classify};
use crate::json::parse_json;
use crate::message::{ProtocolMessage, ValidationOutcome};

/// Validates memos against one immutable [`ProtocolConfig`].
///
/// Holds no mutable state; one validator can serve any number of callers.
#[derive(Debug, Clone, Default)]
pub struct MemoValidator {
    config: ProtocolConfig,
}

impl MemoValidator {
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn classify(&self, memo: &str) -> Grammar {
        classify(memo, &self.config)
    }

    /// Validate one memo. Never panics on arbitrary input.
    pub fn validate(&self, memo: &str) -> ValidationOutcome {
        self.parse(memo).into()
    }

    /// Same as [`validate`](Self::validate), as a `Result`.
    pub fn parse(&self, memo: &str) -> Result<ProtocolMessage, Rejection> {
        match self.classify(memo) {
            Grammar::Compact => parse_compact(memo, &self.config).map(ProtocolMessage::Rating),
            Grammar::Json => parse_json(memo, &self.config),
            Grammar::Unrecognized => Err(Rejection::MalformedGrammar(
                "not a protocol message".to_string(),
            )),
        }
    }
}
