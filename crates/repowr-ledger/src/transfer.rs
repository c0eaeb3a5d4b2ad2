//! Transfer records as exported by the ledger indexer.
//!
//! The reader accepts the flat shape (`"sender": "EQ..."`) and the indexer's
//! nested shape (`"sender": {"address": "EQ..."}`, `"jetton": {"decimals": 9}`).

use crate::jsonl::{JsonlError, read_records_from_path};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Decimals assumed when a record carries none.
pub const DEFAULT_DECIMALS: u32 = 9;

const SYNTHETIC_ID_PREFIX: &str = "synthetic:";
const SYNTHETIC_ID_HEX_CHARS: usize = 16;

/// An account reference, either a bare address or `{"address": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Address(String),
    Account { address: String },
}

impl AccountRef {
    pub fn address(&self) -> &str {
        match self {
            Self::Address(address) | Self::Account { address } => address,
        }
    }
}

impl Default for AccountRef {
    fn default() -> Self {
        Self::Address(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

/// One token transfer. Only `comment` carries protocol data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub sender: AccountRef,
    #[serde(default)]
    pub recipient: AccountRef,
    /// Raw integer units as a decimal string.
    #[serde(default)]
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jetton: Option<TokenInfo>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TransferRecord {
    pub fn sender(&self) -> &str {
        self.sender.address()
    }

    pub fn recipient(&self) -> &str {
        self.recipient.address()
    }

    /// Memo text, `None` when absent or empty.
    pub fn memo(&self) -> Option<&str> {
        self.comment.as_deref().filter(|memo| !memo.is_empty())
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
            .or_else(|| self.jetton.as_ref().and_then(|j| j.decimals))
            .unwrap_or(DEFAULT_DECIMALS)
    }

    /// Amount in whole tokens. Unparsable or non-finite amounts count as
    /// zero, so the stored value always survives a JSON round trip.
    pub fn amount_units(&self) -> f64 {
        let raw = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        let decimals = i32::try_from(self.decimals()).unwrap_or(i32::MAX);
        Some(raw / 10f64.powi(decimals))
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Transaction hash, else event id, else a deterministic synthetic id.
    pub fn transaction_id(&self) -> String {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        non_empty(&self.transaction_hash)
            .or_else(|| non_empty(&self.event_id))
            .unwrap_or_else(|| self.synthetic_id())
    }

    fn synthetic_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update([0u8]);
        hasher.update(self.sender().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.memo().unwrap_or_default().as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        format!("{SYNTHETIC_ID_PREFIX}{}", &hash[..SYNTHETIC_ID_HEX_CHARS])
    }
}

/// Read transfers from a JSONL export.
pub fn read_transfers(path: impl AsRef<Path>) -> Result<Vec<TransferRecord>, JsonlError> {
    read_records_from_path(path)
}
