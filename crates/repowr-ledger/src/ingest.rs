//! Batch ingestion: validate each transfer memo and record the result.
//!
//! Per transfer:
//! 1. skip when there is no memo
//! 2. validate the memo
//! 3. insert the transaction (duplicate ids are counted and skipped)
//! 4. store the accepted rating or profile under canonical addresses
//!
//! One bad memo or address never stops the batch.

use crate::memory::LedgerStore;
use crate::records::{ProfileRecord, RatingRecord, StoredTransaction};
use crate::transfer::TransferRecord;
use repowr_address::AddressCodec;
use repowr_protocol::{MemoValidator, ProtocolMessage, ValidationOutcome};
use serde::Serialize;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Transfers seen.
    pub total: usize,
    /// Transfers that carried a memo.
    pub parsed: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Transactions newly inserted.
    pub saved: usize,
    pub duplicates: usize,
    pub ratings: usize,
    pub profiles: usize,
}

/// Ingest `transfers` into `store`.
pub fn ingest(
    store: &mut LedgerStore,
    validator: &MemoValidator,
    codec: &AddressCodec,
    transfers: impl IntoIterator<Item = TransferRecord>,
) -> IngestStats {
    let mut stats = IngestStats::default();

    for transfer in transfers {
        stats.total += 1;
        let Some(memo) = transfer.memo() else {
            continue;
        };
        stats.parsed += 1;

        let tx_id = transfer.transaction_id();
        let outcome = validator.validate(memo);
        match &outcome {
            ValidationOutcome::Accepted(_) => stats.valid += 1,
            ValidationOutcome::Rejected(reason) => {
                stats.invalid += 1;
                tracing::debug!(tx_id = %tx_id, kind = reason.kind(), %reason, "memo rejected");
            }
        }

        let inserted = store.insert_transaction(StoredTransaction {
            tx_id: tx_id.clone(),
            sender: transfer.sender().trim().to_string(),
            receiver: transfer.recipient().trim().to_string(),
            amount: transfer.amount_units(),
            timestamp: transfer.timestamp,
            memo: memo.to_string(),
            is_valid: outcome.is_accepted(),
        });
        if !inserted {
            stats.duplicates += 1;
            tracing::debug!(tx_id = %tx_id, "duplicate transaction skipped");
            continue;
        }
        stats.saved += 1;

        let ValidationOutcome::Accepted(message) = outcome else {
            continue;
        };
        match message {
            ProtocolMessage::Rating(message) => {
                let record = RatingRecord {
                    tx_id,
                    sender: canonical_or_trimmed(codec, transfer.sender()),
                    receiver: canonical_or_trimmed(codec, transfer.recipient()),
                    timestamp: transfer.timestamp,
                    message,
                };
                match store.insert_rating(record) {
                    Ok(()) => stats.ratings += 1,
                    Err(err) => tracing::warn!(error = %err, "rating not stored"),
                }
            }
            ProtocolMessage::Identity(identity) => {
                store.upsert_profile(ProfileRecord {
                    address: canonical_or_trimmed(codec, transfer.sender()),
                    tx_id,
                    timestamp: transfer.timestamp,
                    identity,
                });
                stats.profiles += 1;
            }
        }
    }

    tracing::info!(
        total = stats.total,
        parsed = stats.parsed,
        valid = stats.valid,
        invalid = stats.invalid,
        saved = stats.saved,
        duplicates = stats.duplicates,
        ratings = stats.ratings,
        profiles = stats.profiles,
        "ingestion finished"
    );
    stats
}

/// Canonical key for storage; undecodable input is kept as trimmed text.
fn canonical_or_trimmed(codec: &AddressCodec, address: &str) -> String {
    match codec.canonical_key(address) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(address, error = %err, "address not canonicalized, storing as given");
            address.trim().to_string()
        }
    }
}
