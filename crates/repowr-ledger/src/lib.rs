//! # repowr-ledger
//!
//! Everything around the validator that turns transfers into reputation:
//!
//! - `transfer`: transfer records from the indexer export
//! - `jsonl`: line-oriented file format with atomic writes
//! - `records`: stored transactions, ratings and profiles
//! - `memory`: the in-memory store and its queries
//! - `ingest`: validate memos and fill the store
//! - `reputation`: per-address mean rating and ranking

pub mod ingest;
pub mod jsonl;
pub mod memory;
pub mod records;
pub mod reputation;
pub mod transfer;

pub use ingest::{IngestStats, ingest};
pub use jsonl::{JsonlError, read_records, read_records_from_path, write_records_to_path};
pub use memory::{LedgerStore, LedgerStoreError, ResolvedAddress, StoreStats};
pub use records::{ProfileRecord, RatingRecord, StoreRecord, StoredTransaction};
pub use reputation::{Reputation, ReputationTable, compute as compute_reputation};
pub use transfer::{AccountRef, DEFAULT_DECIMALS, TokenInfo, TransferRecord, read_transfers};
