//! In-memory ledger state with JSONL persistence.
//!
//! This is the store boundary for `repowr-ledger`:
//! - insert-if-absent transactions keyed by transaction id
//! - ratings and profiles keyed by canonical address
//! - deterministic queries (BTreeMap order everywhere)

use crate::jsonl::{JsonlError, read_records_from_path, write_records_to_path};
use crate::records::{ProfileRecord, RatingRecord, StoreRecord, StoredTransaction};
use repowr_address::{AddressResolver, CodecOptions, MatchTier};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Errors raised while loading or mutating the store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("rating already recorded for transaction {0}")]
    RatingAlreadyExists(String),
}

/// A key found by [`LedgerStore::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddress {
    pub address: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub transactions: usize,
    pub valid_transactions: usize,
    pub ratings: usize,
    pub profiles: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    transactions: BTreeMap<String, StoredTransaction>,
    ratings: BTreeMap<String, RatingRecord>,
    profiles: BTreeMap<String, ProfileRecord>,
    resolver: AddressResolver,
}

impl LedgerStore {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            resolver: AddressResolver::new(options),
            ..Self::default()
        }
    }

    /// Rebuild a store from records in file order.
    ///
    /// A rating must follow its transaction. Profiles go through the same
    /// newest-wins rule as live ingestion.
    pub fn from_records(
        records: Vec<StoreRecord>,
        options: CodecOptions,
    ) -> Result<Self, LedgerStoreError> {
        let mut store = Self::new(options);
        for record in records {
            match record {
                StoreRecord::Transaction(tx) => {
                    store.insert_transaction(tx);
                }
                StoreRecord::Rating(rating) => store.insert_rating(rating)?,
                StoreRecord::Profile(profile) => {
                    store.upsert_profile(profile);
                }
            }
        }
        Ok(store)
    }

    /// Load from a JSONL file. A missing file is an empty store.
    pub fn load_jsonl(
        path: impl AsRef<Path>,
        options: CodecOptions,
    ) -> Result<Self, LedgerStoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new(options));
        }
        Self::from_records(read_records_from_path(path)?, options)
    }

    /// Persist as JSONL: transactions, then ratings, then profiles.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), LedgerStoreError> {
        write_records_to_path(path, &self.records())?;
        Ok(())
    }

    pub fn records(&self) -> Vec<StoreRecord> {
        self.transactions
            .values()
            .cloned()
            .map(StoreRecord::Transaction)
            .chain(self.ratings.values().cloned().map(StoreRecord::Rating))
            .chain(self.profiles.values().cloned().map(StoreRecord::Profile))
            .collect()
    }

    /// Insert unless a transaction with the same id exists.
    ///
    /// Returns whether the transaction was inserted.
    pub fn insert_transaction(&mut self, tx: StoredTransaction) -> bool {
        if self.transactions.contains_key(&tx.tx_id) {
            return false;
        }
        self.transactions.insert(tx.tx_id.clone(), tx);
        true
    }

    pub fn insert_rating(&mut self, rating: RatingRecord) -> Result<(), LedgerStoreError> {
        if !self.transactions.contains_key(&rating.tx_id) {
            return Err(LedgerStoreError::TransactionNotFound(rating.tx_id));
        }
        if self.ratings.contains_key(&rating.tx_id) {
            return Err(LedgerStoreError::RatingAlreadyExists(rating.tx_id));
        }
        self.ratings.insert(rating.tx_id.clone(), rating);
        Ok(())
    }

    /// Keep the newest profile per address; ties go to the incoming one.
    ///
    /// Returns whether `profile` became the stored profile.
    pub fn upsert_profile(&mut self, profile: ProfileRecord) -> bool {
        if let Some(existing) = self.profiles.get(&profile.address)
            && existing.timestamp > profile.timestamp
        {
            return false;
        }
        self.profiles.insert(profile.address.clone(), profile);
        true
    }

    pub fn transaction(&self, tx_id: &str) -> Option<&StoredTransaction> {
        self.transactions.get(tx_id)
    }

    pub fn transactions(&self) -> impl Iterator<Item = &StoredTransaction> {
        self.transactions.values()
    }

    pub fn ratings(&self) -> impl Iterator<Item = &RatingRecord> {
        self.ratings.values()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ProfileRecord> {
        self.profiles.values()
    }

    pub fn profile(&self, address: &str) -> Option<&ProfileRecord> {
        self.profiles.get(address)
    }

    /// Ratings whose receiver is `address`, newest first.
    pub fn ratings_received(&self, address: &str) -> Vec<&RatingRecord> {
        newest_first(self.ratings().filter(|r| r.receiver == address))
    }

    /// Ratings whose sender is `address`, newest first.
    pub fn ratings_given(&self, address: &str) -> Vec<&RatingRecord> {
        newest_first(self.ratings().filter(|r| r.sender == address))
    }

    /// Every address that appears in a rating or owns a profile.
    pub fn canonical_keys(&self) -> BTreeSet<String> {
        self.ratings
            .values()
            .flat_map(|r| [r.sender.clone(), r.receiver.clone()])
            .chain(self.profiles.keys().cloned())
            .collect()
    }

    /// Match a typed address against [`canonical_keys`](Self::canonical_keys).
    pub fn resolve(&self, query: &str) -> Option<ResolvedAddress> {
        let keys = self.canonical_keys();
        self.resolver
            .resolve_in(query, &keys)
            .map(|hit| ResolvedAddress {
                address: hit.address.to_string(),
                tier: hit.tier,
            })
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            transactions: self.transactions.len(),
            valid_transactions: self.transactions.values().filter(|t| t.is_valid).count(),
            ratings: self.ratings.len(),
            profiles: self.profiles.len(),
        }
    }
}

fn newest_first<'a>(ratings: impl Iterator<Item = &'a RatingRecord>) -> Vec<&'a RatingRecord> {
    let mut out: Vec<&RatingRecord> = ratings.collect();
    out.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.tx_id.cmp(&b.tx_id))
    });
    out
}
