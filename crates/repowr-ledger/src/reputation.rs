//! Reputation: the mean of the ratings an address has received.

use crate::memory::LedgerStore;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reputation {
    pub address: String,
    /// Currently the same as `avg_rating`.
    pub final_score: f64,
    pub avg_rating: f64,
    pub total_ratings: usize,
    /// Category name -> ratings in that category. Uncategorised ratings
    /// count as `general`.
    pub by_category: BTreeMap<String, Vec<u8>>,
    /// Ratings this address has sent.
    pub ratings_given: usize,
}

/// Reputation for every address that has received at least one rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReputationTable {
    entries: BTreeMap<String, Reputation>,
}

impl ReputationTable {
    pub fn get(&self, address: &str) -> Option<&Reputation> {
        self.entries.get(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reputation> {
        self.entries.values()
    }

    /// Highest score first; ties by rating count, then address.
    pub fn top(&self, count: usize) -> Vec<&Reputation> {
        let mut ranked: Vec<&Reputation> = self.entries.values().collect();
        ranked.sort_by(|a, b| {
            b.final_score
                .total_cmp(&a.final_score)
                .then_with(|| b.total_ratings.cmp(&a.total_ratings))
                .then_with(|| a.address.cmp(&b.address))
        });
        ranked.truncate(count);
        ranked
    }
}

/// Aggregate every stored rating.
pub fn compute(store: &LedgerStore) -> ReputationTable {
    let mut received: BTreeMap<&str, Vec<(&str, u8)>> = BTreeMap::new();
    let mut given: BTreeMap<&str, usize> = BTreeMap::new();
    for record in store.ratings() {
        received
            .entry(record.receiver.as_str())
            .or_default()
            .push((record.message.effective_category().as_str(), record.rating()));
        *given.entry(record.sender.as_str()).or_default() += 1;
    }

    let entries = received
        .into_iter()
        .map(|(address, ratings)| {
            let total: u64 = ratings.iter().map(|(_, r)| u64::from(*r)).sum();
            let avg = round2(total as f64 / ratings.len() as f64);
            let mut by_category: BTreeMap<String, Vec<u8>> = BTreeMap::new();
            for (category, rating) in &ratings {
                by_category
                    .entry((*category).to_string())
                    .or_default()
                    .push(*rating);
            }
            let reputation = Reputation {
                address: address.to_string(),
                final_score: avg,
                avg_rating: avg,
                total_ratings: ratings.len(),
                by_category,
                ratings_given: given.get(address).copied().unwrap_or(0),
            };
            (address.to_string(), reputation)
        })
        .collect();

    ReputationTable { entries }
}

/// Two decimals, half to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
