//! Tiered lookup of a user-typed address against stored canonical keys.
//!
//! Tiers run in order and the first hit wins:
//!
//! 1. `Exact`        trimmed query is itself a known key
//! 2. `FriendlyHash` friendly query decodes to a hash some key carries
//! 3. `RawSuffix`    text after the first `:` ends some key
//! 4. `Substring`    last 16 characters appear inside some key
//!
//! The last tier is a convenience for partially pasted addresses. It can
//! match the wrong key and is reported as non-authoritative.

use crate::codec::{AddressCodec, CodecOptions, has_friendly_tag};
use serde::Serialize;
use std::collections::BTreeSet;

/// Characters of the query kept for the substring tier.
pub const SUBSTRING_KEY_CHARS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    FriendlyHash,
    RawSuffix,
    Substring,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::FriendlyHash => "friendly_hash",
            Self::RawSuffix => "raw_suffix",
            Self::Substring => "substring",
        }
    }

    /// False for the substring tier, which may return an unrelated key.
    pub fn is_authoritative(self) -> bool {
        !matches!(self, Self::Substring)
    }
}

/// A matched key and the tier that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution<'k> {
    pub address: &'k str,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressResolver {
    codec: AddressCodec,
}

impl AddressResolver {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            codec: AddressCodec::new(options),
        }
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    /// Find `query` among `known`. Iteration order of `known` decides ties.
    pub fn resolve<'k, I>(&self, query: &str, known: I) -> Option<Resolution<'k>>
    where
        I: IntoIterator<Item = &'k str> + Clone,
    {
        let query = query.trim();
        let hit = |address: &'k str, tier| Some(Resolution { address, tier });

        if let Some(address) = known.clone().into_iter().find(|k| *k == query) {
            return hit(address, MatchTier::Exact);
        }

        if has_friendly_tag(query) {
            match self.codec.decode_friendly(query) {
                Ok(canonical) => {
                    let found = known.clone().into_iter().find(|k| {
                        k.split_once(':')
                            .is_some_and(|(_, hash)| hash == canonical.hash_hex())
                    });
                    if let Some(address) = found {
                        return hit(address, MatchTier::FriendlyHash);
                    }
                }
                Err(err) => {
                    tracing::debug!(query, error = %err, "friendly decode failed, skipping hash tier");
                }
            }
        }

        if let Some((_, suffix)) = query.split_once(':') {
            let suffix = suffix.to_lowercase();
            if !suffix.is_empty()
                && let Some(address) = known
                    .clone()
                    .into_iter()
                    .find(|k| k.to_lowercase().ends_with(&suffix))
            {
                return hit(address, MatchTier::RawSuffix);
            }
        }

        let key = substring_key(query);
        if key.is_empty() {
            return None;
        }
        let address = known
            .into_iter()
            .find(|k| k.to_lowercase().contains(&key))?;
        tracing::debug!(query, address, "resolved by substring, not authoritative");
        hit(address, MatchTier::Substring)
    }

    /// Convenience over an owned key set, iterated in sorted order.
    pub fn resolve_in<'k>(
        &self,
        query: &str,
        known: &'k BTreeSet<String>,
    ) -> Option<Resolution<'k>> {
        self.resolve(query, known.iter().map(String::as_str))
    }
}

/// Last 16 characters of the lower-cased query, or all of it when shorter.
fn substring_key(query: &str) -> String {
    let lower = query.to_lowercase();
    let count = lower.chars().count();
    lower
        .chars()
        .skip(count.saturating_sub(SUBSTRING_KEY_CHARS))
        .collect()
}
