//! # repowr-address
//!
//! Address handling for repOWR: the friendly <-> raw codec and the tiered
//! resolver used when a typed address does not exactly match a stored key.
//!
//! Stored keys are always produced by [`AddressForm::canonical_key`]. The
//! looser [`normalize_for_comparison`] is for display and fuzzy matching
//! only.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod resolver;

pub use checksum::crc16_xmodem;
pub use codec::{
    AddressCodec, AddressForm, CanonicalAddress, CodecOptions, has_friendly_tag, has_raw_prefix,
    normalize_for_comparison, to_raw,
};
pub use error::AddressError;
pub use resolver::{AddressResolver, MatchTier, Resolution};
