//! Address decoding errors.

/// Why an address could not be turned into a canonical `workchain:hash` key.
///
/// These never abort a batch: ingestion falls back to the input text, and the
/// resolver skips the tier that needed the decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// A `0:`/`-1:` address whose hash part is not exactly 64 hex digits.
    #[error("invalid raw address {address}: {detail}")]
    InvalidRawHash { address: String, detail: String },

    #[error("invalid base64 in friendly address {address}: {detail}")]
    Base64 { address: String, detail: String },

    #[error("friendly address {address} decodes to {len} bytes (need at least {need})")]
    TooShort {
        address: String,
        len: usize,
        need: usize,
    },

    #[error("checksum mismatch in friendly address {address}: expected {expected:04x}, found {found:04x}")]
    ChecksumMismatch {
        address: String,
        expected: u16,
        found: u16,
    },
}
