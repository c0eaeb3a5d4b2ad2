//! Address codec: friendly (tagged base64url) <-> raw `workchain:hash`.
//!
//! Three input shapes are distinguished explicitly:
//!
//! - raw: `0:<64 hex>` or `-1:<64 hex>`
//! - friendly: `EQ...` / `UQ...` base64url, padding optional
//! - opaque: anything else, kept verbatim so it can still be searched
//!
//! Two friendly layouts are recognised. A 48-character address whose whole
//! text decodes to `[flags, workchain, hash(32), crc(2)]` with a known flags
//! byte uses that standard layout. Everything else falls back to the
//! tag-stripped layout: drop the two tag characters and decode the rest as
//! `[workchain, hash(32), crc(2)]`.

use crate::checksum::verify_trailing;
use crate::error::AddressError;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tags that mark a friendly address.
pub const FRIENDLY_TAGS: [&str; 2] = ["EQ", "UQ"];

/// Prefixes that mark a raw address.
pub const RAW_PREFIXES: [&str; 2] = ["0:", "-1:"];

/// Hex length of a canonical account hash.
pub const HASH_HEX_LEN: usize = 64;

const HASH_LEN: usize = 32;
const STANDARD_FRIENDLY_CHARS: usize = 48;
const STANDARD_FRIENDLY_BYTES: usize = 36;
const TAG_STRIPPED_MIN_BYTES: usize = 1 + HASH_LEN;
const TAG_STRIPPED_FULL_BYTES: usize = 1 + HASH_LEN + 2;

const FLAG_BOUNCEABLE: u8 = 0x11;
const FLAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TESTNET: u8 = 0x80;

/// Standard alphabet, padding optional, non-canonical trailing bits allowed.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Canonical account identity: workchain plus a 32-byte hash.
///
/// `hash_hex` is always exactly 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CanonicalAddressFields")]
pub struct CanonicalAddress {
    workchain: i32,
    hash_hex: String,
}

/// Unchecked wire shape; deserialization goes through `from_hex`.
#[derive(Deserialize)]
struct CanonicalAddressFields {
    workchain: i32,
    hash_hex: String,
}

impl TryFrom<CanonicalAddressFields> for CanonicalAddress {
    type Error = AddressError;

    fn try_from(fields: CanonicalAddressFields) -> Result<Self, Self::Error> {
        Self::from_hex(fields.workchain, &fields.hash_hex)
    }
}

impl CanonicalAddress {
    pub fn new(workchain: i32, hash: [u8; HASH_LEN]) -> Self {
        Self {
            workchain,
            hash_hex: hex::encode(hash),
        }
    }

    /// Build from a hex string; anything but exactly 64 hex digits fails.
    pub fn from_hex(workchain: i32, hash_hex: &str) -> Result<Self, AddressError> {
        let mut hash = [0u8; HASH_LEN];
        if hash_hex.len() != HASH_HEX_LEN {
            return Err(AddressError::InvalidRawHash {
                address: format!("{workchain}:{hash_hex}"),
                detail: format!(
                    "hash has {} hex characters, expected {HASH_HEX_LEN}",
                    hash_hex.len()
                ),
            });
        }
        hex::decode_to_slice(hash_hex, &mut hash).map_err(|e| AddressError::InvalidRawHash {
            address: format!("{workchain}:{hash_hex}"),
            detail: e.to_string(),
        })?;
        Ok(Self::new(workchain, hash))
    }

    pub fn workchain(&self) -> i32 {
        self.workchain
    }

    pub fn hash_hex(&self) -> &str {
        &self.hash_hex
    }

    pub fn hash_bytes(&self) -> [u8; HASH_LEN] {
        let mut hash = [0u8; HASH_LEN];
        // Construction guarantees 64 valid hex characters.
        let _ = hex::decode_to_slice(&self.hash_hex, &mut hash);
        hash
    }

    /// Encode in the standard 48-character friendly layout.
    ///
    /// Only meaningful for workchains that fit a signed byte; larger values
    /// are truncated to their low byte.
    pub fn to_friendly(&self, bounceable: bool) -> String {
        let mut bytes = Vec::with_capacity(STANDARD_FRIENDLY_BYTES);
        bytes.push(if bounceable {
            FLAG_BOUNCEABLE
        } else {
            FLAG_NON_BOUNCEABLE
        });
        bytes.push(self.workchain.to_be_bytes()[3]);
        bytes.extend_from_slice(&self.hash_bytes());
        let crc = crate::checksum::crc16_xmodem(&bytes);
        bytes.extend_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(bytes)
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, self.hash_hex)
    }
}

/// What an input address turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressForm {
    Raw(CanonicalAddress),
    Friendly(CanonicalAddress),
    /// Unknown shape, passed through so it can still be found by substring.
    Opaque(String),
}

impl AddressForm {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::Friendly(_) => "friendly",
            Self::Opaque(_) => "opaque",
        }
    }

    pub fn canonical(&self) -> Option<&CanonicalAddress> {
        match self {
            Self::Raw(a) | Self::Friendly(a) => Some(a),
            Self::Opaque(_) => None,
        }
    }

    /// Storage key: `workchain:hash` when decodable, the input text otherwise.
    pub fn canonical_key(&self) -> String {
        match self {
            Self::Raw(a) | Self::Friendly(a) => a.to_string(),
            Self::Opaque(text) => text.clone(),
        }
    }
}

/// Codec switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Reject friendly addresses whose CRC-16 does not match. Off by default:
    /// corrupted checksums are decoded like valid ones.
    pub verify_checksum: bool,
}

/// Pure address codec. Holds only its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCodec {
    options: CodecOptions,
}

impl AddressCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Classify and, where possible, canonicalize an address.
    ///
    /// Unknown shapes are `Ok(Opaque)`, not errors. Errors are reserved for
    /// input that claims to be raw or friendly but does not decode.
    pub fn to_raw(&self, address: &str) -> Result<AddressForm, AddressError> {
        let address = address.trim();
        if let Some((workchain, hash_hex)) = split_raw(address) {
            return CanonicalAddress::from_hex(workchain, hash_hex).map(AddressForm::Raw);
        }
        if has_friendly_tag(address) {
            return self.decode_friendly(address).map(AddressForm::Friendly);
        }
        Ok(AddressForm::Opaque(address.to_string()))
    }

    /// Decode a friendly address to its canonical form.
    pub fn decode_friendly(&self, address: &str) -> Result<CanonicalAddress, AddressError> {
        let address = address.trim();
        if let Some(bytes) = standard_layout_bytes(address) {
            self.check(address, &bytes)?;
            let mut hash = [0u8; HASH_LEN];
            hash.copy_from_slice(&bytes[2..2 + HASH_LEN]);
            return Ok(CanonicalAddress::new(
                i32::from(i8::from_be_bytes([bytes[1]])),
                hash,
            ));
        }

        let body = address.get(2..).unwrap_or_default();
        let bytes = LENIENT_STANDARD
            .decode(to_standard_alphabet(body))
            .map_err(|e| AddressError::Base64 {
                address: address.to_string(),
                detail: e.to_string(),
            })?;
        if bytes.len() < TAG_STRIPPED_MIN_BYTES {
            return Err(AddressError::TooShort {
                address: address.to_string(),
                len: bytes.len(),
                need: TAG_STRIPPED_MIN_BYTES,
            });
        }
        if self.options.verify_checksum {
            if bytes.len() != TAG_STRIPPED_FULL_BYTES {
                return Err(AddressError::TooShort {
                    address: address.to_string(),
                    len: bytes.len(),
                    need: TAG_STRIPPED_FULL_BYTES,
                });
            }
            self.check(address, &bytes)?;
        }
        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&bytes[1..1 + HASH_LEN]);
        Ok(CanonicalAddress::new(
            i32::from(i8::from_be_bytes([bytes[0]])),
            hash,
        ))
    }

    /// The key the store uses for this address: canonical when decodable,
    /// the trimmed input otherwise.
    pub fn canonical_key(&self, address: &str) -> Result<String, AddressError> {
        self.to_raw(address).map(|form| form.canonical_key())
    }

    fn check(&self, address: &str, bytes: &[u8]) -> Result<(), AddressError> {
        if !self.options.verify_checksum {
            return Ok(());
        }
        verify_trailing(bytes).map_err(|(expected, found)| AddressError::ChecksumMismatch {
            address: address.to_string(),
            expected,
            found,
        })
    }
}

/// Canonicalize with default options.
pub fn to_raw(address: &str) -> Result<AddressForm, AddressError> {
    AddressCodec::default().to_raw(address)
}

/// Loose comparison key. Never used as a storage key.
///
/// Trims, drops a raw workchain prefix or a friendly tag, and lower-cases.
pub fn normalize_for_comparison(address: &str) -> String {
    let address = address.trim();
    if let Some((_, hash)) = split_raw(address) {
        return hash.to_lowercase();
    }
    if has_friendly_tag(address) {
        return address.get(2..).unwrap_or_default().to_lowercase();
    }
    address.to_lowercase()
}

pub fn has_friendly_tag(address: &str) -> bool {
    FRIENDLY_TAGS.iter().any(|tag| address.starts_with(tag))
}

pub fn has_raw_prefix(address: &str) -> bool {
    RAW_PREFIXES.iter().any(|prefix| address.starts_with(prefix))
}

fn split_raw(address: &str) -> Option<(i32, &str)> {
    if !has_raw_prefix(address) {
        return None;
    }
    let (workchain, hash) = address.split_once(':')?;
    Some((workchain.parse().ok()?, hash))
}

fn to_standard_alphabet(body: &str) -> String {
    let mut out: String = body
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}

fn standard_layout_bytes(address: &str) -> Option<Vec<u8>> {
    if address.len() != STANDARD_FRIENDLY_CHARS {
        return None;
    }
    let bytes = LENIENT_STANDARD
        .decode(to_standard_alphabet(address))
        .ok()?;
    let known_flags = matches!(
        bytes.first().map(|flags| flags & !FLAG_TESTNET),
        Some(FLAG_BOUNCEABLE | FLAG_NON_BOUNCEABLE)
    );
    (bytes.len() == STANDARD_FRIENDLY_BYTES && known_flags).then_some(bytes)
}
