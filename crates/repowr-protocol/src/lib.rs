//! # repowr-protocol
//!
//! Validator for repOWR memos: free-text fields on token transfers that may
//! carry a reputation rating or an identity profile.
//!
//! Two grammars compete for every memo:
//!
//! ```text
//! memo ──► classify ──┬─ Compact ──► parse_compact  ─┐
//!                     ├─ Json ─────► parse_json ─────┼─► ValidationOutcome
//!                     │                 └─ identity  │
//!                     └─ Unrecognized ───────────────┘
//! ```
//!
//! - Compact: `repOWR:<rating>:<comment>:`
//! - JSON: `{"protocol":"repOWR","rating":5,"type":"deal",...}` or
//!   `{"protocol":"repOWR","type":"identity","nickname":...,"bio":...}`
//!
//! Every rejection is a value, never a panic, so a batch of memos can be
//! validated one after another without one bad memo affecting the rest.

pub mod compact;
pub mod config;
pub mod error;
pub mod grammar;
pub mod identity;
pub mod json;
pub mod message;
pub mod url;
pub mod validator;

pub use compact::parse_compact;
pub use config::{PROTOCOL_NAME, ProtocolConfig};
pub use error::Rejection;
pub use grammar::{Grammar, classify};
pub use identity::parse_identity;
pub use json::{IDENTITY_TYPE, parse_json};
pub use message::{
    Category, IdentityMessage, ProtocolMessage, RatingMessage, SourceFormat, ValidationOutcome,
};
pub use url::is_well_formed_url;
pub use validator::MemoValidator;
