//! NIP-01: Basic protocol flow
//!
//! Events, their canonical serialization and signatures, and the subscription
//! filters relays evaluate against them.
//!
//! Internal module boundaries:
//! - `error`: shared error and result types
//! - `types`: fixed-size identifiers and timestamps
//! - `keys`: keypairs and the Schnorr sign/verify seam
//! - `kinds`: kind constants and classification
//! - `event`: events, templates and profile metadata
//! - `filter`: subscription filters and matching
//! - `tests`: event/filter coverage
//!
//! # Canonical serialization
//!
//! ```text
//! [0, <pubkey hex>, <created_at>, <kind>, <tags>, <content>]
//! ```
//!
//! The event id is the SHA-256 of that UTF-8 string, and the signature is a
//! BIP-340 Schnorr signature over the id.
//!
//! # Lenient decoding
//!
//! A `pubkey` or `sig` that fails to parse inside event JSON becomes the null
//! sentinel instead of failing the whole event. Such events still decode (so a
//! relay can hold and forward them) but never verify.
//!
//! # References
//!
//! - NIP-01: <https://github.com/nostr-protocol/nips/blob/master/01.md>

mod error;
mod event;
mod filter;
mod keys;
mod kinds;
mod types;

pub use error::{Nip01Error, Result};
pub use event::{
    Event, EventTemplate, Metadata, get_event_hash, get_parameterized_id, serialize_event,
};
pub use filter::{Filter, matches_any};
pub use keys::{Keypair, schnorr_sign, schnorr_verify};
pub use kinds::{
    KIND_CLIENT_AUTH, KIND_CONTACTS, KIND_LONG_FORM_CONTENT, KIND_METADATA, KIND_RECOMMEND_RELAY,
    KIND_SHORT_TEXT_NOTE, KindClassification, classify_kind, is_addressable_kind,
    is_ephemeral_kind, is_regular_kind, is_replaceable_kind,
};
pub use types::{EventId, PublicKey, SecretKey, Signature, Timestamp};
