//! NIP-19: bech32-encoded entities
//!
//! Human-friendly encodings of keys, event ids and TLV bundles with relay
//! hints.
//!
//! | prefix     | payload                                         |
//! |------------|-------------------------------------------------|
//! | `npub`     | 32-byte public key                              |
//! | `nsec`     | 32-byte secret key                              |
//! | `note`     | 32-byte event id                                |
//! | `nprofile` | TLV: pubkey, relays                             |
//! | `nevent`   | TLV: event id, relays, author?, kind?           |
//! | `naddr`    | TLV: identifier, relays, author, kind           |
//! | `nrelay`   | TLV: relay URL                                  |
//!
//! Internal module boundaries:
//! - `bech32`: envelope codec over the `bech32` crate, length cap lifted
//! - `tlv`: type-length-value walk and writer
//! - `entity`: typed entities and prefix dispatch
//! - `tests`: vectors and round trips
//!
//! # References
//!
//! - NIP-19: <https://github.com/nostr-protocol/nips/blob/master/19.md>

pub mod bech32;
mod entity;
mod error;
pub mod tlv;

pub use entity::{
    FromBech32, NAddr, NEvent, NNote, NProfile, NRelay, Nip19Entity, PREFIX_NADDR, PREFIX_NEVENT,
    PREFIX_NOTE, PREFIX_NPROFILE, PREFIX_NPUB, PREFIX_NRELAY, PREFIX_NSEC, ToBech32,
    decode_address, decode_address_with,
};
pub use error::{Nip19Error, Result};
