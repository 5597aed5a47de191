pub mod config;
pub mod hex_codec;
pub mod message;
pub mod nip01;
pub mod nip19;
pub mod nip21;
mod tag_parsing;

pub use config::{CodecConfig, NotePayloadPolicy, TimestampBounds};
pub use hex_codec::HexError;
pub use message::{ClientMessage, Message, MessageError, RelayMessage};
pub use nip01::{
    Event, EventId, EventTemplate, Filter, Keypair, KindClassification, Metadata, Nip01Error,
    PublicKey, SecretKey, Signature, Timestamp,
};
pub use nip19::{
    FromBech32, NAddr, NEvent, NNote, NProfile, NRelay, Nip19Entity, Nip19Error, ToBech32,
    decode_address,
};
pub use nip21::{Nip21Error, parse_nostr_uri, to_nostr_uri};
