use thiserror::Error;

/// Errors that can occur while encoding or decoding NIP-19 addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Nip19Error {
    #[error("invalid bech32 format: {0}")]
    InvalidFormat(String),

    #[error("invalid bech32 character {0:?}")]
    InvalidCharacter(char),

    #[error("invalid bech32 checksum")]
    InvalidChecksum,

    #[error("invalid bech32 padding")]
    InvalidPadding,

    #[error("invalid 5-bit word {0}")]
    InvalidWord(u8),

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("wrong prefix: expected {expected}, found {found}")]
    WrongPrefix { expected: &'static str, found: String },

    #[error("invalid key in address: {0}")]
    InvalidBech32(String),

    #[error("invalid TLV: {0}")]
    InvalidTlv(String),

    #[error("missing TLV field: {0}")]
    MissingField(&'static str),

    #[error("TLV value of type {kind} is {len} bytes, at most 255 allowed")]
    TlvValueTooLong { kind: u8, len: usize },
}

pub type Result<T> = std::result::Result<T, Nip19Error>;
