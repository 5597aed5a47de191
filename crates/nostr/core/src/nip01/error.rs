use crate::hex_codec::HexError;
use thiserror::Error;

/// Errors that can occur during NIP-01 operations.
#[derive(Debug, Error)]
pub enum Nip01Error {
    #[error("invalid hex: {0}")]
    Hex(#[from] HexError),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("key parse failure: {0}")]
    KeyParse(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, Nip01Error>;
