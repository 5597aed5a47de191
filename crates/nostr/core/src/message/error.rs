use thiserror::Error;

/// Errors that can occur when encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed wire message: {0}")]
    MalformedWireJson(String),

    #[error("unknown message type: {0}")]
    UnknownMessageKind(String),

    #[error("unexpected {0}")]
    UnexpectedDirection(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MessageError>;
