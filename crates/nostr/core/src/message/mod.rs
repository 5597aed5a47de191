//! Relay protocol messages (NIP-01, NIP-42, NIP-45)
//!
//! Every message is a JSON array whose first element names its type:
//!
//! ```text
//! client -> relay                      relay -> client
//! ["EVENT", <event>]                   ["EVENT", <sub_id>, <event>]
//! ["REQ", <sub_id>, <filter>, ...]     ["OK", <event_id>, <bool>, <msg>]
//! ["CLOSE", <sub_id>]                  ["EOSE", <sub_id>]
//! ["AUTH", <event>]                    ["CLOSED", <sub_id>, <msg>]
//! ["COUNT", <sub_id>, <filter>, ...]   ["NOTICE", <msg>]
//!                                      ["AUTH", <challenge>]
//!                                      ["COUNT", <n>]
//! ```
//!
//! `EVENT`, `AUTH` and `COUNT` exist in both directions. The shape of the
//! second element tells them apart: an object is a client event, a string is a
//! relay subscription id or challenge (or a client `COUNT` subscription id), a
//! number is a relay count.
//!
//! Elements after the last known position are ignored when decoding, so relays
//! may append fields.
//!
//! Internal module boundaries:
//! - `error`: shared error and result types
//! - `codec`: positional access to raw array elements
//! - `client`: client-to-relay messages
//! - `relay`: relay-to-client messages
//! - `tests`: round trips and malformed input

mod client;
mod codec;
mod error;
mod relay;

pub use client::ClientMessage;
pub use error::{MessageError, Result};
pub use relay::RelayMessage;

use codec::WireArray;
use serde::ser::{Serialize, Serializer};
use tracing::debug;

/// A wire message in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Client(ClientMessage),
    Relay(RelayMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Client,
    Relay,
}

impl Message {
    pub fn from_json(json: &str) -> Result<Self> {
        let wire = WireArray::parse(json)?;
        match direction(&wire)? {
            Direction::Client => ClientMessage::decode(&wire).map(Self::Client),
            Direction::Relay => RelayMessage::decode(&wire).map(Self::Relay),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(message) => message.kind(),
            Self::Relay(message) => message.kind(),
        }
    }
}

impl From<ClientMessage> for Message {
    fn from(message: ClientMessage) -> Self {
        Self::Client(message)
    }
}

impl From<RelayMessage> for Message {
    fn from(message: RelayMessage) -> Self {
        Self::Relay(message)
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Client(message) => message.serialize(serializer),
            Self::Relay(message) => message.serialize(serializer),
        }
    }
}

fn direction(wire: &WireArray<'_>) -> Result<Direction> {
    let kind = wire.kind();
    match kind {
        "REQ" | "CLOSE" => Ok(Direction::Client),
        "OK" | "EOSE" | "CLOSED" | "NOTICE" => Ok(Direction::Relay),
        "EVENT" | "AUTH" => match wire.peek(1) {
            Some(b'{') => Ok(Direction::Client),
            Some(b'"') => Ok(Direction::Relay),
            Some(_) => Err(MessageError::MalformedWireJson(format!(
                "{kind} expects an event object or a string"
            ))),
            None => Err(MessageError::MalformedWireJson(format!(
                "{kind} missing second element"
            ))),
        },
        "COUNT" => match wire.peek(1) {
            Some(b'"') => Ok(Direction::Client),
            Some(b'0'..=b'9') => Ok(Direction::Relay),
            Some(_) => Err(MessageError::MalformedWireJson(
                "COUNT expects a subscription id or a count".to_string(),
            )),
            None => Err(MessageError::MalformedWireJson(
                "COUNT missing second element".to_string(),
            )),
        },
        other => {
            debug!("rejecting unknown message type {:?}", other);
            Err(MessageError::UnknownMessageKind(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests;
