use super::Message;
use super::codec::WireArray;
use super::error::{MessageError, Result};
use crate::nip01::{Event, EventId};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Messages sent from relay to client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// Event matching a subscription: ["EVENT", <subscription_id>, <event JSON>]
    Event {
        subscription_id: String,
        event: Event,
    },

    /// Command result: ["OK", <event_id>, <true|false>, <message>]
    Ok {
        event_id: EventId,
        accepted: bool,
        message: String,
    },

    /// End of stored events: ["EOSE", <subscription_id>]
    Eose { subscription_id: String },

    /// Subscription closed by relay: ["CLOSED", <subscription_id>, <message>]
    Closed {
        subscription_id: String,
        message: String,
    },

    /// Human-readable notice: ["NOTICE", <message>]
    Notice { message: String },

    /// Authentication challenge (NIP-42): ["AUTH", <challenge>]
    Auth { challenge: String },

    /// Count reply: ["COUNT", <n>]
    Count { count: u64 },
}

impl RelayMessage {
    pub fn event(subscription_id: impl Into<String>, event: Event) -> Self {
        Self::Event {
            subscription_id: subscription_id.into(),
            event,
        }
    }

    pub fn ok(event_id: EventId, accepted: bool, message: impl Into<String>) -> Self {
        Self::Ok {
            event_id,
            accepted,
            message: message.into(),
        }
    }

    pub fn eose(subscription_id: impl Into<String>) -> Self {
        Self::Eose {
            subscription_id: subscription_id.into(),
        }
    }

    pub fn closed(subscription_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Closed {
            subscription_id: subscription_id.into(),
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }

    pub fn auth(challenge: impl Into<String>) -> Self {
        Self::Auth {
            challenge: challenge.into(),
        }
    }

    /// Wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Event { .. } => "EVENT",
            Self::Ok { .. } => "OK",
            Self::Eose { .. } => "EOSE",
            Self::Closed { .. } => "CLOSED",
            Self::Notice { .. } => "NOTICE",
            Self::Auth { .. } => "AUTH",
            Self::Count { .. } => "COUNT",
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a message a relay sent. Client-to-relay shapes are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        match Message::from_json(json)? {
            Message::Relay(message) => Ok(message),
            Message::Client(_) => Err(MessageError::UnexpectedDirection(
                "client-to-relay message",
            )),
        }
    }

    pub(super) fn decode(wire: &WireArray<'_>) -> Result<Self> {
        let (message, used) = match wire.kind() {
            "EVENT" => (
                Self::Event {
                    subscription_id: wire.field(1, "subscription_id")?,
                    event: wire.field(2, "event")?,
                },
                3,
            ),
            "OK" => (
                Self::Ok {
                    event_id: wire.field(1, "event_id")?,
                    accepted: wire.field(2, "accepted")?,
                    message: wire.field(3, "message")?,
                },
                4,
            ),
            "EOSE" => (
                Self::Eose {
                    subscription_id: wire.field(1, "subscription_id")?,
                },
                2,
            ),
            "CLOSED" => (
                Self::Closed {
                    subscription_id: wire.field(1, "subscription_id")?,
                    message: wire.field(2, "message")?,
                },
                3,
            ),
            "NOTICE" => (
                Self::Notice {
                    message: wire.field(1, "message")?,
                },
                2,
            ),
            "AUTH" => (
                Self::Auth {
                    challenge: wire.field(1, "challenge")?,
                },
                2,
            ),
            "COUNT" => (
                Self::Count {
                    count: wire.field(1, "count")?,
                },
                2,
            ),
            other => return Err(MessageError::UnknownMessageKind(other.to_string())),
        };
        wire.finish(used);
        Ok(message)
    }
}

impl Serialize for RelayMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        seq.serialize_element(self.kind())?;
        match self {
            Self::Event {
                subscription_id,
                event,
            } => {
                seq.serialize_element(subscription_id)?;
                seq.serialize_element(event)?;
            }
            Self::Ok {
                event_id,
                accepted,
                message,
            } => {
                seq.serialize_element(event_id)?;
                seq.serialize_element(accepted)?;
                seq.serialize_element(message)?;
            }
            Self::Eose { subscription_id } => seq.serialize_element(subscription_id)?,
            Self::Closed {
                subscription_id,
                message,
            } => {
                seq.serialize_element(subscription_id)?;
                seq.serialize_element(message)?;
            }
            Self::Notice { message } => seq.serialize_element(message)?,
            Self::Auth { challenge } => seq.serialize_element(challenge)?,
            Self::Count { count } => seq.serialize_element(count)?,
        }
        seq.end()
    }
}
