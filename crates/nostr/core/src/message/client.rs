use super::Message;
use super::codec::WireArray;
use super::error::{MessageError, Result};
use crate::nip01::{Event, Filter};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Messages sent from client to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Publish an event: ["EVENT", <event JSON>]
    Event(Event),

    /// Subscribe to events: ["REQ", <subscription_id>, <filter1>, <filter2>, ...]
    Req {
        subscription_id: String,
        filters: Vec<Filter>,
    },

    /// Close a subscription: ["CLOSE", <subscription_id>]
    Close { subscription_id: String },

    /// Authentication (NIP-42): ["AUTH", <event JSON>]
    Auth(Event),

    /// Count request (NIP-45): ["COUNT", <subscription_id>, <filter1>, ...]
    Count {
        subscription_id: String,
        filters: Vec<Filter>,
    },
}

impl ClientMessage {
    pub fn req(subscription_id: impl Into<String>, filters: Vec<Filter>) -> Self {
        Self::Req {
            subscription_id: subscription_id.into(),
            filters,
        }
    }

    pub fn close(subscription_id: impl Into<String>) -> Self {
        Self::Close {
            subscription_id: subscription_id.into(),
        }
    }

    pub fn count(subscription_id: impl Into<String>, filters: Vec<Filter>) -> Self {
        Self::Count {
            subscription_id: subscription_id.into(),
            filters,
        }
    }

    /// Wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Event(_) => "EVENT",
            Self::Req { .. } => "REQ",
            Self::Close { .. } => "CLOSE",
            Self::Auth(_) => "AUTH",
            Self::Count { .. } => "COUNT",
        }
    }

    /// Serialize to JSON array for sending to relay.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a message a client sent. Relay-to-client shapes are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        match Message::from_json(json)? {
            Message::Client(message) => Ok(message),
            Message::Relay(_) => Err(MessageError::UnexpectedDirection(
                "relay-to-client message",
            )),
        }
    }

    pub(super) fn decode(wire: &WireArray<'_>) -> Result<Self> {
        let message = match wire.kind() {
            "EVENT" => Self::Event(wire.field(1, "event")?),
            "AUTH" => Self::Auth(wire.field(1, "event")?),
            "CLOSE" => Self::Close {
                subscription_id: wire.field(1, "subscription_id")?,
            },
            // Every element after the subscription id is a filter.
            "REQ" => {
                return Ok(Self::Req {
                    subscription_id: wire.field(1, "subscription_id")?,
                    filters: wire.rest(2, "filter")?,
                });
            }
            "COUNT" => {
                return Ok(Self::Count {
                    subscription_id: wire.field(1, "subscription_id")?,
                    filters: wire.rest(2, "filter")?,
                });
            }
            other => return Err(MessageError::UnknownMessageKind(other.to_string())),
        };
        wire.finish(2);
        Ok(message)
    }
}

impl Serialize for ClientMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        seq.serialize_element(self.kind())?;
        match self {
            Self::Event(event) | Self::Auth(event) => seq.serialize_element(event)?,
            Self::Req {
                subscription_id,
                filters,
            }
            | Self::Count {
                subscription_id,
                filters,
            } => {
                seq.serialize_element(subscription_id)?;
                for filter in filters {
                    seq.serialize_element(filter)?;
                }
            }
            Self::Close { subscription_id } => seq.serialize_element(subscription_id)?,
        }
        seq.end()
    }
}
