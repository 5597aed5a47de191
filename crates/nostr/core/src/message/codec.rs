use super::error::{MessageError, Result};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tracing::trace;

/// A wire message split into its top-level elements, each still raw JSON.
///
/// Elements are decoded by position on demand, so an element nobody asks for
/// is never parsed beyond bracket matching.
pub(crate) struct WireArray<'a> {
    kind: String,
    items: Vec<&'a RawValue>,
}

impl<'a> WireArray<'a> {
    pub(crate) fn parse(json: &'a str) -> Result<Self> {
        let items: Vec<&'a RawValue> = serde_json::from_str(json)
            .map_err(|error| MessageError::MalformedWireJson(error.to_string()))?;
        let Some(first) = items.first() else {
            return Err(MessageError::MalformedWireJson("empty array".to_string()));
        };
        let kind: String = serde_json::from_str(first.get()).map_err(|_| {
            MessageError::MalformedWireJson("first element not a string".to_string())
        })?;
        Ok(Self { kind, items })
    }

    pub(crate) fn kind(&self) -> &str {
        &self.kind
    }

    /// First byte of the element at `index`.
    pub(crate) fn peek(&self, index: usize) -> Option<u8> {
        self.items
            .get(index)
            .and_then(|raw| raw.get().trim_start().bytes().next())
    }

    pub(crate) fn field<T: DeserializeOwned>(&self, index: usize, name: &str) -> Result<T> {
        let raw = self.items.get(index).ok_or_else(|| {
            MessageError::MalformedWireJson(format!("{} missing {}", self.kind, name))
        })?;
        serde_json::from_str(raw.get()).map_err(|error| {
            MessageError::MalformedWireJson(format!("invalid {} {}: {}", self.kind, name, error))
        })
    }

    /// Every element from `start` on, at least one required.
    pub(crate) fn rest<T: DeserializeOwned>(&self, start: usize, name: &str) -> Result<Vec<T>> {
        if self.items.len() <= start {
            return Err(MessageError::MalformedWireJson(format!(
                "{} missing {}",
                self.kind, name
            )));
        }
        (start..self.items.len())
            .map(|index| self.field(index, name))
            .collect()
    }

    /// Note elements past the `used` positions. They are ignored.
    pub(crate) fn finish(&self, used: usize) {
        if self.items.len() > used {
            trace!(
                "{}: ignoring {} trailing element(s)",
                self.kind,
                self.items.len() - used
            );
        }
    }
}
