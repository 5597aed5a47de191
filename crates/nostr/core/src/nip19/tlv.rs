//! Type-length-value triples carried inside `nprofile`, `nevent`, `naddr` and
//! `nrelay` payloads.

use super::error::{Nip19Error, Result};

/// Main value: pubkey, event id, identifier or relay URL.
pub const TLV_SPECIAL: u8 = 0;
/// Relay URL, repeatable.
pub const TLV_RELAY: u8 = 1;
/// 32-byte author public key.
pub const TLV_AUTHOR: u8 = 2;
/// 4-byte big-endian kind.
pub const TLV_KIND: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvEntry<'a> {
    pub kind: u8,
    pub value: &'a [u8],
}

/// Walks `(type, length, value)` triples.
///
/// An incomplete trailing triple ends the walk without an error.
#[derive(Debug, Clone)]
pub struct TlvIter<'a> {
    remaining: &'a [u8],
}

impl<'a> TlvIter<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = TlvEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let [kind, len, rest @ ..] = self.remaining else {
            self.remaining = &[];
            return None;
        };
        let len = usize::from(*len);
        let Some(value) = rest.get(..len) else {
            self.remaining = &[];
            return None;
        };
        let kind = *kind;
        self.remaining = &rest[len..];
        Some(TlvEntry { kind, value })
    }
}

/// Builds a TLV payload.
#[derive(Debug, Clone, Default)]
pub struct TlvWriter {
    buf: Vec<u8>,
}

impl TlvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: u8, value: &[u8]) -> Result<()> {
        let len = u8::try_from(value.len()).map_err(|_| Nip19Error::TlvValueTooLong {
            kind,
            len: value.len(),
        })?;
        self.buf.push(kind);
        self.buf.push(len);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
