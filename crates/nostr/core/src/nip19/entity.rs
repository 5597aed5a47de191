use super::bech32;
use super::error::{Nip19Error, Result};
use super::tlv::{TLV_AUTHOR, TLV_KIND, TLV_RELAY, TLV_SPECIAL, TlvIter, TlvWriter};
use crate::config::{CodecConfig, NotePayloadPolicy};
use crate::nip01::{EventId, PublicKey, SecretKey};
use tracing::{debug, trace};

pub const PREFIX_NPUB: &str = "npub";
pub const PREFIX_NSEC: &str = "nsec";
pub const PREFIX_NOTE: &str = "note";
pub const PREFIX_NPROFILE: &str = "nprofile";
pub const PREFIX_NEVENT: &str = "nevent";
pub const PREFIX_NADDR: &str = "naddr";
pub const PREFIX_NRELAY: &str = "nrelay";

/// Encode to a bech32 address.
pub trait ToBech32 {
    fn to_bech32(&self) -> Result<String>;
}

/// Decode from a bech32 address.
pub trait FromBech32: Sized {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self>;

    fn from_bech32(address: &str) -> Result<Self> {
        Self::from_bech32_with(address, &CodecConfig::default())
    }
}

/// A bare event id (`note`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NNote {
    pub id: EventId,
}

/// A profile with relay hints (`nprofile`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NProfile {
    pub public_key: PublicKey,
    pub relays: Vec<String>,
}

/// An event with optional relay, author and kind hints (`nevent`).
///
/// A null author is never written, so it decodes back as `None`.
///
/// TLV kinds are 32-bit while NIP-01 event kinds are 16-bit; see
/// [`NEvent::event_kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NEvent {
    pub id: EventId,
    pub relays: Vec<String>,
    pub author: Option<PublicKey>,
    pub kind: Option<u32>,
}

/// A parameterized replaceable event coordinate (`naddr`).
///
/// `author` and `kind` are omitted on encode while they hold their zero value
/// ([`PublicKey::NULL`], `0`) and decode to it when absent.
///
/// `kind` is the 32-bit TLV value. A coordinate whose kind exceeds `u16::MAX`
/// names no NIP-01 event, and [`NAddr::event_kind`] returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NAddr {
    pub identifier: String,
    pub relays: Vec<String>,
    pub author: PublicKey,
    pub kind: u32,
}

/// A relay URL (`nrelay`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NRelay {
    pub url: String,
}

/// Any decodable NIP-19 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nip19Entity {
    PublicKey(PublicKey),
    SecretKey(SecretKey),
    Note(NNote),
    Profile(NProfile),
    Event(NEvent),
    Addr(NAddr),
    Relay(NRelay),
}

impl Nip19Entity {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::PublicKey(_) => PREFIX_NPUB,
            Self::SecretKey(_) => PREFIX_NSEC,
            Self::Note(_) => PREFIX_NOTE,
            Self::Profile(_) => PREFIX_NPROFILE,
            Self::Event(_) => PREFIX_NEVENT,
            Self::Addr(_) => PREFIX_NADDR,
            Self::Relay(_) => PREFIX_NRELAY,
        }
    }
}

/// Decode any NIP-19 address, dispatching on its prefix.
pub fn decode_address(address: &str) -> Result<Nip19Entity> {
    decode_address_with(address, &CodecConfig::default())
}

pub fn decode_address_with(address: &str, config: &CodecConfig) -> Result<Nip19Entity> {
    let (prefix, payload) = bech32::decode_with(address, config.verify_checksum)?;
    let entity = match prefix.as_str() {
        PREFIX_NPUB => Nip19Entity::PublicKey(public_key_from_payload(&payload)?),
        PREFIX_NSEC => Nip19Entity::SecretKey(secret_key_from_payload(&payload)?),
        PREFIX_NOTE => Nip19Entity::Note(NNote::from_payload(&payload, config)?),
        PREFIX_NPROFILE => Nip19Entity::Profile(NProfile::from_payload(&payload)?),
        PREFIX_NEVENT => Nip19Entity::Event(NEvent::from_payload(&payload)?),
        PREFIX_NADDR => Nip19Entity::Addr(NAddr::from_payload(&payload)?),
        PREFIX_NRELAY => Nip19Entity::Relay(NRelay::from_payload(&payload)?),
        _ => return Err(Nip19Error::UnknownEntityKind(prefix)),
    };
    Ok(entity)
}

impl ToBech32 for Nip19Entity {
    fn to_bech32(&self) -> Result<String> {
        match self {
            Self::PublicKey(key) => key.to_bech32(),
            Self::SecretKey(key) => key.to_bech32(),
            Self::Note(note) => note.to_bech32(),
            Self::Profile(profile) => profile.to_bech32(),
            Self::Event(event) => event.to_bech32(),
            Self::Addr(addr) => addr.to_bech32(),
            Self::Relay(relay) => relay.to_bech32(),
        }
    }
}

impl FromBech32 for Nip19Entity {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        decode_address_with(address, config)
    }
}

fn decode_prefixed(address: &str, expected: &'static str, config: &CodecConfig) -> Result<Vec<u8>> {
    let (prefix, payload) = bech32::decode_with(address, config.verify_checksum)?;
    if prefix != expected {
        return Err(Nip19Error::WrongPrefix {
            expected,
            found: prefix,
        });
    }
    Ok(payload)
}

fn public_key_from_payload(bytes: &[u8]) -> Result<PublicKey> {
    PublicKey::from_slice(bytes).map_err(|error| Nip19Error::InvalidBech32(error.to_string()))
}

fn secret_key_from_payload(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(bytes).map_err(|error| Nip19Error::InvalidBech32(error.to_string()))
}

fn event_id_from_payload(bytes: &[u8]) -> Result<EventId> {
    EventId::from_slice(bytes).map_err(|error| Nip19Error::InvalidTlv(error.to_string()))
}

fn utf8(field: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|error| Nip19Error::InvalidTlv(format!("{field}: {error}")))
}

fn kind_from_payload(bytes: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = bytes
        .try_into()
        .map_err(|_| Nip19Error::InvalidTlv(format!("kind is {} bytes, expected 4", bytes.len())))?;
    Ok(u32::from_be_bytes(bytes))
}

fn skip_unknown(prefix: &str, kind: u8) {
    trace!("{}: skipping unknown TLV type {}", prefix, kind);
}

impl ToBech32 for PublicKey {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NPUB, self.as_bytes())
    }
}

impl FromBech32 for PublicKey {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        public_key_from_payload(&decode_prefixed(address, PREFIX_NPUB, config)?)
    }
}

impl ToBech32 for SecretKey {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NSEC, &self.secret_bytes())
    }
}

impl FromBech32 for SecretKey {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        secret_key_from_payload(&decode_prefixed(address, PREFIX_NSEC, config)?)
    }
}

impl NNote {
    pub fn new(id: EventId) -> Self {
        Self { id }
    }

    fn from_payload(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let len = bytes.len();
        if len < EventId::LEN {
            return Err(Nip19Error::InvalidTlv(format!(
                "note payload is {len} bytes, expected {}",
                EventId::LEN
            )));
        }
        if len > EventId::LEN {
            match config.note_payload {
                NotePayloadPolicy::Truncate => {
                    debug!("note payload of {} bytes truncated to {}", len, EventId::LEN);
                }
                NotePayloadPolicy::Reject => {
                    return Err(Nip19Error::InvalidTlv(format!(
                        "note payload is {len} bytes, expected {}",
                        EventId::LEN
                    )));
                }
            }
        }
        Ok(Self {
            id: event_id_from_payload(&bytes[..EventId::LEN])?,
        })
    }
}

impl ToBech32 for NNote {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NOTE, self.id.as_bytes())
    }
}

impl FromBech32 for NNote {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        Self::from_payload(&decode_prefixed(address, PREFIX_NOTE, config)?, config)
    }
}

impl NProfile {
    pub fn new(public_key: PublicKey, relays: Vec<String>) -> Self {
        Self { public_key, relays }
    }

    fn from_payload(bytes: &[u8]) -> Result<Self> {
        let mut public_key = None;
        let mut relays = Vec::new();
        for entry in TlvIter::new(bytes) {
            match entry.kind {
                TLV_SPECIAL if public_key.is_none() => {
                    public_key = Some(public_key_from_payload(entry.value)?);
                }
                TLV_SPECIAL => {}
                TLV_RELAY => relays.push(utf8("relay", entry.value)?),
                other => skip_unknown(PREFIX_NPROFILE, other),
            }
        }
        Ok(Self {
            public_key: public_key.ok_or(Nip19Error::MissingField("pubkey"))?,
            relays,
        })
    }

    fn to_payload(&self) -> Result<Vec<u8>> {
        let mut writer = TlvWriter::new();
        writer.push(TLV_SPECIAL, self.public_key.as_bytes())?;
        for relay in &self.relays {
            writer.push(TLV_RELAY, relay.as_bytes())?;
        }
        Ok(writer.into_bytes())
    }
}

impl ToBech32 for NProfile {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NPROFILE, &self.to_payload()?)
    }
}

impl FromBech32 for NProfile {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        Self::from_payload(&decode_prefixed(address, PREFIX_NPROFILE, config)?)
    }
}

impl NEvent {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            relays: Vec::new(),
            author: None,
            kind: None,
        }
    }

    pub fn relay(mut self, url: impl Into<String>) -> Self {
        self.relays.push(url.into());
        self
    }

    /// Set the author hint. [`PublicKey::NULL`] clears it.
    pub fn author(mut self, author: PublicKey) -> Self {
        self.author = (!author.is_null()).then_some(author);
        self
    }

    pub fn kind(mut self, kind: u32) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The kind hint as a NIP-01 event kind, if present and in range.
    pub fn event_kind(&self) -> Option<u16> {
        self.kind.and_then(|kind| u16::try_from(kind).ok())
    }

    fn from_payload(bytes: &[u8]) -> Result<Self> {
        let mut id = None;
        let mut relays = Vec::new();
        let mut author = None;
        let mut kind = None;
        for entry in TlvIter::new(bytes) {
            match entry.kind {
                TLV_SPECIAL if id.is_none() => id = Some(event_id_from_payload(entry.value)?),
                TLV_SPECIAL => {}
                TLV_RELAY => relays.push(utf8("relay", entry.value)?),
                TLV_AUTHOR if author.is_none() => {
                    author = Some(public_key_from_payload(entry.value)?);
                }
                TLV_KIND if kind.is_none() => kind = Some(kind_from_payload(entry.value)?),
                TLV_AUTHOR | TLV_KIND => {}
                other => skip_unknown(PREFIX_NEVENT, other),
            }
        }
        Ok(Self {
            id: id.ok_or(Nip19Error::MissingField("id"))?,
            relays,
            author,
            kind,
        })
    }

    fn to_payload(&self) -> Result<Vec<u8>> {
        let mut writer = TlvWriter::new();
        writer.push(TLV_SPECIAL, self.id.as_bytes())?;
        for relay in &self.relays {
            writer.push(TLV_RELAY, relay.as_bytes())?;
        }
        if let Some(author) = self.author.filter(|author| !author.is_null()) {
            writer.push(TLV_AUTHOR, author.as_bytes())?;
        }
        if let Some(kind) = self.kind {
            writer.push(TLV_KIND, &kind.to_be_bytes())?;
        }
        Ok(writer.into_bytes())
    }
}

impl ToBech32 for NEvent {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NEVENT, &self.to_payload()?)
    }
}

impl FromBech32 for NEvent {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        Self::from_payload(&decode_prefixed(address, PREFIX_NEVENT, config)?)
    }
}

impl NAddr {
    pub fn new(identifier: impl Into<String>, author: PublicKey, kind: u32) -> Self {
        Self {
            identifier: identifier.into(),
            relays: Vec::new(),
            author,
            kind,
        }
    }

    pub fn relay(mut self, url: impl Into<String>) -> Self {
        self.relays.push(url.into());
        self
    }

    /// The coordinate kind as a NIP-01 event kind, if it fits in 16 bits.
    pub fn event_kind(&self) -> Option<u16> {
        u16::try_from(self.kind).ok()
    }

    fn from_payload(bytes: &[u8]) -> Result<Self> {
        let mut identifier = None;
        let mut relays = Vec::new();
        let mut author = None;
        let mut kind = None;
        for entry in TlvIter::new(bytes) {
            match entry.kind {
                TLV_SPECIAL if identifier.is_none() => {
                    identifier = Some(utf8("identifier", entry.value)?);
                }
                TLV_SPECIAL => {}
                TLV_RELAY => relays.push(utf8("relay", entry.value)?),
                TLV_AUTHOR if author.is_none() => {
                    author = Some(public_key_from_payload(entry.value)?);
                }
                TLV_KIND if kind.is_none() => kind = Some(kind_from_payload(entry.value)?),
                TLV_AUTHOR | TLV_KIND => {}
                other => skip_unknown(PREFIX_NADDR, other),
            }
        }
        Ok(Self {
            identifier: identifier.ok_or(Nip19Error::MissingField("identifier"))?,
            relays,
            author: author.unwrap_or(PublicKey::NULL),
            kind: kind.unwrap_or(0),
        })
    }

    fn to_payload(&self) -> Result<Vec<u8>> {
        let mut writer = TlvWriter::new();
        writer.push(TLV_SPECIAL, self.identifier.as_bytes())?;
        for relay in &self.relays {
            writer.push(TLV_RELAY, relay.as_bytes())?;
        }
        if !self.author.is_null() {
            writer.push(TLV_AUTHOR, self.author.as_bytes())?;
        }
        if self.kind != 0 {
            writer.push(TLV_KIND, &self.kind.to_be_bytes())?;
        }
        Ok(writer.into_bytes())
    }
}

impl ToBech32 for NAddr {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NADDR, &self.to_payload()?)
    }
}

impl FromBech32 for NAddr {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        Self::from_payload(&decode_prefixed(address, PREFIX_NADDR, config)?)
    }
}

impl NRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    // Returns on the first URL; anything after it is ignored.
    fn from_payload(bytes: &[u8]) -> Result<Self> {
        for entry in TlvIter::new(bytes) {
            if entry.kind == TLV_SPECIAL {
                return Ok(Self {
                    url: utf8("relay", entry.value)?,
                });
            }
            skip_unknown(PREFIX_NRELAY, entry.kind);
        }
        Err(Nip19Error::MissingField("relay"))
    }

    fn to_payload(&self) -> Result<Vec<u8>> {
        let mut writer = TlvWriter::new();
        writer.push(TLV_SPECIAL, self.url.as_bytes())?;
        Ok(writer.into_bytes())
    }
}

impl ToBech32 for NRelay {
    fn to_bech32(&self) -> Result<String> {
        bech32::encode(PREFIX_NRELAY, &self.to_payload()?)
    }
}

impl FromBech32 for NRelay {
    fn from_bech32_with(address: &str, config: &CodecConfig) -> Result<Self> {
        Self::from_payload(&decode_prefixed(address, PREFIX_NRELAY, config)?)
    }
}
