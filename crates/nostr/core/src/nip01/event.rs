use super::error::{Nip01Error, Result};
use super::keys::{Keypair, schnorr_sign, schnorr_verify};
use super::kinds::{
    KIND_CLIENT_AUTH, KIND_LONG_FORM_CONTENT, KIND_METADATA, KIND_RECOMMEND_RELAY,
    KIND_SHORT_TEXT_NOTE,
};
use super::types::{EventId, PublicKey, Signature, Timestamp};
use crate::tag_parsing::{collect_tag_values, find_tag_value, parameterized_id};
use rand::CryptoRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A signed Nostr event.
///
/// Fields are public so relays can hold events exactly as received. Changing
/// any hashed field without calling [`Event::update_id`] and re-signing makes
/// [`Event::verify`] return `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// SHA-256 of the canonical serialization
    pub id: EventId,
    /// Author (x-only public key)
    #[serde(deserialize_with = "super::types::deserialize_lenient_public_key")]
    pub pubkey: PublicKey,
    /// Unix timestamp in seconds
    pub created_at: Timestamp,
    /// Event kind
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// Schnorr signature over `id`
    #[serde(deserialize_with = "super::types::deserialize_lenient_signature")]
    pub sig: Signature,
}

/// Serialize an event for hashing.
///
/// Format: `[0, pubkey, created_at, kind, tags, content]`
pub fn serialize_event(event: &Event) -> Result<String> {
    serde_json::to_string(&(
        0,
        &event.pubkey,
        event.created_at,
        event.kind,
        &event.tags,
        &event.content,
    ))
    .map_err(|e| Nip01Error::Serialization(e.to_string()))
}

/// Compute the id an event should carry.
pub fn get_event_hash(event: &Event) -> Result<EventId> {
    let serialized = serialize_event(event)?;
    let digest: [u8; 32] = Sha256::digest(serialized.as_bytes()).into();
    Ok(EventId::from_bytes(digest))
}

impl Event {
    /// Recompute `id` from the current fields.
    pub fn update_id(&mut self) -> Result<()> {
        self.id = get_event_hash(self)?;
        Ok(())
    }

    /// Sign the current `id` with the author's key.
    pub fn sign(&mut self, keypair: &Keypair) -> Result<()> {
        self.sign_inner(keypair, None)
    }

    /// Sign with BIP-340 auxiliary randomness drawn from `rng`.
    pub fn sign_with_rng<R: CryptoRng + ?Sized>(
        &mut self,
        keypair: &Keypair,
        rng: &mut R,
    ) -> Result<()> {
        let mut aux = [0u8; 32];
        rng.fill_bytes(&mut aux);
        self.sign_inner(keypair, Some(&aux))
    }

    fn sign_inner(&mut self, keypair: &Keypair, aux: Option<&[u8; 32]>) -> Result<()> {
        if keypair.public_key != self.pubkey {
            return Err(Nip01Error::Signing(format!(
                "keypair {} does not match event author {}",
                keypair.public_key, self.pubkey
            )));
        }
        self.sig = schnorr_sign(&self.id, &keypair.secret_key, aux);
        Ok(())
    }

    /// `true` when `id` matches the content and `sig` verifies against it.
    pub fn verify(&self) -> bool {
        if self.pubkey.is_null() {
            return false;
        }
        match get_event_hash(self) {
            Ok(id) if id == self.id => schnorr_verify(&self.sig, &self.id, &self.pubkey),
            _ => false,
        }
    }

    /// Re-author the event: new pubkey, new id, new signature.
    ///
    /// Not atomic: if signing fails the event keeps the new pubkey and id.
    /// Clone first if the original must survive.
    pub fn stamp(&mut self, keypair: &Keypair) -> Result<()> {
        self.pubkey = keypair.public_key;
        self.update_id()?;
        self.sign(keypair)
    }

    /// The `d` tag identifier, see [`get_parameterized_id`].
    pub fn parameterized_id(&self) -> Option<&str> {
        parameterized_id(&self.tags)
    }

    /// First value of the first tag named `name` that has a value.
    pub fn first_tag_value(&self, name: &str) -> Option<&str> {
        find_tag_value(&self.tags, name)
    }

    /// First values of every tag named `name`.
    pub fn tag_values(&self, name: &str) -> Vec<String> {
        collect_tag_values(&self.tags, name)
    }
}

/// The identifier of a parameterized replaceable event.
///
/// `Some("")` when the first `d` tag has no value, `None` when there is no
/// `d` tag. The two are different: the first is an addressable event with an
/// empty identifier, the second is not addressable at all.
pub fn get_parameterized_id(tags: &[Vec<String>]) -> Option<String> {
    parameterized_id(tags).map(str::to_owned)
}

/// An event before it has an author, id and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTemplate {
    /// Unix timestamp in seconds
    pub created_at: Timestamp,
    /// Event kind
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
}

impl EventTemplate {
    /// A template stamped with the current time.
    pub fn new(kind: u16, content: impl Into<String>) -> Self {
        Self {
            created_at: Timestamp::now(),
            kind,
            tags: Vec::new(),
            content: content.into(),
        }
    }

    /// Kind 1 short text note.
    pub fn note(content: impl Into<String>, tags: Vec<Vec<String>>) -> Self {
        Self::new(KIND_SHORT_TEXT_NOTE, content).tags(tags)
    }

    /// Kind 0 profile metadata; the content is the metadata JSON object.
    pub fn metadata(metadata: &Metadata) -> Result<Self> {
        let content = serde_json::to_string(metadata)
            .map_err(|e| Nip01Error::Serialization(e.to_string()))?;
        Ok(Self::new(KIND_METADATA, content))
    }

    /// Kind 2 relay recommendation; the content is the relay URL.
    pub fn recommend_relay(url: impl Into<String>) -> Self {
        Self::new(KIND_RECOMMEND_RELAY, url)
    }

    /// Kind 30023 long-form article, addressable by `slug`.
    ///
    /// A `["d", slug]` tag is appended after `tags`.
    pub fn article(
        content: impl Into<String>,
        slug: impl Into<String>,
        tags: Vec<Vec<String>>,
    ) -> Self {
        Self::new(KIND_LONG_FORM_CONTENT, content)
            .tags(tags)
            .tag(vec!["d".to_string(), slug.into()])
    }

    /// Kind 22242 authentication event answering a relay `AUTH` challenge.
    pub fn client_auth(relay_url: impl Into<String>, challenge: impl Into<String>) -> Self {
        Self::new(KIND_CLIENT_AUTH, "")
            .tag(vec!["relay".to_string(), relay_url.into()])
            .tag(vec!["challenge".to_string(), challenge.into()])
    }

    pub fn created_at(mut self, created_at: impl Into<Timestamp>) -> Self {
        self.created_at = created_at.into();
        self
    }

    pub fn tag(mut self, tag: Vec<String>) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tags(mut self, tags: Vec<Vec<String>>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Attach the author, compute the id and sign.
    pub fn finalize(&self, keypair: &Keypair) -> Result<Event> {
        let mut event = Event {
            id: EventId::default(),
            pubkey: keypair.public_key,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: self.content.clone(),
            sig: Signature::NULL,
        };
        event.update_id()?;
        event.sign(keypair)?;
        Ok(event)
    }
}

/// Kind 0 profile content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub picture: String,
}

impl Metadata {
    pub fn new(
        name: impl Into<String>,
        about: impl Into<String>,
        picture: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            picture: picture.into(),
        }
    }

    /// Parse the content of a kind 0 event.
    pub fn from_event(event: &Event) -> Result<Self> {
        if event.kind != KIND_METADATA {
            return Err(Nip01Error::InvalidEvent(format!(
                "expected kind {KIND_METADATA}, got {}",
                event.kind
            )));
        }
        serde_json::from_str(&event.content).map_err(|e| Nip01Error::Serialization(e.to_string()))
    }
}
