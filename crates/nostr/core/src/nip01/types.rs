use super::error::{Nip01Error, Result};
use crate::hex_codec;
use bitcoin::secp256k1;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Hex `Display`/`Debug`/`FromStr` and serde-as-hex-string for fixed-size ids.
macro_rules! hex_identifier {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex_codec::to_hex(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = Nip01Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Self::from_hex(&value).map_err(de::Error::custom)
            }
        }
    };
}

/// SHA-256 of an event's canonical serialization.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EventId([u8; 32]);

hex_identifier!(EventId, 32);

impl EventId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| Nip01Error::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        Ok(Self(hex_codec::from_hex(value)?))
    }
}

/// x-only secp256k1 public key.
///
/// The all-zero value is the null sentinel: it is never a valid point, and any
/// signature check against it fails.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PublicKey([u8; 32]);

hex_identifier!(PublicKey, 32);

impl PublicKey {
    pub const NULL: Self = Self([0u8; 32]);

    /// Parse 32 bytes, rejecting values that are not an x-coordinate on the curve.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let xonly = secp256k1::XOnlyPublicKey::from_slice(bytes)
            .map_err(|error| Nip01Error::KeyParse(error.to_string()))?;
        Ok(Self(xonly.serialize()))
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        let bytes: [u8; 32] = hex_codec::from_hex(value)?;
        Self::from_slice(&bytes)
    }

    /// Parse hex, falling back to [`PublicKey::NULL`] on any failure.
    ///
    /// Used when decoding events received from the network: a malformed author
    /// field must not abort decoding of the whole event. The resulting event
    /// simply fails verification.
    pub fn from_hex_lenient(value: &str) -> Self {
        Self::from_hex(value).unwrap_or_else(|error| {
            debug!("public key {:?} replaced by null sentinel: {}", value, error);
            Self::NULL
        })
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub(crate) fn to_xonly(self) -> Option<secp256k1::XOnlyPublicKey> {
        if self.is_null() {
            return None;
        }
        secp256k1::XOnlyPublicKey::from_slice(&self.0).ok()
    }

    pub(crate) fn from_xonly(xonly: &secp256k1::XOnlyPublicKey) -> Self {
        Self(xonly.serialize())
    }
}

/// 64-byte BIP-340 Schnorr signature. All-zero is the null sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature([u8; 64]);

hex_identifier!(Signature, 64);

impl Default for Signature {
    fn default() -> Self {
        Self::NULL
    }
}

impl Signature {
    pub const NULL: Self = Self([0u8; 64]);

    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        Ok(Self(hex_codec::from_hex(value)?))
    }

    /// Parse hex, falling back to [`Signature::NULL`] on any failure.
    pub fn from_hex_lenient(value: &str) -> Self {
        Self::from_hex(value).unwrap_or_else(|error| {
            debug!("signature replaced by null sentinel: {}", error);
            Self::NULL
        })
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 64]
    }
}

/// secp256k1 secret key. `Debug` never prints key material.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey(secp256k1::SecretKey);

impl SecretKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        secp256k1::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|error| Nip01Error::KeyParse(error.to_string()))
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        let bytes: [u8; 32] = hex_codec::from_hex(value)?;
        Self::from_slice(&bytes)
    }

    pub fn secret_bytes(&self) -> [u8; 32] {
        self.0.secret_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex_codec::to_hex(&self.secret_bytes())
    }

    pub(crate) fn as_secp(&self) -> &secp256k1::SecretKey {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl FromStr for SecretKey {
    type Err = Nip01Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Unix timestamp in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);
    /// Sentinel for "no upper bound".
    pub const MAX: Self = Self(u64::MAX);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Self(secs)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative unix timestamp")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Timestamp, E> {
        Ok(Timestamp(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Timestamp, E> {
        u64::try_from(value)
            .map(Timestamp)
            .map_err(|_| E::custom(format!("negative timestamp {value}")))
    }

    // Sub-second precision is dropped.
    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Timestamp, E> {
        if !value.is_finite() || value < 0.0 {
            return Err(E::custom(format!("invalid timestamp {value}")));
        }
        Ok(Timestamp(value.trunc() as u64))
    }
}

/// Lenient `pubkey` field decoding for [`Event`](super::Event).
pub(crate) fn deserialize_lenient_public_key<'de, D>(
    deserializer: D,
) -> std::result::Result<PublicKey, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(PublicKey::from_hex_lenient(&value))
}

/// Lenient `sig` field decoding for [`Event`](super::Event).
pub(crate) fn deserialize_lenient_signature<'de, D>(
    deserializer: D,
) -> std::result::Result<Signature, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(Signature::from_hex_lenient(&value))
}
