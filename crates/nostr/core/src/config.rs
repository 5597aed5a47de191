//! Codec policies.
//!
//! Two behaviors differ between relay implementations in the wild: whether
//! filter `since`/`until` bounds are inclusive, and whether an oversized `note`
//! payload is truncated or rejected. [`CodecConfig`] makes both explicit.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const ENV_TIMESTAMP_BOUNDS: &str = "NOSTR_WIRE_TIMESTAMP_BOUNDS";
pub const ENV_NOTE_PAYLOAD: &str = "NOSTR_WIRE_NOTE_PAYLOAD";
pub const ENV_VERIFY_CHECKSUM: &str = "NOSTR_WIRE_VERIFY_CHECKSUM";

/// How filter `since`/`until` compare against `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampBounds {
    /// `since <= created_at <= until`
    #[default]
    Inclusive,
    /// `since < created_at < until`
    Exclusive,
}

impl TimestampBounds {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Exclusive => "exclusive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "inclusive" => Some(Self::Inclusive),
            "exclusive" => Some(Self::Exclusive),
            _ => None,
        }
    }
}

/// What to do with a `note` payload longer than 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePayloadPolicy {
    /// Keep the first 32 bytes.
    #[default]
    Truncate,
    /// Fail decoding.
    Reject,
}

impl NotePayloadPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Reject => "reject",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "truncate" => Some(Self::Truncate),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Policy knobs shared by the filter, NIP-19 and message codecs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub timestamp_bounds: TimestampBounds,
    pub note_payload: NotePayloadPolicy,
    /// Verify the bech32 checksum when decoding addresses.
    pub verify_checksum: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            timestamp_bounds: TimestampBounds::default(),
            note_payload: NotePayloadPolicy::default(),
            verify_checksum: true,
        }
    }
}

impl CodecConfig {
    /// Defaults overlaid with any `NOSTR_WIRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_TIMESTAMP_BOUNDS) {
            config.timestamp_bounds = TimestampBounds::parse(&value)
                .with_context(|| format!("{ENV_TIMESTAMP_BOUNDS} must be inclusive or exclusive"))?;
        }

        if let Some(value) = lookup(ENV_NOTE_PAYLOAD) {
            config.note_payload = NotePayloadPolicy::parse(&value)
                .with_context(|| format!("{ENV_NOTE_PAYLOAD} must be truncate or reject"))?;
        }

        if let Some(value) = lookup(ENV_VERIFY_CHECKSUM) {
            config.verify_checksum = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => bail!("{ENV_VERIFY_CHECKSUM} must be true or false, got {other:?}"),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.timestamp_bounds, TimestampBounds::Inclusive);
        assert_eq!(config.note_payload, NotePayloadPolicy::Truncate);
        assert!(config.verify_checksum);
    }

    #[test]
    fn test_env_overlay() {
        let config = CodecConfig::from_lookup(lookup(&[
            (ENV_TIMESTAMP_BOUNDS, "Exclusive"),
            (ENV_NOTE_PAYLOAD, "reject"),
            (ENV_VERIFY_CHECKSUM, "false"),
        ]))
        .unwrap();

        assert_eq!(config.timestamp_bounds, TimestampBounds::Exclusive);
        assert_eq!(config.note_payload, NotePayloadPolicy::Reject);
        assert!(!config.verify_checksum);
    }

    #[test]
    fn test_env_overlay_rejects_unknown_values() {
        assert!(CodecConfig::from_lookup(lookup(&[(ENV_TIMESTAMP_BOUNDS, "open")])).is_err());
        assert!(CodecConfig::from_lookup(lookup(&[(ENV_NOTE_PAYLOAD, "drop")])).is_err());
        assert!(CodecConfig::from_lookup(lookup(&[(ENV_VERIFY_CHECKSUM, "yes")])).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CodecConfig = serde_json::from_str(r#"{"note_payload":"reject"}"#).unwrap();
        assert_eq!(config.note_payload, NotePayloadPolicy::Reject);
        assert_eq!(config.timestamp_bounds, TimestampBounds::Inclusive);
        assert!(config.verify_checksum);
    }
}
