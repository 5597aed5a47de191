use super::event::Event;
use super::types::Timestamp;
use crate::config::TimestampBounds;
use crate::tag_parsing::{tag_field, tag_name};
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Subscription filter (NIP-01).
///
/// `ids` and `authors` hold lowercase hex, either full values or prefixes.
/// `tags` is keyed by the bare tag name; the wire form prefixes it with `#`.
/// `since` of [`Timestamp::ZERO`] and `until` of [`Timestamp::MAX`] mean
/// "unbounded" and are omitted on the wire.
///
/// The sentinels are values, not flags: an explicit `{"since":0}` decodes to
/// the default filter and stays unbounded under
/// [`TimestampBounds::Exclusive`], so it still matches `created_at == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub ids: Vec<String>,
    pub authors: Vec<String>,
    pub kinds: Vec<u16>,
    pub tags: BTreeMap<String, Vec<String>>,
    /// Lower bound; [`Timestamp::ZERO`] is unbounded.
    pub since: Timestamp,
    /// Upper bound; [`Timestamp::MAX`] is unbounded.
    pub until: Timestamp,
    pub limit: Option<u64>,
    /// Unrecognized keys, re-emitted verbatim on encode.
    pub extra: Map<String, Value>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            authors: Vec::new(),
            kinds: Vec::new(),
            tags: BTreeMap::new(),
            since: Timestamp::ZERO,
            until: Timestamp::MAX,
            limit: None,
            extra: Map::new(),
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }

    pub fn kind(mut self, kind: u16) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    /// Add accepted values for tag `name` (without the `#`).
    pub fn tag<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn since(mut self, since: impl Into<Timestamp>) -> Self {
        self.since = since.into();
        self
    }

    pub fn until(mut self, until: impl Into<Timestamp>) -> Self {
        self.until = until.into();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// [`Filter::matches_with`] under the default inclusive bounds.
    pub fn matches(&self, event: &Event) -> bool {
        self.matches_with(event, TimestampBounds::default())
    }

    /// Whether `event` satisfies every constraint of this filter.
    ///
    /// `limit` only applies to a relay's initial query and is ignored here.
    pub fn matches_with(&self, event: &Event, bounds: TimestampBounds) -> bool {
        self.matches_window(event.created_at, bounds)
            && (self.kinds.is_empty() || self.kinds.contains(&event.kind))
            && matches_hex_prefix(&self.ids, &event.id.to_hex())
            && matches_hex_prefix(&self.authors, &event.pubkey.to_hex())
            && self.matches_tags(&event.tags)
    }

    fn matches_window(&self, created_at: Timestamp, bounds: TimestampBounds) -> bool {
        let after_since = self.since == Timestamp::ZERO
            || match bounds {
                TimestampBounds::Inclusive => created_at >= self.since,
                TimestampBounds::Exclusive => created_at > self.since,
            };
        let before_until = self.until == Timestamp::MAX
            || match bounds {
                TimestampBounds::Inclusive => created_at <= self.until,
                TimestampBounds::Exclusive => created_at < self.until,
            };
        after_since && before_until
    }

    // At least one tag group must match. A group matches when some event tag
    // with the same name carries an accepted first value.
    fn matches_tags(&self, tags: &[Vec<String>]) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        self.tags.iter().any(|(name, accepted)| {
            tags.iter().any(|tag| {
                tag_name(tag) == Some(name.as_str())
                    && tag_field(tag, 1).is_some_and(|value| accepted.iter().any(|a| a == value))
            })
        })
    }
}

/// True when any filter matches. An empty slice matches nothing.
pub fn matches_any(filters: &[Filter], event: &Event) -> bool {
    filters.iter().any(|filter| filter.matches(event))
}

fn matches_hex_prefix(accepted: &[String], hex: &str) -> bool {
    accepted.is_empty()
        || accepted.iter().any(|value| {
            hex.get(..value.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(value))
        })
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.ids.is_empty() {
            map.serialize_entry("ids", &self.ids)?;
        }
        if !self.authors.is_empty() {
            map.serialize_entry("authors", &self.authors)?;
        }
        if !self.kinds.is_empty() {
            map.serialize_entry("kinds", &self.kinds)?;
        }
        for (name, values) in &self.tags {
            map.serialize_entry(&format!("#{name}"), values)?;
        }
        if self.since != Timestamp::ZERO {
            map.serialize_entry("since", &self.since)?;
        }
        if self.until != Timestamp::MAX {
            map.serialize_entry("until", &self.until)?;
        }
        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` decodes to the all-defaults filter.
        let Some(object) = Option::<Map<String, Value>>::deserialize(deserializer)? else {
            return Ok(Self::default());
        };

        let mut filter = Self::default();
        for (key, value) in object {
            let known = matches!(
                key.as_str(),
                "ids" | "authors" | "kinds" | "since" | "until" | "limit"
            ) || key.starts_with('#');
            if known && value.is_null() {
                continue;
            }
            match key.as_str() {
                "ids" => filter.ids = field(&key, value)?,
                "authors" => filter.authors = field(&key, value)?,
                "kinds" => filter.kinds = field(&key, value)?,
                "since" => filter.since = field(&key, value)?,
                "until" => filter.until = field(&key, value)?,
                "limit" => filter.limit = Some(field(&key, value)?),
                _ => match key.strip_prefix('#') {
                    Some(name) => {
                        let values: Vec<String> = field(&key, value)?;
                        filter.tags.entry(name.to_string()).or_default().extend(values);
                    }
                    None => {
                        filter.extra.insert(key, value);
                    }
                },
            }
        }
        Ok(filter)
    }
}

fn field<T: DeserializeOwned, E: de::Error>(key: &str, value: Value) -> Result<T, E> {
    serde_json::from_value(value).map_err(|error| E::custom(format!("filter `{key}`: {error}")))
}
