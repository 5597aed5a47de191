// Standard event kinds
pub const KIND_METADATA: u16 = 0;
pub const KIND_SHORT_TEXT_NOTE: u16 = 1;
pub const KIND_RECOMMEND_RELAY: u16 = 2;
pub const KIND_CONTACTS: u16 = 3;
/// NIP-42 client authentication.
pub const KIND_CLIENT_AUTH: u16 = 22242;
/// NIP-23 long-form article.
pub const KIND_LONG_FORM_CONTENT: u16 = 30023;

/// Event kind classification according to NIP-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClassification {
    /// Events expected to be stored by relays
    Regular,
    /// Only latest event per pubkey+kind is stored
    Replaceable,
    /// Not expected to be stored by relays
    Ephemeral,
    /// Only latest event per pubkey+kind+d-tag is stored
    Addressable,
    /// Unknown classification
    Unknown,
}

/// Classify an event kind according to NIP-01 rules.
pub fn classify_kind(kind: u16) -> KindClassification {
    match kind {
        1 | 2 | 4..45 | 1000..10000 => KindClassification::Regular,
        0 | 3 | 10000..20000 => KindClassification::Replaceable,
        20000..30000 => KindClassification::Ephemeral,
        30000..40000 => KindClassification::Addressable,
        _ => KindClassification::Unknown,
    }
}

pub fn is_regular_kind(kind: u16) -> bool {
    matches!(classify_kind(kind), KindClassification::Regular)
}

pub fn is_replaceable_kind(kind: u16) -> bool {
    matches!(classify_kind(kind), KindClassification::Replaceable)
}

pub fn is_ephemeral_kind(kind: u16) -> bool {
    matches!(classify_kind(kind), KindClassification::Ephemeral)
}

pub fn is_addressable_kind(kind: u16) -> bool {
    matches!(classify_kind(kind), KindClassification::Addressable)
}
