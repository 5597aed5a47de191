//! NIP-21: `nostr:` URI scheme
//!
//! Wraps a NIP-19 address in a URI. Secret keys are never valid URIs.
//!
//! # References
//!
//! - NIP-21: <https://github.com/nostr-protocol/nips/blob/master/21.md>

use crate::config::CodecConfig;
use crate::nip19::{Nip19Entity, Nip19Error, ToBech32, decode_address_with};
use thiserror::Error;

pub const NOSTR_URI_SCHEME: &str = "nostr:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Nip21Error {
    #[error("missing nostr: scheme")]
    MissingScheme,

    #[error("nsec is not allowed in nostr: URIs")]
    SecretKeyNotAllowed,

    #[error(transparent)]
    Nip19(#[from] Nip19Error),
}

pub fn to_nostr_uri(entity: &Nip19Entity) -> Result<String, Nip21Error> {
    if matches!(entity, Nip19Entity::SecretKey(_)) {
        return Err(Nip21Error::SecretKeyNotAllowed);
    }
    Ok(format!("{NOSTR_URI_SCHEME}{}", entity.to_bech32()?))
}

pub fn parse_nostr_uri(uri: &str) -> Result<Nip19Entity, Nip21Error> {
    parse_nostr_uri_with(uri, &CodecConfig::default())
}

/// Parse a `nostr:` URI. The scheme is matched case-insensitively.
pub fn parse_nostr_uri_with(uri: &str, config: &CodecConfig) -> Result<Nip19Entity, Nip21Error> {
    let uri = uri.trim();
    let address = uri
        .get(..NOSTR_URI_SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(NOSTR_URI_SCHEME))
        .and_then(|_| uri.get(NOSTR_URI_SCHEME.len()..))
        .ok_or(Nip21Error::MissingScheme)?;
    let entity = decode_address_with(address, config)?;
    if matches!(entity, Nip19Entity::SecretKey(_)) {
        return Err(Nip21Error::SecretKeyNotAllowed);
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nip01::{PublicKey, SecretKey};
    use crate::nip19::{FromBech32, NProfile};

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
    const NSEC: &str = "nsec1vl029mgpspedva04g90vltkh6fvh240zqtv9k0t9af8935ke9laqsnlfe5";

    #[test]
    fn test_to_nostr_uri() {
        let key = PublicKey::from_bech32(NPUB).unwrap();
        let uri = to_nostr_uri(&Nip19Entity::PublicKey(key)).unwrap();
        assert_eq!(uri, format!("nostr:{NPUB}"));
    }

    #[test]
    fn test_parse_nostr_uri_case_insensitive_scheme() {
        let entity = parse_nostr_uri(&format!("NOSTR:{NPUB}")).unwrap();
        assert_eq!(
            entity,
            Nip19Entity::PublicKey(PublicKey::from_bech32(NPUB).unwrap())
        );
    }

    #[test]
    fn test_parse_nostr_uri_roundtrip_profile() {
        let profile = NProfile::new(
            PublicKey::from_bech32(NPUB).unwrap(),
            vec!["wss://relay.example.com".to_string()],
        );
        let entity = Nip19Entity::Profile(profile);
        let uri = to_nostr_uri(&entity).unwrap();
        assert_eq!(parse_nostr_uri(&uri).unwrap(), entity);
    }

    #[test]
    fn test_nsec_rejected() {
        assert_eq!(
            parse_nostr_uri(&format!("nostr:{NSEC}")),
            Err(Nip21Error::SecretKeyNotAllowed)
        );
        let secret = SecretKey::from_bech32(NSEC).unwrap();
        assert_eq!(
            to_nostr_uri(&Nip19Entity::SecretKey(secret)),
            Err(Nip21Error::SecretKeyNotAllowed)
        );
    }

    #[test]
    fn test_missing_scheme() {
        assert_eq!(parse_nostr_uri(NPUB), Err(Nip21Error::MissingScheme));
        assert_eq!(parse_nostr_uri("nos"), Err(Nip21Error::MissingScheme));
    }

    #[test]
    fn test_bad_address_propagates() {
        assert!(matches!(
            parse_nostr_uri("nostr:xyz"),
            Err(Nip21Error::Nip19(Nip19Error::InvalidFormat(_)))
        ));
    }
}
