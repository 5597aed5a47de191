//! Fixed-length hex codec for protocol identifiers.
//!
//! Identifiers on the wire are lowercase hex with no separators and no prefix.
//! Decoding is exact: the input must be exactly `2 * N` hex characters.

use thiserror::Error;

/// Errors produced when decoding hex identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid hex length: expected {expected} characters, got {actual}")]
    InvalidHexLength { expected: usize, actual: usize },

    #[error("invalid hex character {character:?} at index {index}")]
    InvalidHexCharacter { character: char, index: usize },
}

/// Encode bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode exactly `N` bytes from a `2 * N` character hex string.
pub fn from_hex<const N: usize>(value: &str) -> Result<[u8; N], HexError> {
    if value.len() != N * 2 {
        return Err(HexError::InvalidHexLength {
            expected: N * 2,
            actual: value.len(),
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(value, &mut out).map_err(|error| match error {
        hex::FromHexError::InvalidHexCharacter { c, index } => HexError::InvalidHexCharacter {
            character: c,
            index,
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::InvalidHexLength {
                expected: N * 2,
                actual: value.len(),
            }
        }
    })?;
    Ok(out)
}

/// Decode a hex string of any even length, skipping one leading `0x`.
pub fn from_hex_prefixed(value: &str) -> Result<Vec<u8>, HexError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|error| match error {
        hex::FromHexError::InvalidHexCharacter { c, index } => HexError::InvalidHexCharacter {
            character: c,
            index: index + (value.len() - digits.len()),
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::InvalidHexLength {
                expected: digits.len() + 1,
                actual: digits.len(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_to_hex_is_lowercase_without_prefix() {
        assert_eq!(to_hex(&[0x00, 0xab, 0xff]), "00abff");
    }

    #[test]
    fn test_from_hex_exact_length() {
        let bytes: [u8; 3] = from_hex("00abff").unwrap();
        assert_eq!(bytes, [0x00, 0xab, 0xff]);

        let upper: [u8; 2] = from_hex("ABCD").unwrap();
        assert_eq!(upper, [0xab, 0xcd]);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert_eq!(
            from_hex::<4>("abcd"),
            Err(HexError::InvalidHexLength {
                expected: 8,
                actual: 4
            })
        );
        assert!(matches!(
            from_hex::<1>("abc"),
            Err(HexError::InvalidHexLength { .. })
        ));
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        assert_eq!(
            from_hex::<2>("ab0g"),
            Err(HexError::InvalidHexCharacter {
                character: 'g',
                index: 3
            })
        );
    }

    #[test]
    fn test_rejects_0x_prefix() {
        assert!(from_hex::<2>("0xabcd").is_err());
    }

    #[test]
    fn test_prefixed_skips_0x() {
        assert_eq!(from_hex_prefixed("0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(from_hex_prefixed("abcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(
            from_hex_prefixed("0xabz0"),
            Err(HexError::InvalidHexCharacter {
                character: 'z',
                index: 4
            })
        );
        assert!(matches!(
            from_hex_prefixed("0xabc"),
            Err(HexError::InvalidHexLength { .. })
        ));
    }

    #[test]
    fn test_hex_roundtrip_property() {
        fn prop(bytes: Vec<u8>) -> bool {
            let mut fixed = [0u8; 16];
            for (slot, byte) in fixed.iter_mut().zip(bytes) {
                *slot = byte;
            }
            from_hex::<16>(&to_hex(&fixed)) == Ok(fixed)
        }
        quickcheck(prop as fn(Vec<u8>) -> bool);
    }
}
