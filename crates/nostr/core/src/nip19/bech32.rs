//! Bech32 (BIP-173) envelope without the length cap.
//!
//! NIP-19 TLV addresses routinely exceed the BIP-173 length limits, so the
//! checksum used here is plain bech32 with an unbounded code length.

use super::error::{Nip19Error, Result};
use bech32::primitives::decode::{
    CharError, ChecksumError, UncheckedHrpstring, UncheckedHrpstringError,
};
use bech32::primitives::hrp::Error as HrpError;
use bech32::{Bech32, ByteIterExt, Checksum, Fe32, Fe32IterExt, Hrp};

const CHECKSUM_LEN: usize = <Bech32 as Checksum>::CHECKSUM_LENGTH;

/// Bech32 checksum with no upper bound on the encoded length.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NostrBech32 {}

impl Checksum for NostrBech32 {
    type MidstateRepr = u32;
    const CODE_LENGTH: usize = usize::MAX;
    const CHECKSUM_LENGTH: usize = CHECKSUM_LEN;
    const GENERATOR_SH: [u32; 5] = <Bech32 as Checksum>::GENERATOR_SH;
    const TARGET_RESIDUE: u32 = <Bech32 as Checksum>::TARGET_RESIDUE;
}

/// Regroup bytes into 5-bit words, zero-padding the last word.
pub fn to_words(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .copied()
        .bytes_to_fes()
        .map(Fe32::to_u8)
        .collect()
}

/// Regroup 5-bit words into bytes.
///
/// Fails with `InvalidPadding` when the leftover bits are five or more, or are
/// not all zero.
pub fn from_words(words: &[u8]) -> Result<Vec<u8>> {
    let fes = words
        .iter()
        .map(|&word| Fe32::try_from(word).map_err(|_| Nip19Error::InvalidWord(word)))
        .collect::<Result<Vec<Fe32>>>()?;

    let padding_bits = fes.len() * 5 % 8;
    if padding_bits > 4 {
        return Err(Nip19Error::InvalidPadding);
    }
    if let Some(last) = fes.last() {
        let mask = (1u8 << padding_bits) - 1;
        if last.to_u8() & mask != 0 {
            return Err(Nip19Error::InvalidPadding);
        }
    }
    Ok(fes.into_iter().fes_to_bytes().collect())
}

/// Encode `data` under the lowercase human-readable prefix `hrp`.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String> {
    let hrp = Hrp::parse(hrp).map_err(|error| Nip19Error::InvalidFormat(error.to_string()))?;
    bech32::encode::<NostrBech32>(hrp, data)
        .map_err(|error| Nip19Error::InvalidFormat(error.to_string()))
}

/// Decode an address into its prefix and payload bytes, verifying the checksum.
pub fn decode(address: &str) -> Result<(String, Vec<u8>)> {
    decode_with(address, true)
}

/// Decode an address, optionally skipping checksum verification.
///
/// Input is case-folded to lowercase before decoding. The data part must hold
/// at least one character beyond the checksum.
pub fn decode_with(address: &str, verify: bool) -> Result<(String, Vec<u8>)> {
    let address = address.to_lowercase();
    let unchecked = UncheckedHrpstring::new(&address).map_err(parse_error)?;

    let data_len = unchecked.data_part_ascii().len();
    if data_len <= CHECKSUM_LEN {
        return Err(Nip19Error::InvalidFormat(format!(
            "data part is {data_len} characters, needs more than the {CHECKSUM_LEN} character checksum"
        )));
    }

    if verify {
        unchecked
            .validate_checksum::<NostrBech32>()
            .map_err(|error| match error {
                ChecksumError::InvalidResidue => Nip19Error::InvalidChecksum,
                other => Nip19Error::InvalidFormat(other.to_string()),
            })?;
    }

    let checked = unchecked.remove_checksum::<NostrBech32>();
    checked
        .validate_segwit_padding()
        .map_err(|_| Nip19Error::InvalidPadding)?;

    Ok((checked.hrp().to_lowercase(), checked.byte_iter().collect()))
}

fn parse_error(error: UncheckedHrpstringError) -> Nip19Error {
    match error {
        UncheckedHrpstringError::Char(CharError::InvalidChar(c)) => {
            Nip19Error::InvalidCharacter(c)
        }
        UncheckedHrpstringError::Char(CharError::MissingSeparator) => {
            Nip19Error::InvalidFormat("missing separator '1'".to_string())
        }
        UncheckedHrpstringError::Hrp(HrpError::Empty) => {
            Nip19Error::InvalidFormat("empty human-readable prefix".to_string())
        }
        UncheckedHrpstringError::Hrp(HrpError::NonAsciiChar(c)) => {
            Nip19Error::InvalidCharacter(c)
        }
        UncheckedHrpstringError::Hrp(HrpError::InvalidAsciiByte(b)) => {
            Nip19Error::InvalidCharacter(char::from(b))
        }
        other => Nip19Error::InvalidFormat(other.to_string()),
    }
}
