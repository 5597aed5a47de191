//! Keypairs and the Schnorr signature primitive.
//!
//! Everything that touches secp256k1 goes through [`schnorr_sign`] and
//! [`schnorr_verify`]; the rest of the crate only sees fixed-size byte types.

use super::error::Result;
use super::types::{EventId, PublicKey, SecretKey, Signature};
use crate::nip19::{Nip19Error, ToBech32};
use bitcoin::secp256k1::{Message, Secp256k1, schnorr};
use rand::CryptoRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl Keypair {
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let keypair = bitcoin::secp256k1::Keypair::from_secret_key(&secp, secret_key.as_secp());
        let (xonly, _parity) = keypair.x_only_public_key();
        Self {
            secret_key,
            public_key: PublicKey::from_xonly(&xonly),
        }
    }

    pub fn from_hex(secret_key_hex: &str) -> Result<Self> {
        Ok(Self::from_secret_key(SecretKey::from_hex(secret_key_hex)?))
    }

    /// Draw a fresh secret key from `rng`.
    pub fn generate<R: CryptoRng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            // Zero and values >= the curve order are rejected; retry.
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                return Self::from_secret_key(secret_key);
            }
        }
    }

    pub fn npub(&self) -> std::result::Result<String, Nip19Error> {
        self.public_key.to_bech32()
    }

    pub fn nsec(&self) -> std::result::Result<String, Nip19Error> {
        self.secret_key.to_bech32()
    }

    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }
}

/// Sign an event id. `aux_rand` of `None` selects the deterministic BIP-340 path.
pub fn schnorr_sign(id: &EventId, secret_key: &SecretKey, aux_rand: Option<&[u8; 32]>) -> Signature {
    let secp = Secp256k1::signing_only();
    let keypair = bitcoin::secp256k1::Keypair::from_secret_key(&secp, secret_key.as_secp());
    let message = Message::from_digest(*id.as_bytes());
    let signature = match aux_rand {
        Some(aux) => secp.sign_schnorr_with_aux_rand(&message, &keypair, aux),
        None => secp.sign_schnorr_no_aux_rand(&message, &keypair),
    };
    Signature::from_bytes(signature.serialize())
}

/// Verify a signature over an event id. Never errors: unparseable keys or
/// signatures, including the null sentinels, verify as `false`.
pub fn schnorr_verify(signature: &Signature, id: &EventId, public_key: &PublicKey) -> bool {
    let Some(xonly) = public_key.to_xonly() else {
        return false;
    };
    if signature.is_null() {
        return false;
    }
    let Ok(signature) = schnorr::Signature::from_slice(signature.as_bytes()) else {
        return false;
    };
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*id.as_bytes());
    secp.verify_schnorr(&signature, &message, &xonly).is_ok()
}
