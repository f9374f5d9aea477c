//! # secp256k1 Signing and Recovery
//!
//! Signs 32-byte digests with recoverable ECDSA and recovers the signing
//! address from a digest and `(v, r, s)`, the way `ecrecover` does on-chain.
//!
//! ## Security Invariant
//!
//! - Signatures are produced low-S with `v ∈ {27, 28}`.
//! - Recovery accepts `v ∈ {0, 1, 27, 28}` and reports any other input, or
//!   any `(r, s)` that does not recover to a curve point, as `None`.
//! - `Secp256k1KeyPair` does not implement `Serialize` and its `Debug`
//!   output shows only the address.

use alloy_primitives::{keccak256, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// An Ethereum-style recoverable signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Eip712Signature {
    /// Recovery byte, 27 or 28.
    pub v: u8,
    /// `r` scalar, big-endian.
    pub r: B256,
    /// `s` scalar, big-endian.
    pub s: B256,
}

impl Eip712Signature {
    /// The 65-byte `r || s || v` form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// Parse the 65-byte `r || s || v` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignatureLength(bytes.len()));
        }
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }
}

/// Derive the Ethereum address of a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the address that signed `digest`, if any.
pub fn recover_address(digest: &B256, signature: &Eip712Signature) -> Option<Address> {
    let recovery_byte = match signature.v {
        27 | 28 => signature.v - 27,
        0 | 1 => signature.v,
        _ => return None,
    };
    let recovery_id = RecoveryId::from_byte(recovery_byte)?;

    let mut raw = [0u8; 64];
    raw[..32].copy_from_slice(signature.r.as_slice());
    raw[32..].copy_from_slice(signature.s.as_slice());
    let sig = Signature::from_slice(&raw).ok()?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id).ok()?;
    Some(address_of(&key))
}

/// A secp256k1 key pair for digest signing.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate a new random key using the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Load a key from its 32-byte big-endian secret scalar.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret.as_slice())
            .map_err(|e| CryptoError::InvalidSigningKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// The address controlled by this key.
    pub fn address(&self) -> Address {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest as-is (no further hashing).
    pub fn sign_digest(&self, digest: &B256) -> Result<Eip712Signature, CryptoError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        let bytes = sig.to_bytes();
        Ok(Eip712Signature {
            v: 27 + recovery_id.to_byte(),
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..]),
        })
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1KeyPair({})", self.address())
    }
}
