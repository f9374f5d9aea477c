//! # Signing and Recovery Capabilities
//!
//! The typed-data proxy never holds key material. It asks a caller-supplied
//! capability to sign a digest, and another to recover the signer of a
//! digest. Both are traits so the backend can be:
//!
//! - [`LocalKeyProvider`]: In-memory secp256k1 key for development and
//!   testing.
//! - [`EnvKeyProvider`]: Loads the secret from an environment variable
//!   (hex-encoded 32-byte scalar). Suitable for container deployments where
//!   secrets are injected via environment.
//! - A remote signer or hardware wallet implemented outside this crate.
//!   Such an implementation may block on I/O inside `sign_digest`; the
//!   proxy adds no timeout or retry around it.
//!
//! ## Error Propagation
//!
//! Each capability names its own `Error` type and the proxy returns it to
//! the caller unchanged. Recovery distinguishes "this signature recovers to
//! no key" (`Ok(None)`, an ordinary verification failure) from "the
//! recovery backend failed" (`Err`).

use std::convert::Infallible;

use alloy_primitives::{hex, Address, B256};

use crate::error::CryptoError;
use crate::secp256k1::{recover_address, Eip712Signature, Secp256k1KeyPair};

/// Signs 32-byte digests.
pub trait DigestSigner: Send + Sync {
    /// Failure reported by the signing backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sign `digest` as-is.
    fn sign_digest(&self, digest: &B256) -> Result<Eip712Signature, Self::Error>;

    /// The address whose signatures this signer produces.
    fn address(&self) -> Result<Address, Self::Error>;

    /// Human-readable name for this provider (for diagnostics/logging).
    fn provider_name(&self) -> &str;
}

/// Recovers the signer of a digest.
pub trait SignerRecovery: Send + Sync {
    /// Failure reported by the recovery backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Recover the address that produced `signature` over `digest`.
    fn recover(
        &self,
        digest: &B256,
        signature: &Eip712Signature,
    ) -> Result<Option<Address>, Self::Error>;
}

// ─── LocalKeyProvider ────────────────────────────────────────────────────

/// In-memory secp256k1 key provider for development and testing.
#[derive(Debug)]
pub struct LocalKeyProvider {
    key: Secp256k1KeyPair,
}

impl LocalKeyProvider {
    /// Wrap an existing key pair.
    pub fn new(key: Secp256k1KeyPair) -> Self {
        Self { key }
    }

    /// Generate a new random key using the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            key: Secp256k1KeyPair::generate(),
        }
    }

    /// Create from a raw 32-byte secret.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: Secp256k1KeyPair::from_secret_bytes(secret)?,
        })
    }
}

impl DigestSigner for LocalKeyProvider {
    type Error = CryptoError;

    fn sign_digest(&self, digest: &B256) -> Result<Eip712Signature, CryptoError> {
        self.key.sign_digest(digest)
    }

    fn address(&self) -> Result<Address, CryptoError> {
        Ok(self.key.address())
    }

    fn provider_name(&self) -> &str {
        "LocalKeyProvider"
    }
}

// ─── EnvKeyProvider ──────────────────────────────────────────────────────

/// Loads a secp256k1 signing key from an environment variable.
///
/// The variable must hold 64 hex characters, optionally `0x`-prefixed.
///
/// ```bash
/// export EAS_SIGNING_KEY="0x4c0883a6..."
/// ```
#[derive(Debug)]
pub struct EnvKeyProvider {
    key: Secp256k1KeyPair,
    var_name: String,
}

impl EnvKeyProvider {
    /// Load the signing key from the named environment variable.
    pub fn from_env(var_name: &str) -> Result<Self, CryptoError> {
        let raw = std::env::var(var_name)
            .map_err(|_| CryptoError::MissingEnv(var_name.to_string()))?;
        Self::from_hex(var_name, &raw)
    }

    fn from_hex(var_name: &str, raw: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(raw.trim()).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        let secret: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidSigningKey(format!(
                "expected 32 bytes in {var_name}, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self {
            key: Secp256k1KeyPair::from_secret_bytes(&secret)?,
            var_name: var_name.to_string(),
        })
    }

    /// Return the environment variable name this provider was loaded from.
    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}

impl DigestSigner for EnvKeyProvider {
    type Error = CryptoError;

    fn sign_digest(&self, digest: &B256) -> Result<Eip712Signature, CryptoError> {
        self.key.sign_digest(digest)
    }

    fn address(&self) -> Result<Address, CryptoError> {
        Ok(self.key.address())
    }

    fn provider_name(&self) -> &str {
        "EnvKeyProvider"
    }
}

// ─── EcdsaRecovery ───────────────────────────────────────────────────────

/// Local `ecrecover`. Cannot fail; malformed signatures recover to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecovery;

impl SignerRecovery for EcdsaRecovery {
    type Error = Infallible;

    fn recover(
        &self,
        digest: &B256,
        signature: &Eip712Signature,
    ) -> Result<Option<Address>, Infallible> {
        Ok(recover_address(digest, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    const SECRET_HEX: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn local_provider_sign_and_recover() {
        let provider = LocalKeyProvider::generate();
        let digest = keccak256(b"payload");
        let sig = provider.sign_digest(&digest).unwrap();
        let recovered = EcdsaRecovery.recover(&digest, &sig).unwrap();
        assert_eq!(recovered, Some(provider.address().unwrap()));
    }

    #[test]
    fn local_provider_from_secret_deterministic() {
        let secret = [42u8; 32];
        let p1 = LocalKeyProvider::from_secret_bytes(&secret).unwrap();
        let p2 = LocalKeyProvider::from_secret_bytes(&secret).unwrap();
        assert_eq!(p1.address().unwrap(), p2.address().unwrap());
    }

    #[test]
    fn provider_names() {
        assert_eq!(LocalKeyProvider::generate().provider_name(), "LocalKeyProvider");
        let env = EnvKeyProvider::from_hex("TEST_KEY", SECRET_HEX).unwrap();
        assert_eq!(env.provider_name(), "EnvKeyProvider");
        assert_eq!(env.var_name(), "TEST_KEY");
    }

    #[test]
    fn env_provider_matches_local_provider() {
        let env = EnvKeyProvider::from_hex("TEST_KEY", SECRET_HEX).unwrap();
        let secret: [u8; 32] = hex::decode(SECRET_HEX).unwrap().try_into().unwrap();
        let local = LocalKeyProvider::from_secret_bytes(&secret).unwrap();
        assert_eq!(env.address().unwrap(), local.address().unwrap());
    }

    #[test]
    fn env_provider_rejects_short_key() {
        let err = EnvKeyProvider::from_hex("TEST_KEY", "0xdeadbeef").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSigningKey(_)));
    }

    #[test]
    fn env_provider_rejects_bad_hex() {
        let err = EnvKeyProvider::from_hex("TEST_KEY", "not-hex").unwrap_err();
        assert!(matches!(err, CryptoError::HexDecode(_)));
    }

    #[test]
    fn env_provider_missing_variable() {
        let err = EnvKeyProvider::from_env("EAS_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(matches!(err, CryptoError::MissingEnv(_)));
    }
}
