//! # eas-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for EAS private data and
//! typed-data signing:
//!
//! - **Standard Merkle tree** with sorted-pair Keccak-256 nodes,
//!   double-hashed leaves, and boolean-flag multiproofs. Roots and proofs
//!   are interchangeable with any on-chain verifier using the same
//!   construction.
//! - **secp256k1** signing over 32-byte digests and `ecrecover`-style
//!   address recovery.
//! - **Capabilities**: the [`DigestSigner`] and [`SignerRecovery`] traits
//!   that the typed-data proxy consumes, plus local and environment-backed
//!   implementations.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `eas-*` crates.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   Keccak-256 and real secp256k1.
//! - Secret key material is never serialized or logged.

pub mod error;
pub mod key_provider;
pub mod merkle;
pub mod secp256k1;

pub use error::{CryptoError, MerkleError};
pub use key_provider::{
    DigestSigner, EcdsaRecovery, EnvKeyProvider, LocalKeyProvider, SignerRecovery,
};
pub use merkle::{hash_pair, standard_leaf_hash, MerkleTree, MultiProof};
pub use secp256k1::{address_of, recover_address, Eip712Signature, Secp256k1KeyPair};
