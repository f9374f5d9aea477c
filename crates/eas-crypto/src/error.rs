//! # Cryptographic Error Types
//!
//! Structured errors for all operations in `eas-crypto`. Merkle shape errors
//! are caller errors and fail loudly; a proof that is well-formed but does
//! not reach the expected root is not an error at all.

use thiserror::Error;

/// Errors from the standard Merkle tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree without leaves")]
    EmptyTree,

    /// A requested leaf index does not exist.
    #[error("leaf index {index} out of range for {len} leaves")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of leaves in the tree.
        len: usize,
    },

    /// The same leaf was requested twice in one multiproof.
    #[error("cannot prove duplicated index {0}")]
    DuplicateIndex(usize),

    /// Fewer proof hashes than `false` flags.
    #[error("invalid multiproof format: {proof} proof hash(es) for {needed} sibling flag(s)")]
    InvalidMultiProof {
        /// Number of proof hashes supplied.
        proof: usize,
        /// Number of `false` flags, each of which consumes a proof hash.
        needed: usize,
    },

    /// Leaf, proof and flag counts do not describe a single tree.
    #[error("{leaves} leaves and {proof} proof hash(es) are not compatible with {flags} flag(s)")]
    IncompatibleLeaves {
        /// Number of leaves supplied.
        leaves: usize,
        /// Number of proof hashes supplied.
        proof: usize,
        /// Number of flags supplied.
        flags: usize,
    },

    /// The flags asked for more pending hashes than the proof provides.
    #[error("multiproof exhausted its hash queue at step {0}")]
    Exhausted(usize),
}

/// Errors from key handling and signing.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The secret key bytes are not a valid secp256k1 scalar.
    #[error("invalid secp256k1 signing key: {0}")]
    InvalidSigningKey(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// A required environment variable is not set.
    #[error("environment variable {0} not set")]
    MissingEnv(String),

    /// A signature byte string has the wrong length.
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// The signing backend failed.
    #[error("signing failed: {0}")]
    Signing(String),
}
