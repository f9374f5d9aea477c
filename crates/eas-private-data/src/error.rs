//! Errors raised while building, proving or verifying a commitment tree.

use eas_core::{CodecError, ValidationError};
use eas_crypto::MerkleError;
use thiserror::Error;

/// Error type for commitment tree operations.
///
/// A proof that is well-formed but does not reach the expected root is not
/// an error; verification reports it as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrivateDataError {
    /// A value could not be ABI-encoded or a leaf could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Input was rejected before any hashing took place.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying tree rejected an index list or a proof shape.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// The random source failed while drawing a salt.
    #[error("salt generation failed: {0}")]
    Entropy(String),

    /// A multiproof must disclose at least one value.
    #[error("index list must not be empty")]
    EmptyIndexes,
}
