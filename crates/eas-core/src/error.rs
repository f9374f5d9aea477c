//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by every crate in the workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Input validation errors fail fast at the point of misuse and carry the
//!   offending tag, index or count.
//! - Codec errors come from the ABI primitive and are propagated unchanged.
//! - Verification mismatches are never errors; they surface as `false`.

use thiserror::Error;

use crate::types::TypeTag;

/// Error raised by the ABI value codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The value variant does not correspond to the declared type.
    #[error("cannot encode a {found} value as {expected}")]
    TypeMismatch {
        /// Declared type tag.
        expected: TypeTag,
        /// Kind of the value that was supplied.
        found: &'static str,
    },

    /// An unsigned integer does not fit the declared width.
    #[error("value does not fit in {0}")]
    Overflow(TypeTag),

    /// The byte string is not a canonical ABI encoding of the declared type.
    #[error("malformed ABI data for {tag}: {reason}")]
    Malformed {
        /// Declared type tag.
        tag: TypeTag,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The byte string is not a `(string, string, bytes, bytes32)` leaf tuple.
    #[error("malformed leaf encoding: {0}")]
    MalformedLeaf(String),
}

/// Error raised when caller input violates a documented precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A commitment tree needs at least one value.
    #[error("value list must not be empty")]
    EmptyValues,

    /// The type string is not one of the supported tags.
    #[error("unsupported type tag: {0:?}")]
    UnsupportedType(String),

    /// The raw value cannot be interpreted as the declared type.
    #[error("invalid value for {tag}: {reason}")]
    InvalidValue {
        /// Declared type tag.
        tag: TypeTag,
        /// Why the value was rejected.
        reason: String,
    },

    /// Some inputs carry a salt and others do not.
    #[error("partially salted input: {salted} value(s) salted, {unsalted} unsalted")]
    PartiallySalted {
        /// Number of inputs with a salt.
        salted: usize,
        /// Number of inputs without a salt.
        unsalted: usize,
    },

    /// Two leaves of the same tree share a salt.
    #[error("salt of value {second} duplicates salt of value {first}")]
    DuplicateSalt {
        /// Index of the first value with the salt.
        first: usize,
        /// Index of the value that repeats it.
        second: usize,
    },

    /// An unsalted typed value was given a salt on the wire.
    #[error("typed value must not carry a salt")]
    UnexpectedSalt,
}
