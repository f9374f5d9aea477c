//! # eas-core — Foundational Types for EAS Private Data
//!
//! This crate is the leaf of the workspace DAG. It defines the value model
//! shared by the commitment tree (`eas-private-data`) and the typed-data
//! signer (`eas-proxy`), plus the ABI codec that turns a declared type and a
//! raw value into canonical bytes.
//!
//! ## Key Design Principles
//!
//! 1. **Closed set of type tags.** `TypeTag` covers `bool`, `uint8`..`uint256`,
//!    `address`, `string`, `bytes` and `bytes32`. Anything else fails at the
//!    parse boundary with `ValidationError::UnsupportedType`.
//!
//! 2. **Typed values are checked at construction.** `TypedValue::new()`
//!    refuses a value whose variant or width does not match its tag, so the
//!    codec only ever sees well-formed pairs from validated callers.
//!
//! 3. **Salts are explicit.** `TypedValue` never carries a salt; a
//!    `SaltedValue` always does. The wire-level `MerkleInput` is the only
//!    type where a salt is optional, and the commitment tree resolves that
//!    ambiguity explicitly.
//!
//! 4. **Exact codec inverse.** `abi::decode()` re-encodes what it decoded and
//!    rejects input that does not round-trip byte-for-byte.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `eas-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod abi;
pub mod digest;
pub mod error;
pub mod types;

// Re-export primary types for ergonomic imports.
pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use digest::{keccak256, keccak256_text};
pub use error::{CodecError, ValidationError};
pub use types::{MerkleInput, SaltedValue, TypeTag, TypedValue, Value};
