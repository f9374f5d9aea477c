//! # eas-private-data — Salted Commitment Trees
//!
//! Commits to a list of typed values under one Merkle root and later
//! discloses any subset of them with a multiproof that a verifier can check
//! against the root alone.
//!
//! ## Lifecycle
//!
//! 1. A producer calls [`PrivateData::build_fresh()`]; every value gets a
//!    random salt. The root goes on-chain, the salted values stay private.
//! 2. To disclose, the producer calls
//!    [`PrivateData::generate_multi_proof()`] and hands the proof over.
//! 3. The verifier calls [`verify_multi_proof()`] with the published root.
//!
//! A producer that only kept the salted values can rebuild the identical
//! tree with [`PrivateData::rebuild_from_disclosed()`].
//!
//! ## Crate Policy
//!
//! - Salts are never logged.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod tree;
pub mod verify;

pub use error::PrivateDataError;
pub use tree::{leaf_hash, FullTree, PrivateData, PrivateMultiProof};
pub use verify::{verify_full_tree, verify_multi_proof};
