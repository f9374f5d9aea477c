//! # Keccak-256 Digests
//!
//! Every digest in the workspace (Merkle leaves and nodes, EIP-712 type
//! hashes, domain separators, struct hashes) is Keccak-256. The primitive
//! itself comes from `alloy-primitives`; this module only adds the text
//! helper used for type strings.

pub use alloy_primitives::keccak256;

use alloy_primitives::B256;

/// Keccak-256 of a UTF-8 string, as used for EIP-712 type hashes and for
/// hashing `string` struct members.
pub fn keccak256_text(text: &str) -> B256 {
    keccak256(text.as_bytes())
}
