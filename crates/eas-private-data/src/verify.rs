//! Stateless verification of disclosed values.
//!
//! Neither function needs the producer's [`PrivateData`](crate::PrivateData);
//! a verifier holds only the published root and whatever was disclosed.

use alloy_primitives::B256;

use crate::error::PrivateDataError;
use crate::tree::{leaf_hash, FullTree, PrivateData, PrivateMultiProof};

/// Check that `proof` discloses leaves of the tree committed to by `root`.
///
/// Returns `Ok(false)` when the proof is well-formed but reaches another
/// root, and `Err` when its leaf, proof and flag counts cannot describe a
/// tree or a leaf cannot be encoded.
pub fn verify_multi_proof(root: &B256, proof: &PrivateMultiProof) -> Result<bool, PrivateDataError> {
    let leaves = proof
        .leaves
        .iter()
        .map(leaf_hash)
        .collect::<Result<Vec<_>, _>>()?;
    let valid = eas_crypto::merkle::verify_multi_proof(root, &leaves, &proof.proof, &proof.proof_flags)?;

    tracing::debug!(leaves = leaves.len(), valid, "verified multiproof");
    Ok(valid)
}

/// Recompute the root of a fully disclosed tree.
///
/// The root stored in `tree` is not consulted; compare the result against a
/// trusted root.
pub fn verify_full_tree(tree: &FullTree) -> Result<B256, PrivateDataError> {
    Ok(PrivateData::rebuild_from_disclosed(tree.values.clone())?.root())
}
