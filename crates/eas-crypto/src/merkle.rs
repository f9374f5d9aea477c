//! # Standard Merkle Tree
//!
//! A binary Merkle tree over 32-byte leaf hashes, laid out as a flat array
//! so that roots and multiproofs match the widely deployed
//! `StandardMerkleTree` / `MerkleProof.multiProofVerify` construction.
//!
//! ## Algorithm
//!
//! - Leaf: `keccak256(keccak256(abi_encoded_leaf))`. Hashing twice keeps a
//!   leaf from ever being confused with a 64-byte internal node.
//! - Node: `keccak256(min(a, b) || max(a, b))`. Sorting the pair means a
//!   proof does not need to say which side each sibling is on.
//! - Layout: `tree[2n - 1]`. Leaf hashes are sorted ascending and written to
//!   the tail in reverse, so the smallest hash sits at `tree[2n - 2]`.
//!   Node `i` has children `2i + 1` and `2i + 2`; the root is `tree[0]`.
//!
//! ## Multiproofs
//!
//! A multiproof proves several leaves at once. Processing walks a queue of
//! pending hashes, initially the disclosed leaves: for each flag, pop one
//! hash, then pop either a second pending hash (`true`) or the next proof
//! hash (`false`), and push their parent. The last hash standing is the
//! root.
//!
//! ## Security Invariant
//!
//! Shape errors (flag/proof/leaf counts that cannot describe one tree) are
//! returned as [`MerkleError`]. A well-formed proof that reaches a different
//! root is reported as `Ok(false)` by [`verify_multi_proof()`].

use std::collections::{BTreeSet, VecDeque};

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::error::MerkleError;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Hash an ABI-encoded leaf: `keccak256(keccak256(encoded))`.
pub fn standard_leaf_hash(encoded: &[u8]) -> B256 {
    keccak256(keccak256(encoded))
}

/// Hash two nodes in sorted order.
pub fn hash_pair(a: &B256, b: &B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn sibling(i: usize) -> usize {
    if i % 2 == 1 {
        i + 1
    } else {
        i - 1
    }
}

// ---------------------------------------------------------------------------
// Multiproof
// ---------------------------------------------------------------------------

/// A multiproof over leaves of type `L`.
///
/// `leaves` are in the order the tree algorithm consumes them (descending
/// tree position), which is generally not the order they were requested in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiProof<L> {
    /// The disclosed leaves.
    pub leaves: Vec<L>,
    /// Sibling hashes for the undisclosed parts of the tree.
    pub proof: Vec<B256>,
    /// One flag per internal hashing step.
    pub proof_flags: Vec<bool>,
}

impl<L> MultiProof<L> {
    /// Replace every leaf, keeping proof and flags.
    pub fn map_leaves<T, E>(
        self,
        f: impl FnMut(L) -> Result<T, E>,
    ) -> Result<MultiProof<T>, E> {
        Ok(MultiProof {
            leaves: self.leaves.into_iter().map(f).collect::<Result<_, _>>()?,
            proof: self.proof,
            proof_flags: self.proof_flags,
        })
    }
}

/// Recompute the root from a multiproof over leaf hashes.
pub fn process_multi_proof(
    leaves: &[B256],
    proof: &[B256],
    proof_flags: &[bool],
) -> Result<B256, MerkleError> {
    let needed = proof_flags.iter().filter(|flag| !**flag).count();
    if proof.len() < needed {
        return Err(MerkleError::InvalidMultiProof {
            proof: proof.len(),
            needed,
        });
    }
    if leaves.len() + proof.len() != proof_flags.len() + 1 {
        return Err(MerkleError::IncompatibleLeaves {
            leaves: leaves.len(),
            proof: proof.len(),
            flags: proof_flags.len(),
        });
    }

    let mut pending: VecDeque<B256> = leaves.iter().copied().collect();
    let mut siblings = proof.iter().copied();

    for (step, &flag) in proof_flags.iter().enumerate() {
        let a = pending.pop_front().ok_or(MerkleError::Exhausted(step))?;
        let b = if flag {
            pending.pop_front()
        } else {
            siblings.next()
        }
        .ok_or(MerkleError::Exhausted(step))?;
        pending.push_back(hash_pair(&a, &b));
    }

    pending
        .pop_back()
        .or_else(|| siblings.next())
        .ok_or(MerkleError::Exhausted(proof_flags.len()))
}

/// Check a multiproof against `root`.
///
/// Returns `Ok(false)` for a well-formed proof of a different root and
/// `Err` for a malformed one.
pub fn verify_multi_proof(
    root: &B256,
    leaves: &[B256],
    proof: &[B256],
    proof_flags: &[bool],
) -> Result<bool, MerkleError> {
    let computed = process_multi_proof(leaves, proof, proof_flags)?;
    Ok(computed == *root)
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// An immutable Merkle tree over pre-hashed leaves.
///
/// Leaves are addressed by *value index*: their position in the slice
/// passed to [`MerkleTree::new()`]. The tree keeps the mapping to internal
/// positions so callers never see the sorted layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    nodes: Vec<B256>,
    /// Tree position of each value index.
    tree_index: Vec<usize>,
    /// Value index of each leaf, in ascending hash order.
    sorted_values: Vec<usize>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes.
    ///
    /// Hashes are sorted before layout; equal hashes keep their input order.
    pub fn new(leaf_hashes: &[B256]) -> Result<Self, MerkleError> {
        let n = leaf_hashes.len();
        if n == 0 {
            return Err(MerkleError::EmptyTree);
        }

        let mut sorted_values: Vec<usize> = (0..n).collect();
        sorted_values.sort_by(|&a, &b| leaf_hashes[a].cmp(&leaf_hashes[b]));

        let len = 2 * n - 1;
        let mut nodes = vec![B256::ZERO; len];
        let mut tree_index = vec![0usize; n];
        for (position, &value_index) in sorted_values.iter().enumerate() {
            let t = len - 1 - position;
            nodes[t] = leaf_hashes[value_index];
            tree_index[value_index] = t;
        }
        for i in (0..n - 1).rev() {
            let left = left_child(i);
            nodes[i] = hash_pair(&nodes[left], &nodes[left + 1]);
        }

        tracing::trace!(leaves = n, root = %nodes[0], "built merkle tree");

        Ok(Self {
            nodes,
            tree_index,
            sorted_values,
        })
    }

    /// The root hash.
    pub fn root(&self) -> B256 {
        self.nodes[0]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.tree_index.len()
    }

    /// Always false; a tree has at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.tree_index.is_empty()
    }

    /// Leaf hash of the value at `value_index`.
    pub fn leaf_hash(&self, value_index: usize) -> Result<B256, MerkleError> {
        let t = self.checked_tree_index(value_index)?;
        Ok(self.nodes[t])
    }

    fn checked_tree_index(&self, value_index: usize) -> Result<usize, MerkleError> {
        self.tree_index
            .get(value_index)
            .copied()
            .ok_or(MerkleError::IndexOutOfRange {
                index: value_index,
                len: self.len(),
            })
    }

    fn value_at(&self, tree_position: usize) -> usize {
        self.sorted_values[self.nodes.len() - 1 - tree_position]
    }

    /// Build a multiproof for the given value indexes.
    ///
    /// The returned leaves are value indexes in proof order. Requesting no
    /// indexes yields a proof that carries only the root.
    pub fn multi_proof(&self, value_indexes: &[usize]) -> Result<MultiProof<usize>, MerkleError> {
        let mut seen = BTreeSet::new();
        let mut positions = Vec::with_capacity(value_indexes.len());
        for &value_index in value_indexes {
            if !seen.insert(value_index) {
                return Err(MerkleError::DuplicateIndex(value_index));
            }
            positions.push(self.checked_tree_index(value_index)?);
        }
        positions.sort_unstable_by(|a, b| b.cmp(a));

        let mut pending: VecDeque<usize> = positions.iter().copied().collect();
        let mut proof = Vec::new();
        let mut proof_flags = Vec::new();

        while let Some(&j) = pending.front() {
            if j == 0 {
                break;
            }
            pending.pop_front();
            let s = sibling(j);
            if pending.front() == Some(&s) {
                proof_flags.push(true);
                pending.pop_front();
            } else {
                proof_flags.push(false);
                proof.push(self.nodes[s]);
            }
            pending.push_back(parent(j));
        }

        if positions.is_empty() {
            proof.push(self.nodes[0]);
        }

        debug_assert_eq!(
            process_multi_proof(
                &positions.iter().map(|&t| self.nodes[t]).collect::<Vec<_>>(),
                &proof,
                &proof_flags,
            ),
            Ok(self.root()),
        );

        Ok(MultiProof {
            leaves: positions.iter().map(|&t| self.value_at(t)).collect(),
            proof,
            proof_flags,
        })
    }
}
