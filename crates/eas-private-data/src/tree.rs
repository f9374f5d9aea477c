//! # Commitment Tree
//!
//! [`PrivateData`] commits to an ordered list of typed values under a single
//! Merkle root. Each value is bound to a 32-byte salt before hashing, so a
//! disclosed root (or a multiproof for other leaves) reveals nothing about
//! an undisclosed low-entropy value such as a boolean.
//!
//! ## Construction Modes
//!
//! | Entry point | Salts |
//! |---|---|
//! | [`PrivateData::build_fresh()`] | Drawn from `OsRng`, one per value |
//! | [`PrivateData::build_fresh_with_rng()`] | Drawn from a caller RNG |
//! | [`PrivateData::rebuild_from_disclosed()`] | Taken verbatim |
//! | [`PrivateData::from_inputs()`] | Decided per input list: all or none |
//!
//! Salts are unique within one tree. A fresh build redraws on collision and
//! a rebuild rejects a repeated salt.

use std::collections::{HashMap, HashSet};

use alloy_primitives::B256;
use eas_core::abi::{decode_leaf, encode_leaf};
use eas_core::{CodecError, MerkleInput, SaltedValue, TypedValue, ValidationError};
use eas_crypto::{standard_leaf_hash, MerkleTree, MultiProof};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::PrivateDataError;

/// A multiproof disclosing salted values.
pub type PrivateMultiProof = MultiProof<SaltedValue>;

/// Complete disclosure of a commitment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTree {
    /// The committed root.
    pub root: B256,
    /// Every salted value, in insertion order.
    pub values: Vec<SaltedValue>,
}

/// Hash a salted value into its tree leaf.
pub fn leaf_hash(value: &SaltedValue) -> Result<B256, CodecError> {
    Ok(standard_leaf_hash(&encode_leaf(value)?))
}

/// An immutable salted commitment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateData {
    tree: MerkleTree,
    values: Vec<SaltedValue>,
}

impl PrivateData {
    /// Build a tree over `values`, salting each with `OsRng`.
    pub fn build_fresh(values: Vec<TypedValue>) -> Result<Self, PrivateDataError> {
        Self::build_fresh_with_rng(values, &mut OsRng)
    }

    /// Build a tree over `values`, salting each from `rng`.
    pub fn build_fresh_with_rng<R: RngCore + CryptoRng>(
        values: Vec<TypedValue>,
        rng: &mut R,
    ) -> Result<Self, PrivateDataError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyValues.into());
        }

        let mut drawn = HashSet::with_capacity(values.len());
        let salted = values
            .into_iter()
            .map(|value| -> Result<SaltedValue, PrivateDataError> {
                let salt = loop {
                    let mut raw = [0u8; 32];
                    rng.try_fill_bytes(&mut raw)
                        .map_err(|e| PrivateDataError::Entropy(e.to_string()))?;
                    let salt = B256::from(raw);
                    if drawn.insert(salt) {
                        break salt;
                    }
                };
                Ok(value.with_salt(salt))
            })
            .collect::<Result<Vec<_>, PrivateDataError>>()?;

        Self::build(salted, "fresh")
    }

    /// Rebuild a tree from previously published salted values.
    pub fn rebuild_from_disclosed(values: Vec<SaltedValue>) -> Result<Self, PrivateDataError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyValues.into());
        }

        let mut seen: HashMap<B256, usize> = HashMap::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            if let Some(&first) = seen.get(&value.salt) {
                return Err(ValidationError::DuplicateSalt {
                    first,
                    second: index,
                }
                .into());
            }
            seen.insert(value.salt, index);
        }

        Self::build(values, "disclosed")
    }

    /// Build from wire inputs: fresh salts if none carry one, verbatim salts
    /// if all do.
    pub fn from_inputs(inputs: Vec<MerkleInput>) -> Result<Self, PrivateDataError> {
        if inputs.is_empty() {
            return Err(ValidationError::EmptyValues.into());
        }

        let salted = inputs.iter().filter(|input| input.salt.is_some()).count();
        if salted == 0 {
            return Self::build_fresh(inputs.into_iter().map(|input| input.value).collect());
        }
        if salted != inputs.len() {
            return Err(ValidationError::PartiallySalted {
                salted,
                unsalted: inputs.len() - salted,
            }
            .into());
        }

        let values = inputs
            .into_iter()
            .filter_map(|input| input.salt.map(|salt| input.value.with_salt(salt)))
            .collect();
        Self::rebuild_from_disclosed(values)
    }

    fn build(values: Vec<SaltedValue>, mode: &'static str) -> Result<Self, PrivateDataError> {
        let leaves = values
            .iter()
            .map(leaf_hash)
            .collect::<Result<Vec<_>, _>>()?;
        let tree = MerkleTree::new(&leaves)?;

        tracing::debug!(
            values = values.len(),
            mode,
            root = %tree.root(),
            "built commitment tree"
        );

        Ok(Self { tree, values })
    }

    /// The committed root.
    pub fn root(&self) -> B256 {
        self.tree.root()
    }

    /// The salted values in insertion order.
    pub fn values(&self) -> &[SaltedValue] {
        &self.values
    }

    /// Number of committed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a tree holds at least one value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Export the root together with every salted value.
    pub fn get_full_tree(&self) -> FullTree {
        FullTree {
            root: self.root(),
            values: self.values.clone(),
        }
    }

    /// Disclose the values at `indexes` (insertion positions, any order).
    ///
    /// The returned leaves follow the tree's processing order, not the order
    /// of `indexes`. Each leaf is decoded back out of its encoded tuple.
    pub fn generate_multi_proof(
        &self,
        indexes: &[usize],
    ) -> Result<PrivateMultiProof, PrivateDataError> {
        if indexes.is_empty() {
            return Err(PrivateDataError::EmptyIndexes);
        }

        let proof = self.tree.multi_proof(indexes)?;
        tracing::debug!(
            disclosed = indexes.len(),
            proof = proof.proof.len(),
            "generated multiproof"
        );

        proof.map_leaves(|index| -> Result<SaltedValue, PrivateDataError> {
            let encoded = encode_leaf(&self.values[index])?;
            Ok(decode_leaf(&encoded)?)
        })
    }
}
