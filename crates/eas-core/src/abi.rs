//! # ABI Value Codec
//!
//! Encodes a [`Value`] of a declared [`TypeTag`] to canonical ABI bytes and
//! back. The encoding of a single value is `abi.encode(value)` with a
//! one-element parameter list, so dynamic types (`string`, `bytes`) carry the
//! leading `0x20` offset word.
//!
//! The word-level encoding itself is delegated to `alloy-sol-types`. This
//! module only dispatches on the runtime type tag and enforces width rules
//! the Rust types cannot express (e.g. `uint8` vs `uint256`).
//!
//! ## Leaf Encoding
//!
//! [`encode_leaf()`] serializes a salted value as the parameter tuple
//! `(string type, string name, bytes encodedValue, bytes32 salt)`. That
//! tuple, not the raw value, is what the commitment tree hashes, so the
//! declared type and the name are bound into every leaf.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;

use crate::error::CodecError;
use crate::types::{SaltedValue, TypeTag, Value};

/// ABI-encode `value` as an instance of `tag`.
pub fn encode(tag: TypeTag, value: &Value) -> Result<Vec<u8>, CodecError> {
    if !value.is_kind_of(tag) {
        return Err(CodecError::TypeMismatch {
            expected: tag,
            found: value.kind(),
        });
    }
    if !value.fits(tag) {
        return Err(CodecError::Overflow(tag));
    }

    Ok(match value {
        Value::Bool(b) => b.abi_encode(),
        Value::Uint(n) => n.abi_encode(),
        Value::Address(a) => a.abi_encode(),
        Value::String(s) => s.abi_encode(),
        Value::Bytes(b) => b.abi_encode(),
        Value::Bytes32(b) => b.abi_encode(),
    })
}

/// Decode ABI bytes as an instance of `tag`.
///
/// Strict: the bytes must be exactly what [`encode()`] produces for the
/// decoded value. Trailing data, dirty padding and out-of-width integers are
/// all rejected.
pub fn decode(tag: TypeTag, data: &[u8]) -> Result<Value, CodecError> {
    let malformed = |e: alloy_sol_types::Error| CodecError::Malformed {
        tag,
        reason: e.to_string(),
    };

    let value = match tag {
        TypeTag::Bool => Value::Bool(bool::abi_decode(data, true).map_err(malformed)?),
        TypeTag::Uint(_) => Value::Uint(U256::abi_decode(data, true).map_err(malformed)?),
        TypeTag::Address => Value::Address(Address::abi_decode(data, true).map_err(malformed)?),
        TypeTag::String => Value::String(String::abi_decode(data, true).map_err(malformed)?),
        TypeTag::Bytes => Value::Bytes(Bytes::abi_decode(data, true).map_err(malformed)?),
        TypeTag::Bytes32 => Value::Bytes32(B256::abi_decode(data, true).map_err(malformed)?),
    };

    let canonical = encode(tag, &value)?;
    if canonical != data {
        return Err(CodecError::Malformed {
            tag,
            reason: format!(
                "non-canonical encoding ({} bytes, expected {})",
                data.len(),
                canonical.len()
            ),
        });
    }
    Ok(value)
}

/// Encode a salted value as its Merkle leaf tuple
/// `(type, name, encode(type, value), salt)`.
pub fn encode_leaf(value: &SaltedValue) -> Result<Vec<u8>, CodecError> {
    let encoded = encode(value.type_tag, &value.value)?;
    Ok((
        value.type_tag.to_string(),
        value.name.clone(),
        Bytes::from(encoded),
        value.salt,
    )
        .abi_encode_params())
}

/// Decode a Merkle leaf tuple back into the salted value it encodes.
///
/// The inner value bytes are decoded with the leaf's own declared type.
pub fn decode_leaf(data: &[u8]) -> Result<SaltedValue, CodecError> {
    let (type_str, name, encoded, salt) =
        <(String, String, Bytes, B256)>::abi_decode_params(data, true)
            .map_err(|e| CodecError::MalformedLeaf(e.to_string()))?;
    let type_tag: TypeTag = type_str
        .parse()
        .map_err(|e: crate::error::ValidationError| CodecError::MalformedLeaf(e.to_string()))?;
    let value = decode(type_tag, &encoded)?;
    Ok(SaltedValue {
        type_tag,
        name,
        value,
        salt,
    })
}
