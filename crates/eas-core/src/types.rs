//! # Value Model — Type Tags, Typed Values, Salted Values
//!
//! A commitment tree is built over a list of named values, each declaring an
//! ABI-style type. This module defines those values in three stages:
//!
//! - [`TypedValue`]: what a user supplies, `{ type, name, value }`.
//! - [`SaltedValue`]: what enters the tree: a typed value plus a 32-byte salt.
//! - [`MerkleInput`]: the wire shape `{ type, name, value, salt? }` accepted
//!   when the caller does not say which of the two it is holding.
//!
//! ## Wire Format
//!
//! All three serialize as flat JSON objects with a `type` string. The JSON
//! form of `value` depends on the declared type: booleans as JSON bools,
//! unsigned integers as decimal strings (JSON numbers and `0x` strings are
//! accepted on input), addresses as checksummed `0x` strings, and `bytes` /
//! `bytes32` as `0x` hex.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A supported ABI type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `uintN` for N in 8..=256, a multiple of 8.
    Uint(u16),
    /// `address`
    Address,
    /// `string`
    String,
    /// `bytes`
    Bytes,
    /// `bytes32`
    Bytes32,
}

impl TypeTag {
    /// `uint256`, the widest unsigned integer.
    pub const UINT256: Self = Self::Uint(256);

    /// Build an unsigned integer tag, checking the width.
    pub fn uint(bits: u16) -> Result<Self, ValidationError> {
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(ValidationError::UnsupportedType(format!("uint{bits}")));
        }
        Ok(Self::Uint(bits))
    }

    /// Whether the ABI encoding of this type is dynamically sized.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Address => f.write_str("address"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Bytes32 => f.write_str("bytes32"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(Self::Bool),
            "address" => Ok(Self::Address),
            "string" => Ok(Self::String),
            "bytes" => Ok(Self::Bytes),
            "bytes32" => Ok(Self::Bytes32),
            _ => {
                let unsupported = || ValidationError::UnsupportedType(s.to_string());
                let digits = s.strip_prefix("uint").ok_or_else(unsupported)?;
                // "uint" alone and zero-padded widths hash differently on-chain.
                if digits.is_empty() || digits.starts_with('0') {
                    return Err(unsupported());
                }
                let bits: u16 = digits.parse().map_err(|_| unsupported())?;
                Self::uint(bits).map_err(|_| unsupported())
            }
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A raw value, interpreted through a [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Unsigned integer of any supported width.
    Uint(U256),
    /// 20-byte account address.
    Address(Address),
    /// UTF-8 string.
    String(String),
    /// Arbitrary byte string.
    Bytes(Bytes),
    /// Fixed 32-byte word.
    Bytes32(B256),
}

impl Value {
    /// Short name of the value variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Address(_) => "address",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Bytes32(_) => "bytes32",
        }
    }

    /// Whether the variant corresponds to `tag`, ignoring integer width.
    pub fn is_kind_of(&self, tag: TypeTag) -> bool {
        matches!(
            (self, tag),
            (Self::Bool(_), TypeTag::Bool)
                | (Self::Uint(_), TypeTag::Uint(_))
                | (Self::Address(_), TypeTag::Address)
                | (Self::String(_), TypeTag::String)
                | (Self::Bytes(_), TypeTag::Bytes)
                | (Self::Bytes32(_), TypeTag::Bytes32)
        )
    }

    /// Whether the value is a valid instance of `tag`, including width.
    pub fn fits(&self, tag: TypeTag) -> bool {
        match (self, tag) {
            (Self::Uint(n), TypeTag::Uint(bits)) => n.bit_len() <= usize::from(bits),
            _ => self.is_kind_of(tag),
        }
    }

    /// Render the value in its JSON wire form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Uint(n) => serde_json::Value::String(n.to_string()),
            Self::Address(a) => serde_json::Value::String(a.to_checksum(None)),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Bytes(b) => serde_json::Value::String(hex::encode_prefixed(b)),
            Self::Bytes32(b) => serde_json::Value::String(hex::encode_prefixed(b)),
        }
    }

    /// Parse a JSON wire value as an instance of `tag`.
    pub fn from_json(tag: TypeTag, json: &serde_json::Value) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidValue { tag, reason };
        let text = || {
            json.as_str()
                .ok_or_else(|| invalid(format!("expected a string, got {json}")))
        };

        let value = match tag {
            TypeTag::Bool => Self::Bool(
                json.as_bool()
                    .ok_or_else(|| invalid(format!("expected a bool, got {json}")))?,
            ),
            TypeTag::Uint(_) => {
                let n = match json {
                    serde_json::Value::Number(n) => n
                        .as_u64()
                        .map(U256::from)
                        .ok_or_else(|| invalid(format!("not an unsigned integer: {n}")))?,
                    serde_json::Value::String(s) => {
                        // An empty digit string would otherwise parse as zero.
                        if s.strip_prefix("0x").unwrap_or(s).is_empty() {
                            return Err(invalid(format!("{s:?}: no digits")));
                        }
                        s.parse::<U256>()
                            .map_err(|e| invalid(format!("{s:?}: {e}")))?
                    }
                    other => return Err(invalid(format!("expected an integer, got {other}"))),
                };
                Self::Uint(n)
            }
            TypeTag::Address => {
                let s = text()?;
                Self::Address(s.parse().map_err(|e| invalid(format!("{s:?}: {e}")))?)
            }
            TypeTag::String => Self::String(text()?.to_string()),
            TypeTag::Bytes => {
                let s = text()?;
                Self::Bytes(
                    hex::decode(s)
                        .map_err(|e| invalid(format!("{s:?}: {e}")))?
                        .into(),
                )
            }
            TypeTag::Bytes32 => {
                let s = text()?;
                Self::Bytes32(s.parse().map_err(|e| invalid(format!("{s:?}: {e}")))?)
            }
        };

        if !value.fits(tag) {
            return Err(invalid(format!("{} does not fit", value.kind())));
        }
        Ok(value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<U256> for Value {
    fn from(n: U256) -> Self {
        Self::Uint(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Uint(U256::from(n))
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<B256> for Value {
    fn from(b: B256) -> Self {
        Self::Bytes32(b)
    }
}

// ---------------------------------------------------------------------------
// Wire representation shared by the three value stages
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct WireValue {
    #[serde(rename = "type")]
    type_tag: TypeTag,
    name: String,
    value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<B256>,
}

impl WireValue {
    fn new(type_tag: TypeTag, name: &str, value: &Value, salt: Option<B256>) -> Self {
        Self {
            type_tag,
            name: name.to_string(),
            value: value.to_json(),
            salt,
        }
    }

    fn typed(&self) -> Result<TypedValue, ValidationError> {
        let value = Value::from_json(self.type_tag, &self.value)?;
        Ok(TypedValue {
            type_tag: self.type_tag,
            name: self.name.clone(),
            value,
        })
    }
}

/// A named value with a declared type. Never carries a salt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedValue {
    /// Declared ABI type.
    pub type_tag: TypeTag,
    /// Free-form label; participates in the leaf hash.
    pub name: String,
    /// The raw value.
    pub value: Value,
}

impl TypedValue {
    /// Create a typed value, checking that `value` is an instance of `type_tag`.
    pub fn new(
        type_tag: TypeTag,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ValidationError> {
        let value = value.into();
        if !value.fits(type_tag) {
            return Err(ValidationError::InvalidValue {
                tag: type_tag,
                reason: format!("{} value does not fit", value.kind()),
            });
        }
        Ok(Self {
            type_tag,
            name: name.into(),
            value,
        })
    }

    /// Attach a salt.
    pub fn with_salt(self, salt: B256) -> SaltedValue {
        SaltedValue {
            type_tag: self.type_tag,
            name: self.name,
            value: self.value,
            salt,
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireValue::new(self.type_tag, &self.name, &self.value, None).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        if wire.salt.is_some() {
            return Err(serde::de::Error::custom(ValidationError::UnexpectedSalt));
        }
        wire.typed().map_err(serde::de::Error::custom)
    }
}

/// A typed value with the 32-byte salt that hides it inside a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SaltedValue {
    /// Declared ABI type.
    pub type_tag: TypeTag,
    /// Free-form label; participates in the leaf hash.
    pub name: String,
    /// The raw value.
    pub value: Value,
    /// Per-leaf salt.
    pub salt: B256,
}

impl SaltedValue {
    /// Drop the salt.
    pub fn typed(&self) -> TypedValue {
        TypedValue {
            type_tag: self.type_tag,
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

impl Serialize for SaltedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireValue::new(self.type_tag, &self.name, &self.value, Some(self.salt))
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SaltedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        let salt = wire
            .salt
            .ok_or_else(|| serde::de::Error::missing_field("salt"))?;
        Ok(wire.typed().map_err(serde::de::Error::custom)?.with_salt(salt))
    }
}

/// Input element whose salt may or may not be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleInput {
    /// The typed value.
    pub value: TypedValue,
    /// Salt, if the value was previously published.
    pub salt: Option<B256>,
}

impl Serialize for MerkleInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = &self.value;
        WireValue::new(v.type_tag, &v.name, &v.value, self.salt).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MerkleInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        Ok(Self {
            value: wire.typed().map_err(serde::de::Error::custom)?,
            salt: wire.salt,
        })
    }
}

impl From<TypedValue> for MerkleInput {
    fn from(value: TypedValue) -> Self {
        Self { value, salt: None }
    }
}

impl From<SaltedValue> for MerkleInput {
    fn from(salted: SaltedValue) -> Self {
        Self {
            value: salted.typed(),
            salt: Some(salted.salt),
        }
    }
}
