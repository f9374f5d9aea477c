//! # EIP-712 Typed Data
//!
//! The domain and the two message structs the attestation contract accepts,
//! with their type hashes, struct hashes and the JSON typed-data view that a
//! wallet's `eth_signTypedData_v4` expects.
//!
//! ## Hashing Rules
//!
//! `hashStruct(s) = keccak256(typeHash || encodeData(s))` where each member
//! is one 32-byte word: static values (`address`, `uint256`, `bytes32`)
//! inline, dynamic `bytes` replaced by its `keccak256`. The domain hashes
//! its `string` members the same way.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use eas_core::keccak256_text;
use serde::{Deserialize, Serialize};

/// Domain name of the attestation contract.
pub const DOMAIN_NAME: &str = "EAS";

/// Encoded type of the domain struct.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Encoded type of an attestation.
pub const ATTEST_TYPE: &str = "Attest(address recipient,uint256 ao,uint256 expirationTime,bytes32 refUUID,bytes data,uint256 nonce)";

/// Encoded type of a revocation.
pub const REVOKE_TYPE: &str = "Revoke(bytes32 uuid,uint256 nonce)";

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// The EIP-712 signing domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    /// Always `"EAS"`.
    pub name: String,
    /// Contract version string.
    pub version: String,
    /// EVM chain ID.
    pub chain_id: u64,
    /// Address of the attestation contract.
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// `keccak256(abi.encode(typeHash, keccak256(name), keccak256(version), chainId, verifyingContract))`
    pub fn separator(&self) -> B256 {
        keccak256(
            (
                keccak256_text(DOMAIN_TYPE),
                keccak256_text(&self.name),
                keccak256_text(&self.version),
                U256::from(self.chain_id),
                self.verifying_contract,
            )
                .abi_encode_params(),
        )
    }

    fn fields() -> Vec<TypedDataField> {
        vec![
            TypedDataField::new("name", "string"),
            TypedDataField::new("version", "string"),
            TypedDataField::new("chainId", "uint256"),
            TypedDataField::new("verifyingContract", "address"),
        ]
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A struct that can be signed under the EIP-712 domain.
pub trait TypedMessage: Serialize {
    /// Struct name, used as `primaryType`.
    const PRIMARY_TYPE: &'static str;

    /// Member names and types, in declaration order.
    fn fields() -> Vec<TypedDataField>;

    /// `hashStruct` of this message.
    fn struct_hash(&self) -> B256;
}

/// Parameters of an attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationParams {
    /// Subject of the attestation.
    pub recipient: Address,
    /// Attestation object (schema) identifier.
    #[serde(with = "decimal")]
    pub ao: U256,
    /// Expiry as a Unix timestamp; zero for none.
    #[serde(with = "decimal")]
    pub expiration_time: U256,
    /// Attestation this one refers to; zero for none.
    #[serde(rename = "refUUID")]
    pub ref_uuid: B256,
    /// Opaque attestation payload.
    pub data: Bytes,
    /// Replay-protection nonce, managed by the caller.
    #[serde(with = "decimal")]
    pub nonce: U256,
}

impl TypedMessage for AttestationParams {
    const PRIMARY_TYPE: &'static str = "Attest";

    fn fields() -> Vec<TypedDataField> {
        vec![
            TypedDataField::new("recipient", "address"),
            TypedDataField::new("ao", "uint256"),
            TypedDataField::new("expirationTime", "uint256"),
            TypedDataField::new("refUUID", "bytes32"),
            TypedDataField::new("data", "bytes"),
            TypedDataField::new("nonce", "uint256"),
        ]
    }

    fn struct_hash(&self) -> B256 {
        keccak256(
            (
                keccak256_text(ATTEST_TYPE),
                self.recipient,
                self.ao,
                self.expiration_time,
                self.ref_uuid,
                keccak256(&self.data),
                self.nonce,
            )
                .abi_encode_params(),
        )
    }
}

/// Parameters of a revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationParams {
    /// Attestation being revoked.
    pub uuid: B256,
    /// Replay-protection nonce, managed by the caller.
    #[serde(with = "decimal")]
    pub nonce: U256,
}

impl TypedMessage for RevocationParams {
    const PRIMARY_TYPE: &'static str = "Revoke";

    fn fields() -> Vec<TypedDataField> {
        vec![
            TypedDataField::new("uuid", "bytes32"),
            TypedDataField::new("nonce", "uint256"),
        ]
    }

    fn struct_hash(&self) -> B256 {
        keccak256((keccak256_text(REVOKE_TYPE), self.uuid, self.nonce).abi_encode_params())
    }
}

// ---------------------------------------------------------------------------
// Typed-data view
// ---------------------------------------------------------------------------

/// One member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    /// Member name.
    pub name: String,
    /// Solidity type.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypedDataField {
    fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

/// A complete EIP-712 typed-data document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData<M> {
    /// Signing domain.
    pub domain: Eip712Domain,
    /// Name of the signed struct.
    pub primary_type: String,
    /// Definitions of the domain struct and the signed struct.
    pub types: BTreeMap<String, Vec<TypedDataField>>,
    /// The message itself.
    pub message: M,
}

impl<M: TypedMessage> TypedData<M> {
    /// Assemble the document for `message` under `domain`.
    pub fn new(domain: Eip712Domain, message: M) -> Self {
        let mut types = BTreeMap::new();
        types.insert("EIP712Domain".to_string(), Eip712Domain::fields());
        types.insert(M::PRIMARY_TYPE.to_string(), M::fields());
        Self {
            domain,
            primary_type: M::PRIMARY_TYPE.to_string(),
            types,
            message,
        }
    }
}

/// `keccak256(0x19 0x01 || domainSeparator || structHash)`
pub fn signing_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_slice());
    buf[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

/// `uint256` members as decimal strings; numbers and `0x` hex are accepted
/// on input.
mod decimal {
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(U256::from(n)),
            Raw::Text(s) => {
                let (digits, radix) = match s.strip_prefix("0x") {
                    Some(hex) => (hex, 16),
                    None => (s.as_str(), 10),
                };
                if digits.is_empty() {
                    return Err(de::Error::custom(format!("invalid uint256 {s:?}: no digits")));
                }
                let parsed = U256::from_str_radix(digits, radix);
                parsed.map_err(|e| de::Error::custom(format!("invalid uint256 {s:?}: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    fn attestation() -> AttestationParams {
        AttestationParams {
            recipient: Address::repeat_byte(0x11),
            ao: U256::from(7),
            expiration_time: U256::ZERO,
            ref_uuid: B256::repeat_byte(0x22),
            data: Bytes::from(vec![0xde, 0xad]),
            nonce: U256::from(1),
        }
    }

    #[test]
    fn domain_type_hash_known_vector() {
        assert_eq!(
            keccak256_text(DOMAIN_TYPE),
            B256::from(hex!(
                "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
            ))
        );
    }

    #[test]
    fn typed_data_lists_both_structs() {
        let domain = Eip712Domain {
            name: DOMAIN_NAME.to_string(),
            version: "0.1".to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        };
        let doc = TypedData::new(domain, attestation());
        assert_eq!(doc.primary_type, "Attest");
        assert_eq!(doc.types.len(), 2);
        assert_eq!(doc.types["Attest"].len(), 6);
        assert_eq!(doc.types["EIP712Domain"][2].type_name, "uint256");
    }

    #[test]
    fn fields_render_encoded_type() {
        let render = |name: &str, fields: Vec<TypedDataField>| {
            let members: Vec<String> = fields
                .iter()
                .map(|f| format!("{} {}", f.type_name, f.name))
                .collect();
            format!("{name}({})", members.join(","))
        };
        assert_eq!(render("Attest", AttestationParams::fields()), ATTEST_TYPE);
        assert_eq!(render("Revoke", RevocationParams::fields()), REVOKE_TYPE);
        assert_eq!(render("EIP712Domain", Eip712Domain::fields()), DOMAIN_TYPE);
    }

    #[test]
    fn attestation_wire_format() {
        let json = serde_json::to_value(attestation()).unwrap();
        assert_eq!(json["ao"], "7");
        assert_eq!(json["expirationTime"], "0");
        assert_eq!(json["data"], "0xdead");
        assert!(json.get("refUUID").is_some());

        let back: AttestationParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, attestation());
    }

    #[test]
    fn uint_members_accept_numbers_and_hex() {
        let json = serde_json::json!({ "uuid": B256::ZERO, "nonce": 255 });
        let a: RevocationParams = serde_json::from_value(json).unwrap();
        let json = serde_json::json!({ "uuid": B256::ZERO, "nonce": "0xff" });
        let b: RevocationParams = serde_json::from_value(json).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.nonce, U256::from(255));

        let json = serde_json::json!({ "uuid": B256::ZERO, "nonce": "-1" });
        assert!(serde_json::from_value::<RevocationParams>(json).is_err());
    }

    #[test]
    fn uint_members_reject_empty_digits() {
        for nonce in ["", "0x"] {
            let json = serde_json::json!({ "uuid": B256::ZERO, "nonce": nonce });
            assert!(
                serde_json::from_value::<RevocationParams>(json).is_err(),
                "nonce {nonce:?} was accepted"
            );
        }
        let mut json = serde_json::to_value(attestation()).unwrap();
        json["expirationTime"] = serde_json::json!("0x");
        assert!(serde_json::from_value::<AttestationParams>(json).is_err());
    }

    #[test]
    fn data_changes_struct_hash() {
        let mut other = attestation();
        other.data = Bytes::from(vec![0xde, 0xae]);
        assert_ne!(attestation().struct_hash(), other.struct_hash());
    }
}
