//! # Typed-Data Proxy
//!
//! [`Proxy`] produces and checks signed Attest/Revoke requests for one
//! deployment of the attestation contract. It holds no key material and no
//! nonce state: signing goes through a [`DigestSigner`], recovery through a
//! [`SignerRecovery`], and nonces are chosen by the caller.
//!
//! ## Verification
//!
//! A request carries its own `digest`, but verification never reads it. The
//! digest is recomputed from `params` under this proxy's domain, so a request
//! signed for another chain or contract, or with edited params, recovers to a
//! different address and fails.

use alloy_primitives::{Address, B256};
use eas_crypto::{DigestSigner, Eip712Signature, SignerRecovery};
use serde::{Deserialize, Serialize};

use crate::config::ProxyConfig;
use crate::typed_data::{
    signing_digest, AttestationParams, Eip712Domain, RevocationParams, TypedData, TypedMessage,
    DOMAIN_NAME,
};

/// A signed typed-data request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Request<P> {
    /// Signature over `digest`.
    #[serde(flatten)]
    pub signature: Eip712Signature,
    /// Digest that was signed. Informational; verifiers recompute it.
    pub digest: B256,
    /// The signed message.
    pub params: P,
}

/// A signed attestation request.
pub type AttestationRequest = Eip712Request<AttestationParams>;

/// A signed revocation request.
pub type RevocationRequest = Eip712Request<RevocationParams>;

/// EIP-712 signer and verifier bound to one domain.
#[derive(Debug, Clone)]
pub struct Proxy {
    domain: Eip712Domain,
    domain_separator: B256,
}

impl Proxy {
    /// Bind a proxy to the deployment described by `config`.
    pub fn new(config: ProxyConfig) -> Self {
        let domain = Eip712Domain {
            name: DOMAIN_NAME.to_string(),
            version: config.version,
            chain_id: config.chain_id,
            verifying_contract: config.verifying_contract,
        };
        let domain_separator = domain.separator();
        tracing::debug!(
            version = %domain.version,
            chain_id = domain.chain_id,
            verifying_contract = %domain.verifying_contract,
            separator = %domain_separator,
            "bound typed-data proxy"
        );
        Self {
            domain,
            domain_separator,
        }
    }

    /// The bound domain.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// The domain separator.
    pub fn get_domain_separator(&self) -> B256 {
        self.domain_separator
    }

    /// The domain in its typed-data form.
    pub fn get_domain_typed_data(&self) -> Eip712Domain {
        self.domain.clone()
    }

    // ── Attestation ─────────────────────────────────────────────────────

    /// Typed-data document for an attestation.
    pub fn get_attestation_typed_data(
        &self,
        params: &AttestationParams,
    ) -> TypedData<AttestationParams> {
        TypedData::new(self.domain.clone(), params.clone())
    }

    /// Digest an attestation signer signs.
    pub fn attestation_digest(&self, params: &AttestationParams) -> B256 {
        self.digest(params)
    }

    /// Sign an attestation with `signer`.
    pub fn get_attestation_request<S: DigestSigner>(
        &self,
        params: AttestationParams,
        signer: &S,
    ) -> Result<AttestationRequest, S::Error> {
        self.sign(params, signer)
    }

    /// Check that `request` was signed by `expected_signer`.
    pub fn verify_attestation_request<R: SignerRecovery>(
        &self,
        expected_signer: Address,
        request: &AttestationRequest,
        recovery: &R,
    ) -> Result<bool, R::Error> {
        self.verify(expected_signer, request, recovery)
    }

    // ── Revocation ──────────────────────────────────────────────────────

    /// Typed-data document for a revocation.
    pub fn get_revocation_typed_data(
        &self,
        params: &RevocationParams,
    ) -> TypedData<RevocationParams> {
        TypedData::new(self.domain.clone(), params.clone())
    }

    /// Digest a revocation signer signs.
    pub fn revocation_digest(&self, params: &RevocationParams) -> B256 {
        self.digest(params)
    }

    /// Sign a revocation with `signer`.
    pub fn get_revocation_request<S: DigestSigner>(
        &self,
        params: RevocationParams,
        signer: &S,
    ) -> Result<RevocationRequest, S::Error> {
        self.sign(params, signer)
    }

    /// Check that `request` was signed by `expected_signer`.
    pub fn verify_revocation_request<R: SignerRecovery>(
        &self,
        expected_signer: Address,
        request: &RevocationRequest,
        recovery: &R,
    ) -> Result<bool, R::Error> {
        self.verify(expected_signer, request, recovery)
    }

    // ── Shared ──────────────────────────────────────────────────────────

    fn digest<M: TypedMessage>(&self, message: &M) -> B256 {
        signing_digest(&self.domain_separator, &message.struct_hash())
    }

    fn sign<M: TypedMessage, S: DigestSigner>(
        &self,
        params: M,
        signer: &S,
    ) -> Result<Eip712Request<M>, S::Error> {
        let digest = self.digest(&params);
        let signature = signer.sign_digest(&digest)?;
        tracing::debug!(
            primary_type = M::PRIMARY_TYPE,
            provider = signer.provider_name(),
            %digest,
            "signed typed-data request"
        );
        Ok(Eip712Request {
            signature,
            digest,
            params,
        })
    }

    fn verify<M: TypedMessage, R: SignerRecovery>(
        &self,
        expected_signer: Address,
        request: &Eip712Request<M>,
        recovery: &R,
    ) -> Result<bool, R::Error> {
        let digest = self.digest(&request.params);
        let recovered = recovery.recover(&digest, &request.signature)?;
        let valid = recovered == Some(expected_signer);
        tracing::debug!(
            primary_type = M::PRIMARY_TYPE,
            %expected_signer,
            recovered = ?recovered,
            valid,
            "verified typed-data request"
        );
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256};
    use eas_crypto::{CryptoError, EcdsaRecovery, LocalKeyProvider};

    fn proxy() -> Proxy {
        Proxy::new(ProxyConfig::new("0.1", 1, Address::repeat_byte(0xcc)))
    }

    fn signer() -> LocalKeyProvider {
        LocalKeyProvider::from_secret_bytes(&[7u8; 32]).unwrap()
    }

    fn revocation() -> RevocationParams {
        RevocationParams {
            uuid: B256::repeat_byte(0x42),
            nonce: U256::from(3),
        }
    }

    /// A signer whose backend is unreachable.
    struct OfflineSigner;

    impl DigestSigner for OfflineSigner {
        type Error = CryptoError;

        fn sign_digest(&self, _digest: &B256) -> Result<Eip712Signature, CryptoError> {
            Err(CryptoError::Signing("backend offline".to_string()))
        }

        fn address(&self) -> Result<Address, CryptoError> {
            Err(CryptoError::Signing("backend offline".to_string()))
        }

        fn provider_name(&self) -> &str {
            "OfflineSigner"
        }
    }

    #[test]
    fn proxy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Proxy>();
        assert_send_sync::<AttestationRequest>();
    }

    #[test]
    fn domain_is_named_eas() {
        let proxy = proxy();
        assert_eq!(proxy.domain().name, "EAS");
        assert_eq!(proxy.get_domain_typed_data(), *proxy.domain());
        assert_eq!(proxy.get_domain_separator(), proxy.domain().separator());
    }

    #[test]
    fn request_digest_matches_recomputed_digest() {
        let proxy = proxy();
        let request = proxy.get_revocation_request(revocation(), &signer()).unwrap();
        assert_eq!(request.digest, proxy.revocation_digest(&revocation()));
        assert!(proxy
            .verify_revocation_request(signer().address().unwrap(), &request, &EcdsaRecovery)
            .unwrap());
    }

    #[test]
    fn stored_digest_is_not_trusted() {
        let proxy = proxy();
        let mut request = proxy.get_revocation_request(revocation(), &signer()).unwrap();
        request.params.nonce = U256::from(4);
        // Even with the digest left pointing at the signed message, edited
        // params no longer recover to the signer.
        assert!(!proxy
            .verify_revocation_request(signer().address().unwrap(), &request, &EcdsaRecovery)
            .unwrap());
    }

    #[test]
    fn signer_errors_propagate() {
        let params = AttestationParams {
            recipient: Address::ZERO,
            ao: U256::ZERO,
            expiration_time: U256::ZERO,
            ref_uuid: B256::ZERO,
            data: Bytes::new(),
            nonce: U256::ZERO,
        };
        let err = proxy()
            .get_attestation_request(params, &OfflineSigner)
            .unwrap_err();
        assert!(matches!(err, CryptoError::Signing(_)));
    }

    #[test]
    fn request_flattens_signature() {
        let request = proxy().get_revocation_request(revocation(), &signer()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["v"].as_u64().is_some());
        assert!(json["r"].as_str().unwrap().starts_with("0x"));
        assert_eq!(json["params"]["nonce"], "3");

        let back: RevocationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }
}
