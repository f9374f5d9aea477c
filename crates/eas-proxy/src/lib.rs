//! # eas-proxy — EIP-712 Requests for EAS
//!
//! Builds the typed data, digests and signed requests that the attestation
//! contract's delegated `attest`/`revoke` entry points accept, and verifies
//! such requests off-chain.
//!
//! ## Usage
//!
//! ```text
//! let proxy = Proxy::new(ProxyConfig::from_env()?);
//! let request = proxy.get_attestation_request(params, &signer)?;
//! assert!(proxy.verify_attestation_request(signer.address()?, &request, &EcdsaRecovery)?);
//! ```
//!
//! ## Crate Policy
//!
//! - The proxy never holds key material; signers are passed per call.
//! - Verification failures are `Ok(false)`. Only capability failures are
//!   errors, returned as the capability's own error type.

pub mod config;
pub mod proxy;
pub mod typed_data;

pub use config::{ConfigError, ProxyConfig, DEFAULT_VERSION};
pub use proxy::{AttestationRequest, Eip712Request, Proxy, RevocationRequest};
pub use typed_data::{
    signing_digest, AttestationParams, Eip712Domain, RevocationParams, TypedData,
    TypedDataField, TypedMessage, ATTEST_TYPE, DOMAIN_NAME, DOMAIN_TYPE, REVOKE_TYPE,
};
