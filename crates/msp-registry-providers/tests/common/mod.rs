// crates/msp-registry-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Deterministic keys, configs, and certificates for provider tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: msp-registry-core, msp-registry-providers, ed25519-dalek
// ============================================================================

//! ## Overview
//! Keys are derived from fixed seeds so every run signs identical
//! certificates. Certificates are signed here only to exercise validation.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use msp_registry_core::MspConfig;
use msp_registry_core::MspId;
use msp_registry_core::SerializedIdentity;
use msp_registry_core::encode_base64;
use msp_registry_providers::FabricMspConfig;
use msp_registry_providers::IdentityCertificate;
use msp_registry_providers::certificate_signing_bytes;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Returns a deterministic signing key for the seed.
#[must_use]
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Returns the base64 public key of a signing key.
#[must_use]
pub fn public_key_b64(key: &SigningKey) -> String {
    encode_base64(key.verifying_key().as_bytes())
}

// ============================================================================
// SECTION: Configs
// ============================================================================

/// Builds a `fabric` body trusting the given roots.
#[must_use]
pub fn fabric_body(name: &str, roots: &[&SigningKey]) -> FabricMspConfig {
    FabricMspConfig {
        name: name.to_string(),
        root_keys: roots.iter().map(|key| public_key_b64(key)).collect(),
        admins: Vec::new(),
        revoked: Vec::new(),
    }
}

/// Builds a `fabric` payload trusting the given roots.
#[must_use]
pub fn fabric_config(name: &str, roots: &[&SigningKey]) -> MspConfig {
    fabric_body(name, roots).to_msp_config().expect("encode fabric config")
}

// ============================================================================
// SECTION: Certificates
// ============================================================================

/// Issues a certificate for `member` signed by `root`.
#[must_use]
pub fn issue(
    root: &SigningKey,
    msp_id: &str,
    subject: &str,
    member: &SigningKey,
) -> IdentityCertificate {
    let public_key = public_key_b64(member);
    let issuer_key = public_key_b64(root);
    let message =
        certificate_signing_bytes(&MspId::new(msp_id), subject, &public_key, &issuer_key)
            .expect("signing bytes");
    let signature = root.sign(&message);
    IdentityCertificate {
        subject: subject.to_string(),
        public_key,
        issuer_key,
        signature: encode_base64(&signature.to_bytes()),
    }
}

/// Encodes a certificate as provider identity bytes.
#[must_use]
pub fn id_bytes(certificate: &IdentityCertificate) -> Vec<u8> {
    serde_json::to_vec(certificate).expect("encode certificate")
}

/// Encodes a certificate as a routed identity envelope.
#[must_use]
pub fn envelope(msp_id: &str, certificate: &IdentityCertificate) -> Vec<u8> {
    SerializedIdentity {
        msp_id: MspId::new(msp_id),
        id_bytes: id_bytes(certificate),
    }
    .to_json()
    .expect("encode envelope")
}
