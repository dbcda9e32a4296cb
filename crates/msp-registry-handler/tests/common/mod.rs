// crates/msp-registry-handler/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Deterministic providers, identities, and audit capture for handler tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: msp-registry-core, msp-registry-handler, msp-registry-providers, ed25519-dalek
// ============================================================================

//! ## Overview
//! Each organization is a `fabric` provider with one root key derived from a
//! fixed seed. Members are issued certificates by that root.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use msp_registry_core::MspConfig;
use msp_registry_core::MspId;
use msp_registry_core::SerializedIdentity;
use msp_registry_core::encode_base64;
use msp_registry_handler::ConfigAuditEvent;
use msp_registry_handler::ConfigAuditSink;
use msp_registry_handler::MspConfigHandler;
use msp_registry_providers::FabricMspConfig;
use msp_registry_providers::IdentityCertificate;
use msp_registry_providers::certificate_signing_bytes;

// ============================================================================
// SECTION: Organizations
// ============================================================================

/// Test organization with a single root key.
pub struct Org {
    /// Provider name.
    pub name: &'static str,
    /// Root signing key.
    pub root: SigningKey,
}

impl Org {
    /// Creates an organization whose root key derives from `seed`.
    #[must_use]
    pub fn new(name: &'static str, seed: u8) -> Self {
        Self {
            name,
            root: signing_key(seed),
        }
    }

    /// Returns the provider body for this organization.
    #[must_use]
    pub fn body(&self) -> FabricMspConfig {
        FabricMspConfig {
            name: self.name.to_string(),
            root_keys: vec![encode_base64(self.root.verifying_key().as_bytes())],
            admins: Vec::new(),
            revoked: Vec::new(),
        }
    }

    /// Returns the provider payload for this organization.
    #[must_use]
    pub fn config(&self) -> MspConfig {
        self.body().to_msp_config().expect("encode fabric config")
    }

    /// Returns a routed identity for `subject` issued by this organization.
    #[must_use]
    pub fn identity(&self, subject: &str, member: &SigningKey) -> Vec<u8> {
        let certificate = issue(&self.root, self.name, subject, member);
        SerializedIdentity {
            msp_id: MspId::new(self.name),
            id_bytes: serde_json::to_vec(&certificate).expect("encode certificate"),
        }
        .to_json()
        .expect("encode envelope")
    }
}

/// Returns a deterministic signing key for the seed.
#[must_use]
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Issues a certificate for `member` signed by `root`.
#[must_use]
pub fn issue(
    root: &SigningKey,
    msp_id: &str,
    subject: &str,
    member: &SigningKey,
) -> IdentityCertificate {
    let public_key = encode_base64(member.verifying_key().as_bytes());
    let issuer_key = encode_base64(root.verifying_key().as_bytes());
    let message =
        certificate_signing_bytes(&MspId::new(msp_id), subject, &public_key, &issuer_key)
            .expect("signing bytes");
    IdentityCertificate {
        subject: subject.to_string(),
        public_key,
        issuer_key,
        signature: encode_base64(&root.sign(&message).to_bytes()),
    }
}

/// Returns a handler built from the built-in factories.
#[must_use]
pub fn builtin_handler() -> MspConfigHandler {
    MspConfigHandler::builtin().expect("builtin handler")
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<ConfigAuditEvent>>,
}

impl RecordingSink {
    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ConfigAuditEvent> {
        self.events.lock().expect("audit lock").clone()
    }
}

impl ConfigAuditSink for RecordingSink {
    fn record(&self, event: &ConfigAuditEvent) {
        self.events.lock().expect("audit lock").push(event.clone());
    }
}
