// crates/msp-registry-core/tests/msp_config.rs
// ============================================================================
// Module: MSP Config Payload Tests
// Description: Structural equality, digests, and wire form of config payloads.
// Purpose: Ensure redefinition detection compares payloads deterministically.
// Dependencies: msp-registry-core, proptest, serde_json
// ============================================================================
//! ## Overview
//! Conflict detection relies on payload equality; these tests pin equality to
//! the tag and exact body bytes and check digests agree with equality.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use msp_registry_core::MspConfig;
use msp_registry_core::SerializedIdentity;
use proptest::prelude::*;

/// Verifies the wire form encodes the body as base64 under `type`/`config`.
#[test]
fn config_wire_form_uses_base64_body() {
    let config = MspConfig::new("fabric", b"{\"name\":\"org1\"}".to_vec());
    let value = serde_json::to_value(&config).expect("serialize");
    assert_eq!(value["type"], "fabric");
    assert_eq!(value["config"], "eyJuYW1lIjoib3JnMSJ9");
    let decoded: MspConfig = serde_json::from_value(value).expect("deserialize");
    assert_eq!(decoded, config);
}

/// Verifies a different type tag makes otherwise identical payloads unequal.
#[test]
fn type_tag_participates_in_equality() {
    let fabric = MspConfig::new("fabric", b"body".to_vec());
    let other = MspConfig::new("idemix", b"body".to_vec());
    assert_ne!(fabric, other);
    assert_ne!(fabric.digest().expect("digest"), other.digest().expect("digest"));
}

/// Verifies invalid base64 identity bytes are rejected on decode.
#[test]
fn serialized_identity_rejects_invalid_base64() {
    let result = SerializedIdentity::from_json(br#"{"msp_id":"org1","id_bytes":"%%%"}"#);
    assert!(result.is_err());
}

/// Verifies unknown envelope fields are rejected.
#[test]
fn serialized_identity_rejects_unknown_fields() {
    let result =
        SerializedIdentity::from_json(br#"{"msp_id":"org1","id_bytes":"","extra":true}"#);
    assert!(result.is_err());
}

proptest! {
    /// Equality and digest equality agree for arbitrary payloads.
    #[test]
    fn digest_equality_matches_structural_equality(
        tag_a in "[a-z]{1,8}",
        tag_b in "[a-z]{1,8}",
        body_a in proptest::collection::vec(any::<u8>(), 0..64),
        body_b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let a = MspConfig::new(tag_a, body_a);
        let b = MspConfig::new(tag_b, body_b);
        let same_digest = a.digest().expect("digest") == b.digest().expect("digest");
        prop_assert_eq!(a == b, same_digest);
    }

    /// A clone is always structurally equal and hashes identically.
    #[test]
    fn clones_are_equal(body in proptest::collection::vec(any::<u8>(), 0..128)) {
        let config = MspConfig::new("fabric", body);
        let copy = config.clone();
        prop_assert_eq!(&config, &copy);
        prop_assert_eq!(config.digest().expect("digest"), copy.digest().expect("digest"));
    }
}
