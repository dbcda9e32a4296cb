// crates/msp-registry-core/src/core/providers.rs
// ============================================================================
// Module: Supported Provider Types
// Description: Canonical type tags recognized for identity providers.
// Purpose: Centralize supported tags for config validation and factory dispatch.
// Dependencies: none
// ============================================================================

//! Canonical type tags for supported identity providers.

/// Type tag of the built-in ed25519-anchored provider.
pub const FABRIC_PROVIDER_TYPE: &str = "fabric";

/// Type tags with a known implementation.
pub const SUPPORTED_PROVIDER_TYPES: [&str; 1] = [FABRIC_PROVIDER_TYPE];

/// Returns true when the type tag has a known implementation.
#[must_use]
pub fn is_supported_provider_type(provider_type: &str) -> bool {
    SUPPORTED_PROVIDER_TYPES.iter().any(|tag| tag == &provider_type)
}
