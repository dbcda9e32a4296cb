// crates/msp-registry-providers/src/lib.rs
// ============================================================================
// Module: MSP Registry Providers
// Description: Built-in identity providers and their factory.
// Purpose: Supply the concrete providers the config handler instantiates.
// Dependencies: msp-registry-core, ed25519-dalek, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate ships the built-in `fabric` identity provider, anchored on
//! ed25519 root keys, and a factory that routes type tags to it.
//! Invariants:
//! - Unknown type tags fail with [`msp_registry_core::SetupError::UnsupportedProviderType`].
//! - Providers fail closed on malformed configuration and identity bytes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fabric;
pub mod factory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fabric::FabricIdentity;
pub use fabric::FabricMsp;
pub use fabric::FabricMspConfig;
pub use fabric::IdentityCertificate;
pub use fabric::certificate_signing_bytes;
pub use factory::BuiltinMspFactory;
