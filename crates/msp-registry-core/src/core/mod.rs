// crates/msp-registry-core/src/core/mod.rs
// ============================================================================
// Module: MSP Registry Core Types
// Description: Canonical identifiers, configuration payloads, and identity envelopes.
// Purpose: Provide stable, serializable types shared by providers and handlers.
// Dependencies: base64, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Core types are the canonical source of truth for configuration payloads and
//! identity envelopes exchanged between the config handler, identity providers,
//! and the aggregate trust manager.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod encoding;
pub mod hashing;
pub mod identifiers;
pub mod identity;
pub mod msp_config;
pub mod providers;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use encoding::decode_base64;
pub use encoding::encode_base64;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::MspId;
pub use identifiers::ProviderType;
pub use identity::MspPrincipal;
pub use identity::MspRole;
pub use identity::SerializedIdentity;
pub use msp_config::MspConfig;
pub use providers::FABRIC_PROVIDER_TYPE;
pub use providers::SUPPORTED_PROVIDER_TYPES;
pub use providers::is_supported_provider_type;
