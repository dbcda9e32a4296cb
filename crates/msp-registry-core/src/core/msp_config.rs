// crates/msp-registry-core/src/core/msp_config.rs
// ============================================================================
// Module: MSP Configuration Payload
// Description: Typed, opaque configuration describing one trust domain.
// Purpose: Carry provider configuration with deterministic structural equality.
// Dependencies: serde, crate::core::{encoding, hashing, identifiers}
// ============================================================================

//! ## Overview
//! An [`MspConfig`] pairs a provider type tag with an opaque serialized body.
//! It is immutable once received. Equality compares the tag and the exact body
//! bytes, so two payloads are equal only when their canonical encodings match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::encoding::base64_bytes;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::canonical_digest;
use crate::core::identifiers::ProviderType;

// ============================================================================
// SECTION: MSP Config
// ============================================================================

/// Configuration payload for one identity provider.
///
/// # Invariants
/// - Equality is byte-exact over `provider_type` and `config`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MspConfig {
    /// Implementation family tag.
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    /// Provider-specific serialized body.
    #[serde(with = "base64_bytes")]
    pub config: Vec<u8>,
}

impl MspConfig {
    /// Creates a configuration payload.
    #[must_use]
    pub fn new(provider_type: impl Into<ProviderType>, config: impl Into<Vec<u8>>) -> Self {
        Self {
            provider_type: provider_type.into(),
            config: config.into(),
        }
    }

    /// Returns the canonical digest of this payload.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn digest(&self) -> Result<HashDigest, HashError> {
        canonical_digest(self)
    }

    /// Returns the body size in bytes.
    #[must_use]
    pub const fn body_len(&self) -> usize {
        self.config.len()
    }
}
