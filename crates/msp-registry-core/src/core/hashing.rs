// crates/msp-registry-core/src/core/hashing.rs
// ============================================================================
// Module: MSP Registry Canonical Hashing
// Description: Canonical JSON encoding and SHA-256 digests for registry material.
// Purpose: Give payloads, certificates, and trust anchors one stable byte form.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Structured values (configuration payloads, certificate bodies) are encoded
//! with RFC 8785 (JCS) before signing or hashing. Root keys are hashed over
//! their raw bytes to form trust anchors.
//!
//! Security posture: anchor digests decide whether two providers claim the
//! same root; they must not depend on map ordering or platform.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Digests
// ============================================================================

/// Hash algorithms a registry digest may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the lowercase algorithm label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Tagged content digest, ordered so it can key anchor maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Hashes `bytes` with SHA-256.
    #[must_use]
    pub fn sha256(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self {
            algorithm: HashAlgorithm::Sha256,
            value: digest.iter().map(|byte| format!("{byte:02x}")).collect(),
        }
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.as_str(), self.value)
    }
}

/// Errors raised while canonicalizing a value.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the RFC 8785 encoding of `value`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Digests the canonical JSON encoding of `value`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_digest<T: Serialize + ?Sized>(value: &T) -> Result<HashDigest, HashError> {
    Ok(HashDigest::sha256(&canonical_json_bytes(value)?))
}

/// Returns the trust anchor for raw root key material.
#[must_use]
pub fn trust_anchor(key_bytes: &[u8]) -> HashDigest {
    HashDigest::sha256(key_bytes)
}
