// crates/msp-registry-core/src/core/identity.rs
// ============================================================================
// Module: MSP Identity Model
// Description: Wire form of identities and principals validated by providers.
// Purpose: Give every provider a common envelope for identity lookup.
// Dependencies: serde, crate::core::{encoding, identifiers}
// ============================================================================

//! ## Overview
//! A [`SerializedIdentity`] names the provider that vouches for an identity
//! and carries provider-specific identity bytes. Managers route on `msp_id`;
//! only the named provider interprets `id_bytes`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::encoding::base64_bytes;
use crate::core::identifiers::MspId;

// ============================================================================
// SECTION: Serialized Identity
// ============================================================================

/// Provider-routed identity envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializedIdentity {
    /// Identifier of the provider vouching for the identity.
    pub msp_id: MspId,
    /// Provider-specific identity bytes.
    #[serde(with = "base64_bytes")]
    pub id_bytes: Vec<u8>,
}

impl SerializedIdentity {
    /// Parses an identity envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the bytes are not a valid envelope.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the envelope as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// ============================================================================
// SECTION: Principals
// ============================================================================

/// Role an identity must hold within its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MspRole {
    /// Any valid identity of the provider.
    Member,
    /// An identity listed as administrator by the provider.
    Admin,
}

/// Principal an identity may be checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspPrincipal {
    /// Provider the identity must belong to.
    pub msp_id: MspId,
    /// Required role.
    pub role: MspRole,
}

impl MspPrincipal {
    /// Principal satisfied by any valid identity of the provider.
    #[must_use]
    pub fn member(msp_id: impl Into<MspId>) -> Self {
        Self {
            msp_id: msp_id.into(),
            role: MspRole::Member,
        }
    }

    /// Principal satisfied only by administrators of the provider.
    #[must_use]
    pub fn admin(msp_id: impl Into<MspId>) -> Self {
        Self {
            msp_id: msp_id.into(),
            role: MspRole::Admin,
        }
    }
}
