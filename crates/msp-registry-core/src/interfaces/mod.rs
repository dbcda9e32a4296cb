// crates/msp-registry-core/src/interfaces/mod.rs
// ============================================================================
// Module: MSP Registry Interfaces
// Description: Backend-agnostic interfaces for identity providers and trust managers.
// Purpose: Define the contract surfaces consumed by the config handler.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Identity providers ([`Msp`]) validate identities for one trust domain. A
//! trust manager ([`MspManager`]) composes a set of providers and routes
//! identities to the provider that vouches for them. Factories build both
//! without exposing concrete types to the handler. Implementations must fail
//! closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::HashDigest;
use crate::core::MspConfig;
use crate::core::MspId;
use crate::core::MspPrincipal;
use crate::core::ProviderType;
use crate::core::SerializedIdentity;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Recoverable failures while building providers or trust managers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The configuration names a provider type with no implementation.
    #[error("unsupported msp type: {0}")]
    UnsupportedProviderType(ProviderType),
    /// The provider object could not be created.
    #[error("creating the msp failed: {0}")]
    ProviderConstructionFailed(String),
    /// The provider rejected its configuration.
    #[error("setting up the msp failed: {0}")]
    ProviderSetupFailed(String),
    /// The provider could not report its identifier.
    #[error("could not extract msp identifier: {0}")]
    IdentifierExtractionFailed(String),
    /// The same identifier was proposed with a different configuration.
    #[error("conflicting redefinition of provider {0}")]
    ConflictingRedefinition(MspId),
    /// The trust manager rejected the provider set.
    #[error("msp manager setup failed: {0}")]
    ManagerSetupFailed(String),
    /// A configured proposal limit was exceeded.
    #[error("msp proposal limit exceeded: {0}")]
    LimitExceeded(String),
}

impl SetupError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedProviderType(_) => "unsupported_provider_type",
            Self::ProviderConstructionFailed(_) => "provider_construction_failed",
            Self::ProviderSetupFailed(_) => "provider_setup_failed",
            Self::IdentifierExtractionFailed(_) => "identifier_extraction_failed",
            Self::ConflictingRedefinition(_) => "conflicting_redefinition",
            Self::ManagerSetupFailed(_) => "manager_setup_failed",
            Self::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

/// Failures while deserializing or validating identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Identity bytes could not be decoded.
    #[error("malformed identity: {0}")]
    Malformed(String),
    /// No trusted provider has the requested identifier.
    #[error("msp not trusted: {0}")]
    UnknownMsp(MspId),
    /// The identity is not valid under its provider.
    #[error("invalid identity: {0}")]
    Invalid(String),
    /// A signature did not verify.
    #[error("signature verification failed: {0}")]
    Verification(String),
    /// The identity does not satisfy the requested principal.
    #[error("principal not satisfied: {0}")]
    PrincipalUnsatisfied(String),
    /// The provider or manager has not been set up.
    #[error("msp not set up")]
    NotSetUp,
}

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Identity decoded by a provider.
pub trait Identity: Send + Sync {
    /// Returns the identifier of the provider that issued the identity.
    fn msp_id(&self) -> &MspId;

    /// Returns the subject named by the identity.
    fn subject(&self) -> &str;

    /// Returns the raw public key bytes bound to the identity.
    fn public_key(&self) -> &[u8];

    /// Verifies a signature produced by this identity over `message`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Verification`] when the signature does not verify.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), IdentityError>;

    /// Encodes the identity into its routed wire form.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Malformed`] when encoding fails.
    fn serialize(&self) -> Result<SerializedIdentity, IdentityError>;
}

// ============================================================================
// SECTION: Identity Provider
// ============================================================================

/// Identity provider for one trust domain.
pub trait Msp: Send + Sync {
    /// Configures the provider from its payload.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ProviderSetupFailed`] when the payload is invalid.
    fn setup(&mut self, config: &MspConfig) -> Result<(), SetupError>;

    /// Returns the identifier derived from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::IdentifierExtractionFailed`] when no identifier is available.
    fn identifier(&self) -> Result<MspId, SetupError>;

    /// Returns digests of the root trust material claimed by this provider.
    fn trust_anchors(&self) -> Vec<HashDigest>;

    /// Decodes provider-specific identity bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the bytes cannot be decoded.
    fn deserialize_identity(&self, id_bytes: &[u8]) -> Result<Box<dyn Identity>, IdentityError>;

    /// Validates an identity against this provider's trust material.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity is not trusted.
    fn validate(&self, identity: &dyn Identity) -> Result<(), IdentityError>;

    /// Checks that an identity satisfies a principal of this provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity is invalid or lacks the role.
    fn satisfies_principal(
        &self,
        identity: &dyn Identity,
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError>;
}

// ============================================================================
// SECTION: Trust Manager
// ============================================================================

/// Read-only identity capabilities of a trust manager.
pub trait IdentityDeserializer: Send + Sync {
    /// Returns the trusted providers keyed by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSetUp`] before the manager is set up.
    fn msps(&self) -> Result<BTreeMap<MspId, Arc<dyn Msp>>, IdentityError>;

    /// Decodes a JSON [`SerializedIdentity`] through the provider it names.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when decoding fails or the provider is unknown.
    fn deserialize_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError>;

    /// Decodes and validates an identity against its provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity is malformed or untrusted.
    fn validate_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        let identity = self.deserialize_identity(serialized)?;
        let msps = self.msps()?;
        let msp = msps
            .get(identity.msp_id())
            .ok_or_else(|| IdentityError::UnknownMsp(identity.msp_id().clone()))?;
        msp.validate(identity.as_ref())?;
        Ok(identity)
    }

    /// Decodes an identity and checks it against a principal.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity is untrusted or lacks the role.
    fn satisfies_principal(
        &self,
        serialized: &[u8],
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError> {
        let identity = self.deserialize_identity(serialized)?;
        let msps = self.msps()?;
        let msp = msps
            .get(identity.msp_id())
            .ok_or_else(|| IdentityError::UnknownMsp(identity.msp_id().clone()))?;
        msp.satisfies_principal(identity.as_ref(), principal)
    }
}

/// Aggregate trust manager built from a set of providers.
pub trait MspManager: IdentityDeserializer {
    /// Configures the manager with the full provider set.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ManagerSetupFailed`] when the set is inconsistent.
    fn setup(&mut self, msps: Vec<Arc<dyn Msp>>) -> Result<(), SetupError>;
}

// ============================================================================
// SECTION: Factories
// ============================================================================

/// Builds identity providers from configuration payloads.
pub trait MspFactory: Send + Sync {
    /// Creates an unconfigured provider for the type tag.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnsupportedProviderType`] for unknown tags and
    /// [`SetupError::ProviderConstructionFailed`] when construction fails.
    fn instantiate(&self, provider_type: &ProviderType) -> Result<Box<dyn Msp>, SetupError>;

    /// Creates and configures a provider from its payload.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when construction or setup fails.
    fn create(&self, config: &MspConfig) -> Result<Arc<dyn Msp>, SetupError> {
        let mut msp = self.instantiate(&config.provider_type)?;
        msp.setup(config)?;
        Ok(Arc::from(msp))
    }
}

/// Builds empty trust managers awaiting setup.
pub trait MspManagerFactory: Send + Sync {
    /// Returns a fresh, unconfigured manager.
    fn new_manager(&self) -> Box<dyn MspManager>;
}
