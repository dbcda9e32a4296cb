// crates/msp-registry-providers/src/fabric.rs
// ============================================================================
// Module: Fabric Identity Provider
// Description: Identity provider anchored on a set of ed25519 root keys.
// Purpose: Validate certificate-backed identities for one trust domain.
// Dependencies: ed25519-dalek, msp-registry-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`FabricMsp`] is configured with a name and one or more ed25519 root
//! keys. Identities are [`IdentityCertificate`] values signed by a root key
//! over the canonical JSON of their bound fields. Validation checks the
//! issuer, the certificate signature, and the revocation list carried in the
//! configuration.
//! Security posture: identity bytes are untrusted and fail closed on any
//! decoding or verification error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use ed25519_dalek::Signature;
use ed25519_dalek::VerifyingKey;
use msp_registry_core::FABRIC_PROVIDER_TYPE;
use msp_registry_core::HashDigest;
use msp_registry_core::HashError;
use msp_registry_core::Identity;
use msp_registry_core::IdentityError;
use msp_registry_core::Msp;
use msp_registry_core::MspConfig;
use msp_registry_core::MspId;
use msp_registry_core::MspPrincipal;
use msp_registry_core::MspRole;
use msp_registry_core::SerializedIdentity;
use msp_registry_core::SetupError;
use msp_registry_core::decode_base64;
use msp_registry_core::hashing::canonical_json_bytes;
use msp_registry_core::hashing::trust_anchor;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a provider name in bytes.
pub const MAX_MSP_NAME_LENGTH: usize = 255;
/// Maximum number of root keys per provider.
pub const MAX_ROOT_KEYS: usize = 64;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Body of a `fabric` provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FabricMspConfig {
    /// Provider name; becomes the provider identifier.
    pub name: String,
    /// Base64-encoded ed25519 public keys trusted to issue identities.
    pub root_keys: Vec<String>,
    /// Subjects holding the administrator role.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<String>,
    /// Subjects whose identities are no longer valid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revoked: Vec<String>,
}

impl FabricMspConfig {
    /// Encodes this body as a `fabric` configuration payload.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonical encoding fails.
    pub fn to_msp_config(&self) -> Result<MspConfig, HashError> {
        Ok(MspConfig::new(FABRIC_PROVIDER_TYPE, canonical_json_bytes(self)?))
    }
}

// ============================================================================
// SECTION: Certificates
// ============================================================================

/// Identity bytes understood by [`FabricMsp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityCertificate {
    /// Subject named by the certificate.
    pub subject: String,
    /// Base64 ed25519 public key of the subject.
    pub public_key: String,
    /// Base64 ed25519 public key of the issuing root.
    pub issuer_key: String,
    /// Base64 ed25519 signature by the issuer.
    pub signature: String,
}

/// Fields covered by the issuer signature.
#[derive(Serialize)]
struct CertificateBody<'a> {
    /// Provider the certificate binds to.
    msp_id: &'a str,
    /// Subject named by the certificate.
    subject: &'a str,
    /// Base64 subject public key.
    public_key: &'a str,
    /// Base64 issuer public key.
    issuer_key: &'a str,
}

/// Returns the bytes an issuer signs for a certificate.
///
/// # Errors
///
/// Returns [`HashError`] when canonical encoding fails.
pub fn certificate_signing_bytes(
    msp_id: &MspId,
    subject: &str,
    public_key: &str,
    issuer_key: &str,
) -> Result<Vec<u8>, HashError> {
    canonical_json_bytes(&CertificateBody {
        msp_id: msp_id.as_str(),
        subject,
        public_key,
        issuer_key,
    })
}

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Identity decoded from an [`IdentityCertificate`].
pub struct FabricIdentity {
    /// Provider that decoded the identity.
    msp_id: MspId,
    /// Certificate as presented.
    certificate: IdentityCertificate,
    /// Decoded subject key.
    key: VerifyingKey,
}

impl FabricIdentity {
    /// Returns the certificate backing this identity.
    #[must_use]
    pub const fn certificate(&self) -> &IdentityCertificate {
        &self.certificate
    }
}

impl Identity for FabricIdentity {
    fn msp_id(&self) -> &MspId {
        &self.msp_id
    }

    fn subject(&self) -> &str {
        &self.certificate.subject
    }

    fn public_key(&self) -> &[u8] {
        self.key.as_bytes()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), IdentityError> {
        let signature = Signature::try_from(signature)
            .map_err(|_| IdentityError::Verification("invalid signature bytes".to_string()))?;
        self.key
            .verify_strict(message, &signature)
            .map_err(|_| IdentityError::Verification("signature does not match".to_string()))
    }

    fn serialize(&self) -> Result<SerializedIdentity, IdentityError> {
        let id_bytes = serde_json::to_vec(&self.certificate)
            .map_err(|err| IdentityError::Malformed(err.to_string()))?;
        Ok(SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes,
        })
    }
}

// ============================================================================
// SECTION: Provider Implementation
// ============================================================================

/// Configured trust material of a [`FabricMsp`].
struct FabricState {
    /// Provider identifier.
    msp_id: MspId,
    /// Root keys indexed by raw bytes.
    roots: BTreeMap<[u8; 32], VerifyingKey>,
    /// Administrator subjects.
    admins: BTreeSet<String>,
    /// Revoked subjects.
    revoked: BTreeSet<String>,
}

/// Identity provider anchored on ed25519 root keys.
///
/// # Invariants
/// - `state` is set exactly once by a successful [`Msp::setup`].
#[derive(Default)]
pub struct FabricMsp {
    /// Trust material once configured.
    state: Option<FabricState>,
}

impl FabricMsp {
    /// Creates an unconfigured provider.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: None,
        }
    }

    /// Returns the configured state or [`IdentityError::NotSetUp`].
    fn configured(&self) -> Result<&FabricState, IdentityError> {
        self.state.as_ref().ok_or(IdentityError::NotSetUp)
    }
}

impl Msp for FabricMsp {
    fn setup(&mut self, config: &MspConfig) -> Result<(), SetupError> {
        if self.state.is_some() {
            return Err(SetupError::ProviderSetupFailed("msp already set up".to_string()));
        }
        if config.provider_type.as_str() != FABRIC_PROVIDER_TYPE {
            return Err(SetupError::ProviderSetupFailed(format!(
                "unexpected msp type: {}",
                config.provider_type
            )));
        }
        let body: FabricMspConfig = serde_json::from_slice(&config.config).map_err(|err| {
            SetupError::ProviderSetupFailed(format!("invalid fabric msp config: {err}"))
        })?;
        self.state = Some(build_state(body).map_err(SetupError::ProviderSetupFailed)?);
        Ok(())
    }

    fn identifier(&self) -> Result<MspId, SetupError> {
        self.state
            .as_ref()
            .map(|state| state.msp_id.clone())
            .ok_or_else(|| SetupError::IdentifierExtractionFailed("msp not set up".to_string()))
    }

    fn trust_anchors(&self) -> Vec<HashDigest> {
        self.state.as_ref().map_or_else(Vec::new, |state| {
            state.roots.keys().map(|bytes| trust_anchor(bytes.as_slice())).collect()
        })
    }

    fn deserialize_identity(&self, id_bytes: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        let state = self.configured()?;
        let certificate: IdentityCertificate = serde_json::from_slice(id_bytes)
            .map_err(|err| IdentityError::Malformed(format!("invalid certificate: {err}")))?;
        let key = decode_public_key("public_key", &certificate.public_key)
            .map_err(IdentityError::Malformed)?;
        Ok(Box::new(FabricIdentity {
            msp_id: state.msp_id.clone(),
            certificate,
            key,
        }))
    }

    fn validate(&self, identity: &dyn Identity) -> Result<(), IdentityError> {
        let state = self.configured()?;
        if identity.msp_id() != &state.msp_id {
            return Err(IdentityError::Invalid(format!(
                "identity belongs to {} not {}",
                identity.msp_id(),
                state.msp_id
            )));
        }
        let serialized = identity.serialize()?;
        let certificate: IdentityCertificate = serde_json::from_slice(&serialized.id_bytes)
            .map_err(|err| IdentityError::Malformed(format!("invalid certificate: {err}")))?;
        let subject_key = decode_public_key("public_key", &certificate.public_key)
            .map_err(IdentityError::Malformed)?;
        if subject_key.as_bytes().as_slice() != identity.public_key() {
            return Err(IdentityError::Invalid("certificate key mismatch".to_string()));
        }
        let issuer = decode_public_key("issuer_key", &certificate.issuer_key)
            .map_err(IdentityError::Malformed)?;
        let Some(root) = state.roots.get(issuer.as_bytes()) else {
            return Err(IdentityError::Invalid("issuer is not a trusted root".to_string()));
        };
        let signature_bytes = decode_base64(&certificate.signature)
            .map_err(|_| IdentityError::Malformed("signature is not valid base64".to_string()))?;
        let signature = Signature::try_from(signature_bytes.as_slice())
            .map_err(|_| IdentityError::Malformed("invalid signature bytes".to_string()))?;
        let message = certificate_signing_bytes(
            &state.msp_id,
            &certificate.subject,
            &certificate.public_key,
            &certificate.issuer_key,
        )
        .map_err(|err| IdentityError::Malformed(err.to_string()))?;
        root.verify_strict(&message, &signature)
            .map_err(|_| IdentityError::Invalid("certificate signature invalid".to_string()))?;
        if state.revoked.contains(&certificate.subject) {
            return Err(IdentityError::Invalid(format!(
                "identity revoked: {}",
                certificate.subject
            )));
        }
        Ok(())
    }

    fn satisfies_principal(
        &self,
        identity: &dyn Identity,
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError> {
        let state = self.configured()?;
        if principal.msp_id != state.msp_id {
            return Err(IdentityError::PrincipalUnsatisfied(format!(
                "principal requires {} but provider is {}",
                principal.msp_id, state.msp_id
            )));
        }
        self.validate(identity)?;
        match principal.role {
            MspRole::Member => Ok(()),
            MspRole::Admin if state.admins.contains(identity.subject()) => Ok(()),
            MspRole::Admin => Err(IdentityError::PrincipalUnsatisfied(format!(
                "{} is not an admin of {}",
                identity.subject(),
                state.msp_id
            ))),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a configuration body and builds provider state.
fn build_state(body: FabricMspConfig) -> Result<FabricState, String> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err("name must be non-empty".to_string());
    }
    if name.len() > MAX_MSP_NAME_LENGTH {
        return Err("name exceeds max length".to_string());
    }
    if body.root_keys.is_empty() {
        return Err("at least one root key is required".to_string());
    }
    if body.root_keys.len() > MAX_ROOT_KEYS {
        return Err("too many root keys".to_string());
    }
    let mut roots = BTreeMap::new();
    for (index, encoded) in body.root_keys.iter().enumerate() {
        let key = decode_public_key(&format!("root_keys[{index}]"), encoded)?;
        if roots.insert(key.to_bytes(), key).is_some() {
            return Err(format!("root_keys[{index}] duplicates an earlier root key"));
        }
    }
    Ok(FabricState {
        msp_id: MspId::new(name),
        roots,
        admins: body.admins.into_iter().collect(),
        revoked: body.revoked.into_iter().collect(),
    })
}

/// Decodes a base64 ed25519 public key.
fn decode_public_key(field: &str, encoded: &str) -> Result<VerifyingKey, String> {
    let bytes = decode_base64(encoded).map_err(|_| format!("{field} is not valid base64"))?;
    let bytes: [u8; 32] =
        bytes.as_slice().try_into().map_err(|_| format!("{field} must be 32 bytes"))?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| format!("{field} is not a valid ed25519 key"))
}
