// crates/msp-registry-core/src/runtime/manager.rs
// ============================================================================
// Module: Default MSP Manager
// Description: Aggregate trust manager routing identities to their provider.
// Purpose: Validate a provider set as a whole and serve identity lookups.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`DefaultMspManager`] is configured once with the complete provider set.
//! Setup checks the set as a unit: identifiers must be unique and no trust
//! anchor may be claimed by two providers. A manager that failed setup stays
//! unconfigured and rejects every lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::HashDigest;
use crate::core::MspId;
use crate::core::MspPrincipal;
use crate::core::SerializedIdentity;
use crate::interfaces::Identity;
use crate::interfaces::IdentityDeserializer;
use crate::interfaces::IdentityError;
use crate::interfaces::Msp;
use crate::interfaces::MspManager;
use crate::interfaces::MspManagerFactory;
use crate::interfaces::SetupError;

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Trust manager keyed by provider identifier.
///
/// # Invariants
/// - `msps` is `None` until a successful [`MspManager::setup`].
/// - Once set, identifiers and trust anchors are unique across providers.
#[derive(Default)]
pub struct DefaultMspManager {
    /// Providers keyed by identifier once set up.
    msps: Option<BTreeMap<MspId, Arc<dyn Msp>>>,
}

impl DefaultMspManager {
    /// Creates an unconfigured manager.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            msps: None,
        }
    }

    /// Returns true once setup has succeeded.
    #[must_use]
    pub const fn is_set_up(&self) -> bool {
        self.msps.is_some()
    }

    /// Returns the provider map or [`IdentityError::NotSetUp`].
    fn configured(&self) -> Result<&BTreeMap<MspId, Arc<dyn Msp>>, IdentityError> {
        self.msps.as_ref().ok_or(IdentityError::NotSetUp)
    }

    /// Returns the provider that issued a decoded identity.
    fn owner(&self, identity: &dyn Identity) -> Result<&Arc<dyn Msp>, IdentityError> {
        self.configured()?
            .get(identity.msp_id())
            .ok_or_else(|| IdentityError::UnknownMsp(identity.msp_id().clone()))
    }

    /// Resolves the provider named by an identity envelope.
    fn route(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        let msps = self.configured()?;
        let envelope = SerializedIdentity::from_json(serialized)
            .map_err(|err| IdentityError::Malformed(err.to_string()))?;
        let msp = msps
            .get(&envelope.msp_id)
            .ok_or_else(|| IdentityError::UnknownMsp(envelope.msp_id.clone()))?;
        msp.deserialize_identity(&envelope.id_bytes)
    }
}

impl MspManager for DefaultMspManager {
    fn setup(&mut self, msps: Vec<Arc<dyn Msp>>) -> Result<(), SetupError> {
        if self.msps.is_some() {
            return Err(SetupError::ManagerSetupFailed("msp manager already set up".to_string()));
        }
        let mut by_id: BTreeMap<MspId, Arc<dyn Msp>> = BTreeMap::new();
        let mut anchors: BTreeMap<HashDigest, MspId> = BTreeMap::new();
        for msp in msps {
            let msp_id = msp.identifier().map_err(|err| {
                SetupError::ManagerSetupFailed(format!("could not extract msp identifier: {err}"))
            })?;
            if by_id.contains_key(&msp_id) {
                return Err(SetupError::ManagerSetupFailed(format!(
                    "duplicate msp identifier: {msp_id}"
                )));
            }
            for anchor in msp.trust_anchors() {
                if let Some(owner) = anchors.get(&anchor)
                    && owner != &msp_id
                {
                    return Err(SetupError::ManagerSetupFailed(format!(
                        "trust anchor {anchor} claimed by both {owner} and {msp_id}"
                    )));
                }
                anchors.insert(anchor, msp_id.clone());
            }
            by_id.insert(msp_id, msp);
        }
        self.msps = Some(by_id);
        Ok(())
    }
}

impl IdentityDeserializer for DefaultMspManager {
    fn msps(&self) -> Result<BTreeMap<MspId, Arc<dyn Msp>>, IdentityError> {
        self.configured().cloned()
    }

    fn deserialize_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        self.route(serialized)
    }

    fn validate_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        let identity = self.route(serialized)?;
        self.owner(identity.as_ref())?.validate(identity.as_ref())?;
        Ok(identity)
    }

    fn satisfies_principal(
        &self,
        serialized: &[u8],
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError> {
        let identity = self.route(serialized)?;
        self.owner(identity.as_ref())?.satisfies_principal(identity.as_ref(), principal)
    }
}

// ============================================================================
// SECTION: Factory
// ============================================================================

/// Factory producing [`DefaultMspManager`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMspManagerFactory;

impl MspManagerFactory for DefaultMspManagerFactory {
    fn new_manager(&self) -> Box<dyn MspManager> {
        Box::new(DefaultMspManager::new())
    }
}
