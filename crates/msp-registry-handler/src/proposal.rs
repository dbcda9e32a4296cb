// crates/msp-registry-handler/src/proposal.rs
// ============================================================================
// Module: Proposal Store
// Description: Identity providers proposed during one open configuration change.
// Purpose: Detect redefinitions and keep a tentative manager built from the whole set.
// Dependencies: msp-registry-config, msp-registry-core
// ============================================================================

//! ## Overview
//! A [`ProposalStore`] lives from `begin_config` until commit or rollback. Each
//! accepted proposal rebuilds the tentative trust manager from every provider
//! in the store, since providers are only valid as a set.
//!
//! Invariants:
//! - The tentative manager is either absent or built from exactly the current
//!   providers.
//! - A rejected proposal (limit, factory, identifier, or conflict) leaves the
//!   store unchanged.
//! - A failed rebuild keeps the new entry, clears the tentative manager, and
//!   marks the store invalidated until rolled back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use msp_registry_config::LimitsConfig;
use msp_registry_core::Msp;
use msp_registry_core::MspConfig;
use msp_registry_core::MspFactory;
use msp_registry_core::MspId;
use msp_registry_core::MspManager;
use msp_registry_core::MspManagerFactory;
use msp_registry_core::SetupError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Hard limits applied to a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalLimits {
    /// Maximum distinct identity providers in one proposal.
    pub max_msps_per_proposal: usize,
    /// Maximum size of one configuration body in bytes.
    pub max_config_bytes: usize,
}

impl Default for ProposalLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

impl From<&LimitsConfig> for ProposalLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_msps_per_proposal: config.max_msps_per_proposal,
            max_config_bytes: config.max_config_bytes,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// A proposed provider and the payload it was built from.
struct PendingMsp {
    /// Payload as proposed.
    config: MspConfig,
    /// Provider built from the payload.
    msp: Arc<dyn Msp>,
}

/// Providers proposed so far in one open configuration change.
#[derive(Default)]
pub struct ProposalStore {
    /// Proposed providers keyed by identifier.
    providers: BTreeMap<MspId, PendingMsp>,
    /// Manager built from `providers` after the last successful proposal.
    tentative: Option<Arc<dyn MspManager>>,
    /// Set when a rebuild failed; cleared only by discarding the store.
    invalidated: bool,
}

impl ProposalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from `config`, records it, and rebuilds the
    /// tentative manager.
    ///
    /// Proposing a payload identical to the one already stored under the same
    /// identifier keeps the stored entry and returns the newly built provider.
    /// Callers must not propose into an invalidated store.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnsupportedProviderType`] for unknown type tags
    /// before any size check, [`SetupError::LimitExceeded`] for oversized
    /// bodies or too many providers, [`SetupError::ConflictingRedefinition`] when the identifier
    /// is already bound to a different payload, factory errors unchanged, and
    /// the manager error when the rebuilt set is rejected.
    pub fn propose(
        &mut self,
        config: &MspConfig,
        msp_factory: &dyn MspFactory,
        manager_factory: &dyn MspManagerFactory,
        limits: &ProposalLimits,
    ) -> Result<Arc<dyn Msp>, SetupError> {
        let mut msp = msp_factory.instantiate(&config.provider_type)?;
        if config.body_len() > limits.max_config_bytes {
            return Err(SetupError::LimitExceeded(format!(
                "config body of {} bytes exceeds {} bytes",
                config.body_len(),
                limits.max_config_bytes
            )));
        }
        msp.setup(config)?;
        let msp: Arc<dyn Msp> = Arc::from(msp);
        let msp_id = msp.identifier()?;
        match self.providers.get(&msp_id) {
            Some(existing) if existing.config != *config => {
                return Err(SetupError::ConflictingRedefinition(msp_id));
            }
            Some(_) => {}
            None => {
                if self.providers.len() >= limits.max_msps_per_proposal {
                    return Err(SetupError::LimitExceeded(format!(
                        "proposal already holds {} msps",
                        limits.max_msps_per_proposal
                    )));
                }
                self.providers.insert(
                    msp_id,
                    PendingMsp {
                        config: config.clone(),
                        msp: Arc::clone(&msp),
                    },
                );
            }
        }
        self.rebuild(manager_factory)?;
        Ok(msp)
    }

    /// Returns the manager a commit of this store would install.
    ///
    /// An empty store yields a freshly set-up manager that trusts nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the empty manager cannot be set up.
    pub fn committable_manager(
        &self,
        manager_factory: &dyn MspManagerFactory,
    ) -> Result<Arc<dyn MspManager>, SetupError> {
        if let Some(manager) = &self.tentative {
            return Ok(Arc::clone(manager));
        }
        let mut manager = manager_factory.new_manager();
        manager.setup(Vec::new())?;
        Ok(Arc::from(manager))
    }

    /// Returns the number of proposed providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true when nothing has been proposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns true when `msp_id` has been proposed.
    #[must_use]
    pub fn contains(&self, msp_id: &MspId) -> bool {
        self.providers.contains_key(msp_id)
    }

    /// Returns the payload stored for `msp_id`.
    #[must_use]
    pub fn config(&self, msp_id: &MspId) -> Option<&MspConfig> {
        self.providers.get(msp_id).map(|pending| &pending.config)
    }

    /// Returns the proposed identifiers in order.
    pub fn msp_ids(&self) -> impl Iterator<Item = &MspId> {
        self.providers.keys()
    }

    /// Returns the tentative manager, if the last rebuild succeeded.
    #[must_use]
    pub fn tentative_manager(&self) -> Option<Arc<dyn MspManager>> {
        self.tentative.clone()
    }

    /// Returns true once a rebuild has failed.
    #[must_use]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Rebuilds the tentative manager from every stored provider.
    fn rebuild(&mut self, manager_factory: &dyn MspManagerFactory) -> Result<(), SetupError> {
        self.tentative = None;
        let msps = self.providers.values().map(|pending| Arc::clone(&pending.msp)).collect();
        let mut manager = manager_factory.new_manager();
        if let Err(err) = manager.setup(msps) {
            self.invalidated = true;
            return Err(err);
        }
        self.tentative = Some(Arc::from(manager));
        Ok(())
    }
}
