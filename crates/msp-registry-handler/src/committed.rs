// crates/msp-registry-handler/src/committed.rs
// ============================================================================
// Module: Committed Manager Handle
// Description: Shared read handle to the currently committed trust manager.
// Purpose: Let readers validate identities while a proposal is in progress.
// Dependencies: msp-registry-core
// ============================================================================

//! ## Overview
//! [`CommittedManager`] holds the committed manager behind one `Arc` slot.
//! Readers take a snapshot of the slot; a commit replaces the slot in a single
//! write, so every lookup sees either the old manager or the new one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use msp_registry_core::Identity;
use msp_registry_core::IdentityDeserializer;
use msp_registry_core::IdentityError;
use msp_registry_core::Msp;
use msp_registry_core::MspId;
use msp_registry_core::MspManager;
use msp_registry_core::MspPrincipal;

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Cloneable handle to the committed trust manager.
#[derive(Clone)]
pub struct CommittedManager {
    /// Slot holding the committed manager.
    slot: Arc<RwLock<Arc<dyn MspManager>>>,
}

impl CommittedManager {
    /// Creates a handle around an already set-up manager.
    #[must_use]
    pub fn new(manager: Arc<dyn MspManager>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(manager)),
        }
    }

    /// Returns a snapshot of the committed manager.
    #[must_use]
    pub fn current(&self) -> Arc<dyn MspManager> {
        // The slot only ever holds a complete Arc, so a poisoned lock is still consistent.
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*slot)
    }

    /// Installs `manager` and returns the one it replaced.
    pub(crate) fn replace(&self, manager: Arc<dyn MspManager>) -> Arc<dyn MspManager> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, manager)
    }
}

impl IdentityDeserializer for CommittedManager {
    fn msps(&self) -> Result<BTreeMap<MspId, Arc<dyn Msp>>, IdentityError> {
        self.current().msps()
    }

    fn deserialize_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        self.current().deserialize_identity(serialized)
    }

    fn validate_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        self.current().validate_identity(serialized)
    }

    fn satisfies_principal(
        &self,
        serialized: &[u8],
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError> {
        self.current().satisfies_principal(serialized, principal)
    }
}
