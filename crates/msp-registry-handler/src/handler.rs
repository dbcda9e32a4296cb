// crates/msp-registry-handler/src/handler.rs
// ============================================================================
// Module: MSP Config Handler
// Description: Begin, propose, commit, rollback state machine for trusted providers.
// Purpose: Swap the committed trust manager atomically or not at all.
// Dependencies: msp-registry-config, msp-registry-core, msp-registry-providers
// ============================================================================

//! ## Overview
//! [`MspConfigHandler`] is either idle with a committed manager, or proposing
//! with the committed manager frozen plus one open [`ProposalStore`]. Commit
//! installs the tentative manager in one swap; rollback discards the store.
//! Each proposal is a full replacement set, not a patch on the committed one.
//!
//! Writer operations take `&mut self`, so one caller drives a handler at a
//! time. Readers on other threads use [`MspConfigHandler::manager_handle`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use msp_registry_config::RegistryConfig;
use msp_registry_core::DefaultMspManagerFactory;
use msp_registry_core::HashDigest;
use msp_registry_core::Identity;
use msp_registry_core::IdentityDeserializer;
use msp_registry_core::IdentityError;
use msp_registry_core::Msp;
use msp_registry_core::MspConfig;
use msp_registry_core::MspFactory;
use msp_registry_core::MspId;
use msp_registry_core::MspManager;
use msp_registry_core::MspManagerFactory;
use msp_registry_core::MspPrincipal;
use msp_registry_core::SetupError;
use msp_registry_providers::BuiltinMspFactory;

use crate::audit::ConfigAction;
use crate::audit::ConfigAuditEvent;
use crate::audit::ConfigAuditEventParams;
use crate::audit::ConfigAuditSink;
use crate::audit::ConfigOutcome;
use crate::audit::NoopConfigAuditSink;
use crate::audit::audit_sink_from_config;
use crate::committed::CommittedManager;
use crate::error::ConfigHandlerError;
use crate::error::ContractViolation;
use crate::proposal::ProposalLimits;
use crate::proposal::ProposalStore;

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Owner of the committed trust manager and the open proposal, if any.
pub struct MspConfigHandler {
    /// Builds providers from payloads.
    msp_factory: Arc<dyn MspFactory>,
    /// Builds empty trust managers.
    manager_factory: Arc<dyn MspManagerFactory>,
    /// Committed manager shared with readers.
    committed: CommittedManager,
    /// Open proposal.
    proposal: Option<ProposalStore>,
    /// Limits applied to each proposal.
    limits: ProposalLimits,
    /// Destination for audit events.
    audit: Arc<dyn ConfigAuditSink>,
    /// Sequence number of the next audit event.
    sequence: u64,
}

/// Optional fields of an audit event.
#[derive(Default)]
struct AuditDetail {
    /// Provider identifier when known.
    msp_id: Option<MspId>,
    /// Payload digest when a payload was involved.
    config_hash: Option<HashDigest>,
    /// Error kind label.
    error_kind: Option<&'static str>,
    /// Error message.
    message: Option<String>,
}

impl MspConfigHandler {
    /// Creates an idle handler whose committed manager trusts nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the empty manager cannot be set up.
    pub fn new(
        msp_factory: Arc<dyn MspFactory>,
        manager_factory: Arc<dyn MspManagerFactory>,
    ) -> Result<Self, SetupError> {
        let mut initial = manager_factory.new_manager();
        initial.setup(Vec::new())?;
        Ok(Self {
            msp_factory,
            manager_factory,
            committed: CommittedManager::new(Arc::from(initial)),
            proposal: None,
            limits: ProposalLimits::default(),
            audit: Arc::new(NoopConfigAuditSink),
            sequence: 0,
        })
    }

    /// Creates a handler using the built-in provider and manager factories.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the empty manager cannot be set up.
    pub fn builtin() -> Result<Self, SetupError> {
        Self::new(Arc::new(BuiltinMspFactory), Arc::new(DefaultMspManagerFactory))
    }

    /// Builds a built-in handler from registry configuration and commits the
    /// configured provider set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigHandlerError`] when the audit sink cannot be opened or
    /// the configured set cannot be committed.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigHandlerError> {
        let sink = audit_sink_from_config(&config.audit)
            .map_err(|err| ConfigHandlerError::Config(format!("audit sink: {err}")))?;
        let configs =
            config.msp_configs().map_err(|err| ConfigHandlerError::Config(err.to_string()))?;
        let mut handler = Self::builtin()?
            .with_limits(ProposalLimits::from(&config.limits))
            .with_audit_sink(sink);
        handler.apply(&configs)?;
        Ok(handler)
    }

    /// Replaces the proposal limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ProposalLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ConfigAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Opens a proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::ProposalAlreadyOpen`] when one is open.
    pub fn begin_config(&mut self) -> Result<(), ContractViolation> {
        if self.proposal.is_some() {
            return Err(self.violation(ConfigAction::Begin, ContractViolation::ProposalAlreadyOpen));
        }
        self.proposal = Some(ProposalStore::new());
        self.audit(ConfigAction::Begin, ConfigOutcome::Ok, AuditDetail::default());
        Ok(())
    }

    /// Proposes one provider payload into the open proposal.
    ///
    /// Returns the provider built from `config`. The committed manager is not
    /// affected. On a recoverable error the caller is expected to roll back.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigHandlerError::Contract`] without an open or with an
    /// invalidated proposal, and [`ConfigHandlerError::Setup`] when the
    /// payload is rejected.
    pub fn propose_msp(&mut self, config: &MspConfig) -> Result<Arc<dyn Msp>, ConfigHandlerError> {
        let config_hash = config.digest().ok();
        let Some(store) = self.proposal.as_mut() else {
            let violation = ContractViolation::NoProposalOpen {
                operation: "propose_msp",
            };
            return Err(self.violation(ConfigAction::Propose, violation).into());
        };
        if store.is_invalidated() {
            return Err(self
                .violation(ConfigAction::Propose, ContractViolation::ProposalInvalidated)
                .into());
        }
        let result = store.propose(
            config,
            self.msp_factory.as_ref(),
            self.manager_factory.as_ref(),
            &self.limits,
        );
        match result {
            Ok(msp) => {
                let detail = AuditDetail {
                    msp_id: msp.identifier().ok(),
                    config_hash,
                    ..AuditDetail::default()
                };
                self.audit(ConfigAction::Propose, ConfigOutcome::Ok, detail);
                Ok(msp)
            }
            Err(err) => {
                let msp_id = match &err {
                    SetupError::ConflictingRedefinition(msp_id) => Some(msp_id.clone()),
                    _ => None,
                };
                let detail = AuditDetail {
                    msp_id,
                    config_hash,
                    error_kind: Some(err.kind()),
                    message: Some(err.to_string()),
                };
                self.audit(ConfigAction::Propose, ConfigOutcome::Error, detail);
                Err(err.into())
            }
        }
    }

    /// Installs the open proposal's manager and closes the proposal.
    ///
    /// A proposal with no accepted providers commits a manager that trusts
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigHandlerError::Contract`] without an open or with an
    /// invalidated proposal, and [`ConfigHandlerError::Setup`] when the
    /// manager cannot be built. The proposal stays open on error.
    pub fn commit_config(&mut self) -> Result<(), ConfigHandlerError> {
        let Some(store) = self.proposal.as_ref() else {
            let violation = ContractViolation::NoProposalOpen {
                operation: "commit_config",
            };
            return Err(self.violation(ConfigAction::Commit, violation).into());
        };
        if store.is_invalidated() {
            return Err(self
                .violation(ConfigAction::Commit, ContractViolation::ProposalInvalidated)
                .into());
        }
        let size = store.len();
        match store.committable_manager(self.manager_factory.as_ref()) {
            Ok(manager) => {
                self.committed.replace(manager);
                self.proposal = None;
                let detail = AuditDetail::default();
                self.audit_with_size(ConfigAction::Commit, ConfigOutcome::Ok, size, detail);
                Ok(())
            }
            Err(err) => {
                let detail = AuditDetail {
                    error_kind: Some(err.kind()),
                    message: Some(err.to_string()),
                    ..AuditDetail::default()
                };
                self.audit(ConfigAction::Commit, ConfigOutcome::Error, detail);
                Err(err.into())
            }
        }
    }

    /// Discards the open proposal; does nothing when idle.
    pub fn rollback_config(&mut self) {
        let size = self.proposal.take().map_or(0, |store| store.len());
        let detail = AuditDetail::default();
        self.audit_with_size(ConfigAction::Rollback, ConfigOutcome::Ok, size, detail);
    }

    /// Proposes `configs` as one full replacement set and commits it.
    ///
    /// Any propose or commit failure rolls the proposal back before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigHandlerError`] when a proposal is already open or the
    /// set cannot be committed.
    pub fn apply(&mut self, configs: &[MspConfig]) -> Result<(), ConfigHandlerError> {
        self.begin_config()?;
        let result = configs
            .iter()
            .try_for_each(|config| self.propose_msp(config).map(|_| ()))
            .and_then(|()| self.commit_config());
        if result.is_err() {
            self.rollback_config();
        }
        result
    }

    /// Returns true while a proposal is open.
    #[must_use]
    pub const fn is_proposing(&self) -> bool {
        self.proposal.is_some()
    }

    /// Returns the open proposal.
    #[must_use]
    pub const fn pending(&self) -> Option<&ProposalStore> {
        self.proposal.as_ref()
    }

    /// Returns a snapshot of the committed manager.
    #[must_use]
    pub fn committed_manager(&self) -> Arc<dyn MspManager> {
        self.committed.current()
    }

    /// Returns a read handle that follows future commits.
    #[must_use]
    pub fn manager_handle(&self) -> CommittedManager {
        self.committed.clone()
    }

    /// Returns the proposal limits in effect.
    #[must_use]
    pub const fn limits(&self) -> ProposalLimits {
        self.limits
    }

    /// Audits a contract violation and returns it.
    fn violation(
        &mut self,
        action: ConfigAction,
        violation: ContractViolation,
    ) -> ContractViolation {
        let detail = AuditDetail {
            error_kind: Some(violation.kind()),
            message: Some(violation.to_string()),
            ..AuditDetail::default()
        };
        self.audit(action, ConfigOutcome::ContractViolation, detail);
        violation
    }

    /// Emits an audit event sized by the open proposal.
    fn audit(&mut self, action: ConfigAction, outcome: ConfigOutcome, detail: AuditDetail) {
        let size = self.proposal.as_ref().map_or(0, ProposalStore::len);
        self.audit_with_size(action, outcome, size, detail);
    }

    /// Emits an audit event with an explicit proposal size.
    fn audit_with_size(
        &mut self,
        action: ConfigAction,
        outcome: ConfigOutcome,
        proposal_size: usize,
        detail: AuditDetail,
    ) {
        let event = ConfigAuditEvent::new(ConfigAuditEventParams {
            sequence: self.sequence,
            action,
            outcome,
            msp_id: detail.msp_id,
            config_hash: detail.config_hash,
            error_kind: detail.error_kind,
            message: detail.message,
            proposal_size,
        });
        self.sequence = self.sequence.saturating_add(1);
        self.audit.record(&event);
    }
}

impl IdentityDeserializer for MspConfigHandler {
    fn msps(&self) -> Result<BTreeMap<MspId, Arc<dyn Msp>>, IdentityError> {
        self.committed.msps()
    }

    fn deserialize_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        self.committed.deserialize_identity(serialized)
    }

    fn validate_identity(&self, serialized: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        self.committed.validate_identity(serialized)
    }

    fn satisfies_principal(
        &self,
        serialized: &[u8],
        principal: &MspPrincipal,
    ) -> Result<(), IdentityError> {
        self.committed.satisfies_principal(serialized, principal)
    }
}
