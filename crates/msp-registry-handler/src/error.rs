// crates/msp-registry-handler/src/error.rs
// ============================================================================
// Module: Config Handler Errors
// Description: Recoverable setup failures and caller contract violations.
// Purpose: Keep misuse of the proposal lifecycle distinguishable from bad input.
// Dependencies: msp-registry-core, thiserror
// ============================================================================

//! ## Overview
//! [`SetupError`] reports a configuration that could not be built. A
//! [`ContractViolation`] reports a caller that broke the begin, propose,
//! commit, rollback protocol. Callers treat the latter as a bug in the
//! driver and abort the unit of work.

// ============================================================================
// SECTION: Imports
// ============================================================================

use msp_registry_core::SetupError;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Misuse of the proposal lifecycle by the driving caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `begin_config` was called while a proposal was open.
    #[error("a proposal is already open")]
    ProposalAlreadyOpen,
    /// An operation that needs an open proposal ran without one.
    #[error("{operation} requires an open proposal")]
    NoProposalOpen {
        /// Operation that was attempted.
        operation: &'static str,
    },
    /// The proposal failed a manager rebuild and must be rolled back.
    #[error("proposal was invalidated by a failed manager rebuild; roll back first")]
    ProposalInvalidated,
}

impl ContractViolation {
    /// Returns a stable label for the violation kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProposalAlreadyOpen => "proposal_already_open",
            Self::NoProposalOpen {
                ..
            } => "no_proposal_open",
            Self::ProposalInvalidated => "proposal_invalidated",
        }
    }
}

/// Errors returned by config handler operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigHandlerError {
    /// A provider or manager could not be built.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// The caller broke the proposal lifecycle.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
    /// The handler could not be assembled from registry configuration.
    #[error("handler configuration failed: {0}")]
    Config(String),
}

impl ConfigHandlerError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Setup(err) => err.kind(),
            Self::Contract(violation) => violation.kind(),
            Self::Config(_) => "config",
        }
    }

    /// Returns true when the error reports caller misuse.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}
