// crates/msp-registry-handler/src/lib.rs
// ============================================================================
// Module: MSP Registry Handler
// Description: Transactional configuration of the trusted identity provider set.
// Purpose: Validate proposed provider sets and commit them atomically.
// Dependencies: msp-registry-config, msp-registry-core, msp-registry-providers
// ============================================================================

//! ## Overview
//! A driver opens a proposal, proposes provider payloads one at a time, then
//! commits or rolls back. The committed trust manager keeps serving identity
//! lookups throughout and is replaced in one swap on commit.
//! Invariants:
//! - A failed proposal never alters the committed manager.
//! - Lifecycle misuse is reported as [`ContractViolation`], never absorbed.
//! - Each commit installs exactly the providers accepted in that proposal.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod committed;
pub mod error;
pub mod handler;
pub mod proposal;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ConfigAction;
pub use audit::ConfigAuditEvent;
pub use audit::ConfigAuditEventParams;
pub use audit::ConfigAuditSink;
pub use audit::ConfigOutcome;
pub use audit::FileConfigAuditSink;
pub use audit::NoopConfigAuditSink;
pub use audit::StderrConfigAuditSink;
pub use audit::audit_sink_from_config;
pub use committed::CommittedManager;
pub use error::ConfigHandlerError;
pub use error::ContractViolation;
pub use handler::MspConfigHandler;
pub use proposal::ProposalLimits;
pub use proposal::ProposalStore;
