// crates/msp-registry-handler/src/audit.rs
// ============================================================================
// Module: Config Audit Logging
// Description: Structured audit events for identity provider configuration changes.
// Purpose: Emit hash-only audit logs without hard dependencies.
// Dependencies: msp-registry-config, msp-registry-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every handler operation emits one [`ConfigAuditEvent`] as a JSON line.
//! Events carry payload digests, never payload bodies. Sinks are selected by
//! the `[audit]` config section or injected directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use msp_registry_config::AuditConfig;
use msp_registry_config::AuditSinkKind;
use msp_registry_core::HashDigest;
use msp_registry_core::MspId;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Handler operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigAction {
    /// `begin_config`.
    Begin,
    /// `propose_msp`.
    Propose,
    /// `commit_config`.
    Commit,
    /// `rollback_config`.
    Rollback,
}

/// Result classification of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigOutcome {
    /// Operation succeeded.
    Ok,
    /// Operation failed with a recoverable error.
    Error,
    /// Caller broke the proposal lifecycle.
    ContractViolation,
}

/// Configuration audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Per-handler event sequence number.
    pub sequence: u64,
    /// Audited operation.
    pub action: ConfigAction,
    /// Operation outcome.
    pub outcome: ConfigOutcome,
    /// Provider identifier when known.
    pub msp_id: Option<MspId>,
    /// Canonical hash of the proposed payload.
    pub config_hash: Option<HashDigest>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the operation failed.
    pub message: Option<String>,
    /// Providers in the open proposal after the operation.
    pub proposal_size: usize,
}

/// Inputs required to construct a config audit event.
pub struct ConfigAuditEventParams {
    /// Per-handler event sequence number.
    pub sequence: u64,
    /// Audited operation.
    pub action: ConfigAction,
    /// Operation outcome.
    pub outcome: ConfigOutcome,
    /// Provider identifier when known.
    pub msp_id: Option<MspId>,
    /// Canonical hash of the proposed payload.
    pub config_hash: Option<HashDigest>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the operation failed.
    pub message: Option<String>,
    /// Providers in the open proposal after the operation.
    pub proposal_size: usize,
}

impl ConfigAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ConfigAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "msp_config",
            timestamp_ms,
            sequence: params.sequence,
            action: params.action,
            outcome: params.outcome,
            msp_id: params.msp_id,
            config_hash: params.config_hash,
            error_kind: params.error_kind,
            message: params.message,
            proposal_size: params.proposal_size,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for configuration events.
pub trait ConfigAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ConfigAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrConfigAuditSink;

impl ConfigAuditSink for StderrConfigAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileConfigAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileConfigAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConfigAuditSink for FileConfigAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopConfigAuditSink;

impl ConfigAuditSink for NoopConfigAuditSink {
    fn record(&self, _event: &ConfigAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by the `[audit]` config section.
///
/// # Errors
///
/// Returns an error when the file sink has no path or cannot be opened.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn ConfigAuditSink>> {
    match config.sink {
        AuditSinkKind::None => Ok(Arc::new(NoopConfigAuditSink)),
        AuditSinkKind::Stderr => Ok(Arc::new(StderrConfigAuditSink)),
        AuditSinkKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "audit.path is required for the file sink",
                )
            })?;
            Ok(Arc::new(FileConfigAuditSink::new(Path::new(path.trim()))?))
        }
    }
}
