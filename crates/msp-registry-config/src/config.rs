// crates/msp-registry-config/src/config.rs
// ============================================================================
// Module: MSP Registry Configuration
// Description: Configuration loading and validation for a registry instance.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: msp-registry-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Each `[[msps]]` entry carries a provider type tag and a `config` table that
//! is converted to canonical JSON bytes, so equal tables always produce equal
//! payloads regardless of key order in the file.
//! Security posture: config inputs are untrusted and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use msp_registry_core::MspConfig;
use msp_registry_core::SUPPORTED_PROVIDER_TYPES;
use msp_registry_core::hashing::canonical_json_bytes;
use msp_registry_core::is_supported_provider_type;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "msp-registry.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "MSP_REGISTRY_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum identity providers per proposal.
pub const DEFAULT_MAX_MSPS_PER_PROPOSAL: usize = 256;
/// Upper bound for `limits.max_msps_per_proposal`.
pub const MAX_MSPS_PER_PROPOSAL: usize = 4096;
/// Default maximum configuration body size in bytes.
pub const DEFAULT_MAX_CONFIG_BYTES: usize = 64 * 1024;
/// Upper bound for `limits.max_config_bytes`.
pub const MAX_CONFIG_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Proposal limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Genesis identity provider set committed at startup.
    #[serde(default)]
    pub msps: Vec<MspEntryConfig>,
}

impl RegistryConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.audit.validate()?;
        for (index, entry) in self.msps.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(())
    }

    /// Converts the genesis entries into configuration payloads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry cannot be canonicalized.
    pub fn msp_configs(&self) -> Result<Vec<MspConfig>, ConfigError> {
        self.msps.iter().map(MspEntryConfig::to_msp_config).collect()
    }
}

/// Proposal limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum distinct identity providers in one proposal.
    #[serde(default = "default_max_msps_per_proposal")]
    pub max_msps_per_proposal: usize,
    /// Maximum size of one configuration body in bytes.
    #[serde(default = "default_max_config_bytes")]
    pub max_config_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_msps_per_proposal: DEFAULT_MAX_MSPS_PER_PROPOSAL,
            max_config_bytes: DEFAULT_MAX_CONFIG_BYTES,
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_msps_per_proposal == 0 || self.max_msps_per_proposal > MAX_MSPS_PER_PROPOSAL {
            return Err(ConfigError::Invalid(format!(
                "limits.max_msps_per_proposal must be between 1 and {MAX_MSPS_PER_PROPOSAL}"
            )));
        }
        if self.max_config_bytes == 0 || self.max_config_bytes > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_config_bytes must be between 1 and {MAX_CONFIG_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates sink selection against the path setting.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid for the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// One genesis identity provider entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MspEntryConfig {
    /// Provider type tag.
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Provider-specific configuration body.
    pub config: toml::Table,
}

impl MspEntryConfig {
    /// Validates the entry type tag.
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.provider_type.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("msps[{index}].type must be non-empty")));
        }
        if !is_supported_provider_type(&self.provider_type) {
            return Err(ConfigError::Invalid(format!(
                "msps[{index}].type {} is not one of {}",
                self.provider_type,
                SUPPORTED_PROVIDER_TYPES.join(", ")
            )));
        }
        Ok(())
    }

    /// Converts the entry into a payload with a canonical JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the body cannot be canonicalized.
    pub fn to_msp_config(&self) -> Result<MspConfig, ConfigError> {
        let body = canonical_json_bytes(&self.config)
            .map_err(|err| ConfigError::Invalid(format!("msp config error: {err}")))?;
        Ok(MspConfig::new(self.provider_type.as_str(), body))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default maximum identity providers per proposal.
const fn default_max_msps_per_proposal() -> usize {
    DEFAULT_MAX_MSPS_PER_PROPOSAL
}

/// Default maximum configuration body size.
const fn default_max_config_bytes() -> usize {
    DEFAULT_MAX_CONFIG_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================
