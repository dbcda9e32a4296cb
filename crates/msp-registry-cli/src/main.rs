// crates/msp-registry-cli/src/main.rs
// ============================================================================
// Module: MSP Registry CLI Entry Point
// Description: Command dispatcher for registry configuration and identity checks.
// Purpose: Validate registry configs and check identities against a committed set.
// Dependencies: clap, base64, msp-registry-config, msp-registry-core, msp-registry-handler.
// ============================================================================

//! ## Overview
//! The MSP registry CLI loads a registry configuration, commits its provider
//! set through a config handler, and answers questions against the committed
//! set: which providers are trusted, whether an identity is valid, and whether
//! a signature verifies. Security posture: identity, message, and config
//! files are untrusted and every read is size-bounded.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use msp_registry_config::RegistryConfig;
use msp_registry_core::HashDigest;
use msp_registry_core::IdentityDeserializer;
use msp_registry_core::MspId;
use msp_registry_core::MspPrincipal;
use msp_registry_core::MspRole;
use msp_registry_core::hashing::canonical_json_bytes;
use msp_registry_handler::MspConfigHandler;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a serialized identity file.
const MAX_IDENTITY_BYTES: usize = 64 * 1024;
/// Maximum size of a message file passed to signature verification.
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;
/// Maximum length of a base64 signature argument.
const MAX_SIGNATURE_CHARS: usize = 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "msp-registry", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Committed provider utilities.
    Msp {
        /// Selected provider subcommand.
        #[command(subcommand)]
        command: MspCommand,
    },
    /// Identity checks against the committed provider set.
    Identity {
        /// Selected identity subcommand.
        #[command(subcommand)]
        command: IdentityCommand,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a registry configuration file and its provider set.
    Validate(ConfigArgs),
}

/// Committed provider subcommands.
#[derive(Subcommand, Debug)]
enum MspCommand {
    /// List committed providers and their trust anchors.
    List(ConfigArgs),
}

/// Identity subcommands.
#[derive(Subcommand, Debug)]
enum IdentityCommand {
    /// Validate a serialized identity, optionally against a role.
    Validate(IdentityValidateCommand),
    /// Verify a signature made by a serialized identity.
    Verify(IdentityVerifyCommand),
}

/// Shared config location argument.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to msp-registry.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for identity validation.
#[derive(Args, Debug)]
struct IdentityValidateCommand {
    /// Path to the serialized identity JSON file.
    #[arg(long, value_name = "PATH")]
    identity: PathBuf,
    /// Role the identity must hold within its provider.
    #[arg(long, value_enum, value_name = "ROLE")]
    role: Option<RoleArg>,
    /// Registry config location.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for signature verification.
#[derive(Args, Debug)]
struct IdentityVerifyCommand {
    /// Path to the serialized identity JSON file.
    #[arg(long, value_name = "PATH")]
    identity: PathBuf,
    /// Path to the signed message bytes.
    #[arg(long, value_name = "PATH")]
    message: PathBuf,
    /// Base64-encoded signature over the message.
    #[arg(long, value_name = "BASE64")]
    signature: String,
    /// Registry config location.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Role selector for principal checks.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RoleArg {
    /// Any valid identity of the provider.
    Member,
    /// An administrator of the provider.
    Admin,
}

impl From<RoleArg> for MspRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Member => Self::Member,
            RoleArg::Admin => Self::Admin,
        }
    }
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Canonical listing of the committed provider set.
#[derive(Debug, Serialize)]
struct MspListing {
    /// Committed providers in identifier order.
    msps: Vec<MspSummary>,
}

/// One committed provider.
#[derive(Debug, Serialize)]
struct MspSummary {
    /// Provider identifier.
    msp_id: MspId,
    /// Digests of the provider's root material.
    trust_anchors: Vec<HashDigest>,
}

/// Result of a successful identity check.
#[derive(Debug, Serialize)]
struct IdentityReport {
    /// Provider the identity belongs to.
    msp_id: MspId,
    /// Subject named by the identity.
    subject: String,
    /// Role checked, when one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<MspRole>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("msp-registry {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Msp {
            command,
        } => command_msp(&command),
        Commands::Identity {
            command,
        } => command_identity(&command),
    }
}

/// Prints top-level help text.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(args),
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let handler = load_handler(args)?;
    let count = handler
        .msps()
        .map_err(|err| CliError::new(format!("failed to read committed providers: {err}")))?
        .len();
    write_stdout_line(&format!("config valid: {count} provider(s) committed"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Provider Commands
// ============================================================================

/// Dispatches provider subcommands.
fn command_msp(command: &MspCommand) -> CliResult<ExitCode> {
    match command {
        MspCommand::List(args) => command_msp_list(args),
    }
}

/// Executes `msp list`.
fn command_msp_list(args: &ConfigArgs) -> CliResult<ExitCode> {
    let handler = load_handler(args)?;
    let msps = handler
        .msps()
        .map_err(|err| CliError::new(format!("failed to read committed providers: {err}")))?;
    let listing = MspListing {
        msps: msps
            .iter()
            .map(|(msp_id, msp)| MspSummary {
                msp_id: msp_id.clone(),
                trust_anchors: msp.trust_anchors(),
            })
            .collect(),
    };
    write_canonical_json(&listing)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Identity Commands
// ============================================================================

/// Dispatches identity subcommands.
fn command_identity(command: &IdentityCommand) -> CliResult<ExitCode> {
    match command {
        IdentityCommand::Validate(command) => command_identity_validate(command),
        IdentityCommand::Verify(command) => command_identity_verify(command),
    }
}

/// Executes `identity validate`.
fn command_identity_validate(command: &IdentityValidateCommand) -> CliResult<ExitCode> {
    let serialized = read_input(&command.identity, "identity", MAX_IDENTITY_BYTES)?;
    let handler = load_handler(&command.config)?;
    let identity = handler
        .validate_identity(&serialized)
        .map_err(|err| CliError::new(format!("identity rejected: {err}")))?;
    let role = command.role.map(MspRole::from);
    if let Some(role) = role {
        let principal = MspPrincipal {
            msp_id: identity.msp_id().clone(),
            role,
        };
        handler
            .satisfies_principal(&serialized, &principal)
            .map_err(|err| CliError::new(format!("identity rejected: {err}")))?;
    }
    write_canonical_json(&IdentityReport {
        msp_id: identity.msp_id().clone(),
        subject: identity.subject().to_string(),
        role,
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `identity verify`.
fn command_identity_verify(command: &IdentityVerifyCommand) -> CliResult<ExitCode> {
    if command.signature.len() > MAX_SIGNATURE_CHARS {
        return Err(CliError::new(format!(
            "signature exceeds size limit ({} > {MAX_SIGNATURE_CHARS} chars)",
            command.signature.len()
        )));
    }
    let signature = BASE64
        .decode(command.signature.trim())
        .map_err(|err| CliError::new(format!("invalid signature encoding: {err}")))?;
    let serialized = read_input(&command.identity, "identity", MAX_IDENTITY_BYTES)?;
    let message = read_input(&command.message, "message", MAX_MESSAGE_BYTES)?;
    let handler = load_handler(&command.config)?;
    let identity = handler
        .validate_identity(&serialized)
        .map_err(|err| CliError::new(format!("identity rejected: {err}")))?;
    identity
        .verify(&message, &signature)
        .map_err(|err| CliError::new(format!("signature rejected: {err}")))?;
    write_stdout_line(&format!(
        "signature verified for {} in {}",
        identity.subject(),
        identity.msp_id()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Registry Helpers
// ============================================================================

/// Loads the registry config and commits its provider set.
fn load_handler(args: &ConfigArgs) -> CliResult<MspConfigHandler> {
    let config = RegistryConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    MspConfigHandler::from_config(&config)
        .map_err(|err| CliError::new(format!("failed to commit provider set: {err}")))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a bounded input file and maps failures to CLI errors.
fn read_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {kind} file {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{kind} file {} exceeds size limit ({size} > {limit} bytes)",
            path.display()
        )),
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as canonical JSON followed by a newline.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let bytes = canonical_json_bytes(value)
        .map_err(|err| CliError::new(format!("failed to encode output: {err}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| CliError::new(format!("failed to encode output: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
