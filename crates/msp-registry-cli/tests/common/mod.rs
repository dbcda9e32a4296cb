// crates/msp-registry-cli/tests/common/mod.rs
// ============================================================================
// Module: Common CLI Test Fixtures
// Description: Registry configs, identities, and binary invocation helpers.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: msp-registry-core, msp-registry-providers, ed25519-dalek, tempfile
// ============================================================================

//! ## Overview
//! Each organization is a `fabric` provider with one root key derived from a
//! fixed seed. Fixtures are written into a temporary directory and the
//! `msp-registry` binary is invoked against them.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use msp_registry_core::MspId;
use msp_registry_core::SerializedIdentity;
use msp_registry_core::encode_base64;
use msp_registry_providers::IdentityCertificate;
use msp_registry_providers::certificate_signing_bytes;

// ============================================================================
// SECTION: Organizations
// ============================================================================

/// Test organization with a single root key and optional admins.
pub struct Org {
    /// Provider name.
    pub name: &'static str,
    /// Root signing key.
    pub root: SigningKey,
    /// Subjects granted the admin role.
    pub admins: Vec<&'static str>,
}

impl Org {
    /// Creates an organization whose root key derives from `seed`.
    #[must_use]
    pub fn new(name: &'static str, seed: u8) -> Self {
        Self {
            name,
            root: signing_key(seed),
            admins: Vec::new(),
        }
    }

    /// Returns the organization with `subject` granted the admin role.
    #[must_use]
    pub fn with_admin(mut self, subject: &'static str) -> Self {
        self.admins.push(subject);
        self
    }

    /// Returns the `[[msps]]` TOML entry for this organization.
    #[must_use]
    pub fn toml_entry(&self) -> String {
        let root_key = encode_base64(self.root.verifying_key().as_bytes());
        let mut entry = String::from("[[msps]]\ntype = \"fabric\"\n[msps.config]\n");
        writeln!(entry, "name = \"{}\"", self.name).expect("write toml");
        writeln!(entry, "root_keys = [\"{root_key}\"]").expect("write toml");
        if !self.admins.is_empty() {
            let admins: Vec<String> =
                self.admins.iter().map(|admin| format!("\"{admin}\"")).collect();
            writeln!(entry, "admins = [{}]", admins.join(", ")).expect("write toml");
        }
        entry.push('\n');
        entry
    }

    /// Returns a routed identity for `subject` issued by this organization.
    #[must_use]
    pub fn identity(&self, subject: &str, member: &SigningKey) -> Vec<u8> {
        let public_key = encode_base64(member.verifying_key().as_bytes());
        let issuer_key = encode_base64(self.root.verifying_key().as_bytes());
        let message =
            certificate_signing_bytes(&MspId::new(self.name), subject, &public_key, &issuer_key)
                .expect("signing bytes");
        let certificate = IdentityCertificate {
            subject: subject.to_string(),
            public_key,
            issuer_key,
            signature: encode_base64(&self.root.sign(&message).to_bytes()),
        };
        SerializedIdentity {
            msp_id: MspId::new(self.name),
            id_bytes: serde_json::to_vec(&certificate).expect("encode certificate"),
        }
        .to_json()
        .expect("encode envelope")
    }
}

/// Returns a deterministic signing key for the seed.
#[must_use]
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Returns a registry config body committing `orgs`.
#[must_use]
pub fn registry_toml(orgs: &[&Org]) -> String {
    orgs.iter().map(|org| org.toml_entry()).collect()
}

/// Writes `contents` to `name` under `dir` and returns the path.
#[must_use]
pub fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

// ============================================================================
// SECTION: Binary Invocation
// ============================================================================

/// Runs the `msp-registry` binary with `args` and no config env override.
#[must_use]
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msp-registry"))
        .args(args)
        .env_remove("MSP_REGISTRY_CONFIG")
        .output()
        .expect("run msp-registry")
}

/// Returns stdout as UTF-8 text.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout utf-8")
}

/// Returns stderr as UTF-8 text.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("stderr utf-8")
}
