// crates/msp-registry-config/src/lib.rs
// ============================================================================
// Module: MSP Registry Config Library
// Description: Canonical config model and validation for a registry instance.
// Purpose: Single source of truth for msp-registry.toml semantics.
// Dependencies: msp-registry-core, serde, toml
// ============================================================================

//! ## Overview
//! `msp-registry-config` defines the configuration of a registry instance:
//! proposal limits, the audit sink, and the genesis identity provider set.
//! Loading is strict and fails closed on unknown or invalid input.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
