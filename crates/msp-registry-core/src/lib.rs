// crates/msp-registry-core/src/lib.rs
// ============================================================================
// Module: MSP Registry Core Library
// Description: Public API surface for the MSP registry core.
// Purpose: Expose core types, interfaces, and the default trust manager.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The MSP registry core defines the configuration payloads, identity
//! envelopes, and provider/manager contracts used to decide which identity
//! providers a configuration unit trusts. It holds no global state; handlers
//! own managers explicitly and replace them as a unit.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::Identity;
pub use interfaces::IdentityDeserializer;
pub use interfaces::IdentityError;
pub use interfaces::Msp;
pub use interfaces::MspFactory;
pub use interfaces::MspManager;
pub use interfaces::MspManagerFactory;
pub use interfaces::SetupError;
pub use runtime::DefaultMspManager;
pub use runtime::DefaultMspManagerFactory;
