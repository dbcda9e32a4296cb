// crates/msp-registry-core/src/runtime/mod.rs
// ============================================================================
// Module: MSP Registry Runtime
// Description: Default implementations of the trust manager interfaces.
// Purpose: Provide the aggregate manager used by the config handler.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime helpers implement [`crate::interfaces::MspManager`] and its factory.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod manager;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use manager::DefaultMspManager;
pub use manager::DefaultMspManagerFactory;
