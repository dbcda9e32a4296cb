// crates/msp-registry-providers/src/factory.rs
// ============================================================================
// Module: Built-in MSP Factory
// Description: Factory dispatching provider type tags to built-in providers.
// Purpose: Instantiate identity providers without exposing concrete types.
// Dependencies: msp-registry-core
// ============================================================================

//! ## Overview
//! [`BuiltinMspFactory`] maps each supported type tag to a fresh provider.
//! Configuration happens in [`MspFactory::create`]; the factory itself holds
//! no state, so a failed build leaves nothing behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use msp_registry_core::FABRIC_PROVIDER_TYPE;
use msp_registry_core::Msp;
use msp_registry_core::MspFactory;
use msp_registry_core::ProviderType;
use msp_registry_core::SetupError;

use crate::FabricMsp;

// ============================================================================
// SECTION: Factory
// ============================================================================

/// Factory for the built-in identity providers.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinMspFactory;

impl MspFactory for BuiltinMspFactory {
    fn instantiate(&self, provider_type: &ProviderType) -> Result<Box<dyn Msp>, SetupError> {
        match provider_type.as_str() {
            FABRIC_PROVIDER_TYPE => Ok(Box::new(FabricMsp::new())),
            _ => Err(SetupError::UnsupportedProviderType(provider_type.clone())),
        }
    }
}
