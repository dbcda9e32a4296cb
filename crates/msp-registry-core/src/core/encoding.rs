// crates/msp-registry-core/src/core/encoding.rs
// ============================================================================
// Module: MSP Registry Byte Encoding
// Description: Base64 serde adapters for opaque byte payloads.
// Purpose: Keep binary payloads readable and stable in JSON and TOML forms.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! Opaque payloads (configuration bodies, identity bytes) serialize as
//! standard base64 strings. Use with `#[serde(with = "base64_bytes")]`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serializer;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes bytes as a standard base64 string.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes a standard base64 string, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`base64::DecodeError`] when the input is not valid base64.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(text.trim())
}

/// Serde adapter for `Vec<u8>` fields encoded as base64 strings.
pub mod base64_bytes {
    use super::Deserialize;
    use super::Deserializer;
    use super::Serializer;
    use super::decode_base64;
    use super::encode_base64;

    /// Serializes bytes as a base64 string.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when writing fails.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_base64(bytes))
    }

    /// Deserializes bytes from a base64 string.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when the value is not a base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_base64(&text).map_err(serde::de::Error::custom)
    }
}
