//! Registry config validation tests for msp-registry-config.
// crates/msp-registry-config/tests/registry_validation.rs
// =============================================================================
// Module: Registry Config Validation Tests
// Description: Validate limits, audit, and genesis provider entries.
// Purpose: Ensure registry settings fail closed and payloads are canonical.
// =============================================================================

use msp_registry_config::AuditSinkKind;
use msp_registry_config::ConfigError;
use msp_registry_config::RegistryConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<RegistryConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn limits_reject_zero_max_msps() -> TestResult {
    let toml = "[limits]\nmax_msps_per_proposal = 0\n";
    assert_invalid(RegistryConfig::from_toml(toml), "limits.max_msps_per_proposal")
}

#[test]
fn limits_reject_oversized_max_config_bytes() -> TestResult {
    let toml = "[limits]\nmax_config_bytes = 2000000\n";
    assert_invalid(RegistryConfig::from_toml(toml), "limits.max_config_bytes")
}

#[test]
fn limits_reject_unknown_fields() -> TestResult {
    let toml = "[limits]\nmax_members = 3\n";
    assert_invalid(RegistryConfig::from_toml(toml), "config parse error")
}

#[test]
fn audit_file_sink_requires_path() -> TestResult {
    let toml = "[audit]\nsink = \"file\"\n";
    assert_invalid(RegistryConfig::from_toml(toml), "audit.path is required")
}

#[test]
fn audit_rejects_unknown_sink() -> TestResult {
    let toml = "[audit]\nsink = \"syslog\"\n";
    assert_invalid(RegistryConfig::from_toml(toml), "config parse error")
}

#[test]
fn audit_file_sink_accepts_path() -> TestResult {
    let toml = "[audit]\nsink = \"file\"\npath = \"audit/msp.jsonl\"\n";
    let config = RegistryConfig::from_toml(toml).map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::File {
        return Err("expected file sink".to_string());
    }
    Ok(())
}

#[test]
fn msps_reject_unsupported_type() -> TestResult {
    let toml = "[[msps]]\ntype = \"idemix\"\n[msps.config]\nname = \"org1\"\n";
    assert_invalid(RegistryConfig::from_toml(toml), "msps[0].type idemix is not one of fabric")
}

#[test]
fn msps_require_config_table() -> TestResult {
    let toml = "[[msps]]\ntype = \"fabric\"\n";
    assert_invalid(RegistryConfig::from_toml(toml), "config parse error")
}

#[test]
fn msp_bodies_are_canonical_json() -> TestResult {
    let toml = r#"
[[msps]]
type = "fabric"
[msps.config]
root_keys = ["a", "b"]
name = "org1"

[[msps]]
type = "fabric"
config = { name = "org1", root_keys = ["a", "b"] }
"#;
    let config = RegistryConfig::from_toml(toml).map_err(|err| err.to_string())?;
    let payloads = config.msp_configs().map_err(|err| err.to_string())?;
    let [first, second] = payloads.as_slice() else {
        return Err("expected two payloads".to_string());
    };
    if first != second {
        return Err("key order changed the payload".to_string());
    }
    if first.provider_type.as_str() != "fabric" {
        return Err("unexpected provider type".to_string());
    }
    if first.config != br#"{"name":"org1","root_keys":["a","b"]}"#.to_vec() {
        return Err(format!("unexpected body {}", String::from_utf8_lossy(&first.config)));
    }
    Ok(())
}
