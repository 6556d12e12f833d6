use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::stream_suite::SeekOrigin;

pub const PROBE_CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_BINARY_PAYLOAD_LEN: usize = 1024;
pub const DEFAULT_TEXT_PAYLOAD: &str = "this is a dummy text buffer";
pub const DEFAULT_INVALID_SEEK_ORIGIN: i32 = 255;

fn probe_config_schema_version() -> u32 {
    PROBE_CONFIG_SCHEMA_VERSION
}

fn default_binary_payload_len() -> usize {
    DEFAULT_BINARY_PAYLOAD_LEN
}

fn default_text_payload() -> String {
    DEFAULT_TEXT_PAYLOAD.to_string()
}

fn default_invalid_seek_origin() -> i32 {
    DEFAULT_INVALID_SEEK_ORIGIN
}

/// Payload sizes and probe values shared by every suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeConfig {
    #[serde(default = "probe_config_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_binary_payload_len")]
    pub binary_payload_len: usize,
    #[serde(default = "default_text_payload")]
    pub text_payload: String,
    #[serde(default = "default_invalid_seek_origin")]
    pub invalid_seek_origin: i32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            schema_version: PROBE_CONFIG_SCHEMA_VERSION,
            binary_payload_len: DEFAULT_BINARY_PAYLOAD_LEN,
            text_payload: default_text_payload(),
            invalid_seek_origin: DEFAULT_INVALID_SEEK_ORIGIN,
        }
    }
}

pub fn parse_probe_config(raw: &str) -> Result<ProbeConfig> {
    let config =
        serde_json::from_str::<ProbeConfig>(raw).context("failed to parse probe config")?;
    validate_probe_config(&config)?;
    Ok(config)
}

pub fn load_probe_config(path: &Path) -> Result<ProbeConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read probe config {}", path.display()))?;
    parse_probe_config(&raw).with_context(|| format!("invalid probe config {}", path.display()))
}

pub fn validate_probe_config(config: &ProbeConfig) -> Result<()> {
    if config.schema_version != PROBE_CONFIG_SCHEMA_VERSION {
        bail!(
            "unsupported probe config schema version {} (expected {})",
            config.schema_version,
            PROBE_CONFIG_SCHEMA_VERSION
        );
    }
    // N + 1 must still be representable as an i32 argument.
    let max_len = (i32::MAX - 1) as usize;
    if config.binary_payload_len == 0 || config.binary_payload_len > max_len {
        bail!(
            "binary_payload_len must be between 1 and {} (found {})",
            max_len,
            config.binary_payload_len
        );
    }
    if config.text_payload.is_empty() {
        bail!("text_payload cannot be empty");
    }
    // boundary lengths assume one byte per character
    if !config.text_payload.is_ascii() {
        bail!("text_payload must be ASCII");
    }
    if config.text_payload.len() > max_len {
        bail!("text_payload exceeds {} bytes", max_len);
    }
    if let Some(origin) = SeekOrigin::from_code(config.invalid_seek_origin) {
        bail!(
            "invalid_seek_origin {} is the legal origin {:?}",
            config.invalid_seek_origin,
            origin
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load_probe_config, parse_probe_config, ProbeConfig};

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join("probe-config")
            .join(name)
    }

    #[test]
    fn unit_parse_probe_config_applies_defaults() {
        let config = parse_probe_config("{}").expect("defaults");
        assert_eq!(config, ProbeConfig::default());
        assert_eq!(config.binary_payload_len, 1024);
        assert_eq!(config.text_payload, "this is a dummy text buffer");
        assert_eq!(config.invalid_seek_origin, 255);
    }

    #[test]
    fn functional_load_probe_config_reads_fixture() {
        let config = load_probe_config(&fixture_path("small-payloads.json")).expect("load");
        assert_eq!(config.binary_payload_len, 64);
        assert_eq!(config.text_payload, "To: someone@example.com");
        assert_eq!(config.invalid_seek_origin, 7);
    }

    #[test]
    fn regression_probe_config_rejects_legal_seek_origin() {
        let error = load_probe_config(&fixture_path("invalid-legal-seek-origin.json"))
            .expect_err("legal origin must fail");
        let rendered = format!("{error:#}");
        assert!(
            rendered.contains("is the legal origin"),
            "unexpected error output: {rendered}"
        );
    }

    #[test]
    fn regression_probe_config_rejects_unsupported_schema() {
        let error = parse_probe_config(r#"{"schema_version": 9}"#).expect_err("schema");
        assert!(error
            .to_string()
            .contains("unsupported probe config schema version"));
    }

    #[test]
    fn regression_probe_config_rejects_empty_payloads() {
        let error = parse_probe_config(r#"{"binary_payload_len": 0}"#).expect_err("empty");
        assert!(error.to_string().contains("binary_payload_len"));
        let error = parse_probe_config(r#"{"text_payload": ""}"#).expect_err("empty text");
        assert!(error.to_string().contains("text_payload cannot be empty"));
    }

    #[test]
    fn regression_probe_config_rejects_non_ascii_text_payload() {
        let error =
            parse_probe_config(r#"{"text_payload": "caf\u00e9"}"#).expect_err("non-ascii");
        assert!(error.to_string().contains("text_payload must be ASCII"));
    }

    #[test]
    fn regression_load_probe_config_reports_missing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let error = load_probe_config(&temp.path().join("absent.json")).expect_err("missing");
        assert!(error.to_string().contains("failed to read probe config"));
    }
}
