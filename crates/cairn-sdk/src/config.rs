use std::path::Path;

use cairn_ledger::LedgerConfig;
use cairn_pin::PinConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Top-level configuration, one section per subsystem.
///
/// ```toml
/// [ledger]
/// commit_channel_capacity = 256
///
/// [pinning]
/// request_timeout_ms = 30000
/// redundant_pin_on_upload = true
/// pin_on_read = true
/// pin_nested_references = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CairnConfig {
    pub ledger: LedgerConfig,
    pub pinning: PinConfig,
}

impl CairnConfig {
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        toml::from_str(source).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        toml::from_str(&source)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.pinning.request_timeout_ms == 0 {
            return Err(SdkError::Config(
                "pinning.request_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.ledger.commit_channel_capacity == 0 {
            return Err(SdkError::Config(
                "ledger.commit_channel_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = CairnConfig::default();
        c.validate().unwrap();
        assert_eq!(c.pinning, PinConfig::default());
        assert_eq!(c.ledger, LedgerConfig::default());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c = CairnConfig::from_toml_str(
            r#"
            [pinning]
            pin_on_read = false
            "#,
        )
        .unwrap();
        assert!(!c.pinning.pin_on_read);
        assert!(c.pinning.redundant_pin_on_upload);
        assert_eq!(c.ledger.commit_channel_capacity, 256);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(CairnConfig::from_toml_str("").unwrap(), CairnConfig::default());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = CairnConfig::from_toml_str("[pinning]\nrequest_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut c = CairnConfig::default();
        c.pinning.request_timeout_ms = 0;
        assert!(matches!(c.validate(), Err(SdkError::Config(_))));
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = CairnConfig::default();
        c.pinning.request_timeout_ms = 1_500;
        c.pinning.pin_nested_references = false;
        let text = c.to_toml_string().unwrap();
        assert_eq!(CairnConfig::from_toml_str(&text).unwrap(), c);
    }

    // ---- Files ----

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]\ncommit_channel_capacity = 8").unwrap();

        let c = CairnConfig::load(file.path()).unwrap();
        assert_eq!(c.ledger.commit_channel_capacity, 8);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CairnConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Io(_)));
    }
}
