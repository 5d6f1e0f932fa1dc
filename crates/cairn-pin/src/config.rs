use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the pin coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Deadline for each individual store call, in milliseconds. A call
    /// that misses it counts as a failure, never as success.
    pub request_timeout_ms: u64,
    /// Follow every upload with an explicit pin request.
    pub redundant_pin_on_upload: bool,
    /// Pin records as a side effect of reading them.
    pub pin_on_read: bool,
    /// On read, also pin the media a record references.
    pub pin_nested_references: bool,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            redundant_pin_on_upload: true,
            pin_on_read: true,
            pin_nested_references: true,
        }
    }
}

impl PinConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = PinConfig::default();
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
        assert!(c.redundant_pin_on_upload);
        assert!(c.pin_on_read);
        assert!(c.pin_nested_references);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: PinConfig = serde_json::from_str(r#"{"pin_on_read": false}"#).unwrap();
        assert!(!c.pin_on_read);
        assert_eq!(c.request_timeout_ms, 30_000);
    }
}
