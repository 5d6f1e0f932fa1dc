use serde::{Deserialize, Serialize};

/// Configuration for a ledger backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Capacity of the commit broadcast channel. Subscribers that fall
    /// further behind than this observe `RecvError::Lagged`.
    pub commit_channel_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            commit_channel_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(LedgerConfig::default().commit_channel_capacity, 256);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: LedgerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
    }
}
