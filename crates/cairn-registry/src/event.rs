use cairn_ledger::{CommitEntry, LogEntry};
use cairn_types::{ContentId, IntegrityHash, Owner, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Domain events emitted by committed registry mutations.
///
/// Events live only in the ledger's commit log; subscribers decode them with
/// [`RegistryEvent::from_commit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum RegistryEvent {
    Stored {
        owner: Owner,
        identifier: ContentId,
        integrity_hash: IntegrityHash,
        display_name: String,
        timestamp: Timestamp,
    },
    Updated {
        owner: Owner,
        old_identifier: ContentId,
        new_identifier: ContentId,
        new_hash: IntegrityHash,
    },
    Removed {
        owner: Owner,
        identifier: ContentId,
    },
}

impl RegistryEvent {
    /// Log topic under which the event is emitted.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Stored { .. } => "Stored",
            Self::Updated { .. } => "Updated",
            Self::Removed { .. } => "Removed",
        }
    }

    pub fn owner(&self) -> &Owner {
        match self {
            Self::Stored { owner, .. } | Self::Updated { owner, .. } | Self::Removed { owner, .. } => {
                owner
            }
        }
    }

    /// Decode a ledger log entry, ignoring topics the registry does not emit.
    pub fn from_log(log: &LogEntry) -> Option<Self> {
        match log.topic.as_str() {
            "Stored" | "Updated" | "Removed" => {
                match serde_json::from_value(log.payload.clone()) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        warn!(topic = %log.topic, error = %e, "undecodable registry event");
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// All registry events carried by one commit, in emission order.
    pub fn from_commit(entry: &CommitEntry) -> Vec<Self> {
        entry.logs.iter().filter_map(Self::from_log).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn serializes_with_event_tag_and_camel_case() {
        let event = RegistryEvent::Updated {
            owner: "0xalice".into(),
            old_identifier: "a".into(),
            new_identifier: "b".into(),
            new_hash: "h".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Updated");
        assert_eq!(json["oldIdentifier"], "a");
        assert_eq!(json["newHash"], "h");
    }

    #[test]
    fn from_log_ignores_foreign_topics() {
        let foreign = LogEntry {
            topic: "Transfer".into(),
            payload: Value::Null,
        };
        assert!(RegistryEvent::from_log(&foreign).is_none());

        let removed = RegistryEvent::Removed {
            owner: "0xalice".into(),
            identifier: "a".into(),
        };
        let log = LogEntry {
            topic: removed.topic().into(),
            payload: serde_json::to_value(&removed).unwrap(),
        };
        assert_eq!(RegistryEvent::from_log(&log), Some(removed));
    }

    #[test]
    fn from_log_skips_malformed_registry_payload() {
        let malformed = LogEntry {
            topic: "Stored".into(),
            payload: serde_json::json!({ "event": "Stored", "owner": 7 }),
        };
        assert!(RegistryEvent::from_log(&malformed).is_none());
    }
}
