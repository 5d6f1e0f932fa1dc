use std::collections::BTreeMap;

use cairn_types::{Owner, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::LedgerError;
use crate::records::{LogEntry, StateMap, Write};

/// Isolated view of ledger state for one transaction.
///
/// Reads see the committed state overlaid with this transaction's own
/// writes. Nothing is visible to other readers until the ledger commits the
/// context; a transaction that returns an error is simply dropped.
pub struct TxContext<'a> {
    base: &'a StateMap,
    overlay: BTreeMap<String, Option<Value>>,
    caller: &'a Owner,
    timestamp: Timestamp,
    logs: Vec<LogEntry>,
}

impl<'a> TxContext<'a> {
    pub fn new(base: &'a StateMap, caller: &'a Owner, timestamp: Timestamp) -> Self {
        Self {
            base,
            overlay: BTreeMap::new(),
            caller,
            timestamp,
            logs: Vec::new(),
        }
    }

    /// The principal that submitted this transaction.
    pub fn caller(&self) -> &Owner {
        self.caller
    }

    /// Ledger time assigned to this transaction.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.overlay.get(key) {
            Some(pending) => pending.as_ref(),
            None => self.base.get(key),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Read and decode a value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LedgerError> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| LedgerError::Serialization(format!("{key}: {e}")))
            })
            .transpose()
    }

    pub fn put(&mut self, key: impl Into<String>, value: Value) {
        self.overlay.insert(key.into(), Some(value));
    }

    /// Encode and write a value.
    pub fn put_as<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), LedgerError> {
        let value =
            serde_json::to_value(value).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        self.put(key, value);
        Ok(())
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.overlay.insert(key.into(), None);
    }

    /// Record a log entry, published only if the transaction commits.
    pub fn emit(&mut self, topic: impl Into<String>, payload: Value) {
        self.logs.push(LogEntry {
            topic: topic.into(),
            payload,
        });
    }

    pub fn emit_as<T: Serialize>(
        &mut self,
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<(), LedgerError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        self.emit(topic, payload);
        Ok(())
    }

    /// Consume the context into its write set and logs.
    ///
    /// Deletes of keys that never existed are dropped so the commit log only
    /// records effective mutations.
    pub fn into_parts(self) -> (Vec<Write>, Vec<LogEntry>) {
        let base = self.base;
        let writes = self
            .overlay
            .into_iter()
            .filter_map(|(key, pending)| match pending {
                Some(value) => Some(Write::Put { key, value }),
                None if base.contains_key(&key) => Some(Write::Delete { key }),
                None => None,
            })
            .collect();
        (writes, self.logs)
    }
}
