use std::sync::Arc;

use cairn_ledger::{CommitRef, Ledger, LedgerError, StateMap, TxContext};
use cairn_types::{ContentId, ContentRecord, IntegrityHash, Owner};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::audit::{AuditReport, IndexAudit};
use crate::error::{ConflictKind, RegistryError, RegistryResult};
use crate::event::RegistryEvent;
use crate::keys::{hash_key, owner_key, record_key, RECORD_PREFIX};

/// Acknowledgement of a committed registry mutation.
pub type Accepted = CommitRef;

/// Caller-supplied fields of a record to create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub identifier: ContentId,
    pub integrity_hash: IntegrityHash,
    pub display_name: String,
    pub media_ref: String,
}

impl NewRecord {
    pub fn new(identifier: impl Into<ContentId>, integrity_hash: impl Into<IntegrityHash>) -> Self {
        Self {
            identifier: identifier.into(),
            integrity_hash: integrity_hash.into(),
            display_name: String::new(),
            media_ref: String::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_media_ref(mut self, media_ref: impl Into<String>) -> Self {
        self.media_ref = media_ref.into();
        self
    }

    fn validate(&self) -> RegistryResult<()> {
        if self.identifier.is_empty() {
            return Err(RegistryError::Validation("identifier must not be empty".into()));
        }
        if self.integrity_hash.is_empty() {
            return Err(RegistryError::Validation(
                "integrity hash must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn into_record(self, owner: Owner, ctx: &TxContext<'_>) -> ContentRecord {
        ContentRecord {
            identifier: self.identifier,
            integrity_hash: self.integrity_hash,
            owner,
            created_at: ctx.timestamp(),
            display_name: self.display_name,
            media_ref: self.media_ref,
        }
    }
}

/// Authoritative identifier ↔ hash ↔ owner registry.
///
/// Exclusively owns the registry keyspace of its ledger. Mutations are
/// linearized by the ledger; reads see a consistent committed snapshot.
pub struct MetadataRegistry<L> {
    ledger: Arc<L>,
}

impl<L> Clone for MetadataRegistry<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: Ledger> MetadataRegistry<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// The backing ledger, for log inspection and subscriptions.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    // ---- Mutations ----

    /// Register a new record owned by `caller`.
    pub fn store(&self, caller: &Owner, new: NewRecord) -> RegistryResult<Accepted> {
        require_caller(caller)?;
        new.validate()?;

        let committed = self.ledger.transact(caller, |ctx| {
            let record_key = record_key(&new.identifier);
            if ctx.contains(&record_key) {
                return Err(RegistryError::conflict(
                    ConflictKind::Identifier,
                    new.identifier.as_str(),
                ));
            }
            let hash_key = hash_key(&new.integrity_hash);
            if ctx.contains(&hash_key) {
                return Err(RegistryError::conflict(
                    ConflictKind::Hash,
                    new.integrity_hash.as_str(),
                ));
            }

            let record = new.into_record(caller.clone(), ctx);
            ctx.put_as(record_key, &record)?;
            ctx.put_as(hash_key, &record.identifier)?;

            let mut owned = owned_in_tx(ctx, caller)?;
            owned.push(record.identifier.clone());
            ctx.put_as(owner_key(caller), &owned)?;

            let event = RegistryEvent::Stored {
                owner: caller.clone(),
                identifier: record.identifier.clone(),
                integrity_hash: record.integrity_hash.clone(),
                display_name: record.display_name.clone(),
                timestamp: record.created_at,
            };
            ctx.emit_as(event.topic(), &event)?;
            Ok(record.identifier)
        })?;

        debug!(
            identifier = %committed.value,
            owner = %caller,
            seq = committed.commit.seq,
            "record stored"
        );
        Ok(committed.commit)
    }

    /// Replace `old_identifier`'s record with a new one under the same owner.
    ///
    /// The new identifier takes the old one's position in the owner's
    /// sequence. `new.integrity_hash` may equal the old hash; it conflicts
    /// only if it is active under some other identifier.
    pub fn update(
        &self,
        caller: &Owner,
        old_identifier: &ContentId,
        new: NewRecord,
    ) -> RegistryResult<Accepted> {
        require_caller(caller)?;
        new.validate()?;

        let committed = self.ledger.transact(caller, |ctx| {
            let old = owned_record(ctx, caller, old_identifier)?;

            if new.identifier != *old_identifier && ctx.contains(&record_key(&new.identifier)) {
                return Err(RegistryError::conflict(
                    ConflictKind::Identifier,
                    new.identifier.as_str(),
                ));
            }
            if let Some(holder) = ctx.get_as::<ContentId>(&hash_key(&new.integrity_hash))? {
                if holder != *old_identifier {
                    return Err(RegistryError::conflict(
                        ConflictKind::Hash,
                        new.integrity_hash.as_str(),
                    ));
                }
            }

            ctx.delete(record_key(old_identifier));
            ctx.delete(hash_key(&old.integrity_hash));

            let record = new.into_record(caller.clone(), ctx);
            ctx.put_as(record_key(&record.identifier), &record)?;
            ctx.put_as(hash_key(&record.integrity_hash), &record.identifier)?;

            let mut owned = owned_in_tx(ctx, caller)?;
            match owned.iter().position(|id| id == old_identifier) {
                Some(index) => owned[index] = record.identifier.clone(),
                None => owned.push(record.identifier.clone()),
            }
            ctx.put_as(owner_key(caller), &owned)?;

            let event = RegistryEvent::Updated {
                owner: caller.clone(),
                old_identifier: old_identifier.clone(),
                new_identifier: record.identifier.clone(),
                new_hash: record.integrity_hash.clone(),
            };
            ctx.emit_as(event.topic(), &event)?;
            Ok(record.identifier)
        })?;

        debug!(
            old = %old_identifier,
            new = %committed.value,
            owner = %caller,
            seq = committed.commit.seq,
            "record updated"
        );
        Ok(committed.commit)
    }

    /// Delete `identifier`'s record from all three indices.
    ///
    /// The owner's sequence keeps the relative order of the remaining
    /// identifiers.
    pub fn remove(&self, caller: &Owner, identifier: &ContentId) -> RegistryResult<Accepted> {
        require_caller(caller)?;
        let committed = self.ledger.transact(caller, |ctx| {
            let record = owned_record(ctx, caller, identifier)?;

            ctx.delete(record_key(identifier));
            ctx.delete(hash_key(&record.integrity_hash));

            let mut owned = owned_in_tx(ctx, caller)?;
            owned.retain(|id| id != identifier);
            if owned.is_empty() {
                ctx.delete(owner_key(caller));
            } else {
                ctx.put_as(owner_key(caller), &owned)?;
            }

            let event = RegistryEvent::Removed {
                owner: caller.clone(),
                identifier: identifier.clone(),
            };
            ctx.emit_as(event.topic(), &event)?;
            Ok::<_, RegistryError>(())
        })?;

        debug!(
            identifier = %identifier,
            owner = %caller,
            seq = committed.commit.seq,
            "record removed"
        );
        Ok(committed.commit)
    }

    // ---- Queries ----

    /// Identifier currently registered under `hash`, if any.
    pub fn lookup_by_hash(&self, hash: &IntegrityHash) -> RegistryResult<Option<ContentId>> {
        if hash.is_empty() {
            return Ok(None);
        }
        let key = hash_key(hash);
        Ok(self.ledger.view(|state| decode(state, &key))??)
    }

    /// Identifiers owned by `owner`, in registration order.
    pub fn list_owned(&self, owner: &Owner) -> RegistryResult<Vec<ContentId>> {
        let key = owner_key(owner);
        let owned = self.ledger.view(|state| decode::<Vec<ContentId>>(state, &key))??;
        Ok(owned.unwrap_or_default())
    }

    pub fn owner_of(&self, identifier: &ContentId) -> RegistryResult<Option<Owner>> {
        Ok(self.find(identifier)?.map(|record| record.owner))
    }

    pub fn get_record(&self, identifier: &ContentId) -> RegistryResult<ContentRecord> {
        self.find(identifier)?
            .ok_or_else(|| RegistryError::NotFound(identifier.clone()))
    }

    /// `true` iff `identifier` is active and `hash` is registered to it.
    ///
    /// Never fails: backend errors are logged and reported as `false`.
    pub fn verify(&self, identifier: &ContentId, hash: &IntegrityHash) -> bool {
        if identifier.is_empty() || hash.is_empty() {
            return false;
        }
        let record_key = record_key(identifier);
        let hash_key = hash_key(hash);
        let outcome = self.ledger.view(|state| {
            let record = decode::<ContentRecord>(state, &record_key)?;
            let holder = decode::<ContentId>(state, &hash_key)?;
            Ok::<_, LedgerError>(record.is_some() && holder.as_ref() == Some(identifier))
        });

        match outcome {
            Ok(Ok(verified)) => verified,
            Ok(Err(e)) | Err(e) => {
                warn!(identifier = %identifier, error = %e, "verify degraded to false");
                false
            }
        }
    }

    /// Number of active records.
    pub fn record_count(&self) -> RegistryResult<usize> {
        Ok(self.ledger.view(|state| {
            state
                .range(RECORD_PREFIX.to_string()..)
                .take_while(|(key, _)| key.starts_with(RECORD_PREFIX))
                .count()
        })?)
    }

    /// Every registry event in ledger order.
    pub fn events(&self) -> RegistryResult<Vec<RegistryEvent>> {
        let entries = self.ledger.read_all()?;
        Ok(entries.iter().flat_map(RegistryEvent::from_commit).collect())
    }

    /// Check the three indices against each other.
    pub fn audit(&self) -> RegistryResult<AuditReport> {
        Ok(IndexAudit::run(self.ledger.as_ref())?)
    }

    fn find(&self, identifier: &ContentId) -> RegistryResult<Option<ContentRecord>> {
        if identifier.is_empty() {
            return Ok(None);
        }
        let key = record_key(identifier);
        Ok(self.ledger.view(|state| decode(state, &key))??)
    }
}

fn require_caller(caller: &Owner) -> RegistryResult<()> {
    if caller.is_empty() {
        return Err(RegistryError::Validation("caller must not be empty".into()));
    }
    Ok(())
}

/// Load `identifier`'s record, requiring `caller` to own it.
///
/// A missing record is an authorization failure: nobody owns it, so the
/// caller cannot either.
fn owned_record(
    ctx: &TxContext<'_>,
    caller: &Owner,
    identifier: &ContentId,
) -> RegistryResult<ContentRecord> {
    match ctx.get_as::<ContentRecord>(&record_key(identifier))? {
        Some(record) if record.owner == *caller => Ok(record),
        _ => Err(RegistryError::Authorization {
            caller: caller.clone(),
            identifier: identifier.clone(),
        }),
    }
}

fn owned_in_tx(ctx: &TxContext<'_>, owner: &Owner) -> RegistryResult<Vec<ContentId>> {
    Ok(ctx
        .get_as::<Vec<ContentId>>(&owner_key(owner))?
        .unwrap_or_default())
}

fn decode<T: DeserializeOwned>(state: &StateMap, key: &str) -> Result<Option<T>, LedgerError> {
    state
        .get(key)
        .map(|value| {
            serde_json::from_value(value.clone())
                .map_err(|e| LedgerError::Serialization(format!("{key}: {e}")))
        })
        .transpose()
}
