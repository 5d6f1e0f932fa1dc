//! End-to-end scenarios over the SDK facade with in-memory backends.

use std::sync::Arc;

use bytes::Bytes;
use cairn_ledger::{LedgerReader, LogValidator, ReplayEngine};
use cairn_registry::ConflictKind;
use cairn_sdk::{
    Cairn, CairnConfig, ContentId, InMemoryContentStore, InMemoryLedger, IntegrityHash,
    IntegrityHasher, NewRecord, Owner, PublishRequest, RegistryError, RegistryEvent, SdkError,
};

fn alice() -> Owner {
    Owner::from("0xalice")
}

fn bob() -> Owner {
    Owner::from("0xbob")
}

fn with_store() -> (Arc<InMemoryContentStore>, Cairn) {
    let store = Arc::new(InMemoryContentStore::new());
    let ledger = Arc::new(InMemoryLedger::default());
    let cairn = Cairn::with_backends(CairnConfig::default(), ledger, store.clone()).unwrap();
    (store, cairn)
}

// ---- Registry properties ----

#[test]
fn store_then_lookup_then_remove() {
    let (_, cairn) = with_store();
    let reg = cairn.registry();
    let id = ContentId::from("bafyAAA");
    let hash = IntegrityHash::from("6f2c0e");

    reg.store(
        &alice(),
        NewRecord::new(id.clone(), hash.clone())
            .with_display_name("demo")
            .with_media_ref("bafyIMG"),
    )
    .unwrap();
    assert_eq!(reg.lookup_by_hash(&hash).unwrap(), Some(id.clone()));
    assert_eq!(reg.get_record(&id).unwrap().integrity_hash, hash);
    assert!(reg.verify(&id, &hash));

    reg.remove(&alice(), &id).unwrap();
    assert_eq!(reg.lookup_by_hash(&hash).unwrap(), None);
    assert!(matches!(reg.get_record(&id), Err(RegistryError::NotFound(_))));
    assert!(!reg.verify(&id, &hash));
}

#[test]
fn store_rejects_conflicts_and_empty_fields() {
    let (_, cairn) = with_store();
    let reg = cairn.registry();
    reg.store(&alice(), NewRecord::new("a", "ha")).unwrap();

    assert!(matches!(
        reg.store(&bob(), NewRecord::new("a", "hb")),
        Err(RegistryError::Conflict { kind: ConflictKind::Identifier, .. })
    ));
    assert!(matches!(
        reg.store(&bob(), NewRecord::new("b", "ha")),
        Err(RegistryError::Conflict { kind: ConflictKind::Hash, .. })
    ));
    assert!(matches!(
        reg.store(&bob(), NewRecord::new("", "hc")),
        Err(RegistryError::Validation(_))
    ));
    assert!(matches!(
        reg.store(&bob(), NewRecord::new("c", "")),
        Err(RegistryError::Validation(_))
    ));
    assert_eq!(reg.record_count().unwrap(), 1);
}

#[test]
fn update_moves_every_index() {
    let (_, cairn) = with_store();
    let reg = cairn.registry();
    let old = ContentId::from("old");
    let new = ContentId::from("new");
    reg.store(&alice(), NewRecord::new(old.clone(), "h-old")).unwrap();

    reg.update(&alice(), &old, NewRecord::new(new.clone(), "h-new"))
        .unwrap();

    assert_eq!(reg.lookup_by_hash(&IntegrityHash::from("h-old")).unwrap(), None);
    assert_eq!(
        reg.lookup_by_hash(&IntegrityHash::from("h-new")).unwrap(),
        Some(new.clone())
    );
    let owned = reg.list_owned(&alice()).unwrap();
    assert!(owned.contains(&new));
    assert!(!owned.contains(&old));
    assert_eq!(reg.owner_of(&old).unwrap(), None);
    assert_eq!(reg.owner_of(&new).unwrap(), Some(alice()));
}

#[test]
fn remove_by_non_owner_changes_nothing() {
    let (_, cairn) = with_store();
    let reg = cairn.registry();
    let id = ContentId::from("a");
    reg.store(&alice(), NewRecord::new(id.clone(), "ha")).unwrap();
    let commits_before = reg.ledger().commit_count().unwrap();

    assert!(matches!(
        reg.remove(&bob(), &id),
        Err(RegistryError::Authorization { .. })
    ));

    assert_eq!(reg.ledger().commit_count().unwrap(), commits_before);
    assert_eq!(reg.owner_of(&id).unwrap(), Some(alice()));
    assert_eq!(reg.list_owned(&alice()).unwrap(), vec![id.clone()]);
    assert!(reg.list_owned(&bob()).unwrap().is_empty());
    assert!(reg.verify(&id, &IntegrityHash::from("ha")));
}

// ---- Pinning properties ----

#[tokio::test]
async fn ensure_pinned_twice_transitions_once() {
    let (store, cairn) = with_store();
    let id = store.insert_unpinned(&b"payload"[..]);

    assert!(cairn.pin(&id).await);
    assert!(cairn.pin(&id).await);
    assert_eq!(store.pin_transitions(), 1);
}

#[tokio::test]
async fn publish_survives_failing_pin_service() {
    let (store, cairn) = with_store();
    store.fail_pins(true);

    let receipt = cairn
        .publish(&alice(), Bytes::from_static(b"metadata"), PublishRequest::new("m.json"))
        .await
        .unwrap();

    assert!(!receipt.pinned);
    assert_eq!(receipt.size, 8);
    assert!(store.contains(&receipt.identifier));
    assert!(cairn.verify(&receipt.identifier, &receipt.integrity_hash));
}

#[tokio::test]
async fn publish_fails_when_store_refuses_upload() {
    let (store, cairn) = with_store();
    store.fail_uploads(true);

    let err = cairn
        .publish(&alice(), Bytes::from_static(b"metadata"), PublishRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Pin(_)));
    assert_eq!(cairn.registry().record_count().unwrap(), 0);
}

#[tokio::test]
async fn reads_heal_unpinned_content() {
    let (store, cairn) = with_store();
    let image = store.insert_unpinned(&b"png bytes"[..]);
    let meta = store.insert_unpinned(&b"json bytes"[..]);
    cairn
        .registry()
        .store(
            &alice(),
            NewRecord::new(meta.clone(), IntegrityHasher::digest_id(&meta))
                .with_media_ref(format!("https://gateway.example/ipfs/{image}")),
        )
        .unwrap();

    let fetched = cairn.fetch(&meta).await.unwrap();
    assert_eq!(fetched.bytes, Bytes::from_static(b"json bytes"));

    assert!(store.contains_pin(&meta));
    assert!(store.contains_pin(&image));
    assert_eq!(store.collect_garbage(), 0);
}

#[tokio::test]
async fn read_succeeds_when_pinning_fails() {
    let (store, cairn) = with_store();
    let meta = store.insert_unpinned(&b"json"[..]);
    cairn
        .registry()
        .store(&alice(), NewRecord::new(meta.clone(), "h"))
        .unwrap();
    store.fail_pins(true);
    store.fail_status_checks(true);

    let view = cairn.view(&meta).await.unwrap();
    assert_eq!(view.identifier, meta);
    assert_eq!(cairn.pins().stats().pin_failures, 1);
}

// ---- Ledger ----

#[tokio::test]
async fn published_history_is_consistent() {
    let (_, cairn) = with_store();
    let mut commits = cairn.registry().ledger().subscribe();

    let first = cairn
        .publish(&alice(), Bytes::from_static(b"one"), PublishRequest::default())
        .await
        .unwrap();
    cairn
        .publish(&bob(), Bytes::from_static(b"two"), PublishRequest::default())
        .await
        .unwrap();
    cairn.registry().remove(&alice(), &first.identifier).unwrap();

    let entry = commits.try_recv().unwrap();
    assert!(matches!(
        RegistryEvent::from_commit(&entry).as_slice(),
        [RegistryEvent::Stored { identifier, .. }] if *identifier == first.identifier
    ));

    let events = cairn.registry().events().unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[2], RegistryEvent::Removed { .. }));

    let ledger = cairn.registry().ledger();
    assert!(LogValidator::validate(ledger.as_ref()).unwrap().is_valid());
    assert!(ReplayEngine::verify_convergence(ledger.as_ref()).unwrap());
    assert!(cairn.registry().audit().unwrap().is_clean());

    let stats = cairn.dispose();
    assert_eq!(stats.uploads, 2);
}
