//! Integration tests for document sealing, opening, and resharing.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tempfile::TempDir;

use sharelock::crypto::ShareConfig;
use sharelock::document::{open_with_master_key, open_with_shares, reshare, seal_document, DocumentBody};
use sharelock::errors::ShareLockError;
use sharelock::session::KeySession;
use sharelock::store::{DocumentStore, NewDocument};

/// Helper: a store in a fresh temp directory plus a seeded session.
fn setup() -> (TempDir, DocumentStore, KeySession<ChaCha20Rng>) {
    let tmp = TempDir::new().unwrap();
    let store = DocumentStore::new(tmp.path().join(".sharelock"));
    let session = KeySession::with_rng(ChaCha20Rng::seed_from_u64(42));
    (tmp, store, session)
}

#[test]
fn sealed_document_opens_with_master_key() {
    let (_tmp, store, mut session) = setup();
    let body = DocumentBody::new("Launch plan", "Ship on Friday.");

    let created = seal_document(&mut session, &store, &body, ShareConfig::new(5, 3).unwrap()).unwrap();
    session.lock();

    let record = store.get(&created.id).unwrap().expect("record should exist");
    assert_eq!(record.title, "Launch plan");
    assert_eq!(record.total_shares, 5);
    assert_eq!(record.threshold, 3);
    assert!(!record.encrypted_content.contains("Ship on Friday"));

    let opened = open_with_master_key(&mut session, &record, &created.master_token).unwrap();
    assert_eq!(opened, body);
}

#[test]
fn sealed_document_opens_with_any_threshold_shares() {
    let (_tmp, store, mut session) = setup();
    let body = DocumentBody::new("Recovery codes", "1234-5678");

    let created = seal_document(&mut session, &store, &body, ShareConfig::new(5, 3).unwrap()).unwrap();
    session.lock();
    let record = store.get(&created.id).unwrap().unwrap();

    let picked = [
        created.shares[1].clone(),
        created.shares[3].clone(),
        created.shares[4].clone(),
    ];
    let opened = open_with_shares(&mut session, &record, &picked).unwrap();
    assert_eq!(opened.title(), "Recovery codes");
    assert_eq!(opened.content(), Some("1234-5678"));

    // No master token is available after a share unlock.
    assert!(session.master_token().is_none());
}

#[test]
fn too_few_shares_are_reported_before_decrypting() {
    let (_tmp, store, mut session) = setup();
    let body = DocumentBody::new("Notes", "text");
    let created = seal_document(&mut session, &store, &body, ShareConfig::new(5, 3).unwrap()).unwrap();
    let record = store.get(&created.id).unwrap().unwrap();

    // A repeated share does not count twice.
    let picked = [
        created.shares[0].clone(),
        created.shares[1].clone(),
        created.shares[1].clone(),
    ];
    let result = open_with_shares(&mut session, &record, &picked);
    assert!(matches!(
        result,
        Err(ShareLockError::InsufficientShares { needed: 3, got: 2 })
    ));
}

#[test]
fn shares_of_another_document_fail_authentication() {
    let (_tmp, store, mut session) = setup();
    let config = ShareConfig::new(3, 2).unwrap();

    let a = seal_document(&mut session, &store, &DocumentBody::new("A", "alpha"), config).unwrap();
    let b = seal_document(&mut session, &store, &DocumentBody::new("B", "beta"), config).unwrap();
    let record_a = store.get(&a.id).unwrap().unwrap();

    let result = open_with_shares(&mut session, &record_a, &b.shares[..2]);
    assert!(matches!(result, Err(ShareLockError::AuthenticationFailure)));
    assert!(!session.is_unlocked(), "a wrong key must not stay held");
}

#[test]
fn wrong_master_key_fails_authentication() {
    let (_tmp, store, mut session) = setup();
    let config = ShareConfig::new(3, 2).unwrap();

    let a = seal_document(&mut session, &store, &DocumentBody::new("A", "alpha"), config).unwrap();
    let b = seal_document(&mut session, &store, &DocumentBody::new("B", "beta"), config).unwrap();
    let record_a = store.get(&a.id).unwrap().unwrap();

    let result = open_with_master_key(&mut session, &record_a, &b.master_token);
    assert!(matches!(result, Err(ShareLockError::AuthenticationFailure)));
    assert!(!session.is_unlocked(), "a wrong key must not stay held");
    assert!(session.master_token().is_none());
}

#[test]
fn failed_unlock_locks_a_previously_unlocked_session() {
    let (_tmp, store, mut session) = setup();
    let config = ShareConfig::new(5, 3).unwrap();
    let created = seal_document(&mut session, &store, &DocumentBody::new("A", "alpha"), config).unwrap();
    let record = store.get(&created.id).unwrap().unwrap();

    // Opening with the right key leaves the session unlocked for the caller.
    open_with_master_key(&mut session, &record, &created.master_token).unwrap();
    assert!(session.is_unlocked());

    // Three well-formed shares from a different document.
    let other = seal_document(&mut session, &store, &DocumentBody::new("B", "beta"), config).unwrap();
    let result = open_with_shares(&mut session, &record, &other.shares[..3]);
    assert!(matches!(result, Err(ShareLockError::AuthenticationFailure)));
    assert!(!session.is_unlocked());
}

#[test]
fn malformed_master_key_is_a_format_error() {
    let (_tmp, store, mut session) = setup();
    let created = seal_document(
        &mut session,
        &store,
        &DocumentBody::new("A", "alpha"),
        ShareConfig::new(2, 2).unwrap(),
    )
    .unwrap();
    session.lock();
    let record = store.get(&created.id).unwrap().unwrap();

    let result = open_with_master_key(&mut session, &record, "not-a-key");
    assert!(matches!(result, Err(ShareLockError::InvalidFormat(_))));
    assert!(!session.is_unlocked());
}

#[test]
fn reshare_issues_a_new_set_and_old_shares_still_work() {
    let (_tmp, store, mut session) = setup();
    let body = DocumentBody::new("Will", "Everything to the cat.");
    let created = seal_document(&mut session, &store, &body, ShareConfig::new(4, 2).unwrap()).unwrap();
    session.lock();
    let record = store.get(&created.id).unwrap().unwrap();

    let fresh = reshare(&mut session, &record, &created.master_token).unwrap();
    session.lock();
    assert_eq!(fresh.len(), 4);
    assert_ne!(*fresh, *created.shares);

    let opened = open_with_shares(&mut session, &record, &fresh[2..]).unwrap();
    assert_eq!(opened, body);
    session.lock();

    let opened = open_with_shares(&mut session, &record, &created.shares[..2]).unwrap();
    assert_eq!(opened, body);
}

#[test]
fn reshare_requires_the_right_master_key() {
    let (_tmp, store, mut session) = setup();
    let config = ShareConfig::new(3, 2).unwrap();
    let a = seal_document(&mut session, &store, &DocumentBody::new("A", "alpha"), config).unwrap();
    let b = seal_document(&mut session, &store, &DocumentBody::new("B", "beta"), config).unwrap();
    let record_a = store.get(&a.id).unwrap().unwrap();

    assert!(matches!(
        reshare(&mut session, &record_a, &b.master_token),
        Err(ShareLockError::AuthenticationFailure)
    ));
    assert!(!session.is_unlocked());
}

#[test]
fn empty_content_round_trips_as_none() {
    let (_tmp, store, mut session) = setup();
    let body = DocumentBody::new("Empty", "");
    let created = seal_document(&mut session, &store, &body, ShareConfig::new(2, 2).unwrap()).unwrap();
    let record = store.get(&created.id).unwrap().unwrap();

    let opened = open_with_master_key(&mut session, &record, &created.master_token).unwrap();
    assert!(opened.content().is_none());
}

#[test]
fn store_rejects_invalid_input() {
    let (_tmp, store, _session) = setup();
    let valid = NewDocument {
        title: "t".into(),
        encrypted_content: "AAAA".into(),
        iv: "AAAAAAAAAAAAAAAA".into(),
        total_shares: 3,
        threshold: 2,
    };

    let cases = [
        NewDocument {
            title: String::new(),
            ..valid.clone()
        },
        NewDocument {
            title: "x".repeat(501),
            ..valid.clone()
        },
        NewDocument {
            encrypted_content: String::new(),
            ..valid.clone()
        },
        NewDocument {
            iv: "A".repeat(25),
            ..valid.clone()
        },
        NewDocument {
            threshold: 1,
            ..valid.clone()
        },
        NewDocument {
            total_shares: 21,
            ..valid.clone()
        },
    ];

    for doc in cases {
        assert!(matches!(
            store.create(doc),
            Err(ShareLockError::InvalidDocument(_))
        ));
    }
    assert!(store.list().unwrap().is_empty());
    assert!(store.create(valid).is_ok());
}

#[test]
fn unknown_ids_are_absent() {
    let (_tmp, store, _session) = setup();
    assert!(store.get("0123456789abcdef0123456789abcdef").unwrap().is_none());
    assert!(store.get("../../etc/passwd").unwrap().is_none());
    assert!(store.get("").unwrap().is_none());
}

#[test]
fn list_returns_metadata_for_every_document() {
    let (_tmp, store, mut session) = setup();
    let config = ShareConfig::new(3, 2).unwrap();
    for title in ["one", "two", "three"] {
        seal_document(&mut session, &store, &DocumentBody::new(title, "body"), config).unwrap();
    }

    let records = store.list().unwrap();
    assert_eq!(records.len(), 3);
    let mut titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["one", "three", "two"]);
}
