//! Agreement aggregator tests over a mock connection: load enrichment,
//! the sign lifecycle with its activation threshold, and the signature
//! sheet join.

mod common;

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use entity::{agreement_signatures, agreements::AgreementStatus};
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, MockExecResult};
use services::{current_user::CurrentUserResolver, dto::AgreementCreateRequest, AgreementService};
use uuid::Uuid;

use common::{agreement, init_test_env, member, signature};

/// Resolver that yields a scripted sequence of identities, one per load.
struct SequenceResolver {
    ids: std::sync::Mutex<VecDeque<Uuid>>,
}

impl SequenceResolver {
    fn new(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            ids: std::sync::Mutex::new(ids.into_iter().collect()),
        }
    }
}

#[async_trait]
impl CurrentUserResolver for SequenceResolver {
    async fn resolve(&self, _db: &DbConn) -> error::Result<Option<Uuid>> {
        Ok(self.ids.lock().expect("resolver lock poisoned").pop_front())
    }
}

#[tokio::test]
async fn test_load_enriches_counts_and_creator() {
    init_test_env();

    let kai = member("Kai", 10);
    let elara = member("Elara", 9);

    let mut signed = agreement("Core Working Hours", AgreementStatus::Active, 3);
    signed.created_by = Some(kai.id);
    let mut unsigned = agreement("Documentation First", AgreementStatus::Pending, 1);
    unsigned.created_by = Some(Uuid::new_v4()); // creator no longer on the roster

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![elara.clone(), kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![unsigned.clone(), signed.clone()]])
        .append_query_results([vec![
            signature(signed.id, kai.id),
            signature(signed.id, elara.id),
        ]])
        .into_connection();

    let service = AgreementService::new(db);
    let loaded = service.load().await.expect("load should succeed");

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, unsigned.id, "newest first");
    assert_eq!(loaded[0].signed_by, 0);
    assert_eq!(loaded[0].total_members, 2);
    assert_eq!(loaded[0].creator_name, "Unknown");

    assert_eq!(loaded[1].signed_by, 2);
    assert_eq!(loaded[1].creator_name, "Kai");

    assert_eq!(service.current_user_id().await, Some(kai.id));
    assert_eq!(service.team_members().await.len(), 2);
}

#[tokio::test]
async fn test_sign_below_threshold_keeps_status() {
    init_test_env();

    let kai = member("Kai", 10);
    let elara = member("Elara", 9);
    let pending = agreement("Documentation First", AgreementStatus::Pending, 1);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![elara.clone(), kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        // sign: advisory pre-check finds nothing, insert returns the row
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([vec![signature(pending.id, kai.id)]])
        .into_connection();

    let log_handle = db.clone();
    let service = AgreementService::new(db);
    service.load().await.expect("load should succeed");

    service.sign(pending.id).await.expect("sign should succeed");

    let agreements = service.agreements().await;
    assert_eq!(agreements[0].signed_by, 1);
    assert_eq!(agreements[0].status, AgreementStatus::Pending, "1 of 2 does not activate");

    let log = format!("{:?}", log_handle.into_transaction_log());
    assert!(!log.contains("UPDATE"), "no status persist below the threshold");
}

#[tokio::test]
async fn test_sign_at_threshold_activates() {
    init_test_env();

    let kai = member("Kai", 10);
    let pending = agreement("Core Working Hours", AgreementStatus::Pending, 1);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([vec![signature(pending.id, kai.id)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected:  1,
        }])
        .into_connection();

    let service = AgreementService::new(db);
    service.load().await.expect("load should succeed");

    service.sign(pending.id).await.expect("sign should succeed");

    let agreements = service.agreements().await;
    assert_eq!(agreements[0].signed_by, 1);
    assert_eq!(
        agreements[0].status,
        AgreementStatus::Active,
        "signed_by == total_members activates"
    );
}

#[tokio::test]
async fn test_sign_twice_is_rejected() {
    init_test_env();

    let kai = member("Kai", 10);
    let elara = member("Elara", 9);
    let pending = agreement("Core Working Hours", AgreementStatus::Pending, 1);
    let existing = signature(pending.id, kai.id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![elara.clone(), kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![existing.clone()]])
        // second sign: the pre-check finds the existing signature
        .append_query_results([vec![existing.clone()]])
        .into_connection();

    let service = AgreementService::new(db);
    service.load().await.expect("load should succeed");

    let before = service.agreements().await[0].signed_by;
    let err = service.sign(pending.id).await.expect_err("second sign must fail");

    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(err.message(), "You have already signed this agreement");
    assert_eq!(service.agreements().await[0].signed_by, before, "count unaffected");
}

#[tokio::test]
async fn test_create_prepends_with_zero_signatures() {
    init_test_env();

    let kai = member("Kai", 10);
    let older = agreement("Core Working Hours", AgreementStatus::Active, 5);

    let mut created = agreement("No Meeting Fridays", AgreementStatus::Pending, 0);
    created.created_by = Some(kai.id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![older.clone()]])
        .append_query_results([vec![signature(older.id, kai.id)]])
        // create: INSERT .. RETURNING the new row
        .append_query_results([vec![created.clone()]])
        .into_connection();

    let service = AgreementService::new(db);
    service.load().await.expect("load should succeed");

    let id = service
        .create(AgreementCreateRequest {
            title:       "No Meeting Fridays".to_string(),
            description: None,
        })
        .await
        .expect("create should succeed");

    assert_eq!(id, created.id);

    let agreements = service.agreements().await;
    assert_eq!(agreements.len(), 2);
    assert_eq!(agreements[0].id, created.id, "optimistic prepend");
    assert_eq!(agreements[0].signed_by, 0);
    assert_eq!(agreements[0].status, AgreementStatus::Pending);
    assert_eq!(agreements[0].creator_name, "Kai");
}

#[tokio::test]
async fn test_create_rejects_invalid_payload_without_network() {
    init_test_env();

    // No mock results appended: any query would error loudly
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let service = AgreementService::new(db);

    let err = service
        .create(AgreementCreateRequest {
            title:       String::new(),
            description: None,
        })
        .await
        .expect_err("empty title must fail validation");

    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_fetch_signatures_covers_full_roster() {
    init_test_env();

    let kai = member("Kai", 10);
    let elara = member("Elara", 9);
    let marcus = member("Marcus", 8);
    let active = agreement("Core Working Hours", AgreementStatus::Active, 2);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![elara.clone(), kai.clone(), marcus.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![active.clone()]])
        .append_query_results([vec![signature(active.id, kai.id)]])
        // fetch_signatures: this agreement's rows
        .append_query_results([vec![signature(active.id, kai.id), signature(active.id, marcus.id)]])
        .into_connection();

    let service = AgreementService::new(db);
    service.load().await.expect("load should succeed");

    let sheet = service
        .fetch_signatures(active.id)
        .await
        .expect("fetch_signatures should succeed");

    assert_eq!(sheet.len(), 3, "one row per roster member, signed or not");
    let signed: Vec<bool> = sheet.iter().map(|s| s.signed).collect();
    assert_eq!(signed.iter().filter(|s| **s).count(), 2);

    let unsigned = sheet.iter().find(|s| !s.signed).unwrap();
    assert_eq!(unsigned.name, elara.name);
    assert!(unsigned.timestamp.is_none());
    assert_eq!(unsigned.id, unsigned.member_id, "unsigned rows fall back to member id");
}

#[tokio::test]
async fn test_three_members_sign_in_sequence_end_to_end() {
    init_test_env();

    let a = member("Ada", 12);
    let b = member("Bram", 11);
    let c = member("Cleo", 10);
    let members = vec![a.clone(), b.clone(), c.clone()];
    let pending = agreement("Core Working Hours", AgreementStatus::Pending, 1);

    let sig_a = signature(pending.id, a.id);
    let sig_b = signature(pending.id, b.id);
    let sig_c = signature(pending.id, c.id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // load 1 (as Ada): roster, agreements, no signatures yet
        .append_query_results([members.clone()])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        // sign 1
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([vec![sig_a.clone()]])
        // load 2 (as Bram)
        .append_query_results([members.clone()])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![sig_a.clone()]])
        // sign 2
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([vec![sig_b.clone()]])
        // load 3 (as Cleo)
        .append_query_results([members.clone()])
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![sig_a.clone(), sig_b.clone()]])
        // sign 3
        .append_query_results([Vec::<agreement_signatures::Model>::new()])
        .append_query_results([vec![sig_c.clone()]])
        // fetch_signatures after activation
        .append_query_results([vec![sig_a.clone(), sig_b.clone(), sig_c.clone()]])
        // the third sign persists status = active
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected:  1,
        }])
        .into_connection();

    let resolver = Arc::new(SequenceResolver::new([a.id, b.id, c.id]));
    let service = AgreementService::with_resolver(db, resolver);

    for step in 1..=3u64 {
        service.load().await.expect("load should succeed");
        service.sign(pending.id).await.expect("sign should succeed");

        let view = service.agreements().await;
        assert_eq!(view[0].signed_by, step);
        if step < 3 {
            assert_eq!(view[0].status, AgreementStatus::Pending);
        }
    }

    let view = service.agreements().await;
    assert_eq!(view[0].status, AgreementStatus::Active, "third sign activates");

    let sheet = service
        .fetch_signatures(pending.id)
        .await
        .expect("fetch_signatures should succeed");
    assert_eq!(sheet.len(), 3);
    assert!(sheet.iter().all(|s| s.signed), "all three entries signed");
}
