//! Delete-with-undo lifecycle tests under a paused clock: undo restores
//! the original position with zero backend deletes, timeout commits
//! exactly once, and concurrent pending deletions stay independent.

mod common;

use std::{sync::Arc, time::Duration};

use entity::{agreement_signatures, agreements::AgreementStatus};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use services::AgreementService;

use common::{agreement, init_test_env, member};

/// Builds a service with three loaded agreements and `delete_execs` exec
/// results available for hard deletes. Returns a log handle alongside.
async fn loaded_service(delete_execs: usize) -> (Arc<AgreementService>, DatabaseConnection) {
    let kai = member("Kai", 10);
    let first = agreement("Core Working Hours", AgreementStatus::Active, 1);
    let second = agreement("Code Review Response Time", AgreementStatus::Active, 2);
    let third = agreement("No Meeting Fridays", AgreementStatus::Pending, 3);

    let mut mock = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![kai.clone()]])
        .append_query_results([vec![first, second, third]])
        .append_query_results([Vec::<agreement_signatures::Model>::new()]);

    for _ in 0..delete_execs {
        mock = mock.append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected:  1,
        }]);
    }

    let db = mock.into_connection();
    let log_handle = db.clone();

    let service = Arc::new(AgreementService::new(db));
    service.load().await.expect("load should succeed");
    (service, log_handle)
}

#[tokio::test(start_paused = true)]
async fn test_delete_then_undo_restores_original_index() {
    init_test_env();
    let (service, log_handle) = loaded_service(0).await;

    let before = service.agreements().await;
    let target = before[1].clone();

    let deletion_id = service
        .delete_with_undo(target.id)
        .await
        .expect("delete_with_undo should succeed");

    let during = service.agreements().await;
    assert_eq!(during.len(), 2, "removed from the view immediately");
    assert!(during.iter().all(|a| a.id != target.id));
    assert_eq!(service.pending_deletions().await.len(), 1);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    service.undo(deletion_id).await.expect("undo should succeed");

    let after = service.agreements().await;
    assert_eq!(after, before, "restored at its original index with identical fields");
    assert!(service.pending_deletions().await.is_empty());

    // Let the (aborted) countdown deadline pass, then verify no delete
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    let log = format!("{:?}", log_handle.into_transaction_log());
    assert!(!log.contains("DELETE"), "undo issues zero backend delete calls");
}

#[tokio::test(start_paused = true)]
async fn test_delete_then_timeout_commits_exactly_once() {
    init_test_env();
    let (service, log_handle) = loaded_service(1).await;

    let target = service.agreements().await[0].clone();
    let deletion_id = service
        .delete_with_undo(target.id)
        .await
        .expect("delete_with_undo should succeed");

    tokio::time::sleep(Duration::from_millis(5100)).await;

    assert!(service.pending_deletions().await.is_empty(), "entry removed on timeout");
    assert!(
        service.undo(deletion_id).await.is_err(),
        "undo after timeout must be a no-op failure"
    );

    let log = format!("{:?}", log_handle.into_transaction_log());
    let delete_count = log.matches("DELETE FROM \"agreements\"").count();
    assert_eq!(delete_count, 1, "exactly one backend delete");
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_commits_immediately_and_only_once() {
    init_test_env();
    let (service, log_handle) = loaded_service(1).await;

    let target = service.agreements().await[0].clone();
    let deletion_id = service
        .delete_with_undo(target.id)
        .await
        .expect("delete_with_undo should succeed");

    tokio::time::sleep(Duration::from_millis(500)).await;
    service.dismiss(deletion_id).await.expect("dismiss should succeed");
    assert!(service.pending_deletions().await.is_empty());

    // Run past the original deadline; the cancelled timer must not fire a
    // second delete (there is only one exec result to consume).
    tokio::time::sleep(Duration::from_millis(10_000)).await;

    let log = format!("{:?}", log_handle.into_transaction_log());
    let delete_count = log.matches("DELETE FROM \"agreements\"").count();
    assert_eq!(delete_count, 1, "dismiss commits exactly once");
}

#[tokio::test(start_paused = true)]
async fn test_two_pending_deletions_are_independent() {
    init_test_env();
    let (service, log_handle) = loaded_service(1).await;

    let view = service.agreements().await;
    let first_target = view[0].clone();
    let second_target = view[2].clone();

    let first_deletion = service
        .delete_with_undo(first_target.id)
        .await
        .expect("first delete should succeed");

    tokio::time::sleep(Duration::from_millis(2000)).await;

    let second_deletion = service
        .delete_with_undo(second_target.id)
        .await
        .expect("second delete should succeed");

    let pending = service.pending_deletions().await;
    assert_eq!(pending.len(), 2, "stacked in creation order");
    assert_eq!(pending[0].id, first_deletion);
    assert_eq!(pending[1].id, second_deletion);

    // Undo the first; the second keeps its own remaining time
    let second_before = service.deletion_progress(second_deletion).await.unwrap();
    service.undo(first_deletion).await.expect("undo should succeed");

    let second_after = service.deletion_progress(second_deletion).await.unwrap();
    assert!(
        (second_before - second_after).abs() < 0.01,
        "undoing one deletion must not touch the other's countdown"
    );

    // The second runs out on its own schedule (2000 + 5000 from its start)
    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert!(service.pending_deletions().await.is_empty());

    let remaining = service.agreements().await;
    assert!(remaining.iter().any(|a| a.id == first_target.id), "first restored");
    assert!(remaining.iter().all(|a| a.id != second_target.id), "second committed");

    let log = format!("{:?}", log_handle.into_transaction_log());
    let delete_count = log.matches("DELETE FROM \"agreements\"").count();
    assert_eq!(delete_count, 1, "only the second deletion reached the backend");
}

#[tokio::test(start_paused = true)]
async fn test_deletion_progress_reflects_elapsed_time() {
    init_test_env();
    let (service, _log) = loaded_service(0).await;

    let target = service.agreements().await[0].clone();
    let deletion_id = service
        .delete_with_undo(target.id)
        .await
        .expect("delete_with_undo should succeed");

    let fresh = service.deletion_progress(deletion_id).await.unwrap();
    assert!(fresh > 0.99);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let halfway = service.deletion_progress(deletion_id).await.unwrap();
    assert!((0.45..=0.55).contains(&halfway), "elapsed-based progress, got {}", halfway);

    service.undo(deletion_id).await.expect("undo should succeed");
    assert!(service.deletion_progress(deletion_id).await.is_none());
}
