//! Stored-configuration validation must fail before any network traffic.

mod support;

use std::sync::Arc;

use anyhow::Result;
use gridlogin::auth::AuthError;
use gridlogin::models::Account;
use gridlogin::storage::MemoryStore;
use support::{orchestrator_for, test_account, test_matrix, RecordingReporter};
use wiremock::MockServer;

async fn run_expecting_failure(store: MemoryStore) -> Result<(AuthError, usize, bool)> {
    // Nothing is mounted; any request would 404 and show up in the count.
    let server = MockServer::start().await;
    let reporter = Arc::new(RecordingReporter::default());
    let err = orchestrator_for(&server.uri(), Arc::new(store), reporter.clone())
        .run()
        .await
        .unwrap_err();
    let requests = server.received_requests().await.expect("requests recorded");
    let offered = *reporter.settings_offered.lock().unwrap();
    Ok((err, requests.len(), offered))
}

#[tokio::test]
async fn missing_account_is_rejected_without_requests() -> Result<()> {
    let (err, requests, offered) =
        run_expecting_failure(MemoryStore::new().with_matrix(test_matrix())).await?;
    assert!(matches!(err, AuthError::AccountNotSet));
    assert_eq!(requests, 0);
    assert!(offered);
    Ok(())
}

#[tokio::test]
async fn empty_credential_field_is_rejected_without_requests() -> Result<()> {
    let store = MemoryStore::new()
        .with_account(Account::new("u1", ""))
        .with_matrix(test_matrix());
    let (err, requests, _) = run_expecting_failure(store).await?;
    assert!(matches!(err, AuthError::AccountNotSet));
    assert_eq!(requests, 0);
    Ok(())
}

#[tokio::test]
async fn missing_matrix_is_rejected_without_requests() -> Result<()> {
    let (err, requests, offered) =
        run_expecting_failure(MemoryStore::new().with_account(test_account())).await?;
    assert!(matches!(err, AuthError::MatrixNotSet));
    assert_eq!(requests, 0);
    assert!(offered);
    Ok(())
}

#[tokio::test]
async fn misshapen_matrix_is_rejected_without_requests() -> Result<()> {
    let mut matrix = test_matrix();
    matrix.cells.pop();
    let store = MemoryStore::new()
        .with_account(test_account())
        .with_matrix(matrix);
    let (err, requests, _) = run_expecting_failure(store).await?;
    assert!(matches!(err, AuthError::MatrixNotSet));
    assert_eq!(requests, 0);
    Ok(())
}

#[tokio::test]
async fn store_read_failure_is_load_failure() -> Result<()> {
    let (err, requests, offered) = run_expecting_failure(MemoryStore::failing()).await?;
    assert!(matches!(err, AuthError::LoadFailure(_)));
    assert_eq!(requests, 0);
    assert!(offered);
    Ok(())
}
