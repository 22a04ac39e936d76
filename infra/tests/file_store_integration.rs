//! Durability of the file revocation store across a simulated restart

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use sh_core::clock::ManualClock;
use sh_core::domain::entities::Role;
use sh_core::errors::TokenError;
use sh_core::repositories::RevocationRepository;
use sh_core::services::token::{SweeperConfig, TokenService, TokenServiceConfig};
use sh_infra::{FileRevocationRepository, InfrastructureError};

const SECRET: &str = "integration-test-secret";

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn test_revocation_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("revocations.json");
    let clock = clock();

    let store = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    let service = TokenService::new(
        store,
        TokenServiceConfig::new(SECRET),
        Arc::new(clock.clone()),
    )
    .unwrap();

    let issued = service.login("u1", Role::Admin).unwrap();
    assert!(service.verify(Some(&issued.access_token)).await.is_ok());

    service.revoke(&issued.access_token).await.unwrap();
    assert_eq!(
        service.verify(Some(&issued.access_token)).await,
        Err(TokenError::Revoked)
    );
    drop(service);

    // New process: reopen from disk
    let reopened = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    assert!(reopened.is_revoked(&issued.token_id).await.unwrap());

    let restarted =
        TokenService::new(reopened, TokenServiceConfig::new(SECRET), Arc::new(clock)).unwrap();
    assert_eq!(
        restarted.verify(Some(&issued.access_token)).await,
        Err(TokenError::Revoked)
    );
}

#[tokio::test]
async fn test_concurrent_revocations_are_all_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("revocations.json");
    let clock = clock();
    let store = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    let service = Arc::new(
        TokenService::new(store, TokenServiceConfig::new(SECRET), Arc::new(clock)).unwrap(),
    );

    let mut tokens = Vec::new();
    for i in 0..16 {
        tokens.push(service.login(&format!("u{}", i), Role::Staff).unwrap());
    }

    let mut handles = Vec::new();
    for token in tokens.clone() {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.revoke(&token.access_token).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    drop(service);

    let reopened = FileRevocationRepository::open(&path).await.unwrap();
    assert_eq!(reopened.len().await, tokens.len());
    for token in &tokens {
        assert!(reopened.is_revoked(&token.token_id).await.unwrap());
    }
}

#[tokio::test]
async fn test_sweep_then_restart_keeps_live_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("revocations.json");
    let clock = clock();
    let store = Arc::new(FileRevocationRepository::open(&path).await.unwrap());

    let short = TokenService::new(
        store.clone(),
        TokenServiceConfig::new(SECRET).with_lifetime(Duration::minutes(5)),
        Arc::new(clock.clone()),
    )
    .unwrap();
    let long = TokenService::new(
        store.clone(),
        TokenServiceConfig::new(SECRET),
        Arc::new(clock.clone()),
    )
    .unwrap();

    let short_token = short.login("u1", Role::Staff).unwrap();
    let long_token = long.login("u2", Role::Manager).unwrap();
    short.revoke(&short_token.access_token).await.unwrap();
    long.revoke(&long_token.access_token).await.unwrap();

    clock.advance(Duration::minutes(10));
    let result = long.sweeper(SweeperConfig::default()).run_sweep().await.unwrap();
    assert_eq!(result.records_purged, 1);
    drop((short, long, store));

    let reopened = FileRevocationRepository::open(&path).await.unwrap();
    assert!(!reopened.is_revoked(&short_token.token_id).await.unwrap());
    assert!(reopened.is_revoked(&long_token.token_id).await.unwrap());
}

#[tokio::test]
async fn test_store_file_cannot_be_shared_between_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("revocations.json");
    let clock = clock();

    let first = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    let service = TokenService::new(
        first.clone(),
        TokenServiceConfig::new(SECRET),
        Arc::new(clock.clone()),
    )
    .unwrap();
    let issued = service.login("u1", Role::Staff).unwrap();

    // A second instance pointed at the same file must not start with its own copy
    let second = FileRevocationRepository::open(&path).await;
    assert!(matches!(second, Err(InfrastructureError::StoreLocked(_))));

    service.revoke(&issued.access_token).await.unwrap();
    drop((service, first));

    let next = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    let restarted =
        TokenService::new(next, TokenServiceConfig::new(SECRET), Arc::new(clock)).unwrap();
    assert_eq!(
        restarted.verify(Some(&issued.access_token)).await,
        Err(TokenError::Revoked)
    );
}
