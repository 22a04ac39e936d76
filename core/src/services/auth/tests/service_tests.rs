//! Unit tests for authentication service

use chrono::{TimeZone, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::mocks::MockStaffDirectory;
use crate::clock::ManualClock;
use crate::domain::entities::Role;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::InMemoryRevocationRepository;
use crate::services::auth::AuthService;
use crate::services::token::{RevocationOutcome, TokenService, TokenServiceConfig};

fn create_service(
    directory: MockStaffDirectory,
) -> AuthService<MockStaffDirectory, InMemoryRevocationRepository> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let tokens = TokenService::new(
        Arc::new(InMemoryRevocationRepository::new()),
        TokenServiceConfig::new("auth-service-test-secret"),
        Arc::new(clock),
    )
    .unwrap();

    AuthService::new(Arc::new(directory), Arc::new(tokens))
}

fn directory() -> MockStaffDirectory {
    MockStaffDirectory::new()
        .with_account("alice", "correct horse", "u1", Role::Admin)
        .with_account("bob", "battery staple", "u2", Role::Staff)
}

#[tokio::test]
async fn test_login_issues_token_for_account() {
    let service = create_service(directory());

    let issued = service.login("alice", "correct horse").await.unwrap();

    assert_eq!(issued.subject_id, "u1");
    assert_eq!(issued.role, Role::Admin);
    assert_eq!(issued.expires_in(), 3600);

    let identity = service
        .token_service()
        .verify(Some(&issued.access_token))
        .await
        .unwrap();
    assert_eq!(identity.subject_id, "u1");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let service = create_service(directory());

    let wrong_password = service.login("alice", "wrong").await.unwrap_err();
    let unknown_user = service.login("mallory", "correct horse").await.unwrap_err();

    assert!(matches!(
        wrong_password,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let service = create_service(directory());

    assert!(matches!(
        service.login("  ", "pw").await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.login("alice", "").await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_directory_failure_propagates() {
    let directory = directory();
    directory.unavailable.store(true, Ordering::SeqCst);
    let service = create_service(directory);

    assert!(matches!(
        service.login("alice", "correct horse").await,
        Err(DomainError::Storage { .. })
    ));
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let service = create_service(directory());
    let issued = service.login("bob", "battery staple").await.unwrap();

    assert!(matches!(
        service.logout(&issued.access_token).await,
        Ok(RevocationOutcome::Revoked { .. })
    ));
    assert_eq!(
        service
            .token_service()
            .verify(Some(&issued.access_token))
            .await,
        Err(TokenError::Revoked)
    );
}
