//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::web;
use sh_api::AppState;
use sh_core::clock::ManualClock;
use sh_core::domain::entities::{RevocationRecord, TokenIdentifier};
use sh_core::errors::DomainError;
use sh_core::repositories::{InMemoryRevocationRepository, RevocationRepository, StaffDirectory};
use sh_core::services::{TokenService, TokenServiceConfig};
use sh_infra::StaticStaffDirectory;
use sh_shared::AccountConfig;

pub const TEST_SECRET: &str = "integration-test-signing-secret";
pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "correct horse battery staple";

/// Wraps a repository with call counters and failure switches
pub struct InstrumentedRepository {
    inner: Arc<dyn RevocationRepository>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_health: AtomicBool,
}

impl InstrumentedRepository {
    pub fn new(inner: Arc<dyn RevocationRepository>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_health: AtomicBool::new(false),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RevocationRepository for InstrumentedRepository {
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::storage("write refused"));
        }
        self.inner.record_revocation(record).await
    }

    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::storage("read refused"));
        }
        self.inner.is_revoked(token_id).await
    }

    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError> {
        self.inner.find_record(token_id).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.inner.purge_expired(now).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        if self.fail_health.load(Ordering::SeqCst) {
            return Err(DomainError::storage("store unreachable"));
        }
        self.inner.health_check().await
    }
}

/// Everything a test needs to drive the app and inspect the store
pub struct TestContext {
    pub clock: ManualClock,
    pub repository: Arc<InstrumentedRepository>,
    pub state: web::Data<AppState>,
}

pub fn staff_directory() -> Arc<dyn StaffDirectory> {
    let accounts = vec![AccountConfig {
        username: USERNAME.to_string(),
        password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
        subject_id: "u1".to_string(),
        role: "admin".to_string(),
    }];
    Arc::new(StaticStaffDirectory::from_accounts(&accounts).unwrap())
}

/// Build app state over `store`, sharing `clock` with the caller
pub fn context_with(store: Arc<dyn RevocationRepository>, clock: ManualClock) -> TestContext {
    let repository = Arc::new(InstrumentedRepository::new(store));
    let dyn_repository: Arc<dyn RevocationRepository> = repository.clone();

    let token_service = Arc::new(
        TokenService::new(
            dyn_repository,
            TokenServiceConfig::new(TEST_SECRET),
            Arc::new(clock.clone()),
        )
        .unwrap(),
    );

    TestContext {
        clock,
        repository,
        state: web::Data::new(AppState::new(staff_directory(), token_service)),
    }
}

pub fn context() -> TestContext {
    context_with(
        Arc::new(InMemoryRevocationRepository::new()),
        ManualClock::new(Utc::now()),
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn login_body() -> serde_json::Value {
    serde_json::json!({ "username": USERNAME, "password": PASSWORD })
}
