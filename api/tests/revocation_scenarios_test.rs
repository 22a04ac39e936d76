//! End-to-end revocation scenarios over the durable file store

mod common;

use actix_web::{http::StatusCode, test};
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

use sh_api::create_app;
use sh_api::dto::{LoginResponse, SessionResponse};
use sh_core::clock::ManualClock;
use sh_core::domain::entities::TokenIdentifier;
use sh_core::repositories::RevocationRepository;
use sh_infra::FileRevocationRepository;
use sh_shared::{CorsConfig, Environment};

use common::*;

#[actix_web::test]
async fn test_revocation_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("revocations.json");
    let clock = ManualClock::new(Utc::now());

    let access_token = {
        let store = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
        let ctx = context_with(store, clock.clone());
        let app = test::init_service(create_app(
            ctx.state.clone(),
            &CorsConfig::default(),
            Environment::Development,
        ))
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(login_body())
            .to_request();
        let login: LoginResponse = test::call_and_read_body_json(&app, req).await;

        // Admitted while live
        let req = test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header(bearer(&login.access_token))
            .to_request();
        let session: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(session.subject_id, "u1");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&login.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Rejected after revocation
        let req = test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header(bearer(&login.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        login.access_token
    };

    // Fresh process state over the same snapshot
    let store = Arc::new(FileRevocationRepository::open(&path).await.unwrap());
    assert!(store
        .is_revoked(&TokenIdentifier::from_encoded(&access_token))
        .await
        .unwrap());

    let ctx = context_with(store, clock);
    let app = test::init_service(create_app(
        ctx.state.clone(),
        &CorsConfig::default(),
        Environment::Development,
    ))
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(bearer(&access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.repository.reads(), 1);
}

#[actix_web::test]
async fn test_other_sessions_unaffected_by_logout() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(
        FileRevocationRepository::open(dir.path().join("revocations.json"))
            .await
            .unwrap(),
    );
    let ctx = context_with(store, ManualClock::new(Utc::now()));
    let app = test::init_service(create_app(
        ctx.state.clone(),
        &CorsConfig::default(),
        Environment::Development,
    ))
    .await;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(login_body())
            .to_request();
        let login: LoginResponse = test::call_and_read_body_json(&app, req).await;
        tokens.push(login.access_token);
    }
    assert_ne!(tokens[0], tokens[1]);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&tokens[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(bearer(&tokens[1]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
