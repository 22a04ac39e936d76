//! Verification middleware behaviour on the protected session route

mod common;

use actix_web::{http::StatusCode, test};
use chrono::Duration;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use sh_api::create_app;
use sh_api::dto::{LoginResponse, SessionResponse};
use sh_core::services::{TokenCodec, TokenServiceConfig};
use sh_core::domain::entities::Role;
use sh_shared::{CorsConfig, Environment, ErrorResponse};

use common::*;

fn assert_uniform_unauthorized(body: &ErrorResponse) {
    assert_eq!(body.error, "UNAUTHORIZED");
    assert_eq!(body.message, "Authentication required");
    assert!(body.details.is_none());
}

#[actix_web::test]
async fn test_valid_token_is_admitted() {
    let ctx = context();
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

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(bearer(&login.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session: SessionResponse = test::read_body_json(resp).await;
    assert_eq!(session.subject_id, "u1");
    assert_eq!(session.role, Role::Admin);
    assert_eq!(ctx.repository.reads(), 1);
}

#[actix_web::test]
async fn test_missing_token_is_rejected() {
    let ctx = context();
    let app = test::init_service(create_app(
        ctx.state.clone(),
        &CorsConfig::default(),
        Environment::Development,
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/v1/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_uniform_unauthorized(&body);
    assert_eq!(ctx.repository.reads(), 0);
}

#[actix_web::test]
async fn test_forged_and_garbage_tokens_get_the_same_response() {
    let ctx = context();
    let app = test::init_service(create_app(
        ctx.state.clone(),
        &CorsConfig::default(),
        Environment::Development,
    ))
    .await;

    let foreign_codec = TokenCodec::new(
        &TokenServiceConfig::new("some-other-secret"),
        Arc::new(ctx.clock.clone()),
    )
    .unwrap();
    let foreign = foreign_codec
        .issue("u1", Role::Admin, Duration::hours(1))
        .unwrap()
        .access_token;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body())
        .to_request();
    let login: LoginResponse = test::call_and_read_body_json(&app, req).await;
    let mut tampered = login.access_token.clone().into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    for token in [foreign.as_str(), tampered.as_str(), "not-a-token", "a.b.c"] {
        let req = test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "token {}", token);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_uniform_unauthorized(&body);
    }

    // Signature and shape failures never reach the store
    assert_eq!(ctx.repository.reads(), 0);
}

#[actix_web::test]
async fn test_expired_token_rejected_without_store_read() {
    let ctx = context();
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
    assert_eq!(login.expires_in, 3600);

    ctx.clock.advance(Duration::hours(1) + Duration::seconds(1));

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(bearer(&login.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_uniform_unauthorized(&body);
    assert_eq!(ctx.repository.reads(), 0);
}

#[actix_web::test]
async fn test_store_failure_fails_closed() {
    let ctx = context();
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

    ctx.repository.fail_reads.store(true, Ordering::SeqCst);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(bearer(&login.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_uniform_unauthorized(&body);
    assert_eq!(ctx.repository.reads(), 1);
}

#[actix_web::test]
async fn test_unknown_route_returns_not_found() {
    let ctx = context();
    let app = test::init_service(create_app(
        ctx.state.clone(),
        &CorsConfig::default(),
        Environment::Development,
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/v1/leave").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
