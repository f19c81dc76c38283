//! Integration tests for health check, fallback routing and store outages

mod common;

use actix_web::test;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use kt_api::app::create_app;
use kt_core::domain::entities::token::{ClientId, RefreshCredentialRecord};
use kt_core::errors::StoreError;
use kt_core::repositories::TokenRepository;

use common::{app_state, app_state_with, login_body, test_config};

/// Store whose backend is always down
struct UnreachableRepository;

#[async_trait]
impl TokenRepository for UnreachableRepository {
    async fn create_if_absent(&self, _: RefreshCredentialRecord) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn overwrite(&self, _: &ClientId, _: &str, _: DateTime<Utc>) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn compare_and_overwrite(
        &self,
        _: &ClientId,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn lookup(&self, _: &ClientId) -> Result<Option<RefreshCredentialRecord>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(app_state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["credential_store"]["status"], "healthy");
}

#[actix_web::test]
async fn test_health_check_with_store_down() {
    let app = test::init_service(create_app(app_state_with(UnreachableRepository, test_config()))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_web::test]
async fn test_login_with_store_down() {
    let app = test::init_service(create_app(app_state_with(UnreachableRepository, test_config()))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/login")
        .set_json(login_body("u1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "STORE_UNAVAILABLE");
    assert!(!body["message"].as_str().unwrap().contains("connection refused"));
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = test::init_service(create_app(app_state())).await;

    let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
