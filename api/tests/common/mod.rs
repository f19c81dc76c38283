//! Shared setup for API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use serde_json::json;

use kt_api::routes::auth::AppState;
use kt_core::repositories::{InMemoryTokenRepository, TokenRepository};
use kt_core::services::token::{SigningKey, TokenService, TokenServiceConfig};

pub const TEST_SIGNING_KEY: &str = "api-test-signing-key";

pub fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(SigningKey::new(TEST_SIGNING_KEY)).with_hash_cost(4)
}

pub fn app_state_with<R: TokenRepository + 'static>(
    repository: R,
    config: TokenServiceConfig,
) -> web::Data<AppState<R>> {
    let token_service = TokenService::new(repository, config).expect("valid token service config");
    web::Data::new(AppState::new(Arc::new(token_service)))
}

pub fn app_state() -> web::Data<AppState<InMemoryTokenRepository>> {
    app_state_with(InMemoryTokenRepository::new(), test_config())
}

pub fn login_body(uuid: &str) -> serde_json::Value {
    json!({ "uuid": uuid })
}

pub fn update_body(jwt: &str, refresh_token: &str) -> serde_json::Value {
    json!({ "jwt": jwt, "refreshToken": refresh_token })
}
