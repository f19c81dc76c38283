//! Bearer token authentication for protected endpoints.
//!
//! `AuthContext` is an extractor: handlers that take it only run once the
//! `Authorization: Bearer <jwt>` header carries a live access token.

use actix_web::{
    dev::Payload, error::InternalError, http::header::AUTHORIZATION, web, Error, FromRequest,
    HttpRequest,
};
use std::future::{ready, Ready};

use kt_core::{
    domain::entities::token::ClientId,
    errors::{DomainError, TokenError},
    repositories::TokenRepository,
    services::token::TokenService,
};

use crate::handlers::handle_domain_error;

/// Authenticated client injected into handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Subject of the presented access token
    pub client_id: ClientId,
}

/// Object-safe view of the token service for request extraction
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<ClientId, DomainError>;
}

impl<R: TokenRepository> Authenticator for TokenService<R> {
    fn authenticate(&self, token: &str) -> Result<ClientId, DomainError> {
        TokenService::authenticate(self, token)
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(error: DomainError) -> Error {
    let message = error.to_string();
    InternalError::from_response(message, handle_domain_error(error)).into()
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(authenticator) = req.app_data::<web::Data<dyn Authenticator>>() else {
            return ready(Err(unauthorized(DomainError::Internal {
                message: "Authenticator not registered".to_string(),
            })));
        };

        let result = match extract_bearer_token(req) {
            Some(token) => authenticator
                .authenticate(token)
                .map(|client_id| AuthContext { client_id })
                .map_err(unauthorized),
            None => Err(unauthorized(TokenError::InvalidAccessToken.into())),
        };

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_http_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123"));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_http_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_http_request();

        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = test::TestRequest::default().to_http_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
