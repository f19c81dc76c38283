//! Mapping of domain failures to HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use kt_core::errors::{DomainError, StoreError, TokenError};
use kt_shared::{error_codes, ErrorResponse};

/// Status code, wire code and client-facing message for a domain error
fn classify(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Store(StoreError::DuplicateIdentifier) => (
            StatusCode::CONFLICT,
            error_codes::ALREADY_REGISTERED,
            error.to_string(),
        ),
        DomainError::Store(StoreError::Unavailable { .. }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::STORE_UNAVAILABLE,
            "Credential store is temporarily unavailable".to_string(),
        ),
        DomainError::Token(TokenError::InvalidAccessToken) => (
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_ACCESS_TOKEN,
            error.to_string(),
        ),
        DomainError::Token(TokenError::AccessTokenExpired) => (
            StatusCode::UNAUTHORIZED,
            error_codes::ACCESS_TOKEN_EXPIRED,
            error.to_string(),
        ),
        DomainError::Token(TokenError::UnknownOrExpiredRefreshToken) => (
            StatusCode::UNAUTHORIZED,
            error_codes::REFRESH_TOKEN_EXPIRED,
            error.to_string(),
        ),
        DomainError::Token(TokenError::RefreshTokenMismatch) => (
            StatusCode::UNAUTHORIZED,
            error_codes::REFRESH_TOKEN_MISMATCH,
            error.to_string(),
        ),
        DomainError::Token(
            TokenError::SigningFailed | TokenError::RandomnessUnavailable | TokenError::HashingFailed,
        )
        | DomainError::Store(StoreError::NotFound)
        | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code, message) = classify(&error);

    if error.is_client_error() {
        tracing::info!(error = %error, code, "Request rejected");
    } else {
        tracing::error!(error = %error, code, "Request failed");
    }

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// 400 for request bodies that decode but fail validation
pub fn handle_validation_error(errors: ValidationErrors) -> HttpResponse {
    tracing::info!(errors = %errors, "Request validation failed");

    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::INVALID_REQUEST,
        format!("Invalid request: {}", errors),
    ))
}

/// `JsonConfig` error handler producing the standard error body
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::info!(error = %error, "Malformed request body");

    // Payload errors can quote the body, so the client gets a fixed message
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::INVALID_REQUEST,
        "Request body is not valid JSON for this endpoint",
    ));
    InternalError::from_response(error, response).into()
}
