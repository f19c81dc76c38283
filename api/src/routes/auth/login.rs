use actix_web::{web, HttpResponse};
use validator::Validate;

use kt_core::domain::entities::token::ClientId;
use kt_core::repositories::TokenRepository;

use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_error};

use super::AppState;

/// Handler for GET|POST /api/v1/auth/login
///
/// Registers a client identifier and issues its first token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "uuid": "client-identifier"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "jwt": "eyJ...",
///     "refreshToken": "base64-secret"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing or out-of-range identifier
/// - 409 Conflict: Identifier already registered
/// - 503 Service Unavailable: Credential store unreachable
pub async fn login<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    R: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(errors);
    }

    let client_id = ClientId::new(request.into_inner().uuid);

    match state.token_service.login(&client_id).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
