use actix_web::{web, HttpResponse};

use kt_core::domain::entities::token::RawRefreshSecret;
use kt_core::repositories::TokenRepository;

use crate::dto::auth::{TokenResponse, UpdateRequest};
use crate::handlers::error::handle_domain_error;

use super::AppState;

/// Handler for PATCH /api/v1/auth/update
///
/// Exchanges the current refresh token for a new pair. The presented
/// refresh token stops working once this succeeds.
///
/// # Request Body
///
/// ```json
/// {
///     "jwt": "eyJ...",
///     "refreshToken": "base64-secret"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Invalid access token, unknown or expired refresh
///   record, or refresh token mismatch
/// - 503 Service Unavailable: Credential store unreachable
pub async fn update<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<UpdateRequest>,
) -> HttpResponse
where
    R: TokenRepository + 'static,
{
    let UpdateRequest { jwt, refresh_token } = request.into_inner();
    let refresh_secret = RawRefreshSecret::new(refresh_token);

    match state.token_service.rotate(&jwt, &refresh_secret).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
