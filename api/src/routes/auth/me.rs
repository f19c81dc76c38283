use actix_web::HttpResponse;

use crate::dto::auth::MeResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
///
/// Echoes the subject of a live bearer token.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        uuid: auth.client_id.into_inner(),
    })
}
