//! Application factory
//!
//! Builds the actix-web `App` from shared state. Used by the binary for every
//! worker and by the integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use kt_core::repositories::TokenRepository;
use kt_shared::{error_codes, ErrorResponse, HealthResponse, HealthStatus, ServiceHealth};

use crate::handlers::json_error_handler;
use crate::middleware::auth::Authenticator;
use crate::routes::auth::{login::login, me::me, update::update, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<R>(
    app_state: web::Data<AppState<R>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: TokenRepository + 'static,
{
    let authenticator: Arc<dyn Authenticator> = app_state.token_service.clone();

    App::new()
        .app_data(app_state)
        .app_data(web::Data::from(authenticator))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<R>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            // Login bodies are decoded whatever the Content-Type says
                            .app_data(
                                web::JsonConfig::default()
                                    .content_type_required(false)
                                    .error_handler(json_error_handler),
                            )
                            .route(web::get().to(login::<R>))
                            .route(web::post().to(login::<R>)),
                    )
                    .route("/update", web::patch().to(update::<R>))
                    .route("/me", web::get().to(me)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Liveness plus credential store readiness
async fn health_check<R>(state: web::Data<AppState<R>>) -> HttpResponse
where
    R: TokenRepository + 'static,
{
    let store = match state.token_service.store_ready().await {
        Ok(()) => ServiceHealth {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(error) => {
            tracing::warn!(error = %error, "Credential store not ready");
            ServiceHealth {
                status: HealthStatus::Unhealthy,
                message: Some("Credential store unreachable".to_string()),
            }
        }
    };

    let mut services = HashMap::new();
    services.insert("credential_store".to_string(), store);
    let response = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));

    match response.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(response),
        _ => HttpResponse::Ok().json(response),
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
