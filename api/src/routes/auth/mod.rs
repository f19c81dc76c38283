//! Authentication route handlers
//!
//! - Login (first token pair for a client)
//! - Update (refresh rotation)
//! - Me (bearer token check)

pub mod login;
pub mod me;
pub mod update;

use std::sync::Arc;

use kt_core::repositories::TokenRepository;
use kt_core::services::token::TokenService;

/// Application state shared with every handler
pub struct AppState<R: TokenRepository> {
    pub token_service: Arc<TokenService<R>>,
}

impl<R: TokenRepository> AppState<R> {
    pub fn new(token_service: Arc<TokenService<R>>) -> Self {
        Self { token_service }
    }
}
