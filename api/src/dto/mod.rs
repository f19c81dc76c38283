pub mod auth;

pub use auth::{LoginRequest, MeResponse, TokenResponse, UpdateRequest};
