use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod issuer;
pub mod jwt;
#[cfg(test)]
pub mod memory_store;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod verifier;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
