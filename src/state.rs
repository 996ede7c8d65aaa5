use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    issuer::SessionIssuer, jwt::SessionKeys, repo::UserStore, verifier::CredentialVerifier,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub issuer: SessionIssuer,
}

impl AppState {
    pub fn from_parts(config: &AppConfig, users: Arc<dyn UserStore>) -> Self {
        let verifier = CredentialVerifier::new(users.clone());
        let keys = SessionKeys::new(&config.session);
        let issuer = SessionIssuer::new(verifier, keys, config.auth.conceal_account_errors);
        Self { users, issuer }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.issuer.keys().clone()
    }
}
