use std::sync::Arc;

use time::OffsetDateTime;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use crate::auth::{
    errors::AuthError,
    password::verify_password_off_thread,
    repo::UserStore,
    repo_types::{AccountStatus, PublicUser, Role},
};

/// Checks an email/password pair against stored accounts.
///
/// Performs one read and, on success only, one `last_login` write. Nothing is
/// retried and the two statements are not wrapped in a transaction.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, email, password))]
    pub async fn verify(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let email = email.trim().to_lowercase();

        let mut missing = Vec::new();
        if email.is_empty() {
            missing.push("email");
        }
        if password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            warn!(?missing, "login rejected: missing credentials");
            return Err(AuthError::Validation { missing });
        }

        let user = match self.store.find_by_email(&email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(%email, "login unknown email");
                return Err(AuthError::UserNotFound { email });
            }
            Err(e) => return Err(AuthError::Database(e)),
        };

        let active = user
            .status
            .parse::<AccountStatus>()
            .is_ok_and(AccountStatus::can_authenticate);
        if !active {
            warn!(user_id = %user.id, status = %user.status, "login on inactive account");
            return Err(AuthError::AccountInactive {
                status: user.status,
            });
        }

        let matches =
            classify_hash_check(verify_password_off_thread(password, &user.password_hash).await)?;
        if !matches {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidPassword);
        }

        let role = user
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::Database(e.context(format!("user {}", user.id))))?;

        let now = OffsetDateTime::now_utc();
        if let Err(e) = self.store.record_login(user.id, now).await {
            warn!(user_id = %user.id, error = %e, "failed to record last_login; continuing");
        } else {
            debug!(user_id = %user.id, "last_login recorded");
        }

        info!(user_id = %user.id, %role, "credentials verified");
        Ok(PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
        })
    }
}

/// Any failure of the hash comparison itself, including a panicked or
/// cancelled blocking task, is a `DATABASE_ERROR`.
fn classify_hash_check(result: Result<anyhow::Result<bool>, JoinError>) -> Result<bool, AuthError> {
    match result {
        Ok(Ok(matches)) => Ok(matches),
        Ok(Err(e)) => Err(AuthError::Database(e.context("stored password hash is malformed"))),
        Err(e) => Err(AuthError::Database(
            anyhow::Error::new(e).context("password check task failed"),
        )),
    }
}
