use tracing::{info, instrument};

use crate::auth::{
    dto::Credentials,
    errors::AuthError,
    jwt::{SessionKeys, SignedSession},
    repo_types::PublicUser,
    verifier::CredentialVerifier,
};

/// Outcome of a successful sign-in.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: SignedSession,
    pub user: PublicUser,
}

/// Adapts [`CredentialVerifier`] to the session contract: verify, then sign.
#[derive(Clone)]
pub struct SessionIssuer {
    verifier: CredentialVerifier,
    keys: SessionKeys,
    conceal_account_errors: bool,
}

impl SessionIssuer {
    pub fn new(verifier: CredentialVerifier, keys: SessionKeys, conceal_account_errors: bool) -> Self {
        Self {
            verifier,
            keys,
            conceal_account_errors,
        }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    #[instrument(skip(self, credentials))]
    pub async fn authorize(&self, credentials: &Credentials) -> Result<IssuedSession, AuthError> {
        let email = credentials.email.as_deref().unwrap_or_default();
        let password = credentials.password.as_deref().unwrap_or_default();

        let user = match self.verifier.verify(email, password).await {
            Ok(user) => user,
            Err(e) if self.conceal_account_errors => return Err(e.conceal()),
            Err(e) => return Err(e),
        };

        let session = self.keys.sign(&user).map_err(AuthError::Unknown)?;
        info!(user_id = %user.id, role = %user.role, "session issued");
        Ok(IssuedSession { session, user })
    }
}
