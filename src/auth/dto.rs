use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{PublicUser, Role};

/// Request body for login. Fields are optional on the wire so that an absent
/// field is reported as a validation error rather than a body rejection.
#[derive(Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub token_type: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUserView {
    pub id: Uuid,
    pub role: Role,
}

/// Session rehydrated from a token.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: SessionUserView,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}
