use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    Json,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::Claims,
        repo_types::{PublicUser, Role},
    },
    config::SessionConfig,
};

/// Session signing and verification keys with their config data.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct SignedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Self {
        let SessionConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = config.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }

    pub fn sign(&self, user: &PublicUser) -> anyhow::Result<SignedSession> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp = now + self.ttl.as_secs() as i64;
        let expires_at = OffsetDateTime::from_unix_timestamp(exp)?;
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now as usize,
            exp: exp as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, role = %user.role, "session signed");
        Ok(SignedSession { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session verified");
        Ok(data.claims)
    }
}

/// Session exposed to request handlers: `user.id` and `user.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub role: Role,
    pub expires_at: OffsetDateTime,
}

impl TryFrom<Claims> for SessionUser {
    type Error = anyhow::Error;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.sub,
            role: claims.role,
            expires_at: OffsetDateTime::from_unix_timestamp(claims.exp as i64)?,
        })
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "type": "UNAUTHORIZED", "message": message, "details": null })),
    )
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| unauthorized("Invalid Authorization header"))?;

        match keys.verify(token).and_then(SessionUser::try_from) {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!(error = %e, "invalid or expired session token");
                Err(unauthorized("Invalid or expired session"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str, ttl_minutes: i64) -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes,
        })
    }

    fn sample_user() -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            name: "Known Official".into(),
            email: "known@gov.go.ke".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn sign_and_verify_carries_id_and_role() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud", 5);
        let user = sample_user();
        let session = keys.sign(&user).expect("sign");
        let claims = keys.verify(&session.token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp as i64, session.expires_at.unix_timestamp());
    }

    #[test]
    fn token_does_not_embed_email_or_name() {
        let keys = make_keys("dev-secret", "iss", "aud", 5);
        let session = keys.sign(&sample_user()).unwrap();
        let claims = keys.verify(&session.token).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud", 5);
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud", 5);
        let session = good_keys.sign(&sample_user()).unwrap();
        assert!(bad_keys.verify(&session.token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let ours = make_keys("secret-a", "iss", "aud", 5);
        let theirs = make_keys("secret-b", "iss", "aud", 5);
        let session = theirs.sign(&sample_user()).unwrap();
        assert!(ours.verify(&session.token).is_err());
    }

    #[test]
    fn session_user_from_claims_keeps_expiry() {
        let keys = make_keys("dev-secret", "iss", "aud", 5);
        let user = sample_user();
        let claims = keys.verify(&keys.sign(&user).unwrap().token).unwrap();
        let signed_expiry = claims.exp as i64;
        let session = SessionUser::try_from(claims).unwrap();
        assert_eq!(session.id, user.id);
        assert_eq!(session.role, user.role);
        assert_eq!(session.expires_at.unix_timestamp(), signed_expiry);
    }
}
