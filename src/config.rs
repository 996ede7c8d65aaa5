use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Report unknown accounts and wrong passwords as one `INVALID_CREDENTIALS` outcome.
    pub conceal_account_errors: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl DatabaseConfig {
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig::from_lookup(&lookup)?;
        let session = SessionConfig {
            secret: lookup("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            issuer: lookup("SESSION_ISSUER").unwrap_or_else(|| "cabinet-admin".into()),
            audience: lookup("SESSION_AUDIENCE")
                .unwrap_or_else(|| "cabinet-admin-dashboard".into()),
            ttl_minutes: parse_or(&lookup, "SESSION_TTL_MINUTES", 60 * 24 * 30)?,
        };
        anyhow::ensure!(!session.secret.is_empty(), "SESSION_SECRET must not be empty");
        anyhow::ensure!(session.ttl_minutes > 0, "SESSION_TTL_MINUTES must be positive");

        let auth = AuthConfig {
            conceal_account_errors: parse_or(&lookup, "AUTH_CONCEAL_ACCOUNT_ERRORS", false)?,
        };
        let server = ServerConfig {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
        };

        Ok(Self {
            database,
            session,
            auth,
            server,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cabinet"),
            ("SESSION_SECRET", "s3cret"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.session.issuer, "cabinet-admin");
        assert_eq!(cfg.session.audience, "cabinet-admin-dashboard");
        assert_eq!(cfg.session.ttl_minutes, 43_200);
        assert!(!cfg.auth.conceal_account_errors);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn missing_session_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/cabinet",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_key() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cabinet"),
            ("SESSION_SECRET", "s3cret"),
            ("APP_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }

    #[test]
    fn conceal_flag_is_parsed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/cabinet"),
            ("SESSION_SECRET", "s3cret"),
            ("AUTH_CONCEAL_ACCOUNT_ERRORS", "true"),
        ]))
        .unwrap();
        assert!(cfg.auth.conceal_account_errors);
    }
}
