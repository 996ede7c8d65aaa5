use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::UserRecord;

const UNDEFINED_TABLE: &str = "42P01";

/// Read/write access to user accounts needed by the login flow.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
    async fn record_login(&self, user_id: Uuid, at: OffsetDateTime) -> anyhow::Result<()>;
    /// Store reachable and `users` table present.
    async fn ping(&self) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password, role, status, last_login
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(classify)
        .context("find user by email")?;
        Ok(user)
    }

    async fn record_login(&self, user_id: Uuid, at: OffsetDateTime) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET last_login = $2
             WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.db)
        .await
        .map_err(classify)
        .context("update last_login")?;
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1 FROM users LIMIT 1")
            .execute(&self.db)
            .await
            .map_err(classify)
            .context("ping users table")?;
        Ok(())
    }
}

fn is_undefined_table(code: Option<&str>) -> bool {
    code == Some(UNDEFINED_TABLE)
}

fn classify(err: sqlx::Error) -> anyhow::Error {
    let missing_table =
        is_undefined_table(err.as_database_error().and_then(|db| db.code()).as_deref());
    if missing_table {
        anyhow::anyhow!("users table does not exist")
    } else {
        anyhow::Error::new(err)
    }
}
