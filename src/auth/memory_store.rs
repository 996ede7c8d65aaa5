use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::UserRecord;

/// `UserStore` kept in process memory, keyed by lower-cased email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users
            .write()
            .await
            .insert(user.email.to_lowercase(), user);
    }

    pub async fn get(&self, email: &str) -> Option<UserRecord> {
        self.users.read().await.get(&email.to_lowercase()).cloned()
    }

    /// Every call fails as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Only `record_login` fails.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.get(email).await)
    }

    async fn record_login(&self, user_id: Uuid, at: OffsetDateTime) -> anyhow::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("write rejected");
        }
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.last_login = Some(at);
                Ok(())
            }
            None => anyhow::bail!("user {user_id} not found"),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check_available()
    }
}
