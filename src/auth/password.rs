use tracing::error;

pub use bcrypt::DEFAULT_COST;

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash_password error");
        anyhow::anyhow!(e.to_string())
    })
}

/// `Ok(false)` on mismatch, `Err` when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt parse hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Runs [`verify_password`] on the blocking pool.
///
/// The outer error is a task join failure, the inner one a malformed hash.
pub async fn verify_password_off_thread(
    plain: &str,
    hash: &str,
) -> Result<anyhow::Result<bool>, tokio::task::JoinError> {
    let plain = plain.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");
        assert!(hash.starts_with("$2"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("admin123", TEST_COST).unwrap();
        let b = hash_password("admin123", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn off_thread_verify_matches_inline_verify() {
        let hash = hash_password("admin123", TEST_COST).unwrap();
        assert!(verify_password_off_thread("admin123", &hash)
            .await
            .unwrap()
            .unwrap());
        assert!(!verify_password_off_thread("admin124", &hash)
            .await
            .unwrap()
            .unwrap());
    }
}
