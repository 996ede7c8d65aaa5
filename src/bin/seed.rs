use anyhow::Context;
use cabinet_admin::{
    auth::password::DEFAULT_COST,
    config::DatabaseConfig,
    db::Database,
    logging, seed,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = DatabaseConfig::from_lookup(|key| std::env::var(key).ok())?;
    let password = std::env::var("SEED_PASSWORD").context("SEED_PASSWORD must be set")?;

    let db = Database::open(&config).await?;
    db.migrate().await;

    let result = seed::run(
        db.pool(),
        &seed::default_ministries(),
        &seed::default_committees(),
        &seed::default_accounts(),
        &password,
        DEFAULT_COST,
    )
    .await;
    db.close().await;

    let report = result?;
    tracing::info!(
        ministries = report.ministries,
        departments = report.departments,
        agencies = report.agencies,
        committees = report.committees,
        users = report.users,
        "seeding complete"
    );
    Ok(())
}
