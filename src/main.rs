use std::sync::Arc;

use cabinet_admin::{
    app,
    auth::repo::PgUserStore,
    config::AppConfig,
    db::Database,
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = AppConfig::from_env()?;
    let db = Database::open(&config.database).await?;
    db.migrate().await;

    let users = Arc::new(PgUserStore::new(db.pool().clone()));
    let state = AppState::from_parts(&config, users);

    let result = app::serve(app::build_app(state), &config.server).await;
    db.close().await;
    result
}
