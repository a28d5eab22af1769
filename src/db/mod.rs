// The competition database.
mod competition;
mod game;
mod team;

use std::{str::FromStr, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::{config::EngineConfig, error::Result, logic::types::Db};

// Open the database described by the configuration and bring its schema up to date.
pub async fn setup(config: &EngineConfig) -> Result<Db> {
    let now = std::time::Instant::now();

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let db = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options).await?;

    migrate(&db).await?;

    info!(url = %config.database_url, "database ready in {:.2?}", now.elapsed());
    return Ok(db);
}

// Database in memory. Every connection to `sqlite::memory:` is its own database,
// so the pool is held to a single connection that never expires.
pub async fn setup_memory() -> Result<Db> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options).await?;

    migrate(&db).await?;
    return Ok(db);
}

async fn migrate(db: &Db) -> Result<()> {
    sqlx::migrate!("sql/migrations").run(db).await?;
    Ok(())
}
