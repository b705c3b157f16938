use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Create the `users` and `sports_events` tables when they are missing.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(db).await.context("apply schema")?;
    tracing::info!("database schema ready");
    Ok(())
}

/// True when `err` wraps a Postgres unique constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}
