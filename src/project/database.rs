/// Database bootstrap for the projects store
///
/// Opens the SQLite pool described by [`DatabaseConfig`] and makes sure the
/// `projects` table exists. Safe to run on every start (IF NOT EXISTS).

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open a connection pool and initialize the schema
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid DATABASE_URL '{}'", config.url))?
        .create_if_missing(true);

    // Ensure the directory of a file-backed database exists
    if let Some(dir) = options.get_filename().parent().filter(|d| !d.as_os_str().is_empty()) {
        if !Path::new(dir).exists() {
            tracing::info!("📁 Creating database directory: {}", dir.display());
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory '{}'", dir.display()))?;
        }
    }

    tracing::info!("🗄️ Opening database pool: {}", config.url);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database pool")?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create the `projects` table and its listing index
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Single-connection in-memory pool with the schema applied
///
/// Every connection to `sqlite::memory:` is its own database, so the pool is
/// capped at one connection that is never recycled.
pub async fn in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}
