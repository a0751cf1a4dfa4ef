/// Portfolio backend entry point
///
/// Loads `.env`, reads configuration once, and starts the HTTP server:
/// - Public project listing at GET /api/projects
/// - Admin CRUD at /api/admin/projects/*
/// - Liveness at GET /

use portfolio_backend::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    start_server(config).await?;

    Ok(())
}
