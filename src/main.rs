mod app;
mod auth;
mod config;
mod db;
mod error;
mod state;

use crate::{config::AppConfig, db::ConnectionProvider, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "accounts=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let db = ConnectionProvider::new(&config.database);

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(db.pool()).await {
        tracing::warn!(error = %e, "migrations failed; continuing");
    }

    let app = app::build_app(AppState::new(db));
    app::serve(app, config.server.addr()?).await
}
