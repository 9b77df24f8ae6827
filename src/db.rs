use sqlx::{
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool, Postgres, Transaction,
};
use tracing::error;

use crate::config::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
#[error("database connection unavailable: {0}")]
pub struct ConnectionError(#[source] pub sqlx::Error);

/// Hands out request-scoped connections from a shared pool.
///
/// Connections go back to the pool when the guard is dropped, so every exit
/// path of a handler releases what it acquired.
#[derive(Clone)]
pub struct ConnectionProvider {
    pool: PgPool,
}

impl ConnectionProvider {
    /// Builds the pool without touching the network; connections open on first use.
    pub fn new(cfg: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .connect_lazy_with(connect_options(cfg));
        Self { pool }
    }

    #[cfg(test)]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, ConnectionError> {
        self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "failed to acquire database connection");
            ConnectionError(e)
        })
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, ConnectionError> {
        self.pool.begin().await.map_err(|e| {
            error!(error = %e, "failed to begin transaction");
            ConnectionError(e)
        })
    }
}

fn connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
        .ssl_mode(cfg.ssl_mode)
}
