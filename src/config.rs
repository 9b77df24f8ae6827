use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgSslMode;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Connection settings for the `user` database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 5000)?,
        };
        let database = DatabaseConfig {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            port: parse_or("DB_PORT", 5432)?,
            username: std::env::var("DB_USER").context("DB_USER must be set")?,
            password: std::env::var("DB_PASSWORD").context("DB_PASSWORD must be set")?,
            database: std::env::var("DB_NAME").context("DB_NAME must be set")?,
            ssl_mode: parse_or("DB_SSL_MODE", PgSslMode::Prefer)?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
        };
        Ok(Self { server, database })
    }
}

/// Reads `key` and parses it, falling back to `default` when the variable is unset.
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        let port: u16 = parse_or("ACCOUNTS_TEST_UNSET_PORT", 5000).expect("default");
        assert_eq!(port, 5000);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        std::env::set_var("ACCOUNTS_TEST_BAD_PORT", "not-a-port");
        let err = parse_or::<u16>("ACCOUNTS_TEST_BAD_PORT", 5000).unwrap_err();
        assert!(err.to_string().contains("ACCOUNTS_TEST_BAD_PORT"));
    }

    #[test]
    fn parse_or_reads_ssl_mode() {
        std::env::set_var("ACCOUNTS_TEST_SSL_MODE", "disable");
        let mode = parse_or("ACCOUNTS_TEST_SSL_MODE", PgSslMode::Prefer).expect("ssl mode");
        assert!(matches!(mode, PgSslMode::Disable));
    }

    #[test]
    fn server_addr_parses() {
        let server = ServerConfig {
            host: "127.0.0.1".into(),
            port: 5000,
        };
        assert_eq!(server.addr().expect("addr").port(), 5000);
    }
}
