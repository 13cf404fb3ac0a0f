use std::{env, str::FromStr};

use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            path: var_or("DATABASE_PATH", "parking.db"),
            reset_on_startup: parse_or("DATABASE_RESET_ON_STARTUP", false)?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
        };
        let auth = AuthConfig {
            ttl: parse_or("AUTH_TOKEN_TTL", 86400)?,
        };
        let admin = AdminConfig {
            email: var_or("ADMIN_EMAIL", "admin@parking.app"),
            password: var_or("ADMIN_PASSWORD", "admin"),
            name: var_or("ADMIN_NAME", "Administrator"),
        };
        let server = ServerConfig {
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 8080)?,
        };
        Ok(Self {
            database,
            auth,
            admin,
            server,
        })
    }
}

pub struct DatabaseConfig {
    // ":memory:" を指定するとインメモリの DB になる
    pub path: String,
    pub reset_on_startup: bool,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".into(),
            reset_on_startup: false,
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

pub struct AuthConfig {
    // セッションの有効期間（秒）
    pub ttl: u64,
}

pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        tracing::debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => v
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {v}")),
    }
}
