use std::{path::Path, str::FromStr};

use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub mod model;

fn make_sqlite_connect_options(cfg: &DatabaseConfig) -> AppResult<SqliteConnectOptions> {
    let options = if cfg.is_in_memory() {
        SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(AppError::SpecificOperationError)?
    } else {
        SqliteConnectOptions::new()
            .filename(&cfg.path)
            .create_if_missing(true)
    };
    Ok(options.foreign_keys(true))
}

#[derive(Clone)]
pub struct ConnectionPool(SqlitePool);

impl ConnectionPool {
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &SqlitePool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Sqlite>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }

    // 埋め込みのマイグレーションを適用する
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.0).await?;
        Ok(())
    }
}

// reset_on_startup のときは既存のファイルを消してから開く。
// インメモリの場合は接続を 1 本に固定して使い回す
pub async fn connect_database_with(cfg: &DatabaseConfig) -> AppResult<ConnectionPool> {
    if cfg.reset_on_startup && !cfg.is_in_memory() && Path::new(&cfg.path).exists() {
        tracing::warn!(path = %cfg.path, "Removing existing database before startup");
        if let Err(e) = std::fs::remove_file(&cfg.path) {
            tracing::error!(error.message = %e, path = %cfg.path, "Failed to remove database file");
        }
    }

    let options = make_sqlite_connect_options(cfg)?;
    let pool_options = if cfg.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(cfg.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(AppError::SpecificOperationError)?;
    Ok(ConnectionPool(pool))
}
