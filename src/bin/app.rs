use std::net::SocketAddr;

use adapter::database::connect_database_with;
use anyhow::{Context, Result};
use api::route::routes;
use axum::Router;
use kernel::model::{role::Role, user::event::CreateUser};
use registry::AppRegistry;
use shared::config::{AdminConfig, AppConfig};
use shared::env::{which, Environment};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database).await?;
    pool.migrate().await?;

    let registry = AppRegistry::new(pool, &app_config);

    // 管理者の初期登録に失敗してもサーバーは起動させる
    if let Err(e) = ensure_admin(&registry, &app_config.admin).await {
        tracing::error!(
            error.cause_chain = ?e, error.message = %e, "Failed to create the bootstrap admin"
        );
    }

    let app = Router::new()
        .merge(routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr: SocketAddr = format!("{}:{}", app_config.server.host, app_config.server.port)
        .parse()
        .context("Invalid HOST/PORT")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}

async fn ensure_admin(registry: &AppRegistry, admin: &AdminConfig) -> Result<()> {
    let users = registry.user_repository();
    if users.exists_with_role(Role::Admin).await? {
        return Ok(());
    }

    let created = users
        .create(CreateUser {
            email: admin.email.clone(),
            password: admin.password.clone(),
            full_name: admin.name.clone(),
            address: "-".into(),
            pin_code: "-".into(),
            role: Role::Admin,
        })
        .await?;
    tracing::info!(user_id = %created.user_id, email = %created.email, "bootstrap admin created");
    Ok(())
}
