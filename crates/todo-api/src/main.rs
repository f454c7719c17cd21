//! todo-api バイナリのエントリポイント

use anyhow::Context;
use shared::Config;
use todo_api::{app, AppState, CorsPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_tracing()?;

    // 必須の接続情報が欠けていればここで起動失敗
    let config = Config::from_env().context("failed to load configuration")?;
    let repo = infrastructure::repository_from_config(&config.storage)
        .context("failed to initialize todo repository")?;
    let state = AppState::new(repo, CorsPolicy::new(config.allowed_origins.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        addr = %config.bind_addr,
        backend = config.storage.name(),
        origins = ?config.allowed_origins,
        "server starting"
    );

    axum::serve(listener, app(state))
        .await
        .context("server error")
}
