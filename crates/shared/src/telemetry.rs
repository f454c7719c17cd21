use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// RUST_LOG 未設定時のフィルタ
const DEFAULT_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// サーバ用のトレーシングサブスクライバーを初期化
/// 構造化ログ（JSON）を標準出力へ出す
pub fn init_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).json())
        .with(env_filter(DEFAULT_FILTER))
        .try_init()
}

/// CLI 用の初期化
/// 標準出力は描画結果に使うため、ログは人間向け形式で標準エラーへ
pub fn init_cli_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(env_filter("warn"))
        .try_init()
}
