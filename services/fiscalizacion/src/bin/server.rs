//! ローカル開発用のペルソナ検索HTTPサーバー
//!
//! Lambdaと同じルーターを`axum::serve`で直接提供する。
//! - ペルソナ検索 (GET /personas)
//! - ヘルスチェック (GET /api/health)

use std::net::SocketAddr;

use fiscalizacion::application::{
    build_router, load_app_config, prepare_oracle, run_startup_check, StartupError,
};
use fiscalizacion::infrastructure::{AppConfig, LogFormat, RuntimeEnvironment};
use tokio::signal;

/// 実行環境に応じたログ形式（開発時は人間が読みやすい形式）
fn log_format_for(config: &AppConfig) -> LogFormat {
    match config.environment {
        RuntimeEnvironment::Development => LogFormat::Compact,
        RuntimeEnvironment::Production | RuntimeEnvironment::Test => LogFormat::Json,
    }
}

/// シャットダウンシグナルを待機する
///
/// SIGTERMまたはCtrl+C (SIGINT) を待機し、いずれかを受信したらリターンする。
///
/// # Panics
/// シグナルハンドラーの登録に失敗した場合はパニックする。
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Ctrl+C シグナルハンドラーの登録に失敗しました");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM シグナルハンドラーの登録に失敗しました")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C (SIGINT) を受信しました。graceful shutdownを開始します");
        }
        _ = terminate => {
            tracing::info!("SIGTERM を受信しました。graceful shutdownを開始します");
        }
    }
}

/// メイン関数
///
/// # 環境変数
/// - `PORT`: リッスンポート（デフォルト: 3000）
/// - `NODE_ENV`: `development`ではコンパクトなログ、それ以外はJSON
/// - `ORACLE_STARTUP_CHECK`: `true`で起動時に`SELECT 1 FROM dual`を実行
/// - その他はLambdaと同じ（Oracle接続設定、`CORS_ORIGIN`、`LOG_LEVEL`）
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let app_config = load_app_config(log_format_for)?;

    tracing::info!(
        environment = ?app_config.environment,
        "ペルソナ検索サーバーを起動します"
    );

    let connection_config = prepare_oracle()?;
    run_startup_check(connection_config.clone()).await?;

    let app = build_router(&app_config, connection_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("リッスン開始: http://localhost:{}", app_config.port);
    tracing::info!("ヘルスチェック: http://localhost:{}/api/health", app_config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("サーバーが正常に停止しました");
    Ok(())
}
