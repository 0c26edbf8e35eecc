/// 起動処理
///
/// Lambdaとローカルサーバーで共通の初期化手順をまとめる。
/// 1. アプリケーション設定を読み込み、ログを初期化
/// 2. Oracle接続設定を解決
/// 3. Oracle Clientを初期化（接続を開く前に必須）
/// 4. リポジトリ・サービス・ルーターを組み立てる
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::{error, info};

use crate::infrastructure::{
    init_logging, init_oracle_client, AppConfig, AppConfigError, ClientInitError, ClientInitState,
    ConfigError, ConnectionConfig, EnvSource, LogFormat, LogLevel, OracleAccessError,
    OracleConnectionProvider, OraclePersonaRepository, ProcessEnv,
};

use super::persona_service::PersonaService;
use super::router::create_router;

/// 環境変数名: 起動時にOracleへの接続確認を行うか（ローカルサーバーのみ）
pub const ENV_ORACLE_STARTUP_CHECK: &str = "ORACLE_STARTUP_CHECK";

/// 起動時のエラー（いずれも致命的）
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    AppConfig(#[from] AppConfigError),

    #[error(transparent)]
    Database(#[from] ConfigError),

    #[error(transparent)]
    ClientInit(#[from] ClientInitError),

    #[error("Oracle接続確認に失敗しました: {0}")]
    StartupCheck(#[from] OracleAccessError),

    #[error("サーバーの起動に失敗しました: {0}")]
    Io(#[from] std::io::Error),
}

/// アプリケーション設定を読み込み、ログを初期化する
///
/// 設定が不正な場合もエラーを出力できるよう、既定のレベルでログを初期化してから返す。
pub fn load_app_config(format_for: impl Fn(&AppConfig) -> LogFormat) -> Result<AppConfig, StartupError> {
    match AppConfig::from_env() {
        Ok(config) => {
            init_logging(format_for(&config), config.log_level);
            Ok(config)
        }
        Err(e) => {
            init_logging(LogFormat::Json, LogLevel::default());
            error!(error = %e, "アプリケーション設定の読み込みに失敗しました");
            Err(e.into())
        }
    }
}

/// Oracle接続設定を解決し、Oracle Clientを初期化する
pub fn prepare_oracle() -> Result<Arc<ConnectionConfig>, StartupError> {
    let config = ConnectionConfig::from_env().map_err(|e| {
        error!(error = %e, "Oracle接続設定が不完全です");
        e
    })?;
    info!(
        connect_string = %config.connect_string(),
        client_lib_dir = %config.client_lib_dir(),
        "Oracle接続設定を解決しました"
    );

    let state = init_oracle_client(config.client_lib_dir())?;
    if state == ClientInitState::AlreadyInitialized {
        info!("Oracle Clientは初期化済みのため再利用します");
    }

    Ok(Arc::new(config))
}

/// Oracleを使うルーターを組み立てる
pub fn build_router(app_config: &AppConfig, connection_config: Arc<ConnectionConfig>) -> Router {
    let provider = OracleConnectionProvider::new(connection_config);
    let repository = OraclePersonaRepository::new(provider);
    let service = PersonaService::new(Arc::new(repository));
    create_router(service, app_config)
}

/// 起動時の接続確認が有効か
pub fn startup_check_enabled(env: &impl EnvSource) -> bool {
    env.get_non_empty(ENV_ORACLE_STARTUP_CHECK)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// `ORACLE_STARTUP_CHECK=true`の場合に`SELECT 1 FROM dual`で接続を確認する
pub async fn run_startup_check(connection_config: Arc<ConnectionConfig>) -> Result<(), StartupError> {
    if !startup_check_enabled(&ProcessEnv) {
        return Ok(());
    }

    OracleConnectionProvider::new(connection_config)
        .ping()
        .await
        .map_err(|e| {
            error!(error = %e, "起動時のOracle接続確認に失敗しました");
            StartupError::from(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_startup_check_enabled() {
        let on: HashMap<&str, &str> = HashMap::from([("ORACLE_STARTUP_CHECK", "true")]);
        let upper: HashMap<&str, &str> = HashMap::from([("ORACLE_STARTUP_CHECK", "TRUE")]);
        let off: HashMap<&str, &str> = HashMap::from([("ORACLE_STARTUP_CHECK", "false")]);
        let unset: HashMap<&str, &str> = HashMap::new();

        assert!(startup_check_enabled(&on));
        assert!(startup_check_enabled(&upper));
        assert!(!startup_check_enabled(&off));
        assert!(!startup_check_enabled(&unset));
    }

    #[test]
    fn test_startup_error_messages() {
        let err = StartupError::from(ConfigError::MissingClientLibDir);
        assert_eq!(err.to_string(), ConfigError::MissingClientLibDir.to_string());

        let err = StartupError::from(ClientInitError {
            lib_dir: "/opt/oracle".to_string(),
            message: "DPI-1047".to_string(),
        });
        assert!(err.to_string().contains("/opt/oracle"));
    }

    #[tokio::test]
    async fn test_build_router_serves_health_without_database() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let connection_config = Arc::new(ConnectionConfig::new(
            "127.0.0.1",
            1,
            "u",
            "p",
            "XE",
            "/opt/oracle",
        ));
        let app = build_router(&AppConfig::default(), connection_config);

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
