/// ペルソナ検索API Lambdaエントリポイント
///
/// API Gateway（REST API）経由のHTTPリクエストをaxumルーターで処理する。
/// 設定の解決とOracle Clientの初期化はコールドスタート時に一度だけ行い、
/// 失敗した場合は初期化エラーとしてLambdaを終了する。
///
/// # 環境変数
/// - `DB_*` / `ORACLE_*`: Oracle接続設定（いずれかの命名規則で完全に設定）
/// - `ORACLE_HOME` / `ORACLE_CLIENT_LIB_DIR`: Oracle Instant Clientのディレクトリ
/// - `CORS_ORIGIN`: CORS許可オリジン（デフォルト: `*`）
/// - `LOG_LEVEL` / `RUST_LOG`: ログレベル
/// - `AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH`: `true`でステージ名をパスから除く
use fiscalizacion::application::{build_router, load_app_config, prepare_oracle};
use fiscalizacion::infrastructure::{EnvSource, LogFormat, ProcessEnv};
use lambda_http::{run, Error};
use tracing::{info, warn};

/// lambda_httpがパスからステージ名を除くかを制御する環境変数
const ENV_IGNORE_STAGE_IN_PATH: &str = "AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Lambdaでは常にJSON形式（CloudWatch Logs向け）
    let app_config = load_app_config(|_| LogFormat::Json)?;

    info!("Fiscalización Lambda関数を初期化");

    if !ignores_stage_in_path(&ProcessEnv) {
        warn!(
            env = ENV_IGNORE_STAGE_IN_PATH,
            "ステージ名がパスに含まれるため、/personasにルーティングされない可能性があります"
        );
    }

    let connection_config = prepare_oracle()?;
    let app = build_router(&app_config, connection_config);

    info!("Lambda関数の初期化が完了しました");

    run(app).await
}

/// ステージ名をパスから除く設定になっているか
fn ignores_stage_in_path(env: &impl EnvSource) -> bool {
    env.get_non_empty(ENV_IGNORE_STAGE_IN_PATH)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
