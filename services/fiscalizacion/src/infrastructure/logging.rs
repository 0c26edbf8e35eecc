/// ログ基盤モジュール
///
/// Lambda/CloudWatch向けのJSON構造化ログと、ローカル開発向けの
/// 人間が読みやすい形式を切り替えて初期化する。
use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::app_config::LogLevel;

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// ログの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON形式（Lambda/CloudWatch向け）
    Json,
    /// コンパクトなテキスト形式（ローカル開発向け）
    Compact,
}

/// EnvFilterを構築する
///
/// `RUST_LOG`が設定されていればそれを優先し、なければ`LOG_LEVEL`由来のレベルを使う。
pub fn build_env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// ログサブスクライバーを初期化する
///
/// この関数は複数回呼び出しても安全で、最初の呼び出しのみ初期化を実行する。
///
/// # 使用例
/// ```ignore
/// use fiscalizacion::infrastructure::{init_logging, LogFormat, LogLevel};
///
/// init_logging(LogFormat::Json, LogLevel::Info);
/// tracing::info!("Lambda function started");
/// ```
pub fn init_logging(format: LogFormat, level: LogLevel) {
    INIT.call_once(|| {
        let env_filter = build_env_filter(level);

        match format {
            LogFormat::Json => {
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .flatten_event(true)
                    .with_current_span(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(json_layer)
                    .init();
            }
            LogFormat::Compact => {
                let fmt_layer = tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .compact();

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .init();
            }
        }
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
