// アプリケーション設定
//
// HTTP層とログ出力に関わる設定（PORT, CORS_ORIGIN, NODE_ENV, LOG_LEVEL）を読み込む。
// DB接続設定はoracle_configで別に解決する。

use std::str::FromStr;

use thiserror::Error;

use super::env_source::{EnvSource, ProcessEnv};

/// 環境変数名: ローカルサーバーのリッスンポート
pub const ENV_PORT: &str = "PORT";

/// 環境変数名: CORS許可オリジン
pub const ENV_CORS_ORIGIN: &str = "CORS_ORIGIN";

/// 環境変数名: 実行環境
pub const ENV_NODE_ENV: &str = "NODE_ENV";

/// 環境変数名: ログレベル
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// デフォルトのリッスンポート
pub const DEFAULT_PORT: u16 = 3000;

/// デフォルトのCORS許可オリジン（全オリジン）
pub const DEFAULT_CORS_ORIGIN: &str = "*";

/// アプリケーション設定エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppConfigError {
    #[error("環境変数 {key} の値が不正です: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// 実行環境
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for RuntimeEnvironment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

/// ログレベル
///
/// `RUST_LOG`が未設定の場合のEnvFilterとして使う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// EnvFilterディレクティブ
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// ローカルサーバーのリッスンポート
    pub port: u16,
    /// CORS許可オリジン（`*`またはカンマ区切りのオリジン一覧）
    pub cors_origin: String,
    /// 実行環境
    pub environment: RuntimeEnvironment,
    /// ログレベル
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            environment: RuntimeEnvironment::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// プロセス環境変数から読み込む
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// 任意の設定ソースから読み込む
    ///
    /// 未設定の項目はデフォルト値。設定されているが解釈できない値はエラー。
    pub fn from_source(env: &impl EnvSource) -> Result<Self, AppConfigError> {
        let port = parse_or_default(env, ENV_PORT, DEFAULT_PORT, |v| {
            v.parse::<u16>().ok().filter(|p| *p > 0)
        })?;
        let environment = parse_or_default(env, ENV_NODE_ENV, RuntimeEnvironment::default(), |v| {
            v.parse().ok()
        })?;
        let log_level = parse_or_default(env, ENV_LOG_LEVEL, LogLevel::default(), |v| {
            v.parse().ok()
        })?;
        let cors_origin = env
            .get_non_empty(ENV_CORS_ORIGIN)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        Ok(Self {
            port,
            cors_origin,
            environment,
            log_level,
        })
    }

    /// 全オリジンを許可するか
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origin.trim() == "*"
    }

    /// 許可オリジンの一覧（`*`の場合は空）
    pub fn cors_origins(&self) -> Vec<String> {
        if self.allows_any_origin() {
            return Vec::new();
        }
        self.cors_origin
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_or_default<T>(
    env: &impl EnvSource,
    key: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, AppConfigError> {
    match env.get_non_empty(key) {
        None => Ok(default),
        Some(value) => parse(&value).ok_or(AppConfigError::InvalidValue { key, value }),
    }
}
