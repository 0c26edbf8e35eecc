/// Oracle接続プロバイダー
///
/// リクエストごとに短命な接続を開き、処理が終わったら必ず解放する。
/// プーリングやリトライは行わない。ドライバーはブロッキングAPIのため、
/// 接続とクエリはすべて`spawn_blocking`のワーカースレッドで実行する。
use std::sync::Arc;

use oracle::Connection;
use thiserror::Error;
use tracing::{debug, error, info};

use super::oracle_client::{oracle_client_state, ClientInitState};
use super::oracle_config::ConnectionConfig;

/// 接続確認用のクエリ
pub const PING_SQL: &str = "SELECT 1 FROM dual";

/// Oracle Client未初期化時の接続エラーメッセージ
pub const CLIENT_NOT_INITIALIZED: &str = "Oracle Clientが初期化されていません";

/// 接続エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Oracleへの接続に失敗しました（{connect_string}）: {message}")]
pub struct ConnectionError {
    pub connect_string: String,
    pub message: String,
}

/// クエリ実行エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// SQLの実行またはフェッチに失敗
    #[error("クエリの実行に失敗しました: {0}")]
    Execution(String),

    /// 行の変換に失敗
    #[error("行の変換に失敗しました: {0}")]
    Mapping(String),

    /// ワーカースレッドがパニックまたはキャンセルされた
    #[error("ワーカースレッドが異常終了しました: {0}")]
    Worker(String),
}

impl From<oracle::Error> for QueryError {
    fn from(err: oracle::Error) -> Self {
        QueryError::Execution(err.to_string())
    }
}

/// 接続またはクエリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleAccessError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// リクエスト単位の接続を提供する
#[derive(Debug, Clone)]
pub struct OracleConnectionProvider {
    config: Arc<ConnectionConfig>,
}

impl OracleConnectionProvider {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }

    /// 新しい接続を開く（ブロッキング）
    ///
    /// Oracle Clientの初期化が完了している必要がある。未初期化の場合はドライバーを呼ばずにエラーを返す。
    pub fn open(config: &ConnectionConfig) -> Result<Connection, ConnectionError> {
        let connect_string = config.connect_string();

        if oracle_client_state() == ClientInitState::Uninitialized {
            error!(connect_string = %connect_string, "Oracle Clientが未初期化のため接続できません");
            return Err(ConnectionError {
                connect_string,
                message: CLIENT_NOT_INITIALIZED.to_string(),
            });
        }
        debug!(connect_string = %connect_string, "Oracle接続を開きます");

        Connection::connect(config.username(), config.password(), &connect_string).map_err(|e| {
            let message = describe_connect_error(&e.to_string());
            error!(connect_string = %connect_string, error = %message, "Oracle接続に失敗しました");
            ConnectionError {
                connect_string,
                message,
            }
        })
    }

    /// 新しい接続でクロージャを実行する
    ///
    /// 接続はクロージャの終了時（成功・エラー・パニックのいずれでも）に
    /// ドロップされて閉じられる。
    ///
    /// # Returns
    /// * `Ok(T)` - クロージャの結果
    /// * `Err(OracleAccessError::Connection)` - 接続できなかった（クロージャは実行されない）
    /// * `Err(OracleAccessError::Query)` - クエリ失敗、またはワーカーの異常終了
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T, OracleAccessError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, QueryError> + Send + 'static,
    {
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || {
            let conn = Self::open(&config)?;
            let result = f(&conn);
            drop(conn);
            debug!("Oracle接続を解放しました");
            result.map_err(OracleAccessError::from)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Oracleワーカースレッドが異常終了しました");
            OracleAccessError::Query(QueryError::Worker(e.to_string()))
        })?
    }

    /// 接続確認（`SELECT 1 FROM dual`）
    pub async fn ping(&self) -> Result<(), OracleAccessError> {
        let value = self
            .with_connection(|conn| Ok(conn.query_row_as::<i64>(PING_SQL, &[])?))
            .await?;
        info!(connect_string = %self.config.connect_string(), result = value, "Oracle接続確認に成功しました");
        Ok(())
    }
}

/// ドライバーの接続エラーに原因のヒントを付ける
///
/// 資格情報は含めない。
pub fn describe_connect_error(message: &str) -> String {
    let hint = if message.contains("DPI-1047") || message.contains("Cannot locate") {
        Some("Oracle Instant Clientを読み込めません")
    } else if message.contains("ORA-12170")
        || message.contains("ORA-12541")
        || message.contains("timeout")
    {
        Some("データベースに到達できません")
    } else if message.contains("ORA-01017") {
        Some("ユーザー名またはパスワードが不正です")
    } else if message.contains("ORA-12514") || message.contains("ORA-12505") {
        Some("サービス名またはSIDが見つかりません")
    } else {
        None
    };

    match hint {
        Some(hint) => format!("{hint}: {message}"),
        None => message.to_string(),
    }
}
