/// Oracle Client（Thickモード）の初期化
///
/// Oracle 11gとの互換性のため、ローカルにインストールされた
/// Oracle Instant Clientをプロセスにつき一度だけ初期化する。
/// 接続を開く前に必ず完了している必要がある（起動時の不変条件）。
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{error, info, warn};

/// 初期化状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientInitState {
    /// まだ初期化を試みていない
    Uninitialized,
    /// この呼び出しで初期化した
    Initialized,
    /// 既に初期化済みだった（成功として扱う）
    AlreadyInitialized,
}

/// Oracle Client初期化エラー（起動時に致命的）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Oracle Clientの初期化に失敗しました（{lib_dir}）: {message}")]
pub struct ClientInitError {
    pub lib_dir: String,
    pub message: String,
}

/// ネイティブクライアントライブラリの初期化処理
pub trait ClientLibrary: Send + Sync {
    /// ライブラリを初期化する
    ///
    /// # Returns
    /// * `Ok(true)` - この呼び出しで初期化した
    /// * `Ok(false)` - 既に初期化済み
    /// * `Err(String)` - ドライバーのエラーメッセージ
    fn initialize(&self, lib_dir: &str) -> Result<bool, String>;
}

/// rust-oracle（ODPI-C）による初期化
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleClientLibrary;

impl ClientLibrary for OracleClientLibrary {
    fn initialize(&self, lib_dir: &str) -> Result<bool, String> {
        let mut params = oracle::InitParams::new();
        params
            .oracle_client_lib_dir(lib_dir)
            .map_err(|e| e.to_string())?;
        params.init().map_err(|e| e.to_string())
    }
}

/// 一度だけ初期化を実行するガード
///
/// 並行な初回呼び出しでもライブラリの初期化は一度しか走らず、
/// 以降の呼び出しは最初の結果を返す。
pub struct NativeClientInitializer<L: ClientLibrary> {
    library: L,
    outcome: OnceLock<Result<ClientInitState, ClientInitError>>,
}

impl<L: ClientLibrary> NativeClientInitializer<L> {
    pub const fn new(library: L) -> Self {
        Self {
            library,
            outcome: OnceLock::new(),
        }
    }

    /// クライアントを初期化する（冪等）
    pub fn initialize(&self, lib_dir: &str) -> Result<ClientInitState, ClientInitError> {
        self.outcome
            .get_or_init(|| self.run(lib_dir))
            .clone()
    }

    /// 現在の状態
    pub fn state(&self) -> ClientInitState {
        match self.outcome.get() {
            Some(Ok(state)) => *state,
            _ => ClientInitState::Uninitialized,
        }
    }

    fn run(&self, lib_dir: &str) -> Result<ClientInitState, ClientInitError> {
        match self.library.initialize(lib_dir) {
            Ok(true) => {
                info!(lib_dir = %lib_dir, "Oracle ClientをThickモードで初期化しました");
                Ok(ClientInitState::Initialized)
            }
            Ok(false) => {
                warn!(lib_dir = %lib_dir, "Oracle Clientは既に初期化済みです");
                Ok(ClientInitState::AlreadyInitialized)
            }
            Err(message) if is_already_initialized(&message) => {
                warn!(lib_dir = %lib_dir, error = %message, "Oracle Clientは既に初期化済みです");
                Ok(ClientInitState::AlreadyInitialized)
            }
            Err(message) => {
                error!(lib_dir = %lib_dir, error = %message, "Oracle Clientの初期化に失敗しました");
                Err(ClientInitError {
                    lib_dir: lib_dir.to_string(),
                    message,
                })
            }
        }
    }
}

/// 「初期化済み」を示すドライバーのエラーか判定する
pub fn is_already_initialized(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already initialized")
}

/// プロセス全体で共有するOracle Client初期化ガード
static ORACLE_CLIENT: NativeClientInitializer<OracleClientLibrary> =
    NativeClientInitializer::new(OracleClientLibrary);

/// プロセスのOracle Clientを初期化する
///
/// 起動時に接続を開く前に一度呼び出す。2回目以降は最初の結果を返す。
pub fn init_oracle_client(lib_dir: &str) -> Result<ClientInitState, ClientInitError> {
    ORACLE_CLIENT.initialize(lib_dir)
}

/// プロセスのOracle Client初期化状態
pub fn oracle_client_state() -> ClientInitState {
    ORACLE_CLIENT.state()
}
