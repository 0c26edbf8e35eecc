// Oracle接続設定の解決
//
// 2つの命名規則（DB_* と ORACLE_*）のいずれかで与えられた接続情報を
// 解決順序テーブルに従って1つのConnectionConfigにまとめる。

use std::fmt;

use thiserror::Error;

use super::env_source::{EnvSource, ProcessEnv};

/// Oracleリスナーのデフォルトポート
pub const DEFAULT_ORACLE_PORT: u16 = 1521;

/// 解決対象のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Host,
    Port,
    Username,
    Password,
    ServiceName,
    ClientLibDir,
}

/// フィールドごとの候補キー（先頭から順に、最初の空でない値を採用）
#[derive(Debug, Clone, Copy)]
pub struct FieldSource {
    pub field: ConfigField,
    pub keys: &'static [&'static str],
}

/// 解決順序テーブル
///
/// 認証情報は`ORACLE_*`を`DB_*`より優先する。
/// クライアントライブラリのパスは`ORACLE_HOME`を`ORACLE_CLIENT_LIB_DIR`より優先する。
pub static RESOLUTION_ORDER: [FieldSource; 6] = [
    FieldSource {
        field: ConfigField::Host,
        keys: &["ORACLE_HOST", "DB_HOST"],
    },
    FieldSource {
        field: ConfigField::Port,
        keys: &["ORACLE_PORT", "DB_PORT"],
    },
    FieldSource {
        field: ConfigField::Username,
        keys: &["ORACLE_USERNAME", "DB_USERNAME"],
    },
    FieldSource {
        field: ConfigField::Password,
        keys: &["ORACLE_PASSWORD", "DB_PASSWORD"],
    },
    FieldSource {
        field: ConfigField::ServiceName,
        keys: &["ORACLE_SID", "DB_NAME"],
    },
    FieldSource {
        field: ConfigField::ClientLibDir,
        keys: &["ORACLE_HOME", "ORACLE_CLIENT_LIB_DIR"],
    },
];

/// 認証情報の命名規則
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// 表示名
    pub name: &'static str,
    /// 完全とみなすために必要なキー（host, username, password, service id）
    pub required: [&'static str; 4],
}

/// 受け付ける命名規則（どちらか一方が完全であればよい）
pub static NAMING_CONVENTIONS: [NamingConvention; 2] = [
    NamingConvention {
        name: "DB_*",
        required: ["DB_HOST", "DB_USERNAME", "DB_PASSWORD", "DB_NAME"],
    },
    NamingConvention {
        name: "ORACLE_*",
        required: ["ORACLE_HOST", "ORACLE_USERNAME", "ORACLE_PASSWORD", "ORACLE_SID"],
    },
];

/// 命名規則ごとの不足キー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionGap {
    pub convention: &'static str,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ConventionGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 不足: {}", self.convention, self.missing.join(", "))
    }
}

/// 設定解決エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// どちらの命名規則でも認証情報が揃っていない
    #[error(
        "Oracle接続設定が不完全です（DB_* または ORACLE_* のいずれかを完全に設定してください）: {}",
        .gaps.iter().map(ToString::to_string).collect::<Vec<_>>().join(" / ")
    )]
    IncompleteCredentials { gaps: Vec<ConventionGap> },

    /// Oracle Clientライブラリのパスが設定されていない
    #[error("Oracle Clientのパスが設定されていません（ORACLE_HOME または ORACLE_CLIENT_LIB_DIR を設定してください）")]
    MissingClientLibDir,

    /// ポート番号が不正
    #[error("ポート番号が不正です: {key}={value}")]
    InvalidPort { key: &'static str, value: String },
}

/// Oracle接続設定
///
/// プロセス起動時に一度だけ解決し、以降は不変。
/// `Debug`出力ではパスワードを伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    service_name: String,
    client_lib_dir: String,
}

impl ConnectionConfig {
    /// 明示的な値で設定を作成（テスト用）
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        service_name: impl Into<String>,
        client_lib_dir: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            service_name: service_name.into(),
            client_lib_dir: client_lib_dir.into(),
        }
    }

    /// プロセス環境変数から設定を解決する
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// 任意の設定ソースから解決する
    ///
    /// 1. いずれかの命名規則で認証情報が揃っていることを確認
    /// 2. `RESOLUTION_ORDER`に従ってフィールドごとに値を採用
    /// 3. クライアントライブラリのパスとポートを検証
    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let gaps: Vec<ConventionGap> = NAMING_CONVENTIONS
            .iter()
            .map(|convention| ConventionGap {
                convention: convention.name,
                missing: convention
                    .required
                    .iter()
                    .copied()
                    .filter(|key| env.get_non_empty(key).is_none())
                    .collect(),
            })
            .collect();

        if gaps.iter().all(|gap| !gap.missing.is_empty()) {
            return Err(ConfigError::IncompleteCredentials { gaps });
        }

        let resolve = |field: ConfigField| -> Option<(&'static str, String)> {
            RESOLUTION_ORDER
                .iter()
                .find(|source| source.field == field)
                .and_then(|source| env.first_non_empty(source.keys))
        };

        let client_lib_dir = resolve(ConfigField::ClientLibDir)
            .map(|(_, value)| value)
            .ok_or(ConfigError::MissingClientLibDir)?;

        let port = match resolve(ConfigField::Port) {
            None => DEFAULT_ORACLE_PORT,
            Some((key, value)) => match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort { key, value }),
            },
        };

        // 上の完全性チェックにより以下の4項目は必ず解決できる
        let required = |field: ConfigField| resolve(field).map(|(_, value)| value).unwrap_or_default();

        Ok(Self {
            host: required(ConfigField::Host),
            port,
            username: required(ConfigField::Username),
            password: required(ConfigField::Password),
            service_name: required(ConfigField::ServiceName),
            client_lib_dir,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// SIDまたはサービス名
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Oracle Instant Clientのディレクトリ
    pub fn client_lib_dir(&self) -> &str {
        &self.client_lib_dir
    }

    /// Easy Connect形式の接続文字列（`host:port/service`）
    pub fn connect_string(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.service_name)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("service_name", &self.service_name)
            .field("client_lib_dir", &self.client_lib_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn db_style() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DB_HOST", "db.internal"),
            ("DB_USERNAME", "fisc"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "ORCL"),
            ("ORACLE_HOME", "/opt/oracle/instantclient"),
        ])
    }

    fn oracle_style() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("ORACLE_HOST", "ora.internal"),
            ("ORACLE_PORT", "1522"),
            ("ORACLE_USERNAME", "pweb"),
            ("ORACLE_PASSWORD", "pw"),
            ("ORACLE_SID", "PWEB"),
            ("ORACLE_CLIENT_LIB_DIR", "/usr/lib/oracle/client"),
        ])
    }

    // ==================== 解決順序テーブル ====================

    #[test]
    fn test_resolution_order_prefers_oracle_prefix_for_credentials() {
        for source in RESOLUTION_ORDER.iter().filter(|s| s.field != ConfigField::ClientLibDir) {
            assert!(source.keys[0].starts_with("ORACLE_"), "{:?}", source.field);
            assert!(source.keys[1].starts_with("DB_"), "{:?}", source.field);
        }
    }

    #[test]
    fn test_resolution_order_prefers_oracle_home_for_client() {
        let source = RESOLUTION_ORDER
            .iter()
            .find(|s| s.field == ConfigField::ClientLibDir)
            .unwrap();
        assert_eq!(source.keys, &["ORACLE_HOME", "ORACLE_CLIENT_LIB_DIR"]);
    }

    // ==================== from_source 正常系 ====================

    #[test]
    fn test_db_style_resolves_with_default_port() {
        let config = ConnectionConfig::from_source(&db_style()).unwrap();

        assert_eq!(config.host(), "db.internal");
        assert_eq!(config.port(), DEFAULT_ORACLE_PORT);
        assert_eq!(config.username(), "fisc");
        assert_eq!(config.password(), "secret");
        assert_eq!(config.service_name(), "ORCL");
        assert_eq!(config.client_lib_dir(), "/opt/oracle/instantclient");
        assert_eq!(config.connect_string(), "db.internal:1521/ORCL");
    }

    #[test]
    fn test_oracle_style_resolves() {
        let config = ConnectionConfig::from_source(&oracle_style()).unwrap();

        assert_eq!(config.host(), "ora.internal");
        assert_eq!(config.port(), 1522);
        assert_eq!(config.username(), "pweb");
        assert_eq!(config.service_name(), "PWEB");
        assert_eq!(config.client_lib_dir(), "/usr/lib/oracle/client");
    }

    #[test]
    fn test_oracle_prefix_wins_when_both_present() {
        let mut env = db_style();
        env.extend(oracle_style());

        let config = ConnectionConfig::from_source(&env).unwrap();

        assert_eq!(config.host(), "ora.internal");
        assert_eq!(config.username(), "pweb");
        assert_eq!(config.password(), "pw");
        assert_eq!(config.service_name(), "PWEB");
        // クライアントパスはORACLE_HOMEが優先
        assert_eq!(config.client_lib_dir(), "/opt/oracle/instantclient");
    }

    #[test]
    fn test_partial_oracle_overrides_complete_db_style() {
        let mut env = db_style();
        env.insert("ORACLE_HOST", "override.internal");

        let config = ConnectionConfig::from_source(&env).unwrap();

        assert_eq!(config.host(), "override.internal");
        assert_eq!(config.username(), "fisc");
    }

    #[test]
    fn test_db_port_used_when_oracle_port_missing() {
        let mut env = db_style();
        env.insert("DB_PORT", "1600");

        let config = ConnectionConfig::from_source(&env).unwrap();
        assert_eq!(config.port(), 1600);
    }

    #[test]
    fn test_blank_values_fall_back_to_next_key() {
        let mut env = db_style();
        env.insert("ORACLE_HOST", "   ");

        let config = ConnectionConfig::from_source(&env).unwrap();
        assert_eq!(config.host(), "db.internal");
    }

    // ==================== from_source 異常系 ====================

    #[test]
    fn test_incomplete_both_conventions() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DB_HOST", "db.internal"),
            ("DB_USERNAME", "fisc"),
            ("ORACLE_HOST", "ora.internal"),
            ("ORACLE_HOME", "/opt/oracle"),
        ]);

        let err = ConnectionConfig::from_source(&env).unwrap_err();

        match &err {
            ConfigError::IncompleteCredentials { gaps } => {
                assert_eq!(gaps[0].convention, "DB_*");
                assert_eq!(gaps[0].missing, vec!["DB_PASSWORD", "DB_NAME"]);
                assert_eq!(gaps[1].convention, "ORACLE_*");
                assert_eq!(
                    gaps[1].missing,
                    vec!["ORACLE_USERNAME", "ORACLE_PASSWORD", "ORACLE_SID"]
                );
            }
            other => panic!("予期しないエラー: {:?}", other),
        }

        let message = err.to_string();
        assert!(message.contains("DB_* 不足: DB_PASSWORD, DB_NAME"));
        assert!(message.contains("ORACLE_* 不足: ORACLE_USERNAME"));
    }

    #[test]
    fn test_empty_environment_is_incomplete() {
        let env: HashMap<&str, &str> = HashMap::new();
        let err = ConnectionConfig::from_source(&env).unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteCredentials { .. }));
    }

    #[test]
    fn test_missing_client_lib_dir() {
        let mut env = db_style();
        env.remove("ORACLE_HOME");

        let err = ConnectionConfig::from_source(&env).unwrap_err();
        assert_eq!(err, ConfigError::MissingClientLibDir);
        assert!(err.to_string().contains("ORACLE_CLIENT_LIB_DIR"));
    }

    #[test]
    fn test_invalid_port() {
        let mut env = db_style();
        env.insert("ORACLE_PORT", "abc");

        let err = ConnectionConfig::from_source(&env).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                key: "ORACLE_PORT",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_zero_port_is_invalid() {
        let mut env = db_style();
        env.insert("DB_PORT", "0");

        assert!(matches!(
            ConnectionConfig::from_source(&env),
            Err(ConfigError::InvalidPort { key: "DB_PORT", .. })
        ));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ConnectionConfig::from_source(&db_style()).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
        assert!(debug.contains("db.internal"));
    }

    // ==================== from_env ====================

    const ALL_KEYS: [&str; 12] = [
        "DB_HOST",
        "DB_PORT",
        "DB_USERNAME",
        "DB_PASSWORD",
        "DB_NAME",
        "ORACLE_HOST",
        "ORACLE_PORT",
        "ORACLE_USERNAME",
        "ORACLE_PASSWORD",
        "ORACLE_SID",
        "ORACLE_HOME",
        "ORACLE_CLIENT_LIB_DIR",
    ];

    unsafe fn cleanup_env() {
        for key in ALL_KEYS {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial(fiscalizacion_env)]
    fn test_from_env_success() {
        unsafe {
            cleanup_env();
            std::env::set_var("ORACLE_HOST", "env.internal");
            std::env::set_var("ORACLE_USERNAME", "u");
            std::env::set_var("ORACLE_PASSWORD", "p");
            std::env::set_var("ORACLE_SID", "SID1");
            std::env::set_var("ORACLE_CLIENT_LIB_DIR", "/opt/ic");
        }

        let config = ConnectionConfig::from_env().expect("設定の読み込みに失敗");
        assert_eq!(config.connect_string(), "env.internal:1521/SID1");
        assert_eq!(config.client_lib_dir(), "/opt/ic");

        unsafe { cleanup_env() };
    }

    #[test]
    #[serial(fiscalizacion_env)]
    fn test_from_env_missing_everything() {
        unsafe { cleanup_env() };

        let result = ConnectionConfig::from_env();
        assert!(matches!(result, Err(ConfigError::IncompleteCredentials { .. })));
    }
}
