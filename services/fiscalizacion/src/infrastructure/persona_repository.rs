/// ペルソナ検索リポジトリ
///
/// 検索条件に合致する有効なペルソナを名前順で返す。
/// 実装はOracle（本番）とテスト用のインメモリモック。
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Persona, PersonaFilter};

use super::oracle_connection::{OracleAccessError, QueryError};

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersonaRepositoryError {
    /// 接続に失敗
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// クエリ実行または行変換に失敗
    #[error("Query execution error: {0}")]
    QueryError(String),
}

impl From<OracleAccessError> for PersonaRepositoryError {
    fn from(err: OracleAccessError) -> Self {
        match err {
            OracleAccessError::Connection(e) => PersonaRepositoryError::ConnectionError(e.to_string()),
            OracleAccessError::Query(e) => PersonaRepositoryError::QueryError(e.to_string()),
        }
    }
}

impl From<QueryError> for PersonaRepositoryError {
    fn from(err: QueryError) -> Self {
        PersonaRepositoryError::QueryError(err.to_string())
    }
}

/// ペルソナ検索トレイト
#[async_trait]
pub trait PersonaRepository: Send + Sync {
    /// フィルターに合致するペルソナを検索
    ///
    /// # 引数
    /// * `filter` - 検証済みの検索条件
    ///
    /// # 戻り値
    /// * `Ok(Vec<Persona>)` - 重複なし、`nombre`昇順
    /// * `Err(PersonaRepositoryError)` - 接続またはクエリのエラー
    async fn search(&self, filter: &PersonaFilter) -> Result<Vec<Persona>, PersonaRepositoryError>;
}
