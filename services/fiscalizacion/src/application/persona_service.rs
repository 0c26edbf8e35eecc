/// ペルソナ検索サービス
///
/// 検証済みのフィルターでリポジトリを検索し、件数付きの結果を返す。
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::domain::{PersonaFilter, PersonaList};
use crate::infrastructure::{PersonaRepository, PersonaRepositoryError};

/// ペルソナ検索のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonaSearchError {
    /// データベースに接続できなかった
    #[error("connection error: {0}")]
    Connection(String),

    /// クエリ実行または結果の変換に失敗
    #[error("query error: {0}")]
    Query(String),
}

impl From<PersonaRepositoryError> for PersonaSearchError {
    fn from(err: PersonaRepositoryError) -> Self {
        match err {
            PersonaRepositoryError::ConnectionError(msg) => PersonaSearchError::Connection(msg),
            PersonaRepositoryError::QueryError(msg) => PersonaSearchError::Query(msg),
        }
    }
}

/// ペルソナ検索サービス
#[derive(Clone)]
pub struct PersonaService {
    repository: Arc<dyn PersonaRepository>,
}

impl PersonaService {
    pub fn new(repository: Arc<dyn PersonaRepository>) -> Self {
        Self { repository }
    }

    /// ペルソナを検索する
    ///
    /// # 引数
    /// * `filter` - 検証済みの検索条件
    ///
    /// # 戻り値
    /// * `Ok(PersonaList)` - 名前順の結果と件数
    /// * `Err(PersonaSearchError)` - 接続またはクエリのエラー
    pub async fn search(&self, filter: &PersonaFilter) -> Result<PersonaList, PersonaSearchError> {
        info!(
            nombre = filter.nombre().unwrap_or("(vacío)"),
            tipo_operador = %filter.tipo_operador(),
            "ペルソナ検索開始"
        );

        let personas = self.repository.search(filter).await.map_err(|e| {
            error!(error = %e, "ペルソナ検索に失敗しました");
            PersonaSearchError::from(e)
        })?;

        let list = PersonaList::new(personas);
        info!(rows_count = list.rows_count(), "ペルソナ検索完了");
        Ok(list)
    }
}
