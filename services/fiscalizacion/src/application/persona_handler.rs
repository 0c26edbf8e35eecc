/// ペルソナ検索エンドポイント（GET /personas）
///
/// クエリパラメーターを検証し、検索結果を`{personas, rowsCount}`で返す。
use std::collections::HashMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::domain::PersonaFilter;

use super::error_response::{ApiError, INTERNAL_ERROR_MESSAGE};
use super::router::AppState;

/// ペルソナ検索
///
/// # Returns
/// - 200 OK: 検索結果（0件を含む）
/// - 400 Bad Request: パラメーター検証エラー（全違反を列挙）
/// - 500 Internal Server Error: 接続またはクエリのエラー（詳細は返さない）
pub async fn get_personas(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "クエリ文字列を解釈できません");
            return ApiError::bad_request(vec![rejection.body_text()]).into_response();
        }
    };

    let filter = match PersonaFilter::from_query(&params) {
        Ok(filter) => filter,
        Err(errors) => {
            warn!(errors = %errors, "ペルソナ検索のパラメーターが不正です");
            return ApiError::from(errors).into_response();
        }
    };

    match state.persona_service.search(&filter).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => {
            error!(error = %e, "ペルソナ検索エラー");
            ApiError::internal_error(INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}
