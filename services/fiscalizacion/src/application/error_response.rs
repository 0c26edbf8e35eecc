//! APIエラーハンドリング
//!
//! すべてのエラーは`{statusCode, message, error}`形式のJSONで返却する。
//! `message`は単一の文字列、または検証エラーの場合は文字列の配列。

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::ValidationErrors;

/// 検索失敗時にクライアントへ返す固定メッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno al consultar personas";

/// エラーメッセージ（単一または一覧）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    List(Vec<String>),
}

/// APIエラーレスポンスのボディ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpErrorBody {
    /// HTTPステータスコード
    pub status_code: u16,
    /// 詳細メッセージ
    pub message: ErrorMessage,
    /// ステータスの理由句（例: "Bad Request"）
    pub error: String,
}

/// APIエラー
///
/// ステータスコードとJSON形式のエラーボディを含む。
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: HttpErrorBody,
}

impl ApiError {
    /// 新しいApiErrorを作成（`error`はステータスの理由句）
    pub fn new(status: StatusCode, message: ErrorMessage) -> Self {
        Self {
            status,
            body: HttpErrorBody {
                status_code: status.as_u16(),
                message,
                error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            },
        }
    }

    /// 400 Bad Request（違反メッセージの一覧）
    pub fn bad_request(messages: Vec<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorMessage::List(messages))
    }

    /// 404 Not Found（`Cannot GET /path`）
    pub fn not_found(method: &Method, uri: &Uri) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorMessage::Single(format!("Cannot {} {}", method, uri.path())),
        )
    }

    /// 500 Internal Server Error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorMessage::Single(message.into()),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &HttpErrorBody {
        &self.body
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::bad_request(errors.into_messages())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
