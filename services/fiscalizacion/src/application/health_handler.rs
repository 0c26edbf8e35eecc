/// ヘルスチェック（GET /api/health）
///
/// データベースには触れず、プロセスの死活のみを返す。
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// ヘルスチェックのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    /// ISO 8601（UTC、ミリ秒）
    pub ts: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
