/// HTTPルーター
///
/// Lambdaとローカルサーバーで共通のルーティングとミドルウェアを構築する。
use axum::{
    http::{
        header::{
            AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
        HeaderName, HeaderValue, Method, Uri,
    },
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::infrastructure::AppConfig;

use super::error_response::ApiError;
use super::health_handler::health;
use super::persona_handler::get_personas;
use super::persona_service::PersonaService;

/// ヘルスチェックのパス
pub const HEALTH_PATH: &str = "/api/health";

/// ペルソナ検索のパス
pub const PERSONAS_PATH: &str = "/personas";

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub persona_service: PersonaService,
}

/// 未定義ルートと未定義メソッド（404 `Cannot GET /path`）
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(&method, &uri)
}

/// CORSレイヤーを構築する
///
/// `*`の場合はリクエストのOriginをそのまま返す（資格情報付きリクエストのため）。
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins()
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "CORS_ORIGINに不正なオリジンが含まれています");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// ルーターを構築する
///
/// `/api/health`はミドルウェアを通さずに応答する。
/// それ以外は外側から順に、トレーシング、CORS、セキュリティヘッダー、gzip圧縮を適用する。
///
/// # Arguments
/// * `persona_service` - ペルソナ検索サービス
/// * `config` - アプリケーション設定（CORS）
pub fn create_router(persona_service: PersonaService, config: &AppConfig) -> Router {
    let state = AppState { persona_service };

    let api = Router::new()
        .route(PERSONAS_PATH, get(get_personas))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(config))
        // リクエストトレーシングレイヤー（method, path, status, latencyを自動記録）
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new()
        .route(HEALTH_PATH, get(health))
        .method_not_allowed_fallback(not_found)
        .merge(api)
}
