// アプリケーション層モジュール
pub mod error_response;
pub mod health_handler;
pub mod persona_handler;
pub mod persona_service;
pub mod router;
pub mod startup;

// 再エクスポート
pub use error_response::{ApiError, ErrorMessage, HttpErrorBody, INTERNAL_ERROR_MESSAGE};
pub use health_handler::HealthStatus;
pub use persona_service::{PersonaSearchError, PersonaService};
pub use router::{create_router, AppState};
pub use startup::{
    build_router, load_app_config, prepare_oracle, run_startup_check, StartupError,
};
