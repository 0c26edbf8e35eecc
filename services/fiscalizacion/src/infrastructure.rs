// Infrastructure layer modules
pub mod app_config;
pub mod env_source;
pub mod logging;
pub mod oracle_client;
pub mod oracle_config;
pub mod oracle_connection;
pub mod oracle_persona_repository;
pub mod persona_repository;
pub mod row_mapping;

// Re-exports
pub use app_config::{AppConfig, AppConfigError, LogLevel, RuntimeEnvironment};
pub use env_source::{EnvSource, ProcessEnv};
pub use logging::{init_logging, LogFormat};
pub use oracle_client::{
    init_oracle_client, ClientInitError, ClientInitState, ClientLibrary, NativeClientInitializer,
    OracleClientLibrary,
};
pub use oracle_config::{ConfigError, ConnectionConfig};
pub use oracle_connection::{
    ConnectionError, OracleAccessError, OracleConnectionProvider, QueryError,
};
pub use oracle_persona_repository::OraclePersonaRepository;
pub use persona_repository::{PersonaRepository, PersonaRepositoryError};
