//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StorageBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TIDINGS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TIDINGS_SERVER__PORT=8080`
/// - `TIDINGS_DATABASE__PATH=/data/tidings.db`
/// - `TIDINGS_STORAGE__BACKEND=memory`
/// - `TIDINGS_WORKER__FLUSH_INTERVAL_SECS=5`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.max_body_bytes", 64 * 1024)?
        .set_default("database.path", "data/tidings.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.backend", "sqlite")?
        .set_default("worker.queue_capacity", 1024)?
        .set_default("worker.flush_interval_secs", 10)?
        .set_default("worker.max_pending", 65_536)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: TIDINGS_WORKER__QUEUE_CAPACITY=4096
    builder = builder.add_source(
        Environment::with_prefix("TIDINGS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Sqlite && config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.worker.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Worker queue capacity cannot be 0".to_string(),
        ));
    }

    if config.worker.flush_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Worker flush interval cannot be 0".to_string(),
        ));
    }

    if config.worker.max_pending == 0 {
        return Err(ConfigError::ValidationError(
            "Worker max_pending cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body Size: {} bytes", config.server.max_body_bytes);
    tracing::info!("Storage Backend: {:?}", config.storage.backend);
    if config.storage.backend == StorageBackend::Sqlite {
        tracing::info!("Database: {}", config.database.path);
        tracing::info!("Database Max Connections: {}", config.database.max_connections);
    }
    tracing::info!("Queue Capacity: {}", config.worker.queue_capacity);
    tracing::info!("Flush Interval: {}s", config.worker.flush_interval_secs);
    tracing::info!("Max Pending: {}", config.worker.max_pending);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
