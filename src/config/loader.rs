//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量（`TUTORLY_` 前缀）
//! 2. 配置文件（config.toml）
//! 3. 兼容的 `OPENAI_*` 环境变量
//! 4. 默认值

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

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

/// 环境变量前缀
const ENV_PREFIX: &str = "TUTORLY";

/// 兼容的旧环境变量及其对应的配置键
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "inference.external_api_key"),
    ("OPENAI_MODEL", "inference.model_name"),
    ("OPENAI_MAX_TOKENS", "inference.max_output_tokens"),
    ("OPENAI_TEMPERATURE", "inference.sampling_temperature"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `TUTORLY_SERVER__PORT=8080`
/// - `TUTORLY_INFERENCE__MODEL_NAME=gpt-4o`
/// - `TUTORLY_INFERENCE__FORCE_FALLBACK_ONLY=true`
/// - `OPENAI_API_KEY=sk-...`（兼容，优先级低于配置文件）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let legacy = legacy_overrides(|name| std::env::var(name).ok());
    let environment = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true);

    build_config(config_path, &legacy, Some(environment))
}

/// 读取兼容的旧环境变量，空值忽略
fn legacy_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    LEGACY_VARIABLES
        .iter()
        .filter_map(|(name, key)| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v))
        })
        .collect()
}

/// 合并各配置来源
fn build_config(
    config_path: Option<&Path>,
    legacy: &[(&'static str, String)],
    environment: Option<Environment>,
) -> Result<AppConfig, ConfigError> {
    let mut builder: ConfigBuilder<DefaultState> = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("server.body_limit_bytes", 1024 * 1024)?
        .set_default("inference.model_name", "gpt-4o-mini")?
        .set_default("inference.max_output_tokens", 1000)?
        .set_default("inference.sampling_temperature", 0.7)?
        .set_default("inference.force_fallback_only", false)?
        .set_default("inference.base_url", "https://api.openai.com/v1")?
        .set_default("inference.timeout_secs", 30)?
        .set_default("inference.probe_on_startup", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 兼容变量覆盖默认值，但低于配置文件
    for (key, value) in legacy {
        builder = builder.set_default(*key, value.as_str())?;
    }

    // 3. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 4. 环境变量（最高优先级）
    // 例如: TUTORLY_INFERENCE__MODEL_NAME=gpt-4o
    if let Some(environment) = environment {
        builder = builder.add_source(environment);
    }

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

    let inference = &config.inference;
    if !(0.0..=2.0).contains(&inference.sampling_temperature) {
        return Err(ConfigError::ValidationError(format!(
            "Sampling temperature must be within 0.0..=2.0, got {}",
            inference.sampling_temperature
        )));
    }

    if inference.max_output_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "Max output tokens cannot be 0".to_string(),
        ));
    }

    if inference.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Inference timeout cannot be 0".to_string(),
        ));
    }

    if inference.model_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Model name cannot be empty".to_string(),
        ));
    }

    if inference.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Inference base URL cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    let inference = &config.inference;
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!(
        "API Key: {}",
        if inference.api_key().is_some() { "<redacted>" } else { "<not set>" }
    );
    tracing::info!("Model: {}", inference.model_name);
    tracing::info!("Base URL: {}", inference.base_url);
    tracing::info!("Max Output Tokens: {}", inference.max_output_tokens);
    tracing::info!("Sampling Temperature: {}", inference.sampling_temperature);
    tracing::info!("Timeout: {}s", inference.timeout_secs);
    tracing::info!("Force Fallback Only: {}", inference.force_fallback_only);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
