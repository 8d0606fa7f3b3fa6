//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::fmt;

use crate::application::ports::ExternalSettings;
use crate::infrastructure::adapters::OpenAiClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 推理配置
    #[serde(default)]
    pub inference: InferenceConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 推理配置
#[derive(Clone, Deserialize)]
pub struct InferenceConfig {
    /// 外部服务 API 密钥，缺失或为空时关闭外部路径
    #[serde(default)]
    pub external_api_key: Option<String>,

    /// 模型名称
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// 单次输出 token 上限
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// 采样温度，取值 0.0 - 2.0
    #[serde(default = "default_sampling_temperature")]
    pub sampling_temperature: f32,

    /// 强制仅使用本地降级
    #[serde(default)]
    pub force_fallback_only: bool,

    /// 外部服务基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 外部请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 启动时探测外部服务
    #[serde(default)]
    pub probe_on_startup: bool,
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_output_tokens() -> u32 {
    1000
}

fn default_sampling_temperature() -> f32 {
    0.7
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            external_api_key: None,
            model_name: default_model_name(),
            max_output_tokens: default_max_output_tokens(),
            sampling_temperature: default_sampling_temperature(),
            force_fallback_only: false,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            probe_on_startup: false,
        }
    }
}

// 密钥只显示是否存在
impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field(
                "external_api_key",
                &self.api_key().map(|_| "<redacted>"),
            )
            .field("model_name", &self.model_name)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("sampling_temperature", &self.sampling_temperature)
            .field("force_fallback_only", &self.force_fallback_only)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("probe_on_startup", &self.probe_on_startup)
            .finish()
    }
}

impl InferenceConfig {
    /// 非空的 API 密钥
    pub fn api_key(&self) -> Option<&str> {
        self.external_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// 外部路径的状态输入
    pub fn external_settings(&self) -> ExternalSettings {
        ExternalSettings {
            credential_present: self.api_key().is_some(),
            force_fallback_only: self.force_fallback_only,
            model_name: self.model_name.clone(),
        }
    }

    /// 客户端配置，仅在存在密钥时返回
    pub fn client_config(&self) -> Option<OpenAiClientConfig> {
        self.api_key().map(|key| OpenAiClientConfig {
            base_url: self.base_url.clone(),
            api_key: key.to_string(),
            model: self.model_name.clone(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.sampling_temperature,
            timeout_secs: self.timeout_secs,
        })
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5060);
        assert_eq!(config.inference.model_name, "gpt-4o-mini");
        assert_eq!(config.inference.max_output_tokens, 1000);
        assert!(!config.inference.force_fallback_only);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5060");
    }

    #[test]
    fn test_blank_key_counts_as_absent() {
        let config = InferenceConfig {
            external_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
        assert!(!config.external_settings().credential_present);
        assert!(config.client_config().is_none());
    }

    #[test]
    fn test_client_config_carries_settings() {
        let config = InferenceConfig {
            external_api_key: Some("sk-live".to_string()),
            model_name: "gpt-4o".to_string(),
            timeout_secs: 12,
            ..Default::default()
        };
        let client = config.client_config().unwrap();
        assert_eq!(client.api_key, "sk-live");
        assert_eq!(client.model, "gpt-4o");
        assert_eq!(client.timeout_secs, 12);
        assert!(config.external_settings().is_configured());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = InferenceConfig {
            external_api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
