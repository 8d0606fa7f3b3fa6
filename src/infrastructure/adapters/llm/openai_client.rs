//! OpenAI Client - 调用 OpenAI 兼容的补全服务
//!
//! 实现 ExternalInferencePort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions   (Bearer 认证)
//! GET  {base_url}/models             (探测，不计费)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{parser, prompts};
use crate::application::ports::{ExternalError, ExternalInferencePort};
use crate::domain::learning::{CapabilityRequest, InferenceResult};

/// 探测请求超时
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// 补全请求体
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 客户端配置
#[derive(Clone)]
pub struct OpenAiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 单次输出 token 上限
    pub max_output_tokens: u32,
    /// 采样温度
    pub temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_output_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

// 密钥不进日志
impl fmt::Debug for OpenAiClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenAI 客户端
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(config: OpenAiClientConfig) -> Result<Self, ExternalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExternalError::Transient(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url())
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url())
    }

    /// 发送补全请求，返回第一条候选的文本
    async fn complete(&self, prompt: &prompts::Prompt) -> Result<String, ExternalError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ExternalError::Authentication(
                "API key is not configured".to_string(),
            ));
        }

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_text));
        }

        // 读取响应体超时仍属暂时性错误，只有反序列化失败才算格式错误
        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                ExternalError::MalformedResponse(format!("invalid envelope: {}", e))
            } else {
                transport_error(e)
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExternalError::MalformedResponse("no completion returned".to_string()))
    }
}

/// 传输层错误（连接、超时、读取响应体）一律视为暂时性错误
fn transport_error(e: reqwest::Error) -> ExternalError {
    if e.is_timeout() {
        ExternalError::Transient("request timed out".to_string())
    } else if e.is_connect() {
        ExternalError::Transient(format!("cannot connect to inference service: {}", e))
    } else {
        ExternalError::Transient(e.to_string())
    }
}

/// 非成功状态码的分类
fn map_status(status: StatusCode, body: String) -> ExternalError {
    let message = format!("HTTP {}: {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExternalError::Authentication(message),
        _ => ExternalError::Transient(message),
    }
}

#[async_trait]
impl ExternalInferencePort for OpenAiClient {
    async fn infer(&self, request: &CapabilityRequest) -> Result<InferenceResult, ExternalError> {
        let prompt = prompts::build(request, self.config.max_output_tokens);

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            capability = %request.capability(),
            max_tokens = prompt.max_tokens,
            "Sending completion request"
        );

        let text = self.complete(&prompt).await?;
        let result = parser::parse(request, &text)?;

        tracing::info!(
            capability = %request.capability(),
            completion_len = text.len(),
            "External inference completed"
        );

        Ok(result)
    }

    async fn probe(&self) -> bool {
        if self.config.api_key.trim().is_empty() {
            return false;
        }
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.config.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
