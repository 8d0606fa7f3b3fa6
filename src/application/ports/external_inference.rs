//! External Inference Port - 外部大模型推理抽象
//!
//! 定义外部推理的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::learning::{CapabilityRequest, InferenceResult};

/// 外部推理错误
///
/// 只在 Dispatcher 内部流转，不会直接暴露给调用方
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExternalError {
    /// 凭证缺失或无效
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 网络/超时/服务端暂时不可用，可重试
    #[error("Transient failure: {0}")]
    Transient(String),

    /// 模型输出无法解析为期望结构
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ExternalError {
    /// 日志用的简短类别名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::Transient(_) => "transient",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// External Inference Port
///
/// 远程补全服务的抽象接口
#[async_trait]
pub trait ExternalInferencePort: Send + Sync {
    /// 执行一次外部推理
    ///
    /// 每次调用恰好一次出站请求，不做内部重试。
    /// 成功时结果的 source 为 external
    async fn infer(&self, request: &CapabilityRequest) -> Result<InferenceResult, ExternalError>;

    /// 探测外部服务是否可达
    ///
    /// 必须是不计费的轻量请求
    async fn probe(&self) -> bool {
        true // 默认实现
    }

    /// 使用的模型名称
    fn model_name(&self) -> &str;
}
