//! 应用层错误定义
//!
//! 调用方可见的统一错误类型。外部推理客户端的内部错误
//! （认证/暂时性/响应格式）不会出现在这里

use thiserror::Error;

use crate::domain::fallback::FallbackError;
use crate::domain::learning::{Capability, RequestError};

/// 应用层错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplicationError {
    /// 验证错误，派发前即拒绝
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 能力不可用（无本地降级且外部路径失败或关闭）
    #[error("{capability} is unavailable: {reason}")]
    CapabilityUnavailable {
        capability: Capability,
        reason: String,
    },

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ApplicationError {
    /// 创建能力不可用错误
    pub fn unavailable(capability: Capability, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability,
            reason: reason.into(),
        }
    }
}

impl From<RequestError> for ApplicationError {
    fn from(err: RequestError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<FallbackError> for ApplicationError {
    fn from(err: FallbackError) -> Self {
        match err {
            FallbackError::MissingTemplate { .. } => Self::ConfigurationError(err.to_string()),
            FallbackError::Unsupported(capability) => {
                Self::unavailable(capability, "no local fallback exists")
            }
        }
    }
}
