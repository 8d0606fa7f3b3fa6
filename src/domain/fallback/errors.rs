//! Fallback Engine - Errors

use thiserror::Error;

use crate::domain::learning::{Capability, Difficulty, LearningStyle};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FallbackError {
    /// 模板表缺项，启动校验时发现
    #[error("no content template for ({style}, {difficulty})")]
    MissingTemplate {
        style: LearningStyle,
        difficulty: Difficulty,
    },

    /// 该能力没有本地实现
    #[error("{0} has no local fallback")]
    Unsupported(Capability),
}
