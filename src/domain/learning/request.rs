//! Learning Context - 能力请求模型
//!
//! 四种 AI 能力的输入契约，以及派发前的校验规则

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::errors::RequestError;
use super::value_objects::{Capability, Difficulty, LearningStyle};

/// 出题数量允许范围
pub const QUESTION_COUNT_RANGE: RangeInclusive<u32> = 1..=10;

/// 默认出题数量
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

/// 学习表现数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// 正确率 [0, 1]
    pub accuracy: f64,
    /// 学习时长（秒）
    #[serde(default)]
    pub time_spent: f64,
    /// 参与度 [0, 1]
    #[serde(default)]
    pub engagement: f64,
}

impl Performance {
    pub fn new(accuracy: f64) -> Self {
        Self {
            accuracy,
            time_spent: 0.0,
            engagement: 0.0,
        }
    }

    fn validate(&self) -> Result<(), RequestError> {
        check_unit_interval("accuracy", self.accuracy)?;
        check_unit_interval("engagement", self.engagement)?;
        if !self.time_spent.is_finite() || self.time_spent < 0.0 {
            return Err(RequestError::OutOfRange {
                field: "time_spent",
                detail: format!("must be a non-negative number of seconds, got {}", self.time_spent),
            });
        }
        Ok(())
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), RequestError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RequestError::OutOfRange {
            field,
            detail: format!("must be within [0, 1], got {}", value),
        });
    }
    Ok(())
}

fn check_topic(topic: &str) -> Result<(), RequestError> {
    if topic.trim().is_empty() {
        return Err(RequestError::Empty("topic"));
    }
    Ok(())
}

/// 能力请求
///
/// 每个变体对应一种能力，按 `capability` 字段区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum CapabilityRequest {
    StyleAnalysis {
        responses: Vec<String>,
    },
    ContentGeneration {
        topic: String,
        learning_style: LearningStyle,
        difficulty: Difficulty,
        #[serde(default)]
        preferences: BTreeSet<String>,
    },
    Recommendation {
        user_id: String,
        #[serde(default)]
        current_topic: Option<String>,
        performance: Performance,
        #[serde(default)]
        learning_style: Option<LearningStyle>,
        #[serde(default)]
        current_difficulty: Option<Difficulty>,
    },
    QuizGeneration {
        topic: String,
        difficulty: Difficulty,
        learning_style: LearningStyle,
        #[serde(default = "default_question_count")]
        question_count: u32,
    },
}

impl CapabilityRequest {
    pub fn capability(&self) -> Capability {
        match self {
            Self::StyleAnalysis { .. } => Capability::StyleAnalysis,
            Self::ContentGeneration { .. } => Capability::ContentGeneration,
            Self::Recommendation { .. } => Capability::Recommendation,
            Self::QuizGeneration { .. } => Capability::QuizGeneration,
        }
    }

    /// 校验请求
    ///
    /// 越界值直接拒绝，不做截断
    pub fn validate(&self) -> Result<(), RequestError> {
        match self {
            // 空回答列表合法，结果为中性先验
            Self::StyleAnalysis { .. } => Ok(()),
            Self::ContentGeneration { topic, .. } => check_topic(topic),
            Self::Recommendation {
                user_id,
                performance,
                ..
            } => {
                if user_id.trim().is_empty() {
                    return Err(RequestError::Empty("user_id"));
                }
                performance.validate()
            }
            Self::QuizGeneration {
                topic,
                question_count,
                ..
            } => {
                check_topic(topic)?;
                if !QUESTION_COUNT_RANGE.contains(question_count) {
                    return Err(RequestError::OutOfRange {
                        field: "question_count",
                        detail: format!(
                            "must be within [{}, {}], got {}",
                            QUESTION_COUNT_RANGE.start(),
                            QUESTION_COUNT_RANGE.end(),
                            question_count
                        ),
                    });
                }
                Ok(())
            }
        }
    }
}
