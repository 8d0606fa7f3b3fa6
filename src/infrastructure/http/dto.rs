//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::learning::{
    CapabilityRequest, InferenceResult, Performance, DEFAULT_QUESTION_COUNT,
};
use crate::infrastructure::http::error::ApiError;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Capability DTOs
// ============================================================================

fn parse_field<T: FromStr<Err = String>>(field: &str, value: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", field, e)))
}

fn parse_optional<T: FromStr<Err = String>>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<T>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_field(field, v).map(Some),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeLearningStyleRequest {
    #[serde(alias = "responses")]
    pub user_responses: Vec<String>,
}

impl AnalyzeLearningStyleRequest {
    pub fn into_request(self) -> CapabilityRequest {
        CapabilityRequest::StyleAnalysis {
            responses: self.user_responses,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub topic: String,
    pub learning_style: String,
    #[serde(alias = "difficulty")]
    pub difficulty_level: String,
    #[serde(default, alias = "preferences")]
    pub user_preferences: Vec<String>,
}

impl GenerateContentRequest {
    pub fn into_request(self) -> Result<CapabilityRequest, ApiError> {
        Ok(CapabilityRequest::ContentGeneration {
            topic: self.topic,
            learning_style: parse_field("learning_style", &self.learning_style)?,
            difficulty: parse_field("difficulty_level", &self.difficulty_level)?,
            preferences: self.user_preferences.into_iter().collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PerformanceDto {
    pub accuracy: f64,
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub engagement: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: String,
    #[serde(default)]
    pub current_topic: Option<String>,
    #[serde(alias = "performance")]
    pub performance_data: PerformanceDto,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub current_difficulty: Option<String>,
}

impl RecommendationsRequest {
    pub fn into_request(self) -> Result<CapabilityRequest, ApiError> {
        Ok(CapabilityRequest::Recommendation {
            user_id: self.user_id,
            current_topic: self.current_topic.filter(|t| !t.trim().is_empty()),
            performance: Performance {
                accuracy: self.performance_data.accuracy,
                time_spent: self.performance_data.time_spent,
                engagement: self.performance_data.engagement,
            },
            learning_style: parse_optional("learning_style", self.learning_style.as_deref())?,
            current_difficulty: parse_optional(
                "current_difficulty",
                self.current_difficulty.as_deref(),
            )?,
        })
    }
}

fn default_num_questions() -> i64 {
    DEFAULT_QUESTION_COUNT as i64
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    pub topic: String,
    #[serde(alias = "difficulty")]
    pub difficulty_level: String,
    pub learning_style: String,
    #[serde(default = "default_num_questions", alias = "question_count")]
    pub num_questions: i64,
}

impl GenerateQuizRequest {
    pub fn into_request(self) -> Result<CapabilityRequest, ApiError> {
        // 越界值交给领域校验给出统一的错误信息
        let question_count = u32::try_from(self.num_questions).unwrap_or(0);
        Ok(CapabilityRequest::QuizGeneration {
            topic: self.topic,
            difficulty: parse_field("difficulty_level", &self.difficulty_level)?,
            learning_style: parse_field("learning_style", &self.learning_style)?,
            question_count,
        })
    }
}

/// 批量请求
///
/// 条目保持原始 JSON，逐条解析，单条格式错误只影响自身
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<serde_json::Value>,
}

impl BatchRequest {
    /// 按原顺序解析每个条目
    pub fn into_requests(self) -> Vec<Result<CapabilityRequest, ApiError>> {
        self.requests
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value(entry).map_err(|e| {
                    ApiError::BadRequest(format!("invalid request at index {}: {}", index, e))
                })
            })
            .collect()
    }
}

/// 批量结果中的错误条目
#[derive(Debug, Serialize)]
pub struct BatchErrorDto {
    pub errno: i32,
    pub error: String,
}

/// 批量结果条目，序列化为 `{"ok": ...}` 或 `{"error": ...}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchEntryDto {
    Ok(InferenceResult),
    Error(BatchErrorDto),
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchEntryDto>,
}
