//! Learning Context - 推理结果
//!
//! 外部模型与本地降级两条路径归一化后的统一结果

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::value_objects::{Capability, Difficulty, LearningStyle, Source};

/// 各学习风格得分
pub type StyleScores = BTreeMap<LearningStyle, f64>;

/// 学习风格分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub primary_style: LearningStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_style: Option<LearningStyle>,
    pub scores: StyleScores,
    pub adaptations: Vec<String>,
    /// 面向神经多样性学习者的注意事项
    #[serde(default)]
    pub considerations: Vec<String>,
}

/// 练习
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub title: String,
    pub instructions: Vec<String>,
}

/// 课程内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonContent {
    pub content_type: String,
    pub difficulty_level: Difficulty,
    pub content: String,
    pub exercises: Vec<Exercise>,
    pub adaptations: Vec<String>,
    #[serde(default)]
    pub assessment: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// 推荐规则分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBranch {
    /// 补救：降低难度
    Remedial,
    /// 巩固：保持难度
    Reinforcement,
    /// 进阶：提升难度
    NextDifficulty,
}

/// 单条推荐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub confidence: f64,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate_minutes: Option<u32>,
    /// 仅本地规则表产出时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<RecommendationBranch>,
}

/// 推荐列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub entries: Vec<RecommendationEntry>,
}

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Practical,
}

/// 测验题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub learning_style_hint: String,
}

/// 测验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub topic: String,
    pub difficulty: Difficulty,
    pub learning_style: LearningStyle,
    pub questions: Vec<QuizQuestion>,
}

/// 按能力区分的结果载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum CapabilityPayload {
    StyleAnalysis(StyleProfile),
    ContentGeneration(LessonContent),
    Recommendation(Recommendations),
    QuizGeneration(Quiz),
}

impl CapabilityPayload {
    pub fn capability(&self) -> Capability {
        match self {
            Self::StyleAnalysis(_) => Capability::StyleAnalysis,
            Self::ContentGeneration(_) => Capability::ContentGeneration,
            Self::Recommendation(_) => Capability::Recommendation,
            Self::QuizGeneration(_) => Capability::QuizGeneration,
        }
    }
}

/// 推理结果
///
/// 不变量:
/// - source 总是存在，调用方无需猜测由哪条路径产出
/// - confidence 在 [0, 1] 内；风格分析与推荐必有，其余能力为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub request_id: Uuid,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub payload: CapabilityPayload,
}

impl InferenceResult {
    pub fn new(source: Source, payload: CapabilityPayload, confidence: Option<f64>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            source,
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
            payload,
        }
    }

    pub fn external(payload: CapabilityPayload, confidence: Option<f64>) -> Self {
        Self::new(Source::External, payload, confidence)
    }

    pub fn fallback(payload: CapabilityPayload, confidence: Option<f64>) -> Self {
        Self::new(Source::Fallback, payload, confidence)
    }

    pub fn capability(&self) -> Capability {
        self.payload.capability()
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_source_and_capability_tag() {
        let payload = CapabilityPayload::Recommendation(Recommendations { entries: vec![] });
        let result = InferenceResult::fallback(payload, Some(0.8));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["source"], "fallback");
        assert_eq!(json["payload"]["capability"], "recommendation");
        assert_eq!(json["confidence"], 0.8);
    }

    #[test]
    fn test_confidence_clamped() {
        let payload = CapabilityPayload::Recommendation(Recommendations { entries: vec![] });
        let result = InferenceResult::external(payload, Some(1.7));
        assert_eq!(result.confidence, Some(1.0));
    }

    #[test]
    fn test_confidence_omitted_when_absent() {
        let payload = CapabilityPayload::QuizGeneration(Quiz {
            topic: "Loops".into(),
            difficulty: Difficulty::Beginner,
            learning_style: LearningStyle::Auditory,
            questions: vec![],
        });
        let json = serde_json::to_value(InferenceResult::external(payload, None)).unwrap();
        assert!(json.get("confidence").is_none());
    }
}
