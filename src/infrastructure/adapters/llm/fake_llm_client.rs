//! Fake LLM Client - 用于测试的外部推理客户端
//!
//! 不发起网络请求，按能力返回固定的结果

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{ExternalError, ExternalInferencePort};
use crate::domain::fallback::DEFAULT_CURRENT_DIFFICULTY;
use crate::domain::learning::{
    CapabilityPayload, CapabilityRequest, Exercise, InferenceResult, LearningStyle, LessonContent,
    QuestionType, Quiz, QuizQuestion, RecommendationEntry, Recommendations, StyleProfile,
    StyleScores,
};

/// Fake LLM Client 配置
#[derive(Debug, Clone)]
pub struct FakeLlmClientConfig {
    /// 模型名称
    pub model: String,
    /// 模拟的推理延迟
    pub latency: Duration,
    /// 非空时所有调用都返回该错误
    pub failure: Option<ExternalError>,
    /// 探测结果
    pub reachable: bool,
}

impl Default for FakeLlmClientConfig {
    fn default() -> Self {
        Self {
            model: "fake-model".to_string(),
            latency: Duration::from_millis(0),
            failure: None,
            reachable: true,
        }
    }
}

/// Fake LLM Client
pub struct FakeLlmClient {
    config: FakeLlmClientConfig,
    calls: AtomicUsize,
}

impl FakeLlmClient {
    pub fn new(config: FakeLlmClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeLlmClientConfig::default())
    }

    /// 总是失败的客户端
    pub fn failing(error: ExternalError) -> Self {
        Self::new(FakeLlmClientConfig {
            failure: Some(error),
            ..Default::default()
        })
    }

    /// 已收到的推理调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canned(request: &CapabilityRequest) -> (CapabilityPayload, Option<f64>) {
        match request {
            CapabilityRequest::StyleAnalysis { .. } => {
                let profile = StyleProfile {
                    primary_style: LearningStyle::Visual,
                    secondary_style: None,
                    scores: StyleScores::from([(LearningStyle::Visual, 1.0)]),
                    adaptations: vec!["Use diagrams".to_string()],
                    considerations: Vec::new(),
                };
                (CapabilityPayload::StyleAnalysis(profile), Some(0.9))
            }
            CapabilityRequest::ContentGeneration {
                topic, difficulty, ..
            } => (
                CapabilityPayload::ContentGeneration(LessonContent {
                    content_type: super::parser::EXTERNAL_CONTENT_TYPE.to_string(),
                    difficulty_level: *difficulty,
                    content: format!("Generated lesson on {}", topic),
                    exercises: vec![Exercise {
                        title: format!("Explore {}", topic),
                        instructions: vec!["Work through the example".to_string()],
                    }],
                    adaptations: Vec::new(),
                    assessment: Vec::new(),
                    resources: Vec::new(),
                }),
                None,
            ),
            CapabilityRequest::Recommendation {
                current_topic,
                current_difficulty,
                ..
            } => (
                CapabilityPayload::Recommendation(Recommendations {
                    entries: vec![RecommendationEntry {
                        title: format!(
                            "Deepen {}",
                            current_topic.as_deref().unwrap_or("your studies")
                        ),
                        description: "Generated recommendation".to_string(),
                        reason: "Based on recent performance".to_string(),
                        confidence: 0.7,
                        difficulty: current_difficulty.unwrap_or(DEFAULT_CURRENT_DIFFICULTY),
                        time_estimate_minutes: Some(20),
                        branch: None,
                    }],
                }),
                Some(0.7),
            ),
            CapabilityRequest::QuizGeneration {
                topic,
                difficulty,
                learning_style,
                question_count,
            } => (
                CapabilityPayload::QuizGeneration(Quiz {
                    topic: topic.clone(),
                    difficulty: *difficulty,
                    learning_style: *learning_style,
                    questions: (1..=*question_count)
                        .map(|n| QuizQuestion {
                            question: format!("{} question {}", topic, n),
                            question_type: QuestionType::ShortAnswer,
                            options: Vec::new(),
                            correct_answer: "answer".to_string(),
                            explanation: String::new(),
                            learning_style_hint: String::new(),
                        })
                        .collect(),
                }),
                None,
            ),
        }
    }
}

#[async_trait]
impl ExternalInferencePort for FakeLlmClient {
    async fn infer(&self, request: &CapabilityRequest) -> Result<InferenceResult, ExternalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            capability = %request.capability(),
            "FakeLlmClient: returning canned result"
        );

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
        if let Some(err) = &self.config.failure {
            return Err(err.clone());
        }

        let (payload, confidence) = Self::canned(request);
        Ok(InferenceResult::external(payload, confidence))
    }

    async fn probe(&self) -> bool {
        self.config.reachable
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
