//! Local Fallback Engine - 本地降级引擎
//!
//! 不依赖网络、无副作用的确定性实现:
//! - style: 关键词桶学习风格分析
//! - content: 模板化课程内容
//! - recommendation: 基于正确率的规则表推荐
//!
//! 出题没有本地实现，只能走外部模型

mod content;
mod errors;
mod recommendation;
mod style;

pub use content::{ContentTemplate, ContentTemplates, BUILTIN_TEMPLATES, FALLBACK_CONTENT_TYPE};
pub use errors::FallbackError;
pub use recommendation::{
    recommend, DEFAULT_CURRENT_DIFFICULTY, NEXT_DIFFICULTY_THRESHOLD, REINFORCEMENT_THRESHOLD,
};
pub use style::{adaptations_for, analyze, count_matches, StyleAnalysis, NEUTRAL_PRIOR};

use crate::domain::learning::{CapabilityPayload, CapabilityRequest};

/// 本地降级引擎
///
/// 构造时校验模板表，之后每次调用都不会因配置缺项而失败
#[derive(Debug, Clone)]
pub struct FallbackEngine {
    templates: ContentTemplates,
}

impl FallbackEngine {
    /// 使用内置模板表创建
    pub fn new() -> Result<Self, FallbackError> {
        Ok(Self {
            templates: ContentTemplates::builtin()?,
        })
    }

    /// 使用自定义模板条目创建
    pub fn with_templates(entries: &[ContentTemplate]) -> Result<Self, FallbackError> {
        Ok(Self {
            templates: ContentTemplates::from_entries(entries)?,
        })
    }

    /// 执行本地推理
    ///
    /// 返回载荷与置信度（仅风格分析和推荐有置信度）
    pub fn run(
        &self,
        request: &CapabilityRequest,
    ) -> Result<(CapabilityPayload, Option<f64>), FallbackError> {
        match request {
            CapabilityRequest::StyleAnalysis { responses } => {
                let analysis = analyze(responses);
                Ok((
                    CapabilityPayload::StyleAnalysis(analysis.profile),
                    Some(analysis.confidence),
                ))
            }
            CapabilityRequest::ContentGeneration {
                topic,
                learning_style,
                difficulty,
                preferences,
            } => {
                let content =
                    self.templates
                        .generate(topic, *learning_style, *difficulty, preferences)?;
                Ok((CapabilityPayload::ContentGeneration(content), None))
            }
            CapabilityRequest::Recommendation {
                current_topic,
                performance,
                learning_style,
                current_difficulty,
                ..
            } => {
                let (recs, confidence) = recommend(
                    current_topic.as_deref(),
                    performance,
                    *learning_style,
                    *current_difficulty,
                );
                Ok((CapabilityPayload::Recommendation(recs), Some(confidence)))
            }
            CapabilityRequest::QuizGeneration { .. } => {
                Err(FallbackError::Unsupported(request.capability()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learning::{Capability, Difficulty, LearningStyle, Performance};

    #[test]
    fn test_quiz_is_unsupported() {
        let engine = FallbackEngine::new().unwrap();
        let req = CapabilityRequest::QuizGeneration {
            topic: "Loops".into(),
            difficulty: Difficulty::Beginner,
            learning_style: LearningStyle::Visual,
            question_count: 3,
        };
        assert_eq!(
            engine.run(&req),
            Err(FallbackError::Unsupported(Capability::QuizGeneration))
        );
    }

    #[test]
    fn test_run_is_byte_identical_across_calls() {
        let engine = FallbackEngine::new().unwrap();
        let requests = vec![
            CapabilityRequest::StyleAnalysis {
                responses: vec!["I watch videos".into(), "and listen to podcasts".into()],
            },
            CapabilityRequest::ContentGeneration {
                topic: "Ownership".into(),
                learning_style: LearningStyle::ReadingWriting,
                difficulty: Difficulty::Intermediate,
                preferences: ["notes".to_string()].into(),
            },
            CapabilityRequest::Recommendation {
                user_id: "u-7".into(),
                current_topic: Some("Borrowing".into()),
                performance: Performance::new(0.72),
                learning_style: Some(LearningStyle::Auditory),
                current_difficulty: None,
            },
        ];

        for req in &requests {
            let first = serde_json::to_vec(&engine.run(req).unwrap().0).unwrap();
            let second = serde_json::to_vec(&engine.run(req).unwrap().0).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_incomplete_templates_rejected_at_construction() {
        let result = FallbackEngine::with_templates(&BUILTIN_TEMPLATES[1..]);
        assert!(matches!(result, Err(FallbackError::MissingTemplate { .. })));
    }
}
