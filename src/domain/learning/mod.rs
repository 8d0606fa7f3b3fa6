//! Learning Context - 学习能力限界上下文
//!
//! 职责:
//! - 能力请求模型与校验
//! - 统一的推理结果契约（带来源标记）
//! - 学习风格、难度等值对象

mod errors;
mod request;
mod result;
mod value_objects;

pub use errors::RequestError;
pub use request::{CapabilityRequest, Performance, DEFAULT_QUESTION_COUNT, QUESTION_COUNT_RANGE};
pub use result::{
    CapabilityPayload, Exercise, InferenceResult, LessonContent, Quiz, QuizQuestion,
    QuestionType, RecommendationBranch, RecommendationEntry, Recommendations, StyleProfile,
    StyleScores,
};
pub use value_objects::{Capability, Difficulty, LearningStyle, Source};
