//! Completion Parser - 模型输出解析
//!
//! 把补全文本解析为类型化的 CapabilityPayload。
//! 缺少必需字段或取值越界一律视为 MalformedResponse，不做猜测性修补

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::application::ports::ExternalError;
use crate::domain::fallback::DEFAULT_CURRENT_DIFFICULTY;
use crate::domain::learning::{
    CapabilityPayload, CapabilityRequest, Difficulty, Exercise, InferenceResult, LearningStyle,
    LessonContent, QuestionType, Quiz, QuizQuestion, RecommendationEntry, Recommendations,
    StyleProfile, StyleScores,
};

/// AI 生成内容的 content_type
pub const EXTERNAL_CONTENT_TYPE: &str = "ai_generated";

/// 去掉 Markdown 代码块包裹
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记（如 ```json）
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// 解析补全文本
pub fn parse(request: &CapabilityRequest, text: &str) -> Result<InferenceResult, ExternalError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(malformed("completion is empty"));
    }

    match request {
        CapabilityRequest::StyleAnalysis { .. } => {
            let wire: StyleWire = decode(body)?;
            let (profile, confidence) = wire.into_profile()?;
            Ok(InferenceResult::external(
                CapabilityPayload::StyleAnalysis(profile),
                Some(confidence),
            ))
        }
        CapabilityRequest::ContentGeneration { difficulty, .. } => {
            let wire: ContentWire = decode(body)?;
            let content = wire.into_content(*difficulty)?;
            Ok(InferenceResult::external(
                CapabilityPayload::ContentGeneration(content),
                None,
            ))
        }
        CapabilityRequest::Recommendation {
            current_difficulty, ..
        } => {
            let wire: Listing<RecommendationWire> = decode(body)?;
            let default_difficulty = current_difficulty.unwrap_or(DEFAULT_CURRENT_DIFFICULTY);
            let entries = wire
                .into_vec()
                .into_iter()
                .map(|entry| entry.into_entry(default_difficulty))
                .collect::<Result<Vec<_>, _>>()?;
            if entries.is_empty() {
                return Err(malformed("no recommendations returned"));
            }
            let confidence =
                entries.iter().map(|e| e.confidence).sum::<f64>() / entries.len() as f64;
            Ok(InferenceResult::external(
                CapabilityPayload::Recommendation(Recommendations { entries }),
                Some(confidence),
            ))
        }
        CapabilityRequest::QuizGeneration {
            topic,
            difficulty,
            learning_style,
            question_count,
        } => {
            let wire: Listing<QuestionWire> = decode(body)?;
            let mut questions = wire
                .into_vec()
                .into_iter()
                .map(QuestionWire::into_question)
                .collect::<Result<Vec<_>, _>>()?;
            if questions.is_empty() {
                return Err(malformed("no quiz questions returned"));
            }
            questions.truncate(*question_count as usize);
            Ok(InferenceResult::external(
                CapabilityPayload::QuizGeneration(Quiz {
                    topic: topic.clone(),
                    difficulty: *difficulty,
                    learning_style: *learning_style,
                    questions,
                }),
                None,
            ))
        }
    }
}

fn malformed(message: impl Into<String>) -> ExternalError {
    ExternalError::MalformedResponse(message.into())
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ExternalError> {
    serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {}", e)))
}

fn unit_interval(field: &str, value: f64) -> Result<f64, ExternalError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(malformed(format!("{} out of range: {}", field, value)))
    }
}

fn non_blank(field: &str, value: String) -> Result<String, ExternalError> {
    if value.trim().is_empty() {
        Err(malformed(format!("{} is empty", field)))
    } else {
        Ok(value)
    }
}

/// 字符串或字符串数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrList {
    List(Vec<String>),
    Text(String),
}

impl Default for TextOrList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl TextOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Text(text) if text.trim().is_empty() => Vec::new(),
            Self::Text(text) => vec![text],
        }
    }
}

/// 数组、包了一层的对象或单个对象
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Many(Vec<T>),
    Wrapped {
        #[serde(alias = "recommendations", alias = "questions")]
        items: Vec<T>,
    },
    One(T),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) | Self::Wrapped { items } => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct StyleWire {
    primary_style: String,
    #[serde(default)]
    secondary_style: Option<String>,
    confidence: f64,
    #[serde(default)]
    adaptations: TextOrList,
    #[serde(default)]
    neurodivergent_considerations: TextOrList,
    #[serde(default)]
    scores: BTreeMap<String, f64>,
}

impl StyleWire {
    fn into_profile(self) -> Result<(StyleProfile, f64), ExternalError> {
        let primary_style = self
            .primary_style
            .parse::<LearningStyle>()
            .map_err(malformed)?;

        let secondary_style = match self.secondary_style.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null") => None,
            Some(s) => Some(s.parse::<LearningStyle>().map_err(malformed)?),
        }
        .filter(|s| *s != primary_style);

        let confidence = unit_interval("confidence", self.confidence)?;

        let mut scores = StyleScores::new();
        for (name, value) in self.scores {
            let style = name.parse::<LearningStyle>().map_err(malformed)?;
            scores.insert(style, unit_interval("score", value)?);
        }
        if scores.is_empty() {
            // 模型未给分项时，以置信度作为主风格得分
            scores.insert(primary_style, confidence);
        }

        Ok((
            StyleProfile {
                primary_style,
                secondary_style,
                scores,
                adaptations: self.adaptations.into_vec(),
                considerations: self.neurodivergent_considerations.into_vec(),
            },
            confidence,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ExerciseWire {
    title: String,
    #[serde(default, alias = "steps")]
    instructions: TextOrList,
}

#[derive(Debug, Deserialize)]
struct ContentWire {
    content: String,
    #[serde(default)]
    exercises: Vec<ExerciseWire>,
    #[serde(default)]
    visual_elements: TextOrList,
    #[serde(default)]
    assessment: TextOrList,
    #[serde(default)]
    adaptations: TextOrList,
    #[serde(default)]
    resources: TextOrList,
}

impl ContentWire {
    fn into_content(self, difficulty: Difficulty) -> Result<LessonContent, ExternalError> {
        let content = non_blank("content", self.content)?;

        let exercises = self
            .exercises
            .into_iter()
            .map(|e| {
                Ok(Exercise {
                    title: non_blank("exercise title", e.title)?,
                    instructions: e.instructions.into_vec(),
                })
            })
            .collect::<Result<Vec<_>, ExternalError>>()?;

        let mut adaptations = self.adaptations.into_vec();
        adaptations.extend(
            self.visual_elements
                .into_vec()
                .into_iter()
                .map(|v| format!("Visual aid: {}", v)),
        );

        Ok(LessonContent {
            content_type: EXTERNAL_CONTENT_TYPE.to_string(),
            difficulty_level: difficulty,
            content,
            exercises,
            adaptations,
            assessment: self.assessment.into_vec(),
            resources: self.resources.into_vec(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationWire {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    reason: String,
    confidence: f64,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default, alias = "time_estimate_minutes")]
    time_estimate: Option<f64>,
}

impl RecommendationWire {
    fn into_entry(self, default_difficulty: Difficulty) -> Result<RecommendationEntry, ExternalError> {
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => default_difficulty,
            Some(d) => d.parse::<Difficulty>().map_err(malformed)?,
        };

        let time_estimate_minutes = match self.time_estimate {
            None => None,
            Some(minutes) if minutes.is_finite() && minutes >= 0.0 => Some(minutes.round() as u32),
            Some(minutes) => return Err(malformed(format!("time_estimate out of range: {}", minutes))),
        };

        Ok(RecommendationEntry {
            title: non_blank("recommendation title", self.title)?,
            description: self.description,
            reason: self.reason,
            confidence: unit_interval("confidence", self.confidence)?,
            difficulty,
            time_estimate_minutes,
            branch: None,
        })
    }
}

/// 正确答案可能是字符串、布尔或数字
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Answer {
    Text(String),
    Flag(bool),
    Number(f64),
}

impl Answer {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Flag(flag) => flag.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionWire {
    question: String,
    #[serde(rename = "type", alias = "question_type")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Answer,
    #[serde(default)]
    explanation: String,
    #[serde(default, alias = "hint")]
    learning_style_hint: String,
}

fn question_type(raw: &str) -> Result<QuestionType, ExternalError> {
    let normalized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' || c == '/' { '_' } else { c })
        .collect();
    match normalized.as_str() {
        "multiple_choice" => Ok(QuestionType::MultipleChoice),
        "true_false" => Ok(QuestionType::TrueFalse),
        "short_answer" => Ok(QuestionType::ShortAnswer),
        "practical" => Ok(QuestionType::Practical),
        _ => Err(malformed(format!("unknown question type: {}", raw))),
    }
}

impl QuestionWire {
    fn into_question(self) -> Result<QuizQuestion, ExternalError> {
        let question_type = question_type(&self.kind)?;
        if question_type == QuestionType::MultipleChoice && self.options.len() < 2 {
            return Err(malformed("multiple choice question needs at least two options"));
        }

        Ok(QuizQuestion {
            question: non_blank("question", self.question)?,
            question_type,
            options: self.options,
            correct_answer: non_blank("correct_answer", self.correct_answer.into_text())?,
            explanation: self.explanation,
            learning_style_hint: self.learning_style_hint,
        })
    }
}
