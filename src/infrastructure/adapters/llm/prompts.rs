//! Prompt Construction - 按能力构造提示词

use crate::domain::learning::{CapabilityRequest, Difficulty};

/// 一次补全请求的提示词
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
    /// 本次请求的输出 token 上限
    pub max_tokens: u32,
}

const STYLE_SYSTEM: &str = "You are an educational psychologist specializing in learning styles and neurodivergent learners. Respond only with valid JSON.";
const CONTENT_SYSTEM: &str = "You are an adaptive learning content creator specializing in personalized education. Respond only with valid JSON.";
const RECOMMENDATION_SYSTEM: &str = "You are an AI tutor that provides personalized learning recommendations. Respond only with valid JSON array.";
const QUIZ_SYSTEM: &str = "You are an educational assessment expert. Create adaptive quiz questions. Respond only with valid JSON array.";

/// 构造提示词
///
/// 内容生成与出题的输出较长，token 上限翻倍
pub fn build(request: &CapabilityRequest, max_output_tokens: u32) -> Prompt {
    match request {
        CapabilityRequest::StyleAnalysis { responses } => {
            let listed = responses
                .iter()
                .map(|r| format!("- {}", r))
                .collect::<Vec<_>>()
                .join("\n");
            Prompt {
                system: STYLE_SYSTEM,
                user: format!(
                    "Analyze the following user responses to determine their learning style preferences.\n\
                     Classify them as: visual, auditory, kinesthetic, or reading_writing.\n\n\
                     User responses:\n{}\n\n\
                     Provide a JSON object with:\n\
                     - primary_style: the main learning style (visual/auditory/kinesthetic/reading_writing)\n\
                     - secondary_style: secondary preference, or null\n\
                     - confidence: confidence score (0-1)\n\
                     - adaptations: list of specific recommendations\n\
                     - neurodivergent_considerations: list of considerations for neurodivergent learners\n\
                     - scores: object mapping each learning style to a score (0-1)\n\n\
                     Format as valid JSON only, no additional text.",
                    listed
                ),
                max_tokens: max_output_tokens,
            }
        }
        CapabilityRequest::ContentGeneration {
            topic,
            learning_style,
            difficulty,
            preferences,
        } => {
            let preferences_text = if preferences.is_empty() {
                "None specified".to_string()
            } else {
                preferences.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            Prompt {
                system: CONTENT_SYSTEM,
                user: format!(
                    "Create personalized learning content for:\n\
                     - Topic: {}\n\
                     - Learning Style: {}\n\
                     - Difficulty Level: {}\n\
                     - User Preferences: {}\n\n\
                     Return a JSON object with fields:\n\
                     - content: main learning content as a single string\n\
                     - exercises: array of 3 objects with title and instructions (array of steps)\n\
                     - visual_elements: array of suggestions for visual aids\n\
                     - assessment: array of 3-5 assessment questions as strings\n\
                     - adaptations: array of neurodivergent-friendly modifications\n\
                     - resources: array of additional learning resources\n\n\
                     Format as valid JSON only, no additional text.",
                    topic, learning_style, difficulty, preferences_text
                ),
                max_tokens: max_output_tokens.saturating_mul(2),
            }
        }
        CapabilityRequest::Recommendation {
            user_id,
            current_topic,
            performance,
            learning_style,
            current_difficulty,
        } => Prompt {
            system: RECOMMENDATION_SYSTEM,
            user: format!(
                "Based on this learner profile and performance data, provide personalized learning recommendations.\n\n\
                 Learner: {}\n\
                 Current topic: {}\n\
                 Learning style: {}\n\
                 Current difficulty: {}\n\
                 Accuracy: {:.2}\n\
                 Time spent (seconds): {:.0}\n\
                 Engagement: {:.2}\n\n\
                 Generate 3-5 recommendations, each with:\n\
                 - title: specific learning topic/activity\n\
                 - description: detailed description of the recommendation\n\
                 - reason: why this is recommended based on the data\n\
                 - confidence: how confident you are in this recommendation (0-1)\n\
                 - difficulty: beginner, intermediate or advanced\n\
                 - time_estimate: estimated time to complete in minutes (number)\n\n\
                 Return as JSON array only, no additional text.",
                user_id,
                current_topic.as_deref().unwrap_or("unspecified"),
                learning_style
                    .map(|s| s.as_str())
                    .unwrap_or("unspecified"),
                current_difficulty
                    .map(|d| d.as_str())
                    .unwrap_or(Difficulty::Intermediate.as_str()),
                performance.accuracy,
                performance.time_spent,
                performance.engagement,
            ),
            max_tokens: max_output_tokens,
        },
        CapabilityRequest::QuizGeneration {
            topic,
            difficulty,
            learning_style,
            question_count,
        } => Prompt {
            system: QUIZ_SYSTEM,
            user: format!(
                "Generate {} quiz questions for:\n\
                 - Topic: {}\n\
                 - Difficulty Level: {}\n\
                 - Learning Style: {}\n\n\
                 Create questions adapted to the learning style:\n\
                 - Visual learners: include diagram descriptions, visual scenarios\n\
                 - Auditory learners: include sound-based or verbal scenarios\n\
                 - Kinesthetic learners: include hands-on, practical scenarios\n\
                 - Reading/Writing learners: include text analysis, written scenarios\n\n\
                 For each question provide:\n\
                 - question: the question text\n\
                 - type: multiple_choice, true_false, short_answer, or practical\n\
                 - options: array of answer choices (for multiple choice)\n\
                 - correct_answer: the correct answer\n\
                 - explanation: detailed explanation of why this is correct\n\
                 - learning_style_hint: specific hint adapted to the learning style\n\n\
                 Return as JSON array only, no additional text.",
                question_count, topic, difficulty, learning_style
            ),
            max_tokens: max_output_tokens.saturating_mul(2),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learning::{LearningStyle, Performance};
    use std::collections::BTreeSet;

    #[test]
    fn test_style_prompt_lists_responses() {
        let prompt = build(
            &CapabilityRequest::StyleAnalysis {
                responses: vec!["I like maps".into(), "and podcasts".into()],
            },
            1000,
        );
        assert!(prompt.user.contains("- I like maps\n- and podcasts"));
        assert_eq!(prompt.max_tokens, 1000);
        assert_eq!(prompt.system, STYLE_SYSTEM);
    }

    #[test]
    fn test_long_form_prompts_double_budget() {
        let content = build(
            &CapabilityRequest::ContentGeneration {
                topic: "Lifetimes".into(),
                learning_style: LearningStyle::Visual,
                difficulty: Difficulty::Advanced,
                preferences: BTreeSet::new(),
            },
            800,
        );
        assert_eq!(content.max_tokens, 1600);
        assert!(content.user.contains("User Preferences: None specified"));

        let quiz = build(
            &CapabilityRequest::QuizGeneration {
                topic: "Lifetimes".into(),
                difficulty: Difficulty::Advanced,
                learning_style: LearningStyle::ReadingWriting,
                question_count: 4,
            },
            800,
        );
        assert_eq!(quiz.max_tokens, 1600);
        assert!(quiz.user.starts_with("Generate 4 quiz questions"));
        assert!(quiz.user.contains("Learning Style: reading_writing"));
    }

    #[test]
    fn test_recommendation_prompt_carries_performance() {
        let prompt = build(
            &CapabilityRequest::Recommendation {
                user_id: "learner-42".into(),
                current_topic: None,
                performance: Performance {
                    accuracy: 0.625,
                    time_spent: 900.0,
                    engagement: 0.5,
                },
                learning_style: None,
                current_difficulty: None,
            },
            1000,
        );
        assert!(prompt.user.contains("Learner: learner-42"));
        assert!(prompt.user.contains("Accuracy: 0.62") || prompt.user.contains("Accuracy: 0.63"));
        assert!(prompt.user.contains("Time spent (seconds): 900"));
        assert!(prompt.user.contains("Current difficulty: intermediate"));
    }
}
