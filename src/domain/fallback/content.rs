//! 模板化课程内容生成
//!
//! 按 (learning_style, difficulty) 查模板并替换 `{topic}`，
//! 再附加按风格查表的练习与适配说明。
//! 模板表在构造时做完整性校验，缺项属于配置错误。

use std::collections::{BTreeSet, HashMap};

use super::errors::FallbackError;
use crate::domain::learning::{Difficulty, Exercise, LearningStyle, LessonContent};

const TOPIC_PLACEHOLDER: &str = "{topic}";

/// 本地生成内容的 content_type
pub const FALLBACK_CONTENT_TYPE: &str = "lesson";

/// 内容模板条目
#[derive(Debug, Clone, Copy)]
pub struct ContentTemplate {
    pub learning_style: LearningStyle,
    pub difficulty: Difficulty,
    pub body: &'static str,
}

const fn template(
    learning_style: LearningStyle,
    difficulty: Difficulty,
    body: &'static str,
) -> ContentTemplate {
    ContentTemplate {
        learning_style,
        difficulty,
        body,
    }
}

/// 内置模板表
pub const BUILTIN_TEMPLATES: &[ContentTemplate] = &[
    template(
        LearningStyle::Visual,
        Difficulty::Beginner,
        "{topic} at a glance: start from a labelled diagram of the core idea, then follow a colour-coded flowchart of one simple example from input to result.",
    ),
    template(
        LearningStyle::Visual,
        Difficulty::Intermediate,
        "{topic} mapped out: compare two annotated diagrams side by side, trace how data moves between the parts, and sketch a mind map linking {topic} to what you already know.",
    ),
    template(
        LearningStyle::Visual,
        Difficulty::Advanced,
        "{topic} in depth: build a layered architecture diagram, mark the trade-offs on it, and use a timeline chart to show how edge cases unfold.",
    ),
    template(
        LearningStyle::Auditory,
        Difficulty::Beginner,
        "{topic} explained aloud: listen to a short walkthrough of the basic idea, then repeat the key terms out loud in your own words.",
    ),
    template(
        LearningStyle::Auditory,
        Difficulty::Intermediate,
        "{topic} as a conversation: follow a dialogue between a mentor and a learner working through a realistic case, pausing to predict each answer before it is spoken.",
    ),
    template(
        LearningStyle::Auditory,
        Difficulty::Advanced,
        "{topic} debated: listen to two opposing approaches argued in full, then record a short verbal summary defending the one you would choose.",
    ),
    template(
        LearningStyle::Kinesthetic,
        Difficulty::Beginner,
        "{topic} by doing: work through a guided hands-on example one small step at a time and check the result after every change.",
    ),
    template(
        LearningStyle::Kinesthetic,
        Difficulty::Intermediate,
        "{topic} in practice: build a small working project that uses {topic}, break it on purpose, and fix it again to see how each part behaves.",
    ),
    template(
        LearningStyle::Kinesthetic,
        Difficulty::Advanced,
        "{topic} under pressure: extend a real project with {topic}, run experiments against edge cases, and measure the effect of each design choice.",
    ),
    template(
        LearningStyle::ReadingWriting,
        Difficulty::Beginner,
        "{topic} in writing: read a short plain-language definition, then write three sentences describing {topic} with one example each.",
    ),
    template(
        LearningStyle::ReadingWriting,
        Difficulty::Intermediate,
        "{topic} annotated: read a worked example line by line, write margin notes on every decision, and summarise the pattern as a checklist.",
    ),
    template(
        LearningStyle::ReadingWriting,
        Difficulty::Advanced,
        "{topic} reviewed: read reference material critically, write a short technical note comparing approaches, and list open questions for further study.",
    ),
];

/// 按风格查表的练习骨架（标题、步骤）
fn exercise_stubs(style: LearningStyle) -> &'static [(&'static str, &'static [&'static str])] {
    match style {
        LearningStyle::Visual => &[
            (
                "Draw the {topic} diagram",
                &["Sketch the main parts of {topic}", "Connect them with labelled arrows"],
            ),
            (
                "Colour-code an example",
                &["Pick one example of {topic}", "Highlight each stage in a different colour"],
            ),
        ],
        LearningStyle::Auditory => &[
            (
                "Explain {topic} aloud",
                &["Describe {topic} out loud for two minutes", "Note where you hesitated"],
            ),
            (
                "Discuss with a partner",
                &["Ask a partner one question about {topic}", "Answer theirs in return"],
            ),
        ],
        LearningStyle::Kinesthetic => &[
            (
                "Hands-on {topic} drill",
                &["Type out a minimal {topic} example", "Change one thing and observe the result"],
            ),
            (
                "Mini project",
                &["Build something small that uses {topic}", "Take a short break, then refine it"],
            ),
        ],
        LearningStyle::ReadingWriting => &[
            (
                "Write a {topic} summary",
                &["Read the lesson once", "Write a five-line summary without looking"],
            ),
            (
                "Make a glossary",
                &["List the key terms of {topic}", "Define each in one sentence"],
            ),
        ],
    }
}

/// 按风格查表的适配说明
fn style_adaptations(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &[
            "Diagrams accompany every new concept",
            "Key terms are highlighted consistently",
        ],
        LearningStyle::Auditory => &[
            "Each section can be read aloud or listened to",
            "Short verbal recap after every section",
        ],
        LearningStyle::Kinesthetic => &[
            "Hands-on checkpoint after every concept",
            "Built-in break every 20-30 minutes",
        ],
        LearningStyle::ReadingWriting => &[
            "Written summaries close every section",
            "Space for notes next to each example",
        ],
    }
}

fn fill(text: &str, topic: &str) -> String {
    text.replace(TOPIC_PLACEHOLDER, topic)
}

/// 经过完整性校验的模板表
#[derive(Debug, Clone)]
pub struct ContentTemplates {
    table: HashMap<(LearningStyle, Difficulty), &'static str>,
}

impl ContentTemplates {
    /// 使用内置模板表
    pub fn builtin() -> Result<Self, FallbackError> {
        Self::from_entries(BUILTIN_TEMPLATES)
    }

    /// 从模板条目构建并校验
    ///
    /// 请求模型允许的每个 (风格, 难度) 组合都必须有模板
    pub fn from_entries(entries: &[ContentTemplate]) -> Result<Self, FallbackError> {
        let table: HashMap<_, _> = entries
            .iter()
            .map(|t| ((t.learning_style, t.difficulty), t.body))
            .collect();

        for style in LearningStyle::ALL {
            for difficulty in Difficulty::ALL {
                if !table.contains_key(&(style, difficulty)) {
                    return Err(FallbackError::MissingTemplate { style, difficulty });
                }
            }
        }

        Ok(Self { table })
    }

    /// 生成课程内容
    pub fn generate(
        &self,
        topic: &str,
        style: LearningStyle,
        difficulty: Difficulty,
        preferences: &BTreeSet<String>,
    ) -> Result<LessonContent, FallbackError> {
        let body = self
            .table
            .get(&(style, difficulty))
            .ok_or(FallbackError::MissingTemplate { style, difficulty })?;

        let exercises = exercise_stubs(style)
            .iter()
            .map(|(title, steps)| Exercise {
                title: fill(title, topic),
                instructions: steps.iter().map(|s| fill(s, topic)).collect(),
            })
            .collect();

        let mut adaptations: Vec<String> = style_adaptations(style)
            .iter()
            .map(|s| s.to_string())
            .collect();
        adaptations.extend(preferences.iter().map(|p| format!("Preference noted: {}", p)));

        Ok(LessonContent {
            content_type: FALLBACK_CONTENT_TYPE.to_string(),
            difficulty_level: difficulty,
            content: fill(body, topic),
            exercises,
            adaptations,
            assessment: vec![],
            resources: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_complete() {
        let templates = ContentTemplates::builtin().unwrap();
        for style in LearningStyle::ALL {
            for difficulty in Difficulty::ALL {
                let content = templates
                    .generate("Closures", style, difficulty, &BTreeSet::new())
                    .unwrap();
                assert!(content.content.contains("Closures"));
                assert!(!content.content.contains(TOPIC_PLACEHOLDER));
                assert_eq!(content.difficulty_level, difficulty);
            }
        }
    }

    #[test]
    fn test_missing_combination_is_configuration_error() {
        let partial: Vec<ContentTemplate> = BUILTIN_TEMPLATES
            .iter()
            .copied()
            .filter(|t| {
                !(t.learning_style == LearningStyle::ReadingWriting
                    && t.difficulty == Difficulty::Advanced)
            })
            .collect();

        match ContentTemplates::from_entries(&partial) {
            Err(FallbackError::MissingTemplate { style, difficulty }) => {
                assert_eq!(style, LearningStyle::ReadingWriting);
                assert_eq!(difficulty, Difficulty::Advanced);
            }
            other => panic!("expected missing template, got {:?}", other),
        }
    }

    #[test]
    fn test_exercises_and_adaptations_present() {
        let templates = ContentTemplates::builtin().unwrap();
        let prefs: BTreeSet<String> = ["examples".to_string(), "dark mode".to_string()].into();
        let content = templates
            .generate("Iterators", LearningStyle::Kinesthetic, Difficulty::Beginner, &prefs)
            .unwrap();

        assert_eq!(content.content_type, FALLBACK_CONTENT_TYPE);
        assert_eq!(content.exercises.len(), 2);
        assert_eq!(content.exercises[0].title, "Hands-on Iterators drill");
        // BTreeSet 保证偏好按字典序追加
        assert_eq!(
            &content.adaptations[2..],
            &["Preference noted: dark mode", "Preference noted: examples"]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let templates = ContentTemplates::builtin().unwrap();
        let prefs = BTreeSet::from(["practice".to_string()]);
        let a = templates
            .generate("Traits", LearningStyle::Auditory, Difficulty::Advanced, &prefs)
            .unwrap();
        let b = templates
            .generate("Traits", LearningStyle::Auditory, Difficulty::Advanced, &prefs)
            .unwrap();
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }
}
