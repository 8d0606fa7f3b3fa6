//! 规则表推荐
//!
//! 分支只取决于 accuracy:
//! - accuracy < 0.5          → 补救（降一级难度）
//! - 0.5 <= accuracy < 0.85  → 巩固（保持难度）
//! - accuracy >= 0.85        → 进阶（升一级难度）

use crate::domain::learning::{
    Difficulty, LearningStyle, Performance, RecommendationBranch, RecommendationEntry,
    Recommendations,
};

/// 巩固分支下限
pub const REINFORCEMENT_THRESHOLD: f64 = 0.5;
/// 进阶分支下限
pub const NEXT_DIFFICULTY_THRESHOLD: f64 = 0.85;

/// 未指定当前难度时的默认值
pub const DEFAULT_CURRENT_DIFFICULTY: Difficulty = Difficulty::Intermediate;

const GENERIC_TOPIC: &str = "your current topic";

impl RecommendationBranch {
    /// 按正确率选择分支
    pub fn for_accuracy(accuracy: f64) -> Self {
        if accuracy < REINFORCEMENT_THRESHOLD {
            Self::Remedial
        } else if accuracy < NEXT_DIFFICULTY_THRESHOLD {
            Self::Reinforcement
        } else {
            Self::NextDifficulty
        }
    }

    /// 分支固定置信度
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Remedial => 0.8,
            Self::Reinforcement => 0.75,
            Self::NextDifficulty => 0.9,
        }
    }

    /// 分支固定理由
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Remedial => {
                "Recent accuracy is below 50%; revisiting the fundamentals at an easier level will close the gaps"
            }
            Self::Reinforcement => {
                "Recent accuracy is solid but not yet mastered; more practice at the same level will consolidate it"
            }
            Self::NextDifficulty => {
                "Recent accuracy is at or above 85%; you are ready for more challenging material"
            }
        }
    }

    fn target_difficulty(&self, current: Difficulty) -> Difficulty {
        match self {
            Self::Remedial => current.easier(),
            Self::Reinforcement => current,
            Self::NextDifficulty => current.harder(),
        }
    }

    /// (标题, 描述, 预计分钟数)
    fn activities(&self) -> &'static [(&'static str, &'static str, u32)] {
        match self {
            Self::Remedial => &[
                (
                    "Review the fundamentals of {topic}",
                    "Step back to the core ideas of {topic} with short guided examples",
                    20,
                ),
                (
                    "Guided practice: {topic}",
                    "Work through scaffolded exercises with hints available at every step",
                    15,
                ),
            ],
            Self::Reinforcement => &[
                (
                    "Practice set: {topic}",
                    "Solve a fresh set of exercises on {topic} at the same level",
                    25,
                ),
                (
                    "Spaced review of {topic}",
                    "Revisit {topic} tomorrow with a short recall quiz",
                    10,
                ),
            ],
            Self::NextDifficulty => &[(
                "Next level: {topic}",
                "Move on to harder material that builds on {topic}",
                30,
            )],
        }
    }
}

/// 基于风格的附加建议（可选）
fn style_note(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Visual => "Prefer diagram-heavy material",
        LearningStyle::Auditory => "Prefer narrated or discussion-based material",
        LearningStyle::Kinesthetic => "Prefer hands-on exercises",
        LearningStyle::ReadingWriting => "Prefer written walkthroughs",
    }
}

/// 生成推荐
///
/// 返回推荐列表及分支固定置信度
pub fn recommend(
    current_topic: Option<&str>,
    performance: &Performance,
    learning_style: Option<LearningStyle>,
    current_difficulty: Option<Difficulty>,
) -> (Recommendations, f64) {
    let branch = RecommendationBranch::for_accuracy(performance.accuracy);
    let topic = current_topic
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(GENERIC_TOPIC);
    let difficulty = branch.target_difficulty(current_difficulty.unwrap_or(DEFAULT_CURRENT_DIFFICULTY));

    let entries = branch
        .activities()
        .iter()
        .map(|(title, description, minutes)| {
            let mut description = description.replace("{topic}", topic);
            if let Some(style) = learning_style {
                description = format!("{}. {}", description, style_note(style));
            }
            RecommendationEntry {
                title: title.replace("{topic}", topic),
                description,
                reason: branch.reason().to_string(),
                confidence: branch.confidence(),
                difficulty,
                time_estimate_minutes: Some(*minutes),
                branch: Some(branch),
            }
        })
        .collect();

    (Recommendations { entries }, branch.confidence())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_of(accuracy: f64) -> RecommendationBranch {
        let (recs, _) = recommend(None, &Performance::new(accuracy), None, None);
        recs.entries[0].branch.unwrap()
    }

    #[test]
    fn test_branch_selection() {
        assert_eq!(branch_of(0.4), RecommendationBranch::Remedial);
        assert_eq!(branch_of(0.6), RecommendationBranch::Reinforcement);
        assert_eq!(branch_of(0.95), RecommendationBranch::NextDifficulty);
    }

    #[test]
    fn test_branch_boundaries() {
        assert_eq!(branch_of(0.5), RecommendationBranch::Reinforcement);
        assert_eq!(branch_of(0.85), RecommendationBranch::NextDifficulty);
        assert_eq!(branch_of(0.0), RecommendationBranch::Remedial);
        assert_eq!(branch_of(1.0), RecommendationBranch::NextDifficulty);
    }

    #[test]
    fn test_every_entry_carries_branch_reason_and_confidence() {
        let (recs, confidence) = recommend(Some("Loops"), &Performance::new(0.3), None, None);
        assert!(!recs.entries.is_empty());
        assert_eq!(confidence, RecommendationBranch::Remedial.confidence());
        for entry in &recs.entries {
            assert_eq!(entry.reason, RecommendationBranch::Remedial.reason());
            assert_eq!(entry.confidence, confidence);
        }
        assert_eq!(recs.entries[0].title, "Review the fundamentals of Loops");
    }

    #[test]
    fn test_difficulty_moves_with_branch() {
        let perf = Performance::new(0.2);
        let (recs, _) = recommend(None, &perf, None, Some(Difficulty::Beginner));
        assert_eq!(recs.entries[0].difficulty, Difficulty::Beginner);

        let perf = Performance::new(0.9);
        let (recs, _) = recommend(None, &perf, None, None);
        assert_eq!(recs.entries[0].difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_branch_ignores_time_and_engagement() {
        let mut perf = Performance::new(0.6);
        let (a, _) = recommend(None, &perf, None, None);
        perf.time_spent = 7200.0;
        perf.engagement = 0.1;
        let (b, _) = recommend(None, &perf, None, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_topic_uses_generic_wording() {
        let (recs, _) = recommend(Some("  "), &Performance::new(0.9), None, None);
        assert_eq!(recs.entries[0].title, "Next level: your current topic");
    }

    #[test]
    fn test_style_note_appended() {
        let (recs, _) = recommend(
            Some("Maps"),
            &Performance::new(0.7),
            Some(LearningStyle::Visual),
            None,
        );
        assert!(recs.entries[0]
            .description
            .ends_with("Prefer diagram-heavy material"));
    }
}
