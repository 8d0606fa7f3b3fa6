//! 学习风格关键词分析
//!
//! 三个固定关键词桶（visual / auditory / kinesthetic）：
//! - 每条回答转小写后扫描，每命中一个关键词对应桶计数 +1
//! - 一条回答可同时命中多个桶
//! - 计数归一化后总和为 1；全部为 0 时返回中性先验

use crate::domain::learning::{LearningStyle, StyleProfile, StyleScores};

/// 视觉型关键词
const VISUAL_KEYWORDS: &[&str] = &[
    "visual", "diagram", "chart", "graph", "picture", "image", "video", "see", "watch", "draw",
    "color", "map", "highlight",
];

/// 听觉型关键词
const AUDITORY_KEYWORDS: &[&str] = &[
    "audio", "listen", "hear", "lecture", "podcast", "discuss", "talk", "sound", "verbal",
    "music", "aloud", "conversation",
];

/// 动觉型关键词
const KINESTHETIC_KEYWORDS: &[&str] = &[
    "hands-on", "hands on", "practice", "doing", "build", "experiment", "interactive", "project",
    "exercise", "lab", "move", "touch",
];

/// 关键词桶，顺序即平局时的优先级
const BUCKETS: [(LearningStyle, &[&str]); 3] = [
    (LearningStyle::Visual, VISUAL_KEYWORDS),
    (LearningStyle::Auditory, AUDITORY_KEYWORDS),
    (LearningStyle::Kinesthetic, KINESTHETIC_KEYWORDS),
];

/// 无任何命中时的中性先验
pub const NEUTRAL_PRIOR: [(LearningStyle, f64); 3] = [
    (LearningStyle::Visual, 0.4),
    (LearningStyle::Auditory, 0.3),
    (LearningStyle::Kinesthetic, 0.3),
];

/// 关键词分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAnalysis {
    pub profile: StyleProfile,
    /// 胜出桶的归一化得分
    pub confidence: f64,
}

/// 统计每个桶的命中次数
pub fn count_matches(responses: &[String]) -> [u32; 3] {
    let mut counts = [0u32; 3];
    for response in responses {
        let lowered = response.to_lowercase();
        for (slot, (_, keywords)) in counts.iter_mut().zip(BUCKETS.iter()) {
            *slot += keywords.iter().filter(|kw| lowered.contains(*kw)).count() as u32;
        }
    }
    counts
}

/// 归一化为概率分布
fn normalize(counts: [u32; 3]) -> [f64; 3] {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return NEUTRAL_PRIOR.map(|(_, v)| v);
    }
    let total = total as f64;
    counts.map(|c| c as f64 / total)
}

/// 分析回答，返回学习风格画像
pub fn analyze(responses: &[String]) -> StyleAnalysis {
    let normalized = normalize(count_matches(responses));

    // 严格大于才替换，保证平局时按 BUCKETS 顺序取前者
    let mut primary = 0;
    for i in 1..normalized.len() {
        if normalized[i] > normalized[primary] {
            primary = i;
        }
    }

    let mut secondary: Option<usize> = None;
    for i in 0..normalized.len() {
        if i == primary || normalized[i] <= 0.0 {
            continue;
        }
        match secondary {
            Some(s) if normalized[i] <= normalized[s] => {}
            _ => secondary = Some(i),
        }
    }

    let scores: StyleScores = BUCKETS
        .iter()
        .zip(normalized.iter())
        .map(|((style, _), score)| (*style, *score))
        .collect();

    let primary_style = BUCKETS[primary].0;

    StyleAnalysis {
        profile: StyleProfile {
            primary_style,
            secondary_style: secondary.map(|i| BUCKETS[i].0),
            scores,
            adaptations: adaptations_for(primary_style)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            considerations: vec![],
        },
        confidence: normalized[primary],
    }
}

/// 按风格查表的学习建议
pub fn adaptations_for(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &[
            "Use diagrams and charts to understand concepts",
            "Take visual notes with colors and highlighting",
            "Watch educational videos and animations",
            "Create mind maps for complex topics",
        ],
        LearningStyle::Auditory => &[
            "Listen to educational podcasts and lectures",
            "Discuss topics with others or explain them aloud",
            "Use text-to-speech for reading materials",
            "Record yourself explaining concepts",
        ],
        LearningStyle::Kinesthetic => &[
            "Use hands-on activities and simulations",
            "Take frequent breaks during study sessions",
            "Use physical objects to understand abstract concepts",
            "Practice skills through real-world applications",
        ],
        LearningStyle::ReadingWriting => &[
            "Rewrite key ideas in your own words",
            "Keep a structured written summary per topic",
            "Read reference documentation alongside examples",
            "Turn diagrams into written step lists",
        ],
    }
}
