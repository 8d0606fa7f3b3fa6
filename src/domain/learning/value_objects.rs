//! Learning Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 学习风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    #[serde(alias = "reading/writing", alias = "reading-writing")]
    ReadingWriting,
}

impl LearningStyle {
    /// 请求模型允许的全部学习风格
    pub const ALL: [LearningStyle; 4] = [
        Self::Visual,
        Self::Auditory,
        Self::Kinesthetic,
        Self::ReadingWriting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::ReadingWriting => "reading_writing",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    /// 大小写不敏感，接受 reading/writing 的常见写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visual" => Ok(Self::Visual),
            "auditory" => Ok(Self::Auditory),
            "kinesthetic" => Ok(Self::Kinesthetic),
            "reading_writing" | "reading/writing" | "reading-writing" | "reading writing" => {
                Ok(Self::ReadingWriting)
            }
            other => Err(format!("unknown learning style: {}", other)),
        }
    }
}

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// 降一级，已是最低级时保持不变
    pub fn easier(&self) -> Self {
        match self {
            Self::Beginner | Self::Intermediate => Self::Beginner,
            Self::Advanced => Self::Intermediate,
        }
    }

    /// 升一级，已是最高级时保持不变
    pub fn harder(&self) -> Self {
        match self {
            Self::Beginner => Self::Intermediate,
            Self::Intermediate | Self::Advanced => Self::Advanced,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// AI 能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    StyleAnalysis,
    ContentGeneration,
    Recommendation,
    QuizGeneration,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Self::StyleAnalysis,
        Self::ContentGeneration,
        Self::Recommendation,
        Self::QuizGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StyleAnalysis => "style_analysis",
            Self::ContentGeneration => "content_generation",
            Self::Recommendation => "recommendation",
            Self::QuizGeneration => "quiz_generation",
        }
    }

    /// 是否存在本地降级实现
    ///
    /// 出题只能走外部模型
    pub fn supports_fallback(&self) -> bool {
        !matches!(self, Self::QuizGeneration)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    External,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
