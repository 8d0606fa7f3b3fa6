//! Status Query Handlers
//!
//! 只读查询，不会触发任何计费的外部调用

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::ports::{ServiceStatus, StatusCachePort};
use crate::application::queries::{GetCapabilities, GetStatus};
use crate::domain::learning::Capability;

// ============================================================================
// Response DTOs
// ============================================================================

/// 单个能力详情
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityDetail {
    pub available: bool,
    /// 是否由外部模型增强
    pub enhanced: bool,
    pub features: Vec<&'static str>,
}

/// 能力报告
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub capabilities: BTreeMap<Capability, CapabilityDetail>,
    pub status: ServiceStatus,
}

fn features(capability: Capability, enhanced: bool) -> Vec<&'static str> {
    match (capability, enhanced) {
        (Capability::StyleAnalysis, true) => vec![
            "Visual, auditory, kinesthetic, reading/writing classification",
            "Confidence scoring",
            "Personalized adaptations",
            "Neurodivergent considerations",
        ],
        (Capability::StyleAnalysis, false) => vec![
            "Visual, auditory, kinesthetic classification",
            "Confidence scoring",
            "Basic adaptations",
        ],
        (Capability::ContentGeneration, true) => vec![
            "Topic-specific content",
            "Learning style adaptation",
            "Difficulty level adjustment",
            "Interactive exercises",
            "Assessment questions",
        ],
        (Capability::ContentGeneration, false) => vec![
            "Topic-specific content",
            "Learning style adaptation",
            "Difficulty level adjustment",
            "Basic exercises",
        ],
        (Capability::Recommendation, true) => vec![
            "Personalized learning paths",
            "Performance-based suggestions",
            "Confidence scoring",
            "Time estimates",
        ],
        (Capability::Recommendation, false) => vec![
            "Performance-based suggestions",
            "Confidence scoring",
            "Basic recommendations",
        ],
        (Capability::QuizGeneration, true) => vec![
            "Adaptive question generation",
            "Multiple question types",
            "Learning style specific questions",
            "Detailed explanations",
        ],
        (Capability::QuizGeneration, false) => vec![],
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetStatus Handler
pub struct GetStatusHandler {
    status: Arc<dyn StatusCachePort>,
}

impl GetStatusHandler {
    pub fn new(status: Arc<dyn StatusCachePort>) -> Self {
        Self { status }
    }

    pub fn handle(&self, _query: GetStatus) -> ServiceStatus {
        self.status.snapshot()
    }
}

/// GetCapabilities Handler
pub struct GetCapabilitiesHandler {
    status: Arc<dyn StatusCachePort>,
}

impl GetCapabilitiesHandler {
    pub fn new(status: Arc<dyn StatusCachePort>) -> Self {
        Self { status }
    }

    pub fn handle(&self, _query: GetCapabilities) -> CapabilityReport {
        let status = self.status.snapshot();
        let capabilities = Capability::ALL
            .iter()
            .map(|c| {
                let availability = status.capability(*c);
                (
                    *c,
                    CapabilityDetail {
                        available: availability.is_available(),
                        enhanced: availability.external,
                        features: features(*c, availability.external),
                    },
                )
            })
            .collect();

        CapabilityReport {
            capabilities,
            status,
        }
    }
}
