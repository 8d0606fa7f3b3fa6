//! Status Cache Port - 服务状态缓存
//!
//! 进程级的 ServiceStatus：惰性计算，探测结果变化时失效。
//! 外部配置只在启动时加载一次。
//! Dispatcher 和 Reporter 共用同一份状态，不再各自临时判断

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::learning::Capability;

/// 外部路径的配置快照
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalSettings {
    /// 是否存在非空凭证
    pub credential_present: bool,
    /// 强制仅使用本地降级
    pub force_fallback_only: bool,
    /// 模型名称
    pub model_name: String,
}

impl ExternalSettings {
    /// 凭证存在且未被强制关闭
    pub fn is_configured(&self) -> bool {
        self.credential_present && !self.force_fallback_only
    }
}

/// 最近一次探测结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRecord {
    pub reachable: bool,
    pub checked_at: DateTime<Utc>,
}

/// 单个能力的可用路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityAvailability {
    pub external: bool,
    pub fallback: bool,
}

impl CapabilityAvailability {
    /// 至少有一条路径可用
    pub fn is_available(&self) -> bool {
        self.external || self.fallback
    }
}

/// 服务状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    /// 凭证存在且未强制降级
    pub external_configured: bool,
    /// 已配置且最近一次探测（如有）成功
    pub external_available: bool,
    pub model_name: Option<String>,
    pub fallback_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_probe: Option<ProbeRecord>,
    pub capabilities: BTreeMap<Capability, CapabilityAvailability>,
}

impl ServiceStatus {
    /// 由配置与探测记录计算状态
    ///
    /// external_available = 已配置 且（从未探测 或 最近一次探测成功）
    pub fn compute(settings: &ExternalSettings, last_probe: Option<&ProbeRecord>) -> Self {
        let external_configured = settings.is_configured();
        let external_available = external_configured && last_probe.map_or(true, |p| p.reachable);

        let capabilities = Capability::ALL
            .iter()
            .map(|c| {
                (
                    *c,
                    CapabilityAvailability {
                        external: external_available,
                        fallback: c.supports_fallback(),
                    },
                )
            })
            .collect();

        Self {
            external_configured,
            external_available,
            model_name: external_configured.then(|| settings.model_name.clone()),
            fallback_available: true,
            last_probe: last_probe.cloned(),
            capabilities,
        }
    }

    pub fn capability(&self, capability: Capability) -> CapabilityAvailability {
        self.capabilities
            .get(&capability)
            .copied()
            .unwrap_or(CapabilityAvailability {
                external: self.external_available,
                fallback: capability.supports_fallback(),
            })
    }
}

/// Status Cache Port
///
/// 外部配置在启动时确定一次，运行期只有探测结果会变化
pub trait StatusCachePort: Send + Sync {
    /// 读取当前状态（必要时重新计算）
    fn snapshot(&self) -> ServiceStatus;

    /// 记录一次探测结果
    fn record_probe(&self, reachable: bool);
}
