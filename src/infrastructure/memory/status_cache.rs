//! In-Memory Status Cache Implementation

use chrono::Utc;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::{ExternalSettings, ProbeRecord, ServiceStatus, StatusCachePort};

struct StatusState {
    last_probe: Option<ProbeRecord>,
    /// 惰性计算的快照，探测结果变化时清空
    cached: Option<ServiceStatus>,
}

/// 内存状态缓存
///
/// 读多写少：只有探测会写入
pub struct InMemoryStatusCache {
    settings: ExternalSettings,
    state: RwLock<StatusState>,
}

impl InMemoryStatusCache {
    pub fn new(settings: ExternalSettings) -> Self {
        Self {
            settings,
            state: RwLock::new(StatusState {
                last_probe: None,
                cached: None,
            }),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    // 状态只在写锁内整体替换，锁中毒时数据仍然一致
    fn read(&self) -> RwLockReadGuard<'_, StatusState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StatusState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StatusCachePort for InMemoryStatusCache {
    fn snapshot(&self) -> ServiceStatus {
        if let Some(status) = &self.read().cached {
            return status.clone();
        }

        let mut state = self.write();
        if let Some(status) = &state.cached {
            return status.clone();
        }
        let status = ServiceStatus::compute(&self.settings, state.last_probe.as_ref());
        state.cached = Some(status.clone());
        tracing::debug!(
            external_available = status.external_available,
            "Service status computed"
        );
        status
    }

    fn record_probe(&self, reachable: bool) {
        let mut state = self.write();
        state.last_probe = Some(ProbeRecord {
            reachable,
            checked_at: Utc::now(),
        });
        state.cached = None;
    }
}
