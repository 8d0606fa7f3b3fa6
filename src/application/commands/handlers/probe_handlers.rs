//! Probe Command Handlers - 外部服务可达性探测

use std::sync::Arc;

use crate::application::commands::dispatch_commands::ProbeExternalCommand;
use crate::application::ports::{ExternalInferencePort, ServiceStatus, StatusCachePort};

/// ProbeExternal Handler
///
/// 只在外部路径已配置时发起探测；探测本身不计费
pub struct ProbeExternalHandler {
    external: Option<Arc<dyn ExternalInferencePort>>,
    status: Arc<dyn StatusCachePort>,
}

impl ProbeExternalHandler {
    pub fn new(
        external: Option<Arc<dyn ExternalInferencePort>>,
        status: Arc<dyn StatusCachePort>,
    ) -> Self {
        Self { external, status }
    }

    pub async fn handle(&self, _cmd: ProbeExternalCommand) -> ServiceStatus {
        let current = self.status.snapshot();
        let external = match &self.external {
            Some(external) if current.external_configured => external,
            _ => {
                tracing::debug!("External inference not configured, skipping probe");
                return current;
            }
        };

        let reachable = external.probe().await;
        tracing::info!(
            model = external.model_name(),
            reachable = reachable,
            "External inference probed"
        );
        self.status.record_probe(reachable);
        self.status.snapshot()
    }
}
