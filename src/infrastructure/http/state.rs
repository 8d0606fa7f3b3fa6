//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    DispatchHandler, ProbeExternalHandler,
    // Query handlers
    GetCapabilitiesHandler, GetStatusHandler,
    // Ports
    ExternalInferencePort, StatusCachePort,
};
use crate::domain::fallback::FallbackEngine;

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub dispatch_handler: DispatchHandler,
    pub probe_handler: ProbeExternalHandler,

    // ========== Query Handlers ==========
    pub get_status_handler: GetStatusHandler,
    pub get_capabilities_handler: GetCapabilitiesHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `external` 为 None 时外部路径整体关闭
    pub fn new(
        external: Option<Arc<dyn ExternalInferencePort>>,
        fallback: Arc<FallbackEngine>,
        status: Arc<dyn StatusCachePort>,
        external_timeout: Duration,
    ) -> Self {
        Self {
            // Command handlers
            dispatch_handler: DispatchHandler::new(
                external.clone(),
                fallback,
                status.clone(),
                external_timeout,
            ),
            probe_handler: ProbeExternalHandler::new(external, status.clone()),

            // Query handlers
            get_status_handler: GetStatusHandler::new(status.clone()),
            get_capabilities_handler: GetCapabilitiesHandler::new(status),
        }
    }
}
