//! Status Handlers
//!
//! status / capabilities 只读缓存，不触发外部调用；probe 会发起一次探测

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CapabilityReport, GetCapabilities, GetStatus, ProbeExternalCommand, ServiceStatus,
};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ServiceStatus>> {
    Json(ApiResponse::success(state.get_status_handler.handle(GetStatus)))
}

pub async fn get_capabilities(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<CapabilityReport>> {
    Json(ApiResponse::success(
        state.get_capabilities_handler.handle(GetCapabilities),
    ))
}

pub async fn probe_external(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ServiceStatus>> {
    let status = state.probe_handler.handle(ProbeExternalCommand).await;
    Json(ApiResponse::success(status))
}
