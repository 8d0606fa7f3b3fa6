//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ExternalInferencePort、StatusCachePort）
//! - commands: 能力派发、批量派发、外部探测
//! - queries: 服务状态、能力报告
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    DispatchBatchCommand,
    DispatchCommand,
    ProbeExternalCommand,
    // Handlers
    handlers::{DispatchHandler, ProbeExternalHandler},
};

pub use error::ApplicationError;

pub use ports::{
    CapabilityAvailability,
    ExternalError,
    ExternalInferencePort,
    ExternalSettings,
    ProbeRecord,
    ServiceStatus,
    StatusCachePort,
};

pub use queries::{
    GetCapabilities,
    GetStatus,
    // Handlers
    handlers::{CapabilityDetail, CapabilityReport, GetCapabilitiesHandler, GetStatusHandler},
};
