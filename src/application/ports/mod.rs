//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod external_inference;
mod status_cache;

pub use external_inference::{ExternalError, ExternalInferencePort};
pub use status_cache::{
    CapabilityAvailability, ExternalSettings, ProbeRecord, ServiceStatus, StatusCachePort,
};
