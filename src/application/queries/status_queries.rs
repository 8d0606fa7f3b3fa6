//! Status Queries - 服务状态查询

/// 查询服务状态
#[derive(Debug, Clone, Default)]
pub struct GetStatus;

/// 查询各能力详情
#[derive(Debug, Clone, Default)]
pub struct GetCapabilities;
