//! Dispatch Commands - 能力派发相关命令

use crate::domain::learning::CapabilityRequest;

/// 派发单个能力请求
#[derive(Debug, Clone)]
pub struct DispatchCommand {
    pub request: CapabilityRequest,
}

impl DispatchCommand {
    pub fn new(request: CapabilityRequest) -> Self {
        Self { request }
    }
}

/// 批量派发
///
/// 每个请求独立派发，结果与输入一一对应、顺序一致
#[derive(Debug, Clone)]
pub struct DispatchBatchCommand {
    pub requests: Vec<CapabilityRequest>,
}

/// 探测外部服务并刷新可达性
#[derive(Debug, Clone, Default)]
pub struct ProbeExternalCommand;
