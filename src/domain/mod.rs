//! Domain Layer - 领域层
//!
//! 包含:
//! - Learning Context: 能力请求、推理结果与值对象
//! - Fallback: 无网络依赖的确定性本地实现

pub mod fallback;
pub mod learning;
