//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：服务状态与能力报告

mod status_queries;

pub mod handlers;

pub use status_queries::*;
