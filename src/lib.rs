//! Tutorly - 自适应学习混合推理服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Learning Context: 能力请求、统一推理结果、学习风格与难度
//! - Fallback: 关键词风格分析、模板内容、规则表推荐
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ExternalInference, StatusCache）
//! - Commands: 能力派发、批量派发、外部探测
//! - Queries: 服务状态、能力报告
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: 服务状态缓存
//! - Adapters: OpenAI 兼容补全客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
