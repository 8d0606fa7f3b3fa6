//! Memory Layer - In-Memory State Management
//!
//! 实现 StatusCache，管理进程级服务状态

mod status_cache;

pub use status_cache::InMemoryStatusCache;
