//! 应用层 - 命令
//!
//! CQRS 命令侧：能力派发与可达性探测

mod dispatch_commands;

pub mod handlers;

pub use dispatch_commands::*;
