//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod dispatch_handlers;
mod probe_handlers;

pub use dispatch_handlers::*;
pub use probe_handlers::*;
