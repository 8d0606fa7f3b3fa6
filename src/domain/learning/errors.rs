//! Learning Context - Errors

use thiserror::Error;

/// 请求校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} {detail}")]
    OutOfRange { field: &'static str, detail: String },
}
