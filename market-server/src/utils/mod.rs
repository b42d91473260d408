//! 工具模块 - 错误、日志、校验

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok, ok_list, ok_with_message};
