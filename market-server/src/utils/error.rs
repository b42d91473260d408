//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构 (`{success, message?, data?, error?}`)
//!
//! Every handler returns `AppResult<Json<AppResponse<T>>>`; domain errors are
//! converted to the same envelope with `success: false` by `IntoResponse`.
//! Database/internal failures are logged here and surfaced generically.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 开发模式下在响应中附带完整错误详情 (生产环境只返回通用信息)
static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// Enable or disable error detail in 5xx response bodies. Set once at
/// startup from [`Config::is_development`](crate::core::Config::is_development).
pub fn expose_error_details(enabled: bool) {
    EXPOSE_ERROR_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Detail for the envelope's `error` field, withheld outside development
fn error_detail(msg: String) -> Option<String> {
    EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed).then_some(msg)
}

/// API 统一响应结构
///
/// ```json
/// {
///   "success": true,
///   "message": "Order created successfully",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Onboarding hint for profile-incomplete rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Seconds left in the rejection cooldown (429 responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_active: Option<bool>,
}

impl<T> AppResponse<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            message: None,
            count: None,
            data: None,
            error: None,
            redirect_to: None,
            remaining_time: None,
            cooldown_active: None,
        }
    }
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("{message}")]
    /// 资料未完善 (400, 附带 onboarding 跳转提示)
    ProfileIncomplete { message: String, redirect_to: String },

    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Conflict: {0}")]
    /// 资源状态冲突 (409)
    Conflict(String),

    #[error("Vendor is in cooldown for {remaining_seconds}s")]
    /// 拒单冷却中 (429)
    Cooldown { remaining_seconds: i64 },

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn profile_incomplete(msg: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::ProfileIncomplete {
            message: msg.into(),
            redirect_to: redirect_to.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn cooldown(remaining_seconds: i64) -> Self {
        Self::Cooldown { remaining_seconds }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Human countdown for the 429 message, mirroring the countdown a UI shows
fn cooldown_message(remaining_seconds: i64) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    let wait = if minutes > 0 {
        format!(
            "{} minute{} and {} second{}",
            minutes,
            if minutes == 1 { "" } else { "s" },
            seconds,
            if seconds == 1 { "" } else { "s" }
        )
    } else {
        format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" })
    };
    format!("You cannot accept this order yet. Please wait {wait} before trying again.")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = AppResponse::<()>::empty(false);

        let status = match self {
            AppError::Validation(msg) => {
                body.message = Some(msg);
                StatusCode::BAD_REQUEST
            }
            AppError::ProfileIncomplete {
                message,
                redirect_to,
            } => {
                body.message = Some(message);
                body.redirect_to = Some(redirect_to);
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden(msg) => {
                body.message = Some(msg);
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(msg) => {
                body.message = Some(msg);
                StatusCode::NOT_FOUND
            }
            AppError::Conflict(msg) => {
                body.message = Some(msg);
                StatusCode::CONFLICT
            }
            AppError::Cooldown { remaining_seconds } => {
                body.message = Some(cooldown_message(remaining_seconds));
                body.remaining_time = Some(remaining_seconds);
                body.cooldown_active = Some(true);
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                body.message = Some("Database error".to_string());
                body.error = error_detail(msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                body.message = Some("Internal server error".to_string());
                body.error = error_detail(msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::db::repository::RepoError> for AppError {
    fn from(e: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Application-level Result type used in HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    let mut body = AppResponse::empty(true);
    body.data = Some(data);
    Json(body)
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    let mut body = AppResponse::empty(true);
    body.message = Some(message.into());
    body.data = Some(data);
    Json(body)
}

/// Create a successful list response with a count
pub fn ok_list<T: Serialize>(data: Vec<T>) -> Json<AppResponse<Vec<T>>> {
    let mut body = AppResponse::empty(true);
    body.count = Some(data.len());
    body.data = Some(data);
    Json(body)
}
