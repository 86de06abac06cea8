//! 错误定义模块

use thiserror::Error;

/// 系统统一错误类型
#[derive(Error, Debug)]
pub enum WardError {
    #[error("{0}")]
    Validation(String),

    #[error("Patient with ID {0} not found")]
    PatientNotFound(i64),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WardError {
    /// 是否为输入校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, WardError::Validation(_))
    }

    /// 是否为资源未找到
    pub fn is_not_found(&self) -> bool {
        matches!(self, WardError::PatientNotFound(_))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for WardError {
    fn from(err: sqlx::Error) -> Self {
        WardError::Database(err.to_string())
    }
}

/// 系统统一结果类型
pub type Result<T> = std::result::Result<T, WardError>;
