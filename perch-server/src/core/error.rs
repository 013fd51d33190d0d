//! 服务器级错误

use crate::store::StoreError;

/// 启动/运行期错误 (API 层错误见 [`crate::utils::AppError`])
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seat store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
