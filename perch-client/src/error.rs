//! 客户端错误类型

use shared::message::wire::WireError;

/// Client-side errors for the message bus and seat feed
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 连接失败或连接中断
    #[error("Connection error: {0}")]
    Connection(String),

    /// RPC 请求超时
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 序列化/反序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 服务端拒绝了请求 (校验失败、未知操作等)
    #[error("Request rejected: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },
}

impl From<WireError> for ClientError {
    fn from(e: WireError) -> Self {
        ClientError::Connection(e.to_string())
    }
}
