//! Transport 传输层抽象
//!
//! 提供可插拔的传输层架构：
//! ```text
//!         ┌────────────────────┐
//!         │   Transport Trait  │  ◄── 可插拔接口
//!         └────────┬───────────┘
//!                  │
//!          ┌───────┴────────┐
//!          ▼                ▼
//!     TcpTransport    MemoryTransport
//!     (TCP 协议)      (同进程通信)
//! ```
//!
//! Framing lives in `shared::message::wire` so the client crate speaks
//! the exact same protocol.

mod memory;
mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

use async_trait::async_trait;
use shared::message::BusMessage;
use shared::message::wire::WireError;

use crate::utils::AppError;

impl From<WireError> for AppError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Disconnected => AppError::ClientDisconnected,
            WireError::InvalidEventType(t) => {
                AppError::invalid(format!("Invalid event type: {}", t))
            }
            WireError::Io(e) => AppError::internal(format!("Transport I/O failed: {}", e)),
        }
    }
}

/// Transport 传输层特征
///
/// 所有传输实现必须实现此特征，支持消息的读写和连接管理。
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// 从传输层读取一条消息
    async fn read_message(&self) -> Result<BusMessage, AppError>;

    /// 向传输层写入一条消息
    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError>;

    /// 关闭传输连接
    async fn close(&self) -> Result<(), AppError>;

    /// 获取对端地址
    fn peer_addr(&self) -> Option<String> {
        None
    }
}
