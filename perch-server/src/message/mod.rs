//! 消息总线
//!
//! 实时同步通道：任意客户端写入座位后，服务端把完整座位图
//! 推送给所有在线客户端。

mod bus;
mod handler;
mod tcp_server;
pub mod transport;

pub use bus::{MessageBus, TransportConfig};
pub use handler::MessageHandler;

// Re-export shared wire types for convenience
pub use shared::message::{BusMessage, EventType};

/// 已连接客户端信息
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub id: String,
    pub name: Option<String>,
    pub addr: Option<String>,
}
