//! 消息总线客户端

mod client;
mod transport;

pub use client::MessageClient;
pub use transport::{ClientTransport, MemoryTransport, TcpTransport};
