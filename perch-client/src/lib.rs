//! Perch Client - 座位服务客户端
//!
//! 提供两层 API：
//!
//! - [`MessageClient`] - 底层消息总线客户端 (TCP / 同进程内存传输)，
//!   支持事件订阅和 RPC 式的指令请求
//! - [`SeatFeed`] - 座位图实时通道：`subscribe` 立即回调一次当前
//!   服务端状态，之后每次任何客户端写入都会再次回调；`publish`
//!   写入单条座位记录并等待服务端确认

pub mod error;
pub mod feed;
pub mod message;

pub use error::ClientError;
pub use feed::{SeatFeed, SeatSubscription};
pub use message::MessageClient;
