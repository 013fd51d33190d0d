//! Perch Seat Server - 办公室座位图实时同步服务端
//!
//! # 架构概述
//!
//! 本模块是 Seat Server 的主入口，提供以下核心功能：
//!
//! - **消息总线** (`message`): 支持 TCP/Memory 传输的实时消息系统，
//!   每次座位写入后向所有客户端推送完整座位图
//! - **存储** (`store`): 嵌入式 redb 座位数据库
//! - **HTTP API** (`api`): RESTful API 接口 (座位、分区、分享链接)
//!
//! # 模块结构
//!
//! ```text
//! perch-server/src/
//! ├── core/          # 配置、状态、服务器生命周期
//! ├── api/           # HTTP 路由和处理器
//! ├── message/       # 消息总线
//! ├── store/         # 存储层
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod message;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType, MessageBus, TransportConfig};
pub use store::SeatStore;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____                 __
   / __ \___  __________/ /_
  / /_/ / _ \/ ___/ ___/ __ \
 / ____/  __/ /  / /__/ / / /
/_/    \___/_/   \___/_/ /_/
    "#
    );
}
