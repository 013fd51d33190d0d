//! 存储层
//!
//! 嵌入式 redb 数据库，保存共享座位图。

pub mod seats;

pub use seats::{SeatStore, StoreError, StoreResult};
