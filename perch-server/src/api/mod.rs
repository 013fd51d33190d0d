//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`seats`] - 座位读写接口
//! - [`zones`] - 分区布局接口
//! - [`share`] - 分享链接接口

pub mod health;
pub mod seats;
pub mod share;
pub mod zones;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(seats::router())
        .merge(zones::router())
        .merge(share::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
