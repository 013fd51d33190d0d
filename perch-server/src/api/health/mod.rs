//! Health API 模块

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthInfo {
    status: &'static str,
    plan_version: u64,
    occupied_seats: usize,
    connected_clients: usize,
}

/// GET /api/health - 服务健康状态
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthInfo>> {
    let (plan_version, seats) = state.plan_snapshot().await?;
    Ok(Json(HealthInfo {
        status: "ok",
        plan_version,
        occupied_seats: seats.occupied_count(),
        connected_clients: state.message_bus().get_connected_clients().len(),
    }))
}
