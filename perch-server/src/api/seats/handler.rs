//! Seat API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{SeatMap, SeatRecord};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/seats - 获取完整座位图
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<SeatMap>> {
    let (_, seats) = state.plan_snapshot().await?;
    Ok(Json(seats))
}

/// GET /api/seats/:id - 获取单个座位
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SeatRecord>> {
    let record = state
        .store
        .get(&id)?
        .ok_or_else(|| AppError::not_found(format!("Seat {} not found", id)))?;
    Ok(Json(record))
}

/// PUT /api/seats/:id - 写入单个座位
///
/// 路径 id 必须与记录位置派生出的 id 一致，防止把记录写到别的座位下。
pub async fn upsert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SeatRecord>,
) -> AppResult<Json<SeatRecord>> {
    if id != payload.derived_id() {
        return Err(AppError::validation(format!(
            "Path id {} does not match seat position {}",
            id,
            payload.derived_id()
        )));
    }

    let (stored, _version) = state.assign_seat(payload).await?;
    Ok(Json(stored))
}
