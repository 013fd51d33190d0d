//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{FLOOR_ZONES, SEATS_PER_ZONE, SeatRecord, ZoneData, zone_by_id};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/zones - 固定的分区布局
pub async fn list() -> Json<Vec<ZoneData>> {
    Json(FLOOR_ZONES.to_vec())
}

/// GET /api/zones/:id/seats - 分区内的所有座位
///
/// 未被编辑过的座位以空白记录补齐，保证每个分区都返回满编的一组。
pub async fn list_seats(
    State(state): State<ServerState>,
    Path(zone_id): Path<u32>,
) -> AppResult<Json<Vec<SeatRecord>>> {
    if zone_by_id(zone_id).is_none() {
        return Err(AppError::not_found(format!("Zone {} not found", zone_id)));
    }

    let (_, seats) = state.plan_snapshot().await?;
    let records = (0..SEATS_PER_ZONE)
        .map(|index| seats.get_or_vacant(zone_id, index))
        .collect();
    Ok(Json(records))
}
