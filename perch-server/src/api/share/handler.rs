//! Share-link API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use shared::link;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ShareLink {
    pub url: String,
    pub plan_version: u64,
}

/// GET /api/share-link - 当前座位图的分享链接
pub async fn share_link(State(state): State<ServerState>) -> AppResult<Json<ShareLink>> {
    let (plan_version, seats) = state.plan_snapshot().await?;
    let url = link::encode(&seats, &state.config.share_base_url)
        .map_err(|e| AppError::internal(format!("Failed to encode share link: {}", e)))?;

    Ok(Json(ShareLink { url, plan_version }))
}
