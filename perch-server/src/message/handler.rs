//! Message Handler for server-side message processing
//!
//! The MessageHandler subscribes to the client channel of the bus and
//! serves the two seat operations:
//!
//! | action | params | response data |
//! |--------|--------|---------------|
//! | `seat.assign` | one `SeatRecord` | the stored record |
//! | `seat.snapshot` | - | `PlanSyncPayload` with the full map |
//!
//! Responses are unicast back to the requesting client via its
//! `source` id with the request's `request_id` as correlation id.
//! Both operations are idempotent single writes; failures travel back
//! in the RPC response and are never retried server-side.

use shared::models::SeatRecord;
use shared::message::{
    ACTION_SEAT_ASSIGN, ACTION_SEAT_SNAPSHOT, BusMessage, EventType, PlanSyncPayload,
    RequestCommandPayload, ResponsePayload,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::utils::AppError;

/// Server-side message handler
pub struct MessageHandler {
    receiver: broadcast::Receiver<BusMessage>,
    state: ServerState,
    shutdown_token: CancellationToken,
}

impl MessageHandler {
    pub fn new(
        receiver: broadcast::Receiver<BusMessage>,
        state: ServerState,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            receiver,
            state,
            shutdown_token,
        }
    }

    /// Start processing messages
    ///
    /// This is a long-running task that should be spawned in the background.
    pub async fn run(mut self) {
        tracing::info!("Message handler started");

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Message handler shutting down");
                    break;
                }

                msg_result = self.receiver.recv() => {
                    match msg_result {
                        Ok(msg) => self.handle_message(msg).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Message handler lagged, skipped {} messages", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Message channel closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Message handler stopped");
    }

    async fn handle_message(&self, msg: BusMessage) {
        match msg.event_type {
            EventType::RequestCommand => self.handle_request(msg).await,
            // Handshake is consumed by the transport layer; Sync/Response
            // never originate from clients.
            other => {
                tracing::debug!(event_type = %other, "Ignoring non-request client message");
            }
        }
    }

    async fn handle_request(&self, msg: BusMessage) {
        let payload: RequestCommandPayload = match msg.parse_payload() {
            Ok(p) => p,
            Err(e) => {
                self.respond(
                    &msg,
                    ResponsePayload::error(format!("Invalid request payload: {}", e), None),
                )
                .await;
                return;
            }
        };

        let result = match payload.action.as_str() {
            ACTION_SEAT_ASSIGN => self.seat_assign(payload.params).await,
            ACTION_SEAT_SNAPSHOT => self.seat_snapshot().await,
            other => Err(AppError::invalid(format!("Unknown action: {}", other))),
        };

        let response = match result {
            Ok(data) => ResponsePayload::success("ok", Some(data)),
            Err(e) => {
                tracing::warn!(action = %payload.action, error = %e, "Seat request failed");
                ResponsePayload::error(e.to_string(), Some(e.code().to_string()))
            }
        };

        self.respond(&msg, response).await;
    }

    /// Write one seat record, broadcast the updated map, return the record
    async fn seat_assign(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, AppError> {
        let params = params.ok_or_else(|| AppError::validation("seat.assign requires a seat record"))?;
        let record: SeatRecord = serde_json::from_value(params)
            .map_err(|e| AppError::validation(format!("Invalid seat record: {}", e)))?;

        let (stored, _version) = self.state.assign_seat(record).await?;
        serde_json::to_value(&stored).map_err(|e| AppError::internal(e.to_string()))
    }

    /// The full seat map at its current version
    async fn seat_snapshot(&self) -> Result<serde_json::Value, AppError> {
        let (version, seats) = self.state.plan_snapshot().await?;
        serde_json::to_value(PlanSyncPayload::full(version, seats))
            .map_err(|e| AppError::internal(e.to_string()))
    }

    /// Unicast the RPC response back to the requesting client
    async fn respond(&self, request: &BusMessage, payload: ResponsePayload) {
        let mut response =
            BusMessage::response(&payload).with_correlation_id(request.request_id);
        if let Some(source) = &request.source {
            response = response.with_target(source);
        }

        if let Err(e) = self.state.message_bus().publish(response).await {
            tracing::warn!("Failed to publish response: {}", e);
        }
    }
}
