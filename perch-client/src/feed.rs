//! 座位图实时通道
//!
//! [`SeatFeed`] wraps a [`MessageClient`] with the two seat operations:
//!
//! - [`subscribe`](SeatFeed::subscribe): invokes the callback once
//!   immediately with the current server state (empty map if the store
//!   is untouched), then again for every committed write from any
//!   client. Delivery is push-based and at-least-once, in store commit
//!   order; stale versions are dropped.
//! - [`publish`](SeatFeed::publish): writes one seat record; the
//!   returned future is the completion signal (server ack or error).
//!   失败不重试，由调用方决定如何呈现。
//!
//! Dropping the returned [`SeatSubscription`] stops further callback
//! invocations.

use shared::message::{
    ACTION_SEAT_ASSIGN, ACTION_SEAT_SNAPSHOT, EventType, PlanSyncPayload, ResponsePayload,
};
use shared::models::{SeatMap, SeatRecord};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::message::MessageClient;

/// 座位图实时通道
#[derive(Debug, Clone)]
pub struct SeatFeed {
    client: MessageClient,
}

impl SeatFeed {
    /// Wrap an existing message client
    pub fn new(client: MessageClient) -> Self {
        Self { client }
    }

    /// Connect to a seat server over TCP
    pub async fn connect(addr: &str, client_name: &str) -> Result<Self, ClientError> {
        Ok(Self::new(MessageClient::connect(addr, client_name).await?))
    }

    /// The underlying message client
    pub fn client(&self) -> &MessageClient {
        &self.client
    }

    /// Fetch the current seat map and its version from the server
    pub async fn snapshot(&self) -> Result<(u64, SeatMap), ClientError> {
        let response = self.client.send_command(ACTION_SEAT_SNAPSHOT, None).await?;
        parse_snapshot(&response)
    }

    /// Write one seat record to the shared store
    ///
    /// Overwrites whatever was stored under the record's derived id.
    /// Resolves with the stored record once the server has committed and
    /// broadcast the write; fails on network error or server rejection.
    pub async fn publish(&self, record: &SeatRecord) -> Result<SeatRecord, ClientError> {
        let params = serde_json::to_value(record)?;
        let response = self
            .client
            .send_command(ACTION_SEAT_ASSIGN, Some(params))
            .await?;

        let data = response
            .data
            .ok_or_else(|| ClientError::Connection("Assign response without data".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Open the live feed
    ///
    /// `on_update(version, seats)` fires once immediately with the current
    /// server state, then on every committed write until the returned
    /// subscription is dropped.
    pub async fn subscribe<F>(&self, mut on_update: F) -> Result<SeatSubscription, ClientError>
    where
        F: FnMut(u64, SeatMap) + Send + 'static,
    {
        // Subscribe before fetching the snapshot so no committed write can
        // fall between the two; the version check below drops the overlap.
        let mut rx = self.client.subscribe();

        let (mut last_version, seats) = self.snapshot().await?;
        on_update(last_version, seats);

        let token = CancellationToken::new();
        let task_token = token.clone();
        let feed = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        break;
                    }

                    msg_result = rx.recv() => {
                        match msg_result {
                            Ok(msg) if msg.event_type == EventType::Sync => {
                                let payload: PlanSyncPayload = match msg.parse_payload() {
                                    Ok(p) => p,
                                    Err(e) => {
                                        tracing::warn!("Invalid sync payload: {}", e);
                                        continue;
                                    }
                                };

                                match payload.seats {
                                    Some(seats) if payload.version > last_version => {
                                        last_version = payload.version;
                                        on_update(last_version, seats);
                                    }
                                    Some(_) => {
                                        // Already delivered this (or a newer) state
                                    }
                                    None => {
                                        // Resync marker: we lagged, refetch
                                        feed.resync(&mut last_version, &mut on_update).await;
                                    }
                                }
                            }
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(n)) => {
                                tracing::warn!(dropped = n, "Seat feed lagged, refetching snapshot");
                                feed.resync(&mut last_version, &mut on_update).await;
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                tracing::debug!("Seat feed closed");
                                break;
                            }
                        }
                    }
                }
            }

            tracing::debug!("Seat feed subscription stopped");
        });

        Ok(SeatSubscription {
            token,
            handle: Some(handle),
        })
    }

    /// Refetch the snapshot after a lag and deliver it if it is news
    async fn resync<F>(&self, last_version: &mut u64, on_update: &mut F)
    where
        F: FnMut(u64, SeatMap) + Send,
    {
        match self.snapshot().await {
            Ok((version, seats)) if version > *last_version => {
                *last_version = version;
                on_update(version, seats);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Resync snapshot failed: {}", e);
            }
        }
    }
}

/// 订阅句柄：释放即停止回调
///
/// Scoped acquisition of the live feed: dropping the handle cancels the
/// background task, after which the callback is never invoked again.
#[derive(Debug)]
pub struct SeatSubscription {
    token: CancellationToken,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl SeatSubscription {
    /// Stop the feed and wait for the background task to finish
    pub async fn unsubscribe(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for SeatSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Parse a snapshot response payload into (version, seats)
fn parse_snapshot(response: &ResponsePayload) -> Result<(u64, SeatMap), ClientError> {
    let data = response
        .data
        .clone()
        .ok_or_else(|| ClientError::Connection("Snapshot response without data".to_string()))?;
    let payload: PlanSyncPayload = serde_json::from_value(data)?;
    let seats = payload.seats.unwrap_or_default();
    Ok((payload.version, seats))
}
