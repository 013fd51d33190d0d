//! Seat feed behavior against a scripted server
//!
//! The fake server answers snapshot requests from a queue of prepared
//! states, which makes lag/resync and stale-version handling
//! deterministic without a real seat server in the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use perch_client::{ClientError, MessageClient, SeatFeed};
use shared::message::{
    ACTION_SEAT_ASSIGN, ACTION_SEAT_SNAPSHOT, BusMessage, EventType, PlanSyncPayload,
    RequestCommandPayload, ResponsePayload,
};
use shared::models::{SeatMap, SeatRecord};
use tokio::sync::broadcast;
use tokio::sync::mpsc;

/// A scripted in-process server end of the bus
struct FakeServer {
    server_tx: broadcast::Sender<BusMessage>,
    client_tx: broadcast::Sender<BusMessage>,
    snapshot_requests: Arc<AtomicU64>,
}

impl FakeServer {
    /// Spawn the server task. Snapshot requests are answered from
    /// `snapshots` in order; the last entry repeats once the queue runs
    /// dry. Assign requests are always rejected.
    fn spawn(snapshots: Vec<(u64, SeatMap)>) -> Self {
        let (server_tx, _) = broadcast::channel(64);
        let (client_tx, _) = broadcast::channel(64);
        let snapshot_requests = Arc::new(AtomicU64::new(0));

        let tx = server_tx.clone();
        let mut rx: broadcast::Receiver<BusMessage> = client_tx.subscribe();
        let counter = snapshot_requests.clone();
        tokio::spawn(async move {
            let mut queue = snapshots.into_iter();
            let mut current: Option<(u64, SeatMap)> = None;
            while let Ok(msg) = rx.recv().await {
                if msg.event_type != EventType::RequestCommand {
                    continue;
                }
                let payload: RequestCommandPayload = msg.parse_payload().unwrap();
                let response = match payload.action.as_str() {
                    ACTION_SEAT_SNAPSHOT => {
                        counter.fetch_add(1, Ordering::SeqCst);
                        if let Some(next) = queue.next() {
                            current = Some(next);
                        }
                        let (version, seats) =
                            current.clone().expect("fake server has no snapshot scripted");
                        ResponsePayload::success(
                            "ok",
                            Some(
                                serde_json::to_value(PlanSyncPayload::full(version, seats))
                                    .unwrap(),
                            ),
                        )
                    }
                    ACTION_SEAT_ASSIGN => {
                        ResponsePayload::error("Assignments disabled", Some("E0002".to_string()))
                    }
                    other => ResponsePayload::error(format!("Unknown action: {}", other), None),
                };

                let mut reply =
                    BusMessage::response(&response).with_correlation_id(msg.request_id);
                if let Some(source) = &msg.source {
                    reply = reply.with_target(source);
                }
                let _ = tx.send(reply);
            }
        });

        Self {
            server_tx,
            client_tx,
            snapshot_requests,
        }
    }

    async fn feed(&self, name: &str) -> SeatFeed {
        let client = MessageClient::memory(&self.server_tx, &self.client_tx, name)
            .await
            .unwrap();
        SeatFeed::new(client)
    }

    fn push_sync(&self, payload: &PlanSyncPayload) {
        let _ = self.server_tx.send(BusMessage::sync(payload));
    }

    fn snapshot_request_count(&self) -> u64 {
        self.snapshot_requests.load(Ordering::SeqCst)
    }
}

fn one_seat_map(name: &str) -> SeatMap {
    [SeatRecord::occupied(0, 0, name)].into_iter().collect()
}

async fn recv_update(rx: &mut mpsc::UnboundedReceiver<(u64, SeatMap)>) -> (u64, SeatMap) {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for update")
        .expect("update channel closed")
}

#[tokio::test]
async fn subscribe_delivers_the_snapshot_immediately() {
    let server = FakeServer::spawn(vec![(4, one_seat_map("Ana"))]);
    let feed = server.feed("board").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    let (version, seats) = recv_update(&mut rx).await;
    assert_eq!(version, 4);
    assert_eq!(seats, one_seat_map("Ana"));
    assert_eq!(server.snapshot_request_count(), 1);
}

#[tokio::test]
async fn stale_and_duplicate_syncs_are_dropped() {
    let server = FakeServer::spawn(vec![(4, one_seat_map("Ana"))]);
    let feed = server.feed("board").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();
    recv_update(&mut rx).await;

    // A sync at the already-delivered version and one below it: both ignored
    server.push_sync(&PlanSyncPayload::full(4, one_seat_map("Stale")));
    server.push_sync(&PlanSyncPayload::full(2, one_seat_map("Older")));
    // A newer one lands
    server.push_sync(&PlanSyncPayload::full(5, one_seat_map("Ben")));

    let (version, seats) = recv_update(&mut rx).await;
    assert_eq!(version, 5);
    assert_eq!(seats, one_seat_map("Ben"));
    assert!(rx.try_recv().is_err(), "stale syncs must not reach the callback");
}

#[tokio::test]
async fn resync_marker_triggers_a_snapshot_refetch() {
    let server = FakeServer::spawn(vec![(1, one_seat_map("Ana")), (7, one_seat_map("Zoe"))]);
    let feed = server.feed("board").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    let (version, _) = recv_update(&mut rx).await;
    assert_eq!(version, 1);

    // Server says we lagged; the feed must refetch rather than stay stale
    server.push_sync(&PlanSyncPayload::resync(12));

    let (version, seats) = recv_update(&mut rx).await;
    assert_eq!(version, 7);
    assert_eq!(seats, one_seat_map("Zoe"));
    assert_eq!(server.snapshot_request_count(), 2);
}

#[tokio::test]
async fn rejected_publish_surfaces_the_server_error() {
    let server = FakeServer::spawn(vec![(0, SeatMap::new())]);
    let feed = server.feed("board").await;

    let err = feed
        .publish(&SeatRecord::occupied(0, 0, "Ana"))
        .await
        .unwrap_err();

    match err {
        ClientError::Rejected { message, code } => {
            assert_eq!(message, "Assignments disabled");
            assert_eq!(code.as_deref(), Some("E0002"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn dropping_the_subscription_stops_the_feed() {
    let server = FakeServer::spawn(vec![(1, one_seat_map("Ana"))]);
    let feed = server.feed("board").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = feed
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();
    recv_update(&mut rx).await;

    assert!(sub.is_active());
    drop(sub);
    tokio::time::sleep(Duration::from_millis(50)).await;

    server.push_sync(&PlanSyncPayload::full(9, one_seat_map("Ben")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "dropped subscription must stay silent");
}
