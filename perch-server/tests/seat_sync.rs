//! End-to-end seat synchronization over the message bus
//!
//! These tests drive the server through the same client API the board
//! uses, wired over the in-process memory transport (plus one real TCP
//! round trip at the end).

use std::time::Duration;

use perch_client::{ClientError, MessageClient, SeatFeed};
use perch_server::{Config, ServerState};
use shared::link;
use shared::models::{SeatMap, SeatRecord};
use tokio::sync::mpsc;

fn test_state() -> (tempfile::TempDir, ServerState) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0, 0);
    let state = ServerState::initialize(&config).unwrap();
    state.start_background_tasks();
    (dir, state)
}

async fn memory_feed(state: &ServerState, name: &str) -> SeatFeed {
    let bus = state.message_bus();
    let client = MessageClient::memory(bus.sender(), bus.sender_to_server(), name)
        .await
        .unwrap();
    SeatFeed::new(client)
}

async fn recv_update(
    rx: &mut mpsc::UnboundedReceiver<(u64, SeatMap)>,
) -> (u64, SeatMap) {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for seat update")
        .expect("update channel closed")
}

#[tokio::test]
async fn subscribe_on_empty_store_delivers_empty_map_immediately() {
    let (_dir, state) = test_state();
    let feed = memory_feed(&state, "subscriber").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    let (version, seats) = recv_update(&mut rx).await;
    assert_eq!(version, 0);
    assert!(seats.is_empty());
}

#[tokio::test]
async fn publish_then_fresh_subscriber_sees_the_record() {
    let (_dir, state) = test_state();

    let writer = memory_feed(&state, "writer").await;
    let stored = writer
        .publish(&SeatRecord::occupied(2, 1, "Alex"))
        .await
        .unwrap();
    assert_eq!(stored.id, "2-1");

    // A fresh listener gets the record in its immediate first delivery
    let reader = memory_feed(&state, "reader").await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = reader
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    let (version, seats) = recv_update(&mut rx).await;
    assert_eq!(version, 1);
    assert_eq!(seats.get("2-1"), Some(&stored));
}

#[tokio::test]
async fn pushed_updates_arrive_in_commit_order() {
    let (_dir, state) = test_state();

    let reader = memory_feed(&state, "reader").await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = reader
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    // Initial empty delivery
    let (version, _) = recv_update(&mut rx).await;
    assert_eq!(version, 0);

    let writer = memory_feed(&state, "writer").await;
    writer.publish(&SeatRecord::occupied(0, 0, "Ana")).await.unwrap();
    writer.publish(&SeatRecord::occupied(0, 1, "Ben")).await.unwrap();
    writer.publish(&SeatRecord::occupied(0, 0, "Cleo")).await.unwrap();

    let mut versions = Vec::new();
    let mut last_map = SeatMap::new();
    while versions.last() != Some(&3) {
        let (version, seats) = recv_update(&mut rx).await;
        versions.push(version);
        last_map = seats;
    }

    let mut sorted = versions.clone();
    sorted.sort_unstable();
    assert_eq!(versions, sorted, "updates must arrive in commit order");

    // Last write wins on the contested seat
    assert_eq!(last_map.get("0-0").unwrap().occupant_name, "Cleo");
    assert_eq!(last_map.get("0-1").unwrap().occupant_name, "Ben");
}

#[tokio::test]
async fn publish_off_plan_position_is_rejected() {
    let (_dir, state) = test_state();
    let feed = memory_feed(&state, "writer").await;

    let err = feed
        .publish(&SeatRecord::occupied(99, 0, "Nobody"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));

    // Store untouched
    let (version, seats) = feed.snapshot().await.unwrap();
    assert_eq!(version, 0);
    assert!(seats.is_empty());
}

#[tokio::test]
async fn unsubscribe_stops_further_callbacks() {
    let (_dir, state) = test_state();

    let reader = memory_feed(&state, "reader").await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = reader
        .subscribe(move |version, seats| {
            let _ = tx.send((version, seats));
        })
        .await
        .unwrap();

    // Consume the immediate delivery, then dispose the subscription
    recv_update(&mut rx).await;
    sub.unsubscribe().await;

    let writer = memory_feed(&state, "writer").await;
    writer.publish(&SeatRecord::occupied(1, 2, "Dia")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        rx.try_recv().is_err(),
        "no callback may fire after unsubscribe"
    );
}

#[tokio::test]
async fn edit_flow_round_trips_through_the_share_link() {
    let (_dir, state) = test_state();
    let feed = memory_feed(&state, "board").await;

    // Click seat 0-2, save "Priya"
    let clicked = SeatMap::new().get_or_vacant(0, 2);
    assert_eq!(clicked.occupant_name, "");
    let record = SeatRecord {
        occupant_name: "Priya".to_string(),
        ..clicked
    };
    feed.publish(&record).await.unwrap();

    let (_, seats) = feed.snapshot().await.unwrap();
    let expected: SeatMap = [SeatRecord::occupied(0, 2, "Priya")].into_iter().collect();
    assert_eq!(seats, expected);

    // The shared link reproduces the exact mapping
    let url = link::encode(&seats, "https://perch.example/board").unwrap();
    assert_eq!(link::decode(&url), Some(expected));
}

#[tokio::test]
async fn tcp_transport_round_trip() {
    // Random port to avoid conflicts between parallel test runs
    let port = 10000 + (rand::random::<u16>() % 20000);

    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0, port);
    let state = ServerState::initialize(&config).unwrap();
    state.start_background_tasks();

    let bus = state.message_bus().clone();
    tokio::spawn(async move {
        bus.start_tcp_server().await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let addr = format!("127.0.0.1:{}", port);
    let feed = SeatFeed::connect(&addr, "tcp-test").await.unwrap();
    let stored = feed
        .publish(&SeatRecord::occupied(5, 3, "Noor"))
        .await
        .unwrap();
    assert_eq!(stored.id, "5-3");

    let (version, seats) = feed.snapshot().await.unwrap();
    assert_eq!(version, 1);
    assert_eq!(seats.get("5-3"), Some(&stored));

    state.message_bus().shutdown();
}
