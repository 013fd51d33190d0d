//! HTTP API surface tests (router driven directly via tower)

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use perch_server::{Config, ServerState};
use shared::link;
use shared::models::{SeatMap, SeatRecord, ZoneData};
use tower::ServiceExt;

fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0, 0);
    let state = ServerState::initialize(&config).unwrap();
    let app = perch_server::api::router().with_state(state);
    (dir, app)
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_seat(id: &str, record: &SeatRecord) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/api/seats/{}", id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(record).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok_on_a_fresh_store() {
    let (_dir, app) = test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info: serde_json::Value = body_json(response).await;
    assert_eq!(info["status"], "ok");
    assert_eq!(info["plan_version"], 0);
    assert_eq!(info["occupied_seats"], 0);
}

#[tokio::test]
async fn put_then_get_round_trips_a_seat() {
    let (_dir, app) = test_app();

    let record = SeatRecord::occupied(0, 2, "Priya");
    let response = app
        .clone()
        .oneshot(put_seat("0-2", &record))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/seats/0-2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: SeatRecord = body_json(response).await;
    assert_eq!(fetched, record);

    let response = app.oneshot(get("/api/seats")).await.unwrap();
    let map: SeatMap = body_json(response).await;
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("0-2"), Some(&record));
}

#[tokio::test]
async fn put_with_mismatched_path_id_is_rejected() {
    let (_dir, app) = test_app();

    let record = SeatRecord::occupied(0, 2, "Priya");
    let response = app
        .clone()
        .oneshot(put_seat("1-1", &record))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Store untouched under both ids
    for id in ["1-1", "0-2"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/seats/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn unknown_seat_is_a_404() {
    let (_dir, app) = test_app();
    let response = app.oneshot(get("/api/seats/3-0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zones_return_the_fixed_floor_plan() {
    let (_dir, app) = test_app();

    let response = app.clone().oneshot(get("/api/zones")).await.unwrap();
    let zones: Vec<ZoneData> = body_json(response).await;
    assert_eq!(zones.len(), 6);
    assert_eq!(zones.iter().filter(|z| z.col == 0).count(), 3);
    assert_eq!(zones.iter().filter(|z| z.col == 1).count(), 3);

    // Zone seat listing pads untouched seats with vacant records
    let response = app.oneshot(get("/api/zones/2/seats")).await.unwrap();
    let seats: Vec<SeatRecord> = body_json(response).await;
    assert_eq!(seats.len(), 4);
    assert!(seats.iter().all(|s| s.zone_id == 2 && !s.is_occupied()));
}

#[tokio::test]
async fn unknown_zone_is_a_404() {
    let (_dir, app) = test_app();
    let response = app.oneshot(get("/api/zones/42/seats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn share_link_encodes_the_current_map() {
    let (_dir, app) = test_app();

    let record = SeatRecord::occupied(4, 1, "Alex");
    app.clone().oneshot(put_seat("4-1", &record)).await.unwrap();

    let response = app.oneshot(get("/api/share-link")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let payload: serde_json::Value = body_json(response).await;

    let url = payload["url"].as_str().unwrap();
    let decoded = link::decode(url).expect("share link must decode");
    assert_eq!(decoded.get("4-1"), Some(&record));
    assert_eq!(payload["plan_version"], 1);
}
