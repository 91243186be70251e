use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use client::{BookingApi, BookingClient, ErrorKind, Operation, RoomClient};
use domain::{BookingPayload, BookingStatus};
use serde_json::{json, Value};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Default)]
struct FakeApi {
    bookings: Arc<Mutex<Vec<Value>>>,
    room_hits: Arc<AtomicUsize>,
}

fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "b1", "room_id": "r1", "title": "Sync", "description": "d", "name": "Dina",
            "start_time": "2025-01-01T10:00:00", "end_time": "2025-01-01T11:00:00",
            "created_at": "2024-12-30T08:00:00", "status": "pending",
            "rooms": { "name": "Room A", "location": "Floor 2" }
        }),
        json!({
            "id": "b2", "room_id": "r2", "title": "Retro", "description": null, "name": "Budi",
            "start_time": "2025-01-02T10:00:00", "end_time": "2025-01-02T11:00:00",
            "created_at": "2024-12-30T08:00:00", "status": "on_hold",
            "rooms": { "name": "Room B", "location": "Floor 3" }
        }),
    ]
}

async fn list(State(api): State<FakeApi>) -> Json<Value> {
    Json(Value::Array(api.bookings.lock().unwrap().clone()))
}

async fn create(State(api): State<FakeApi>, Json(body): Json<Value>) -> impl IntoResponse {
    if body["room_id"] == "busy" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Room unavailable" })),
        );
    }
    if body["room_id"] == "silent" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    let mut created = body.clone();
    created["id"] = json!("b9");
    created["status"] = json!("pending");
    created["created_at"] = json!("2024-12-31T08:00:00");
    created["rooms"] = json!({ "name": "Room A", "location": "Floor 2" });
    api.bookings.lock().unwrap().push(created.clone());
    (StatusCode::OK, Json(created))
}

async fn update_status(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut bookings = api.bookings.lock().unwrap();
    match bookings.iter_mut().find(|b| b["id"] == id.as_str()) {
        Some(booking) => {
            booking["status"] = body["status"].clone();
            (StatusCode::OK, Json(booking.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Booking not found" })),
        ),
    }
}

async fn rooms(State(api): State<FakeApi>) -> Json<Value> {
    api.room_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "id": "r1", "name": "Room A", "location": "Floor 2", "capacity": 8,
          "image_link": "a.png", "status": "active", "realtime_status": "available",
          "next_booking_start": null },
        { "id": "r2", "name": "Room B", "location": "Floor 3", "capacity": 4,
          "image_link": "b.png", "status": "active", "realtime_status": "booked",
          "next_booking_start": "2025-01-02T10:00:00" }
    ]))
}

async fn spawn_fake_api() -> Result<(SocketAddr, FakeApi), BoxError> {
    let state = FakeApi {
        bookings: Arc::new(Mutex::new(seed())),
        ..Default::default()
    };
    let app = Router::new()
        .route("/api/booking", get(list).post(create))
        .route("/api/bookings/:id/status", patch(update_status))
        .route("/api/rooms", get(rooms))
        .route(
            "/broken/rooms",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route(
            "/broken/booking",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((addr, state))
}

fn payload(room_id: &str) -> BookingPayload {
    BookingPayload {
        room_id: room_id.into(),
        name: "Dina".into(),
        title: "Planning".into(),
        description: "Q1".into(),
        start_time: "2025-01-03T10:00".into(),
        end_time: "2025-01-03T11:00".into(),
    }
}

#[tokio::test]
async fn approve_then_list_reflects_new_status() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = BookingClient::new(&format!("http://{addr}/api"));

    let updated = client
        .update_booking_status("b1", BookingStatus::Approved)
        .await?;
    assert_eq!("b1", updated.id);
    assert_eq!(BookingStatus::Approved, updated.status);

    let bookings = client.list_bookings().await?;
    let b1 = bookings.iter().find(|b| b.id == "b1").expect("b1 listed");
    assert_eq!(BookingStatus::Approved, b1.status);
    Ok(())
}

#[tokio::test]
async fn list_tolerates_unknown_statuses_and_null_text() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = BookingClient::new(&format!("http://{addr}/api"));

    let bookings = client.list_bookings().await?;
    let ids: Vec<_> = bookings.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(vec!["b1", "b2"], ids);
    assert_eq!(BookingStatus::Unknown("on_hold".into()), bookings[1].status);
    assert_eq!("", bookings[1].description);
    Ok(())
}

#[tokio::test]
async fn create_reports_server_message_exactly() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = BookingClient::new(&format!("http://{addr}/api"));

    let err = client.create_booking(&payload("busy")).await.unwrap_err();
    assert_eq!("Room unavailable", err.to_string());
    assert_eq!(Operation::BookingCreation, err.operation);
    assert_eq!(ErrorKind::Backend { status: 400 }, err.kind);

    let err = client.create_booking(&payload("silent")).await.unwrap_err();
    assert_eq!("Failed to create booking", err.to_string());

    let created = client.create_booking(&payload("r1")).await?;
    assert_eq!("b9", created.id);
    assert_eq!(BookingStatus::Pending, created.status);
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_booking_uses_server_message() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = BookingClient::new(&format!("http://{addr}/api"));

    let err = client
        .update_booking_status("nope", BookingStatus::Rejected)
        .await
        .unwrap_err();
    assert_eq!("Booking not found", err.to_string());
    assert_eq!(Some(404), err.status());
    Ok(())
}

#[tokio::test]
async fn non_json_failure_falls_back_to_generic_message() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = BookingClient::new(&format!("http://{addr}/broken"));

    let err = client.list_bookings().await.unwrap_err();
    assert_eq!("Failed to fetch bookings", err.to_string());
    assert_eq!(ErrorKind::Backend { status: 502 }, err.kind);
    Ok(())
}

#[tokio::test]
async fn unreachable_gateway_is_a_network_error() -> Result<(), BoxError> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = BookingClient::new(&format!("http://{addr}/api"));
    let err = client.list_bookings().await.unwrap_err();
    assert_eq!(ErrorKind::Network, err.kind);
    assert_eq!("Failed to fetch bookings", err.to_string());
    Ok(())
}

#[tokio::test]
async fn rooms_are_mapped_and_revalidated() -> Result<(), BoxError> {
    let (addr, state) = spawn_fake_api().await?;
    let client = RoomClient::new(&format!("http://{addr}/api"))
        .with_revalidate(Duration::from_millis(200));

    let rooms = client.list_rooms().await?;
    assert_eq!(2, rooms.len());
    assert_eq!("Room A", rooms[0].name);
    assert_eq!(8, rooms[0].capacity);
    assert_eq!(None, rooms[0].next_booking_start);

    let again = client.list_rooms().await?;
    assert_eq!(rooms, again);
    assert_eq!(1, state.room_hits.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(300)).await;
    client.list_rooms().await?;
    assert_eq!(2, state.room_hits.load(Ordering::SeqCst));

    client.invalidate().await;
    client.list_rooms().await?;
    assert_eq!(3, state.room_hits.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn room_failures_are_not_cached() -> Result<(), BoxError> {
    let (addr, _) = spawn_fake_api().await?;
    let client = RoomClient::new(&format!("http://{addr}/broken"));

    for _ in 0..2 {
        let err = client.list_rooms().await.unwrap_err();
        assert_eq!(Operation::RoomFetch, err.operation);
        assert_eq!("Failed to fetch rooms", err.to_string());
        assert_eq!(Some(503), err.status());
    }
    Ok(())
}
