use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use roost_api::app;
use roost_api::middleware::auth::Claims;
use roost_api::state::{AppState, AuthConfig};
use roost_store::MemoryRoomStore;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let state = AppState {
        rooms: Arc::new(MemoryRoomStore::new()),
        auth: AuthConfig {
            secret: SECRET.to_string(),
        },
    };
    app(state)
}

fn bearer(email: &str) -> String {
    let claims = Claims {
        sub: "user-1".to_string(),
        email: email.to_string(),
        exp: 4102444800, // 2100-01-01
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_room(app: &Router, title: &str, price: f64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/rooms",
        None,
        Some(json!({ "title": title, "image": format!("{title}.jpg"), "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_book_cancel_round_trip() {
    let app = test_app();

    let room = create_room(&app, "Ocean View", 1200.0).await;
    let room_id = room["id"].as_str().unwrap().to_string();
    assert_eq!(room["availability"], json!(true));

    // Book the room
    let (status, booked) = send(
        &app,
        Method::PATCH,
        &format!("/book-room/{room_id}"),
        None,
        Some(json!({ "name": "Ana", "email": "a@x.com", "date": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booked["success"], json!(true));
    assert_eq!(booked["message"], json!("Room booked successfully"));
    assert_eq!(booked["room"]["availability"], json!(false));
    let booked_dates = booked["room"]["bookedDates"].as_array().unwrap();
    assert_eq!(booked_dates.len(), 1);
    let booking_id = booked_dates[0]["id"].as_str().unwrap().to_string();

    // Cancel it via the gated route
    let (status, cancelled) = send(
        &app,
        Method::DELETE,
        "/booking-cancel?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({ "roomId": room_id, "bookingId": booking_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["success"], json!(true));
    assert_eq!(cancelled["message"], json!("Booking cancelled successfully"));

    // The room is available again with no bookings left
    let (status, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["availability"], json!(true));
    assert_eq!(detail["bookedDates"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn review_feeds_the_top_rated_ranking() {
    let app = test_app();

    let room = create_room(&app, "Garden Suite", 900.0).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/review/{room_id}"),
        Some(&bearer("b@x.com")),
        Some(json!({ "review": { "name": "Bob", "rating": 5, "comment": "great" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["modifiedCount"], json!(1));

    let (status, ranked) = send(&app, Method::GET, "/top-rated-room", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ranked = ranked.as_array().unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0]["avgRating"], json!(5.0));
    assert_eq!(ranked[0]["totalReviews"], json!(1));
}

#[tokio::test]
async fn budget_brackets_filter_the_listing() {
    let app = test_app();
    create_room(&app, "budget", 800.0).await;
    create_room(&app, "mid", 1200.0).await;
    create_room(&app, "high", 2000.0).await;

    let (_, all) = send(&app, Method::GET, "/rooms", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    let (_, all) = send(&app, Method::GET, "/rooms?budget=All", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, low) = send(&app, Method::GET, "/rooms?budget=0-1000", None, None).await;
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["title"], json!("budget"));

    let (_, mid) = send(&app, Method::GET, "/rooms?budget=1001-1500", None, None).await;
    let mid = mid.as_array().unwrap();
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0]["title"], json!("mid"));

    // Unknown tokens fall into the top bracket
    let (_, high) = send(&app, Method::GET, "/rooms?budget=cheap", None, None).await;
    let high = high.as_array().unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["title"], json!("high"));
}

#[tokio::test]
async fn my_bookings_is_gated_by_token_and_email_match() {
    let app = test_app();

    let room = create_room(&app, "Ocean View", 1200.0).await;
    let room_id = room["id"].as_str().unwrap();
    send(
        &app,
        Method::PATCH,
        &format!("/book-room/{room_id}"),
        None,
        Some(json!({ "name": "Ana", "email": "a@x.com", "date": "2024-01-01" })),
    )
    .await;

    // No credential
    let (status, _) = send(&app, Method::GET, "/my-bookings?email=a@x.com", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Bad credential
    let (status, _) = send(
        &app,
        Method::GET,
        "/my-bookings?email=a@x.com",
        Some("Bearer not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Verified identity, mismatched email claim
    let (status, body) = send(
        &app,
        Method::GET,
        "/my-bookings?email=a@x.com",
        Some(&bearer("b@x.com")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], json!("forbidden access"));

    // Verified identity, email param missing
    let (status, body) = send(
        &app,
        Method::GET,
        "/my-bookings",
        Some(&bearer("a@x.com")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Email is required"));

    // Matching identity sees the flattened booking records
    let (status, body) = send(
        &app,
        Method::GET,
        "/my-bookings?email=a@x.com",
        Some(&bearer("a@x.com")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["roomId"].as_str().unwrap(), room_id);
    assert_eq!(records[0]["title"], json!("Ocean View"));
    assert!(records[0]["bookingId"].is_string());
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_the_store() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/rooms/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid room ID"));

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/book-room/not-a-uuid",
        None,
        Some(json!({ "name": "Ana", "email": "a@x.com", "date": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid room ID"));

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/booking-date-update?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({ "roomId": "x", "bookingId": "y", "newDate": "2024-02-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid roomId or bookingId"));
}

#[tokio::test]
async fn zero_match_mutations_report_not_found() {
    let app = test_app();
    let room = create_room(&app, "Loft", 1800.0).await;
    let room_id = room["id"].as_str().unwrap();

    // Booking a room that does not exist
    let ghost = Uuid::new_v4();
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/book-room/{ghost}"),
        None,
        Some(json!({ "name": "Ana", "email": "a@x.com", "date": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Room not found"));

    // Updating a booking that does not exist on a real room
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/booking-date-update?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({
            "roomId": room_id,
            "bookingId": Uuid::new_v4().to_string(),
            "newDate": "2024-02-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Booking not found or already updated"));

    // Cancelling a booking that does not exist
    let (status, body) = send(
        &app,
        Method::DELETE,
        "/booking-cancel?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({
            "roomId": room_id,
            "bookingId": Uuid::new_v4().to_string()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        json!("Booking not found or already cancelled")
    );

    // Reviewing a room that does not exist
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/review/{ghost}"),
        Some(&bearer("a@x.com")),
        Some(json!({ "review": { "name": "Bob", "rating": 4, "comment": "ok" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Room not found or no changes made"));
}

#[tokio::test]
async fn booking_date_update_edits_the_embedded_entry() {
    let app = test_app();
    let room = create_room(&app, "Ocean View", 1200.0).await;
    let room_id = room["id"].as_str().unwrap().to_string();

    let (_, booked) = send(
        &app,
        Method::PATCH,
        &format!("/book-room/{room_id}"),
        None,
        Some(json!({ "name": "Ana", "email": "a@x.com", "date": "2024-01-01" })),
    )
    .await;
    let booking_id = booked["room"]["bookedDates"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/booking-date-update?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({
            "roomId": room_id,
            "bookingId": booking_id,
            "newDate": "2024-02-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Booking date updated successfully"));

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    let date = detail["bookedDates"][0]["date"].as_str().unwrap();
    assert!(date.starts_with("2024-02-02"));

    // An unparseable date is rejected before the store
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/booking-date-update?email=a@x.com",
        Some(&bearer("a@x.com")),
        Some(json!({
            "roomId": room_id,
            "bookingId": detail["bookedDates"][0]["id"],
            "newDate": "whenever"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid date format"));
}

#[tokio::test]
async fn double_booking_is_allowed_by_design() {
    let app = test_app();
    let room = create_room(&app, "Ocean View", 1200.0).await;
    let room_id = room["id"].as_str().unwrap();

    for email in ["a@x.com", "b@x.com"] {
        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/book-room/{room_id}"),
            None,
            Some(json!({ "name": "Guest", "email": email, "date": "2024-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(detail["bookedDates"].as_array().unwrap().len(), 2);
    assert_eq!(detail["availability"], json!(false));
}

#[tokio::test]
async fn invalid_review_payloads_never_reach_the_store() {
    let app = test_app();
    let room = create_room(&app, "Loft", 1800.0).await;
    let room_id = room["id"].as_str().unwrap();

    for payload in [
        json!({}),
        json!({ "review": { "name": "Bob", "rating": 4 } }),
        json!({ "review": { "name": "Bob", "rating": 0, "comment": "meh" } }),
        json!({ "review": { "rating": 4, "comment": "ok" } }),
    ] {
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/review/{room_id}"),
            Some(&bearer("a@x.com")),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Invalid review data"));
    }

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(detail["reviews"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn latest_reviews_cap_at_ten_newest_first() {
    let app = test_app();
    let first = create_room(&app, "first", 900.0).await;
    let second = create_room(&app, "second", 1100.0).await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    for day in 1..=6 {
        send(
            &app,
            Method::PATCH,
            &format!("/review/{first_id}"),
            Some(&bearer("a@x.com")),
            Some(json!({ "review": {
                "name": format!("guest-{day}"),
                "rating": 4,
                "comment": "fine",
                "date": format!("2024-01-{day:02}T00:00:00Z")
            }})),
        )
        .await;
        send(
            &app,
            Method::PATCH,
            &format!("/review/{second_id}"),
            Some(&bearer("a@x.com")),
            Some(json!({ "review": {
                "name": format!("guest-{day}"),
                "rating": 5,
                "comment": "fine",
                "date": format!("2024-02-{day:02}T00:00:00Z")
            }})),
        )
        .await;
    }

    let (status, feed) = send(&app, Method::GET, "/latest-reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 10);

    // Newest first, annotated with the owning room
    assert!(feed[0]["date"].as_str().unwrap().starts_with("2024-02-06"));
    assert_eq!(feed[0]["roomTitle"], json!("second"));
    assert_eq!(feed[0]["roomId"].as_str().unwrap(), second_id);
    assert!(feed[0]["roomImage"].is_string());

    let dates: Vec<&str> = feed.iter().map(|e| e["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn create_room_validates_required_fields() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/rooms",
        None,
        Some(json!({ "image": "x.jpg", "price": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("title is required"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/rooms",
        None,
        Some(json!({ "title": "Suite", "image": "x.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("price is required"));
}
