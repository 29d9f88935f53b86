use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use roost_core::booking::{self, Booking};
use roost_core::query::{self, BookingRecord};
use roost_core::room::{self, Room};

use crate::error::AppError;
use crate::middleware::auth::EmailQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookRoomRequest {
    pub name: String,
    pub email: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct BookRoomResponse {
    pub success: bool,
    pub message: String,
    pub room: Room,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingDateRequest {
    pub room_id: String,
    pub booking_id: String,
    pub new_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub room_id: String,
    pub booking_id: String,
}

/// PATCH /book-room/{id}
/// Append a booking and mark the room unavailable in one atomic update.
/// Prior availability is not checked; date conflicts are out of scope.
pub async fn book_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BookRoomRequest>,
) -> Result<Json<BookRoomResponse>, AppError> {
    let room_id = room::parse_room_id(&id)?;
    let date = booking::parse_stay_date(&req.date)?;
    let entry = Booking::new(room_id, req.name, req.email, date);

    let updated = state
        .rooms
        .book_room(room_id, &entry)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Room not found".to_string()))?;

    info!("Room {} booked by {}", room_id, entry.email);

    Ok(Json(BookRoomResponse {
        success: true,
        message: "Room booked successfully".to_string(),
        room: updated,
    }))
}

/// GET /my-bookings
/// The caller's bookings across all rooms; the email gate has already
/// matched the query email against the verified principal.
pub async fn my_bookings(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let email = params
        .email
        .ok_or_else(|| AppError::ValidationError("Email is required".to_string()))?;

    let rooms = state
        .rooms
        .list_rooms(None)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(query::bookings_for(&rooms, &email)))
}

/// PATCH /booking-date-update
/// Edit one embedded booking's date in place
pub async fn update_booking_date(
    State(state): State<AppState>,
    Json(req): Json<UpdateBookingDateRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let (room_id, booking_id) = booking::parse_id_pair(&req.room_id, &req.booking_id)?;
    let date = booking::parse_stay_date(&req.new_date)?;

    let matched = state
        .rooms
        .update_booking_date(room_id, booking_id, date)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if matched == 0 {
        return Err(AppError::NotFoundError(
            "Booking not found or already updated".to_string(),
        ));
    }

    Ok(Json(MutationResponse {
        success: true,
        message: "Booking date updated successfully".to_string(),
    }))
}

/// DELETE /booking-cancel
/// Remove a booking and restore availability in one atomic update
pub async fn cancel_booking(
    State(state): State<AppState>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let (room_id, booking_id) = booking::parse_id_pair(&req.room_id, &req.booking_id)?;

    let matched = state
        .rooms
        .cancel_booking(room_id, booking_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if matched == 0 {
        return Err(AppError::NotFoundError(
            "Booking not found or already cancelled".to_string(),
        ));
    }

    info!("Booking {} cancelled on room {}", booking_id, room_id);

    Ok(Json(MutationResponse {
        success: true,
        message: "Booking cancelled successfully".to_string(),
    }))
}
