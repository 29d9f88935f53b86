use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use roost_core::query::{self, BudgetBracket, RankedRoom};
use roost_core::room::{self, Room, RoomDraft};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRoomsQuery {
    pub budget: Option<String>,
}

/// POST /rooms
/// Create a room offering
pub async fn create_room(
    State(state): State<AppState>,
    Json(draft): Json<RoomDraft>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let room = Room::create(draft)?;

    state
        .rooms
        .insert_room(&room)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /rooms
/// List rooms, optionally filtered by budget bracket
pub async fn get_rooms(
    State(state): State<AppState>,
    Query(params): Query<ListRoomsQuery>,
) -> Result<Json<Vec<Room>>, AppError> {
    let bracket = BudgetBracket::parse(params.budget.as_deref());

    let rooms = state
        .rooms
        .list_rooms(bracket.price_range())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(rooms))
}

/// GET /top-rated-room
/// Top 6 rooms ranked by average review rating
pub async fn get_top_rated_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedRoom>>, AppError> {
    let rooms = state
        .rooms
        .list_rooms(None)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(query::top_rated(rooms)))
}

/// GET /rooms/{id}
/// Full room document
pub async fn get_room_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Room>, AppError> {
    let room_id = room::parse_room_id(&id)?;

    let room = state
        .rooms
        .find_room(room_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Room not found".to_string()))?;

    Ok(Json(room))
}
