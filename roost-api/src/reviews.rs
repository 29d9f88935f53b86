use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use roost_core::query::{self, ReviewFeedEntry};
use roost_core::review::{Review, ReviewDraft};
use roost_core::room;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub review: Option<ReviewDraft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewResponse {
    pub success: bool,
    pub modified_count: u64,
}

/// PATCH /review/{room_id}
/// Append a review; the payload shape is validated before the store is
/// touched.
pub async fn add_review(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<AddReviewRequest>,
) -> Result<Json<AddReviewResponse>, AppError> {
    let draft = req
        .review
        .ok_or_else(|| AppError::ValidationError("Invalid review data".to_string()))?;
    let review = Review::from_draft(draft)?;
    let room_id = room::parse_room_id(&room_id)?;

    let matched = state
        .rooms
        .add_review(room_id, &review)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if matched == 0 {
        return Err(AppError::NotFoundError(
            "Room not found or no changes made".to_string(),
        ));
    }

    Ok(Json(AddReviewResponse {
        success: true,
        modified_count: matched,
    }))
}

/// GET /latest-reviews
/// The 10 most recent reviews across every room
pub async fn latest_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewFeedEntry>>, AppError> {
    let rooms = state
        .rooms
        .list_rooms(None)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(query::latest_reviews(&rooms)))
}
