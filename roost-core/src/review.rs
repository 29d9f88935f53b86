use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RoomError;

/// One guest's rating and comment, embedded in its owning room document.
/// Reviews are append-only; they are never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub rating: f64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Inbound review payload; `date` defaults to the time of creation.
#[derive(Debug, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Review {
    /// Validates the draft shape before the store is touched: name, rating
    /// and comment must all be present and non-empty / non-zero.
    pub fn from_draft(draft: ReviewDraft) -> Result<Review, RoomError> {
        if draft.name.trim().is_empty()
            || draft.comment.trim().is_empty()
            || draft.rating == 0.0
            || !draft.rating.is_finite()
        {
            return Err(RoomError::Validation("Invalid review data".to_string()));
        }
        Ok(Review {
            name: draft.name,
            rating: draft.rating,
            comment: draft.comment,
            date: draft.date.unwrap_or_else(Utc::now),
        })
    }
}
