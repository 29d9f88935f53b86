use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::Booking;
use crate::review::Review;
use crate::RoomError;

/// A bookable room offering: the aggregate root owning its embedded
/// bookings and reviews. Every mutation runs as a single-document atomic
/// update in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub availability: bool,
    #[serde(default)]
    pub booked_dates: Vec<Booking>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound payload for room creation. Only title, image and price are
/// required; everything else falls back to the schema defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Room {
    /// Validates the draft and mints a new room document with the
    /// aggregate defaults: available, no bookings, no reviews.
    pub fn create(draft: RoomDraft) -> Result<Room, RoomError> {
        if draft.title.trim().is_empty() {
            return Err(RoomError::Validation("title is required".to_string()));
        }
        if draft.image.trim().is_empty() {
            return Err(RoomError::Validation("image is required".to_string()));
        }
        let price = draft
            .price
            .ok_or_else(|| RoomError::Validation("price is required".to_string()))?;
        if !price.is_finite() || price < 0.0 {
            return Err(RoomError::Validation(
                "price must be a non-negative number".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Room {
            id: Uuid::new_v4(),
            title: draft.title,
            image: draft.image,
            price,
            description: draft.description,
            features: draft.features,
            location: draft.location,
            availability: true,
            booked_dates: Vec::new(),
            reviews: Vec::new(),
            bed_type: draft.bed_type,
            max_guests: draft.max_guests,
            size: draft.size,
            amenities: draft.amenities,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Parses an externally supplied room id, rejecting anything that is not a
/// well-formed UUID before the store is consulted.
pub fn parse_room_id(raw: &str) -> Result<Uuid, RoomError> {
    Uuid::parse_str(raw).map_err(|_| RoomError::InvalidId("Invalid room ID".to_string()))
}
