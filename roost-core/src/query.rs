use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::booking::Booking;
use crate::review::Review;
use crate::room::Room;

/// Rooms returned by the top-rated ranking.
pub const TOP_RATED_LIMIT: usize = 6;
/// Reviews returned by the cross-room latest feed.
pub const LATEST_REVIEWS_LIMIT: usize = 10;

/// Caller-supplied price bracket for the room listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBracket {
    All,
    UpTo1000,
    From1001To1500,
    Above1500,
}

impl BudgetBracket {
    /// Maps the raw query token. Absent or "All" disables the filter;
    /// unknown tokens fall through to the top bracket.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            None | Some("All") => BudgetBracket::All,
            Some("0-1000") => BudgetBracket::UpTo1000,
            Some("1001-1500") => BudgetBracket::From1001To1500,
            Some(_) => BudgetBracket::Above1500,
        }
    }

    /// The price range the store applies as a filtered scan, or `None`
    /// for an unfiltered listing.
    pub fn price_range(self) -> Option<PriceRange> {
        match self {
            BudgetBracket::All => None,
            BudgetBracket::UpTo1000 => Some(PriceRange {
                above: None,
                up_to: Some(1000.0),
            }),
            BudgetBracket::From1001To1500 => Some(PriceRange {
                above: Some(1000.0),
                up_to: Some(1500.0),
            }),
            BudgetBracket::Above1500 => Some(PriceRange {
                above: Some(1500.0),
                up_to: None,
            }),
        }
    }
}

/// Price predicate `above < price <= up_to`, open at either end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub above: Option<f64>,
    pub up_to: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.above.map_or(true, |lo| price > lo) && self.up_to.map_or(true, |hi| price <= hi)
    }
}

/// Fixed projection returned by the top-rated ranking: the full document
/// plus the derived rating fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRoom {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    pub amenities: Vec<String>,
    pub tags: Vec<String>,
    pub availability: bool,
    pub booked_dates: Vec<Booking>,
    pub reviews: Vec<Review>,
    pub avg_rating: f64,
    pub total_reviews: usize,
}

impl From<Room> for RankedRoom {
    fn from(room: Room) -> Self {
        let total_reviews = room.reviews.len();
        let avg_rating = if total_reviews > 0 {
            room.reviews.iter().map(|r| r.rating).sum::<f64>() / total_reviews as f64
        } else {
            0.0
        };
        RankedRoom {
            id: room.id,
            title: room.title,
            image: room.image,
            price: room.price,
            description: room.description,
            features: room.features,
            location: room.location,
            bed_type: room.bed_type,
            size: room.size,
            max_guests: room.max_guests,
            amenities: room.amenities,
            tags: room.tags,
            availability: room.availability,
            booked_dates: room.booked_dates,
            reviews: room.reviews,
            avg_rating,
            total_reviews,
        }
    }
}

/// Ranks rooms by mean review rating (a room with no reviews scores 0),
/// ties broken by review count, capped at [`TOP_RATED_LIMIT`].
pub fn top_rated(rooms: Vec<Room>) -> Vec<RankedRoom> {
    let mut ranked: Vec<RankedRoom> = rooms.into_iter().map(RankedRoom::from).collect();
    ranked.sort_by(|a, b| {
        b.avg_rating
            .total_cmp(&a.avg_rating)
            .then(b.total_reviews.cmp(&a.total_reviews))
    });
    ranked.truncate(TOP_RATED_LIMIT);
    ranked
}

/// A review annotated with its owning room, as served by the latest feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFeedEntry {
    pub name: String,
    pub rating: f64,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub room_title: String,
    pub room_id: Uuid,
    pub room_image: String,
}

/// Flattens every room's reviews into one feed, newest first, capped at
/// [`LATEST_REVIEWS_LIMIT`]. The sort is stable, so same-instant reviews
/// keep their scan order.
pub fn latest_reviews(rooms: &[Room]) -> Vec<ReviewFeedEntry> {
    let mut feed: Vec<ReviewFeedEntry> = rooms
        .iter()
        .flat_map(|room| {
            room.reviews.iter().map(move |review| ReviewFeedEntry {
                name: review.name.clone(),
                rating: review.rating,
                comment: review.comment.clone(),
                date: review.date,
                room_title: room.title.clone(),
                room_id: room.id,
                room_image: room.image.clone(),
            })
        })
        .collect();
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(LATEST_REVIEWS_LIMIT);
    feed
}

/// One guest booking flattened out of its room for the my-bookings view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    pub image: String,
    pub date: DateTime<Utc>,
}

/// Scans every room's booked dates for entries belonging to `email`.
pub fn bookings_for(rooms: &[Room], email: &str) -> Vec<BookingRecord> {
    rooms
        .iter()
        .flat_map(|room| {
            room.booked_dates
                .iter()
                .filter(|booking| booking.email == email)
                .map(move |booking| BookingRecord {
                    booking_id: booking.id,
                    room_id: room.id,
                    title: room.title.clone(),
                    image: room.image.clone(),
                    date: booking.date,
                })
        })
        .collect()
}
