use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::Booking;
use crate::query::PriceRange;
use crate::review::Review;
use crate::room::Room;

/// Boxed error surfaced by store implementations; the API layer maps it
/// to an internal error without leaking detail.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Data access for the room collection.
///
/// Implementations must apply each booking mutation as a single atomic
/// operation on the owning document: `book_room` flips availability and
/// appends in one step, `cancel_booking` removes and flips back in one
/// step. A zero-match result means the filter (room id, plus embedded
/// booking id where given) matched no document.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn insert_room(&self, room: &Room) -> Result<(), StoreError>;

    /// Filtered scan of the collection; `None` lists everything.
    async fn list_rooms(&self, filter: Option<PriceRange>) -> Result<Vec<Room>, StoreError>;

    async fn find_room(&self, id: Uuid) -> Result<Option<Room>, StoreError>;

    /// Sets `availability = false` and appends the booking, returning the
    /// updated document, or `None` when the room does not exist. Does not
    /// check prior availability; double-booking is allowed by design.
    async fn book_room(&self, room_id: Uuid, booking: &Booking)
        -> Result<Option<Room>, StoreError>;

    /// Replaces the date of one embedded booking in place, matching on
    /// room id AND booking id. Returns the number of matched documents.
    async fn update_booking_date(
        &self,
        room_id: Uuid,
        booking_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Removes the booking and sets `availability = true` regardless of
    /// remaining bookings. Returns the number of matched documents.
    async fn cancel_booking(&self, room_id: Uuid, booking_id: Uuid) -> Result<u64, StoreError>;

    /// Appends a review. Returns the number of matched documents.
    async fn add_review(&self, room_id: Uuid, review: &Review) -> Result<u64, StoreError>;
}
