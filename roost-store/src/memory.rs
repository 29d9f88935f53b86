use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use roost_core::query::PriceRange;
use roost_core::repository::{RoomRepository, StoreError};
use roost_core::{Booking, Review, Room};

/// In-memory room collection used by tests and dependency-free runs. One
/// write-lock hold per mutation gives the same per-document atomicity the
/// Postgres adapter gets from single-statement updates.
#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<Uuid, Room>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for MemoryRoomStore {
    async fn insert_room(&self, room: &Room) -> Result<(), StoreError> {
        self.rooms.write().await.insert(room.id, room.clone());
        Ok(())
    }

    async fn list_rooms(&self, filter: Option<PriceRange>) -> Result<Vec<Room>, StoreError> {
        let rooms = self.rooms.read().await;
        let mut listed: Vec<Room> = rooms
            .values()
            .filter(|room| filter.map_or(true, |range| range.contains(room.price)))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn find_room(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.read().await.get(&id).cloned())
    }

    async fn book_room(
        &self,
        room_id: Uuid,
        booking: &Booking,
    ) -> Result<Option<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        match rooms.get_mut(&room_id) {
            Some(room) => {
                room.availability = false;
                room.booked_dates.push(booking.clone());
                room.updated_at = Utc::now();
                Ok(Some(room.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_booking_date(
        &self,
        room_id: Uuid,
        booking_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            return Ok(0);
        };
        match room.booked_dates.iter_mut().find(|b| b.id == booking_id) {
            Some(booking) => {
                booking.date = date;
                room.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn cancel_booking(&self, room_id: Uuid, booking_id: Uuid) -> Result<u64, StoreError> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            return Ok(0);
        };
        let before = room.booked_dates.len();
        room.booked_dates.retain(|b| b.id != booking_id);
        if room.booked_dates.len() == before {
            return Ok(0);
        }
        // Cancellation of any single booking restores availability, even
        // if other bookings remain.
        room.availability = true;
        room.updated_at = Utc::now();
        Ok(1)
    }

    async fn add_review(&self, room_id: Uuid, review: &Review) -> Result<u64, StoreError> {
        let mut rooms = self.rooms.write().await;
        match rooms.get_mut(&room_id) {
            Some(room) => {
                room.reviews.push(review.clone());
                room.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
