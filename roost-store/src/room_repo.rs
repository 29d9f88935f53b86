use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use roost_core::query::PriceRange;
use roost_core::repository::{RoomRepository, StoreError};
use roost_core::{Booking, Review, Room};

/// Postgres-backed room collection: one JSONB document per room. Embedded
/// bookings and reviews are mutated with single-statement updates, so
/// each availability flip + array mutation pair is atomic. Embedded
/// bookings are matched with `@>` containment on their id.
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn doc_from_row(row: sqlx::postgres::PgRow) -> Result<Room, sqlx::Error> {
    row.try_get::<Json<Room>, _>("doc").map(|doc| doc.0)
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn insert_room(&self, room: &Room) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO rooms (id, doc) VALUES ($1, $2)")
            .bind(room.id)
            .bind(Json(room))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_rooms(&self, filter: Option<PriceRange>) -> Result<Vec<Room>, StoreError> {
        let range = filter.unwrap_or(PriceRange {
            above: None,
            up_to: None,
        });
        let rows = sqlx::query(
            r#"
            SELECT doc FROM rooms
            WHERE ($1::float8 IS NULL OR (doc->>'price')::float8 > $1)
              AND ($2::float8 IS NULL OR (doc->>'price')::float8 <= $2)
            ORDER BY created_at, id
            "#,
        )
        .bind(range.above)
        .bind(range.up_to)
        .fetch_all(&self.pool)
        .await?;

        let rooms = rows
            .into_iter()
            .map(doc_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    async fn find_room(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query("SELECT doc FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(doc_from_row).transpose()?)
    }

    async fn book_room(
        &self,
        room_id: Uuid,
        booking: &Booking,
    ) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE rooms
            SET doc = jsonb_set(
                    doc || jsonb_build_object('availability', false, 'updatedAt', to_jsonb(NOW())),
                    '{bookedDates}',
                    COALESCE(doc->'bookedDates', '[]'::jsonb) || $2
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING doc
            "#,
        )
        .bind(room_id)
        .bind(Json(booking))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(doc_from_row).transpose()?)
    }

    async fn update_booking_date(
        &self,
        room_id: Uuid,
        booking_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET doc = jsonb_set(
                    doc || jsonb_build_object('updatedAt', to_jsonb(NOW())),
                    '{bookedDates}',
                    (SELECT jsonb_agg(
                         CASE WHEN b->>'id' = $2
                              THEN jsonb_set(b, '{date}', $3)
                              ELSE b END)
                     FROM jsonb_array_elements(doc->'bookedDates') AS b)
                ),
                updated_at = NOW()
            WHERE id = $1
              AND doc->'bookedDates' @> jsonb_build_array(jsonb_build_object('id', $2::text))
            "#,
        )
        .bind(room_id)
        .bind(booking_id.to_string())
        .bind(Json(date))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn cancel_booking(&self, room_id: Uuid, booking_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET doc = jsonb_set(
                    doc || jsonb_build_object('availability', true, 'updatedAt', to_jsonb(NOW())),
                    '{bookedDates}',
                    COALESCE(
                        (SELECT jsonb_agg(b)
                         FROM jsonb_array_elements(doc->'bookedDates') AS b
                         WHERE b->>'id' <> $2),
                        '[]'::jsonb
                    )
                ),
                updated_at = NOW()
            WHERE id = $1
              AND doc->'bookedDates' @> jsonb_build_array(jsonb_build_object('id', $2::text))
            "#,
        )
        .bind(room_id)
        .bind(booking_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn add_review(&self, room_id: Uuid, review: &Review) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET doc = jsonb_set(
                    doc || jsonb_build_object('updatedAt', to_jsonb(NOW())),
                    '{reviews}',
                    COALESCE(doc->'reviews', '[]'::jsonb) || $2
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(room_id)
        .bind(Json(review))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
