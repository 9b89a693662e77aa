use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::error::StoreError;
use crate::models::{FlatSeat, PersistedLayout, Room, RoomConfig};
use crate::store::RoomStore;

const ROOM_COLUMNS: &str =
    "id, name, cinema_id, layout_rows, layout_cols, seats, vip_price, couple_price, created_at, updated_at";

#[derive(Clone)]
pub struct PgRoomStore {
    db: Database,
}

// Строка таблицы rooms
#[derive(Debug, FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    cinema_id: String,
    layout_rows: i32,
    layout_cols: i32,
    seats: Json<Vec<FlatSeat>>,
    vip_price: f64,
    couple_price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            cinema_id: row.cinema_id,
            seat_layout: PersistedLayout {
                rows: row.layout_rows.max(0) as usize,
                cols: row.layout_cols.max(0) as usize,
                seats: row.seats.0,
            },
            vip_price: row.vip_price,
            couple_price: row.couple_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PgRoomStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn list(&self, cinema_id: Option<&str>) -> Result<Vec<Room>, StoreError> {
        let rows = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms
             WHERE ($1::text IS NULL OR cinema_id = $1)
             ORDER BY created_at"
        ))
        .bind(cinema_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        Ok(row.map(Room::from))
    }

    async fn create(&self, room: Room) -> Result<Room, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "INSERT INTO rooms (id, name, cinema_id, layout_rows, layout_cols, seats, vip_price, couple_price, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ROOM_COLUMNS}"
        ))
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.cinema_id)
        .bind(room.seat_layout.rows as i32)
        .bind(room.seat_layout.cols as i32)
        .bind(Json(&room.seat_layout.seats))
        .bind(room.vip_price)
        .bind(room.couple_price)
        .bind(room.created_at)
        .bind(room.updated_at)
        .fetch_one(&self.db.pool)
        .await?;

        info!(room_id = %row.id, "room created");
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, config: RoomConfig) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "UPDATE rooms
             SET name = $2, cinema_id = $3, layout_rows = $4, layout_cols = $5, seats = $6,
                 vip_price = $7, couple_price = $8, updated_at = NOW()
             WHERE id = $1
             RETURNING {ROOM_COLUMNS}"
        ))
        .bind(id)
        .bind(&config.name)
        .bind(&config.cinema_id)
        .bind(config.seat_layout.rows as i32)
        .bind(config.seat_layout.cols as i32)
        .bind(Json(&config.seat_layout.seats))
        .bind(config.vip_price)
        .bind(config.couple_price)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(row.map(Room::from))
    }

    async fn update_layout(&self, id: Uuid, layout: PersistedLayout) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "UPDATE rooms
             SET layout_rows = $2, layout_cols = $3, seats = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {ROOM_COLUMNS}"
        ))
        .bind(id)
        .bind(layout.rows as i32)
        .bind(layout.cols as i32)
        .bind(Json(&layout.seats))
        .fetch_optional(&self.db.pool)
        .await?;

        if row.is_some() {
            info!(room_id = %id, seats = layout.seats.len(), "room layout saved");
        }
        Ok(row.map(Room::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
