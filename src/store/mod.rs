//! Хранилище залов. Сервис знает только трейт `RoomStore`; Postgres
//! используется в проде, хранилище в памяти - в тестах и без DATABASE_URL.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{PersistedLayout, Room, RoomConfig};

pub use memory::MemoryRoomStore;
pub use postgres::PgRoomStore;

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn list(&self, cinema_id: Option<&str>) -> Result<Vec<Room>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Room>, StoreError>;

    async fn create(&self, room: Room) -> Result<Room, StoreError>;

    /// `None` when the room does not exist.
    async fn update(&self, id: Uuid, config: RoomConfig) -> Result<Option<Room>, StoreError>;

    async fn update_layout(&self, id: Uuid, layout: PersistedLayout) -> Result<Option<Room>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
