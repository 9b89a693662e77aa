use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{PersistedLayout, Room, RoomConfig};
use crate::store::RoomStore;

#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<Uuid, Room>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn list(&self, cinema_id: Option<&str>) -> Result<Vec<Room>, StoreError> {
        let rooms = self.rooms.read().await;
        let mut found: Vec<Room> = rooms
            .values()
            .filter(|room| cinema_id.map_or(true, |id| room.cinema_id == id))
            .cloned()
            .collect();
        found.sort_by_key(|room| room.created_at);
        Ok(found)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.read().await.get(&id).cloned())
    }

    async fn create(&self, room: Room) -> Result<Room, StoreError> {
        self.rooms.write().await.insert(room.id, room.clone());
        Ok(room)
    }

    async fn update(&self, id: Uuid, config: RoomConfig) -> Result<Option<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        Ok(rooms.get_mut(&id).map(|room| {
            room.apply(config);
            room.clone()
        }))
    }

    async fn update_layout(&self, id: Uuid, layout: PersistedLayout) -> Result<Option<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        Ok(rooms.get_mut(&id).map(|room| {
            room.seat_layout = layout;
            room.updated_at = Utc::now();
            room.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rooms.write().await.remove(&id).is_some())
    }
}
