use redis::AsyncCommands;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::CacheService;
use crate::models::PersistedLayout;

pub fn layout_key(room_id: Uuid) -> String {
    format!("room:{}:layout", room_id)
}

impl CacheService {
    /// Закешированная схема зала. Любая ошибка Redis - это промах.
    pub async fn get_cached_layout(&self, room_id: Uuid) -> Option<PersistedLayout> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = match conn.get::<_, Option<String>>(layout_key(room_id)).await {
            Ok(data) => data,
            Err(e) => {
                warn!("layout cache read failed for room {}: {:?}", room_id, e);
                return None;
            }
        };

        // Битая запись в кеше - тоже промах
        data.and_then(|json| serde_json::from_str(&json).ok())
    }

    pub async fn cache_layout(&self, room_id: Uuid, layout: &PersistedLayout) {
        let data = match serde_json::to_string(layout) {
            Ok(data) => data,
            Err(e) => {
                warn!("layout for room {} not cached: {:?}", room_id, e);
                return;
            }
        };

        let mut conn = self.redis.conn.clone();
        let result: Result<(), _> = conn.set_ex(layout_key(room_id), data, self.layout_ttl_seconds).await;
        if let Err(e) = result {
            warn!("layout cache write failed for room {}: {:?}", room_id, e);
        }
    }

    // Инвалидировать кеш схемы после сохранения или удаления зала
    pub async fn invalidate_layout(&self, room_id: Uuid) {
        let mut conn = self.redis.conn.clone();
        let result: Result<(), _> = conn.del(layout_key(room_id)).await;
        match result {
            Ok(()) => info!("Invalidated layout cache for room {}", room_id),
            Err(e) => warn!("layout cache invalidation failed for room {}: {:?}", room_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_per_room() {
        let id = Uuid::nil();
        assert_eq!(layout_key(id), "room:00000000-0000-0000-0000-000000000000:layout");
    }
}
