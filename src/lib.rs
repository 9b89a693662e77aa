pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod store;

use std::sync::Arc;
use tracing::{info, warn};

use store::{MemoryRoomStore, PgRoomStore, RoomStore};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub cache: Option<cache::CacheService>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn RoomStore> = match &config.database.url {
            Some(url) => {
                let db = database::Database::connect(url, &config.database).await?;
                Arc::new(PgRoomStore::new(db))
            }
            None => {
                warn!("DATABASE_URL is not set, rooms are kept in memory");
                Arc::new(MemoryRoomStore::new())
            }
        };

        // Без Redis сервис работает, просто без кеша
        let cache = match (&config.redis.url, config.cache_enabled()) {
            (Some(url), true) => match redis_client::RedisClient::new(url).await {
                Ok(redis) => Some(cache::CacheService::new(redis, config.redis.layout_ttl_seconds)),
                Err(e) => {
                    warn!("Redis unavailable, layout cache disabled: {:?}", e);
                    None
                }
            },
            _ => None,
        };
        info!(cache = cache.is_some(), "Application state ready");

        Ok(Arc::new(Self { store, cache, config }))
    }

    pub fn with_store(config: config::Config, store: Arc<dyn RoomStore>) -> Arc<Self> {
        Arc::new(Self { store, cache: None, config })
    }
}
