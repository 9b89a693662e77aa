use redis::{aio::ConnectionManager, Client};
use tracing::info;

#[derive(Clone)]
pub struct RedisClient {
    pub conn: ConnectionManager,
}

impl RedisClient {
    /// Менеджер соединения сам переподключается после обрыва.
    pub async fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Redis connected");
        Ok(RedisClient { conn })
    }
}
