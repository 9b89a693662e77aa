use crate::redis_client::RedisClient;

pub mod layouts;

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    layout_ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, layout_ttl_seconds: u64) -> Self {
        Self { redis, layout_ttl_seconds }
    }
}
